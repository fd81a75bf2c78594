pub mod error;
pub mod logger;
pub mod monitor;
pub mod progress;
pub mod validation;
