// Domain layer: core models, ports (interfaces) and pure services.
// Services depend only on the ports and on arrow for the table type.

pub mod model;
pub mod ports;

pub mod services;
