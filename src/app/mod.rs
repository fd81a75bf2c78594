pub mod builder;
#[cfg(feature = "cli")]
pub mod runner;

pub use builder::{
    build_pipeline, default_tokenizer, run_build, DefaultPipeline, DefaultTokenizer, RunOptions,
};
#[cfg(feature = "cli")]
pub use runner::{run, Confirmation, PromptConfirmation, RunOutcome};
