// src/llm/mod.rs
// Provider gateway: dispatch, prompt augmentation, structured-output
// recovery, and the offline simulator.

pub mod gateway;
pub mod prompt;
pub mod provider;
pub mod recovery;
pub mod simulator;
pub mod types;

pub use gateway::Gateway;
pub use types::{CompletionRequest, CompletionResult};
