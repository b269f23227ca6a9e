pub mod assistant;
pub mod config;
pub mod error;
pub mod llm;
pub mod plan;
pub mod prompts;
pub mod research;
pub mod respond;
pub mod session;
pub mod types;

pub use types::*;
