//! Local text generation and the chat assistant

pub mod assistant;
pub mod generator;
pub mod model_manager;
pub mod prompts;

pub use assistant::{ChatAssistant, FALLBACK_RESPONSE};
pub use generator::{Generator, T5Generator};
pub use model_manager::ModelManager;
