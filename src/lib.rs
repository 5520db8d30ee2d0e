//! Job application assistant library

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod processing;
pub mod session;

pub use app::{resolve_role, AssistantApp, RoleChoice};
pub use config::Config;
pub use error::{AssistantError, Result};
