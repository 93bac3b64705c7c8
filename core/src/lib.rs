// Core functionality shared by the relay and the chat client:
// - Provider client for the Anthropic Messages API
// - Wire envelopes and chat message model
// - Configuration loading
// - Shared error types

pub mod client;
pub use client::*;

pub mod types;
pub use types::*;

pub mod config;
pub use self::config::*;

pub mod errors;
pub use errors::*;

pub mod prompt;
pub use prompt::SYSTEM_PROMPT;
