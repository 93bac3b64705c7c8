//! Stateless HTTP relay between the chat client and the hosted model.

pub mod config;
pub mod coordinator;
pub mod errors;
pub mod http_server;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::RelayError;
pub use http_server::{build_router, run_server, AppState};
