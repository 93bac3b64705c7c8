//! Chat client: single-flight controller, message rendering and the relay transport.

pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod logging;
pub mod relay_client;
pub mod render;

pub use controller::{ChatController, ChatView, Gate, APOLOGY_TEXT};
pub use relay_client::{ExchangeError, RelayClient, RelayReply, RelayTransport};
