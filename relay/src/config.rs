use nittany_core::RelayConfig;
use std::net::SocketAddr;

pub const DEFAULT_ENDPOINT: &str = "/api/claude-chat";
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub http_addr: SocketAddr,
    /// Path the chat endpoint is mounted on
    pub endpoint: String,
    pub provider: RelayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            http_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            provider: RelayConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(http_addr: SocketAddr, endpoint: impl Into<String>, provider: RelayConfig) -> Self {
        let endpoint = endpoint.into();
        let endpoint = if endpoint.starts_with('/') {
            endpoint
        } else {
            format!("/{}", endpoint)
        };

        Self {
            http_addr,
            endpoint,
            provider,
        }
    }
}
