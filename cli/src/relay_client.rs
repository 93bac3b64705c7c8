use async_trait::async_trait;
use log::debug;
use nittany_core::{RequestEnvelope, ResponseEnvelope};
use reqwest::Client;
use thiserror::Error;

/// Successful relay answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub reply: String,
    /// Informational only; never rendered
    pub model: String,
}

/// Why an exchange with the relay failed. Never shown to the user.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Relay returned HTTP {status}: {error}")]
    Status { status: u16, error: String },

    #[error("Failed to reach relay: {0}")]
    Network(String),

    #[error("Malformed relay response: {0}")]
    Malformed(String),
}

/// How the controller talks to the relay
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, envelope: &RequestEnvelope) -> Result<RelayReply, ExchangeError>;
}

/// HTTP transport posting JSON envelopes to the relay endpoint
#[derive(Debug, Clone)]
pub struct RelayClient {
    http_client: Client,
    url: String,
}

impl RelayClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RelayTransport for RelayClient {
    async fn send(&self, envelope: &RequestEnvelope) -> Result<RelayReply, ExchangeError> {
        debug!("Posting message to relay at {}", self.url);

        let response = self
            .http_client
            .post(&self.url)
            .json(envelope)
            .send()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error = match response.json::<ResponseEnvelope>().await {
                Ok(ResponseEnvelope::Error { error }) => error,
                _ => "Failed to get response".to_string(),
            };
            return Err(ExchangeError::Status {
                status: status.as_u16(),
                error,
            });
        }

        match response.json::<ResponseEnvelope>().await {
            Ok(ResponseEnvelope::Reply { reply, model }) => Ok(RelayReply { reply, model }),
            Ok(ResponseEnvelope::Error { error }) => Err(ExchangeError::Malformed(format!(
                "error body with success status: {}",
                error
            ))),
            Err(e) => Err(ExchangeError::Malformed(e.to_string())),
        }
    }
}
