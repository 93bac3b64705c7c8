use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::RelayConfig;
use crate::errors::{ProviderError, ProviderResult};
use crate::prompt::SYSTEM_PROMPT;
use crate::types::*;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Seam between the relay and the hosted model so tests can swap the provider out
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends one completion request. The key is passed per call because it is
    /// read from the environment on every request.
    async fn complete(
        &self,
        api_key: &str,
        request: &MessagesRequest,
    ) -> ProviderResult<MessagesResponse>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Client for the Anthropic Messages API
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http_client: Client,
    messages_url: String,
}

impl AnthropicClient {
    pub fn new(config: &RelayConfig) -> ProviderResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            messages_url: config.messages_url(),
        })
    }
}

#[async_trait]
impl CompletionProvider for AnthropicClient {
    async fn complete(
        &self,
        api_key: &str,
        request: &MessagesRequest,
    ) -> ProviderResult<MessagesResponse> {
        debug!(model = %request.model, url = %self.messages_url, "Sending completion request");

        let response = self
            .http_client
            .post(&self.messages_url)
            .header("x-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderErrorBody>(&error_body)
                .map(|body| format!("{}: {}", body.error.error_type, body.error.message))
                .unwrap_or(error_body);

            if status == StatusCode::UNAUTHORIZED {
                return Err(ProviderError::Unauthorized(message));
            }
            return Err(ProviderError::HttpError {
                status_code: status.as_u16(),
                message,
            });
        }

        response
            .json::<MessagesResponse>()
            .await
            .map_err(|e| ProviderError::ParsingError(format!("Failed to parse response: {}", e)))
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }
}

/// Builds the single-turn request: fixed instruction plus the user's message, nothing else.
pub fn create_chat_request(config: &RelayConfig, user_message: &str) -> MessagesRequest {
    MessagesRequest {
        model: config.model_name.clone(),
        max_tokens: config.max_tokens,
        system: SYSTEM_PROMPT.to_string(),
        messages: vec![MessageParam {
            role: Role::User,
            content: user_message.to_string(),
        }],
    }
}

/// Returns the first text segment of the reply
pub fn extract_text_from_response(response: &MessagesResponse) -> ProviderResult<String> {
    if response.content.is_empty() {
        return Err(ProviderError::EmptyResponse(
            "No content in response".to_string(),
        ));
    }

    response
        .content
        .iter()
        .find_map(|block| block.text.clone())
        .ok_or_else(|| ProviderError::EmptyResponse("No text in content".to_string()))
}
