use nittany_core::{
    create_chat_request, extract_text_from_response, CompletionProvider, RelayConfig,
    ResponseEnvelope,
};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::errors::RelayError;

/// Where a relay call got to. Nothing survives the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayStage {
    Received,
    Validated,
    Configured,
    Dispatched,
    Succeeded,
}

/// Pulls a non-blank `message` string out of a JSON object body
pub fn extract_message(body: &[u8]) -> Result<String, RelayError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "Request body is not JSON");
        RelayError::Validation
    })?;

    match value.get("message") {
        Some(Value::String(message)) if !message.trim().is_empty() => Ok(message.clone()),
        _ => Err(RelayError::Validation),
    }
}

/// Process a single chat message: validate, check the credential, make
/// exactly one provider call, and shape the reply.
pub async fn relay_message(
    config: &RelayConfig,
    provider: &dyn CompletionProvider,
    body: &[u8],
) -> Result<ResponseEnvelope, RelayError> {
    let mut stage = RelayStage::Received;
    debug!(stage = ?stage, body_len = body.len(), "Relay call received");

    let message = extract_message(body)?;
    stage = RelayStage::Validated;

    let api_key = config.api_key_from_env().ok_or_else(|| {
        error!(
            stage = ?stage,
            api_key_env = %config.api_key_env,
            "API key missing from environment"
        );
        RelayError::Configuration
    })?;
    stage = RelayStage::Configured;

    let request = create_chat_request(config, &message);
    debug!(stage = ?stage, message_len = message.len(), "Constructed provider request");

    stage = RelayStage::Dispatched;
    let response = provider
        .complete(&api_key, &request)
        .await
        .map_err(|e| {
            error!(
                stage = ?stage,
                provider = provider.provider_name(),
                error = %e,
                "Error calling provider"
            );
            RelayError::from(&e)
        })?;

    let reply = extract_text_from_response(&response).map_err(|e| {
        error!(
            stage = ?stage,
            provider = provider.provider_name(),
            error = %e,
            "Provider reply had no usable text"
        );
        RelayError::from(&e)
    })?;

    stage = RelayStage::Succeeded;
    info!(stage = ?stage, model = %response.model, reply_len = reply.len(), "Relayed reply");
    Ok(ResponseEnvelope::reply(reply, response.model))
}
