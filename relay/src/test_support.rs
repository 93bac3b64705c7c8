//! In-process provider double shared by the relay's unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use nittany_core::{
    CompletionProvider, ContentBlock, MessagesRequest, MessagesResponse, ProviderError,
    ProviderResult,
};

#[derive(Debug, Clone)]
pub enum MockOutcome {
    Reply { text: String, model: String },
    Unauthorized,
    Unavailable,
    EmptyContent,
}

impl MockOutcome {
    pub fn reply(text: &str, model: &str) -> Self {
        MockOutcome::Reply {
            text: text.to_string(),
            model: model.to_string(),
        }
    }
}

/// Records every call and answers with a fixed outcome
#[derive(Debug)]
pub struct MockProvider {
    outcome: MockOutcome,
    calls: Mutex<Vec<(String, MessagesRequest)>>,
}

impl MockProvider {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, MessagesRequest)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(
        &self,
        api_key: &str,
        request: &MessagesRequest,
    ) -> ProviderResult<MessagesResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((api_key.to_string(), request.clone()));

        match &self.outcome {
            MockOutcome::Reply { text, model } => Ok(MessagesResponse {
                id: Some("msg_test".to_string()),
                model: model.clone(),
                content: vec![ContentBlock {
                    block_type: Some("text".to_string()),
                    text: Some(text.clone()),
                }],
                stop_reason: Some("end_turn".to_string()),
            }),
            MockOutcome::Unauthorized => Err(ProviderError::Unauthorized(
                "authentication_error: invalid x-api-key".to_string(),
            )),
            MockOutcome::Unavailable => Err(ProviderError::RequestError(
                "Failed to send request: connection refused".to_string(),
            )),
            MockOutcome::EmptyContent => Ok(MessagesResponse {
                id: None,
                model: "m".to_string(),
                content: Vec::new(),
                stop_reason: None,
            }),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
