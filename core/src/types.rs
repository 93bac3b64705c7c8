use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rendered turn. Fields are private so a message cannot change once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: Role,
    text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Payload the chat client posts to the relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub message: String,
}

impl RequestEnvelope {
    /// Returns `None` when the message is blank after trimming.
    pub fn new(message: impl Into<String>) -> Option<Self> {
        let message = message.into();
        if message.trim().is_empty() {
            None
        } else {
            Some(Self { message })
        }
    }
}

/// Body returned by the relay. Exactly one shape per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Reply { reply: String, model: String },
    Error { error: String },
}

impl ResponseEnvelope {
    pub fn reply(reply: impl Into<String>, model: impl Into<String>) -> Self {
        Self::Reply {
            reply: reply.into(),
            model: model.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }
}

/// Request body for the provider's Messages API
#[derive(Serialize, Debug, Clone)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<MessageParam>,
}

/// One conversational turn sent to the provider
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageParam {
    pub role: Role,
    pub content: String,
}

/// Response body from the provider's Messages API
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MessagesResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub model: String,
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Content block in a provider response. Only text blocks carry `text`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub block_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Error body the provider returns on non-success statuses
#[derive(Deserialize, Debug)]
pub struct ProviderErrorBody {
    pub error: ProviderErrorDetail,
}

#[derive(Deserialize, Debug)]
pub struct ProviderErrorDetail {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}
