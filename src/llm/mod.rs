//! # LLM Module
//!
//! The chat-completion seam used by the prompt pipeline.
//!
//! [`ChatClient`] is the abstraction the pipeline talks to; [`OllamaClient`]
//! implements it against a local Ollama server.

pub mod ollama;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use ollama::OllamaClient;

use crate::error::Result;

/// Default Ollama server address.
pub const DEFAULT_HOST: &str = "http://localhost:11434";

/// Default model the sensor reading is sent to.
pub const DEFAULT_MODEL: &str = "deepseek-r1:1.5b";

/// Chat endpoint settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LlmSettings {
    pub host: String,
    pub model: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        LlmSettings {
            host: DEFAULT_HOST.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Author of a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged chat message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Body of a non-streaming chat request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

impl ChatRequest {
    /// A request carrying a single user message.
    pub fn single_user(model: impl Into<String>, content: impl Into<String>) -> Self {
        ChatRequest {
            model: model.into(),
            messages: vec![ChatMessage::user(content)],
            stream: false,
        }
    }
}

/// The part of a chat response the pipeline reads.
///
/// The reply text lives at `message.content`; other fields are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub model: String,
    pub message: ChatMessage,
}

impl ChatReply {
    /// reply text
    pub fn content(&self) -> &str {
        &self.message.content
    }

    pub fn into_content(self) -> String {
        self.message.content
    }
}

/// A synchronous request/response chat capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request = ChatRequest::single_user("deepseek-r1:1.5b", "hello");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "deepseek-r1:1.5b",
                "messages": [{ "role": "user", "content": "hello" }],
                "stream": false
            })
        );
    }

    #[test]
    fn test_reply_reads_message_content() {
        let body = json!({
            "model": "deepseek-r1:1.5b",
            "created_at": "2025-01-29T10:00:00Z",
            "message": { "role": "assistant", "content": "{\"temperature\": 23.5}" },
            "done": true,
            "total_duration": 123456
        });
        let reply: ChatReply = serde_json::from_value(body).unwrap();
        assert_eq!(reply.message.role, Role::Assistant);
        assert_eq!(reply.content(), "{\"temperature\": 23.5}");
    }

    #[test]
    fn test_reply_without_message_is_rejected() {
        let body = json!({ "model": "x", "done": true });
        assert!(serde_json::from_value::<ChatReply>(body).is_err());
    }

    #[test]
    fn test_default_settings() {
        let settings = LlmSettings::default();
        assert_eq!(settings.host, "http://localhost:11434");
        assert_eq!(settings.model, "deepseek-r1:1.5b");
    }
}
