use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;

use super::{ChatClient, ChatReply, ChatRequest, LlmSettings};
use crate::error::{Result, SerialOllamaError};

/// Chat client for the Ollama `/api/chat` endpoint.
pub struct OllamaClient {
    client: Client,
    endpoint: String,
}

impl OllamaClient {
    pub fn new(settings: &LlmSettings) -> Self {
        OllamaClient {
            client: Client::new(),
            endpoint: chat_endpoint(&settings.host),
        }
    }

    /// get endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        info!("Sending chat request to {} (model {})", self.endpoint, request.model);
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Chat endpoint answered {status}: {body}");
            return Err(SerialOllamaError::llm(format!("{status}: {}", body.trim())));
        }

        let reply = response.json::<ChatReply>().await?;
        debug!("Chat reply has {} bytes", reply.content().len());
        Ok(reply)
    }
}

fn chat_endpoint(host: &str) -> String {
    format!("{}/api/chat", host.trim_end_matches('/'))
}
