use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::SendFailure;
use crate::personality::Personality;

pub const DEFAULT_API_URL: &str = "https://chatbot-api-server.onrender.com/api/chat";

/// Body posted to the chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub personality: Personality,
}

#[derive(Deserialize)]
struct ChatReply {
    reply: String,
}

/// Something that can turn a request into a reply.
///
/// The HTTP client is the real implementation; tests and headless callers
/// substitute their own.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<String, SendFailure>;
}

#[derive(Clone)]
pub struct HttpChatClient {
    client: Client,
    url: String,
}

impl HttpChatClient {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpChatClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[async_trait]
impl ChatBackend for HttpChatClient {
    async fn send(&self, request: &ChatRequest) -> Result<String, SendFailure> {
        tracing::debug!(personality = request.personality.value(), "posting chat request");

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SendFailure::Status(response.status()));
        }

        let body: ChatReply = response
            .json()
            .await
            .map_err(|e| SendFailure::MalformedResponse(e.to_string()))?;
        Ok(body.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = ChatRequest {
            message: "hello".to_string(),
            personality: Personality::Mirror,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"message": "hello", "personality": "mirror"}));
    }

    #[test]
    fn test_default_client_targets_fixed_endpoint() {
        assert_eq!(HttpChatClient::default().url(), DEFAULT_API_URL);
    }
}
