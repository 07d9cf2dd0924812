use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{decode_utf8_stream, ChatMessage, CompletionClient, CompletionConfig, CompletionError, CompletionRequest, CompletionStream};

/// Client for any endpoint implementing `/v1/chat/completions` with streaming.
///
/// Only connecting is bounded by a timeout; a stream may run as long as the
/// upstream keeps sending.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    client: Client,
    config: CompletionConfig,
}

impl OpenAiCompatibleClient {
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| CompletionError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    fn payload<'a>(&'a self, request: &'a CompletionRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: &request.messages,
            stream: true,
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    async fn stream_completion(&self, request: CompletionRequest) -> Result<CompletionStream, CompletionError> {
        let payload = self.payload(&request);
        debug!(
            model = %payload.model,
            messages = payload.messages.len(),
            "opening completion stream"
        );

        let mut req = self.client.post(&self.config.api_url).json(&payload);
        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await.map_err(|e| {
            error!(url = %self.config.api_url, error = %e, "completion request failed (transport)");
            CompletionError::Request(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            let message = error_message(&body);

            error!(%status, %message, "completion endpoint returned HTTP error");
            return Err(CompletionError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(decode_utf8_stream(response.bytes_stream()))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    max_tokens: u32,
}

// Error envelope used by OpenAI and compatible APIs.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let client = OpenAiCompatibleClient::new(CompletionConfig::default()).unwrap();
        let request = CompletionRequest {
            messages: vec![ChatMessage::system("Вы помощник"), ChatMessage::user("Поисковый запрос")],
        };

        let value = serde_json::to_value(client.payload(&request)).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "gpt-4.1-mini",
                "messages": [
                    {"role": "system", "content": "Вы помощник"},
                    {"role": "user", "content": "Поисковый запрос"}
                ],
                "stream": true,
                "max_tokens": 2000
            })
        );
    }

    #[test]
    fn test_error_message_parsing() {
        assert_eq!(
            error_message(r#"{"error": {"message": "invalid api key", "code": 401}}"#),
            "invalid api key"
        );
        assert_eq!(error_message("  upstream down \n"), "upstream down");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_request_error() {
        let config = CompletionConfig {
            api_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            connect_timeout: std::time::Duration::from_secs(2),
            ..CompletionConfig::default()
        };
        let client = OpenAiCompatibleClient::new(config).unwrap();

        let result = client
            .stream_completion(CompletionRequest {
                messages: vec![ChatMessage::user("test")],
            })
            .await;
        assert!(matches!(result, Err(CompletionError::Request(_))));
    }
}
