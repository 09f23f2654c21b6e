//! Anthropic Messages API surface.
//!
//! # Example
//!
//! ```ignore
//! use keygate_core::auth::ApiKey;
//! use keygate_core::providers::AnthropicSurface;
//!
//! let surface = AnthropicSurface::new(ApiKey::new("sk-ant-..."));
//! let surface = AnthropicSurface::with_base_url(ApiKey::new("sk-ant-..."), "http://localhost:8080");
//! ```

use async_trait::async_trait;
use tracing::debug;

use super::types::ApiErrorBody;
use super::{InferenceSurface, MessageRequest, MessageResponse};
use crate::auth::ApiKey;
use crate::error::InferenceError;

/// Default Anthropic API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// API version sent in the `anthropic-version` header.
pub const API_VERSION: &str = "2023-06-01";

/// HTTP client bound to one API key.
pub struct AnthropicSurface {
    base_url: String,
    api_key: ApiKey,
    client: reqwest::Client,
}

impl AnthropicSurface {
    /// Create a surface pointing at the public API.
    pub fn new(api_key: ApiKey) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a surface with a custom base URL.
    pub fn with_base_url(api_key: ApiKey, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Get the base URL for this surface.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl InferenceSurface for AnthropicSurface {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn create_message(
        &self,
        request: MessageRequest,
    ) -> Result<MessageResponse, InferenceError> {
        let url = format!("{}/v1/messages", self.base_url);
        debug!(
            model = %request.model,
            turns = request.messages.len(),
            max_tokens = request.max_tokens,
            "sending message request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(parsed) => match parsed.error.kind {
                    Some(kind) => format!("{kind}: {}", parsed.error.message),
                    None => parsed.error.message,
                },
                Err(_) if body.is_empty() => status.to_string(),
                Err(_) => body,
            };
            return Err(InferenceError::from_status(status.as_u16(), message));
        }

        let body = response
            .text()
            .await
            .map_err(|e| InferenceError::network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| InferenceError::malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InferenceErrorKind;
    use crate::providers::ConversationTurn;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> MessageRequest {
        MessageRequest::new(
            "claude-3-5-sonnet-20241022",
            64,
            vec![ConversationTurn::user("Hello")],
        )
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let surface = AnthropicSurface::with_base_url(ApiKey::new("k"), "http://localhost:1/");
        assert_eq!(surface.base_url(), "http://localhost:1");
        assert_eq!(surface.name(), "anthropic");
    }

    #[test]
    fn default_base_url() {
        let surface = AnthropicSurface::new(ApiKey::new("k"));
        assert_eq!(surface.base_url(), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn sends_key_version_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", API_VERSION))
            .and(body_json(serde_json::json!({
                "model": "claude-3-5-sonnet-20241022",
                "max_tokens": 64,
                "messages": [{"role": "user", "content": "Hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"id":"msg_1","content":[{"type":"text","text":"Hi!"}],"stop_reason":"end_turn"}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let surface = AnthropicSurface::with_base_url(ApiKey::new("sk-ant-test"), mock_server.uri());
        let response = surface.create_message(request()).await.unwrap();

        assert_eq!(response.first_text(), Some("Hi!"));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#,
            ))
            .mount(&mock_server)
            .await;

        let surface = AnthropicSurface::with_base_url(ApiKey::new("sk-ant-bad"), mock_server.uri());
        let err = surface.create_message(request()).await.unwrap_err();

        assert!(err.is_auth());
        assert_eq!(err.message, "authentication_error: invalid x-api-key");
    }

    #[tokio::test]
    async fn rate_limit_maps_to_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let surface = AnthropicSurface::with_base_url(ApiKey::new("k"), mock_server.uri());
        let err = surface.create_message(request()).await.unwrap_err();

        assert_eq!(err.kind, InferenceErrorKind::RateLimited);
        assert!(err.message.contains("429"));
    }

    #[tokio::test]
    async fn plain_text_error_body_is_kept() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&mock_server)
            .await;

        let surface = AnthropicSurface::with_base_url(ApiKey::new("k"), mock_server.uri());
        let err = surface.create_message(request()).await.unwrap_err();

        assert_eq!(err.kind, InferenceErrorKind::Api { status: 502 });
        assert_eq!(err.message, "bad gateway");
    }

    #[tokio::test]
    async fn undecodable_body_is_malformed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let surface = AnthropicSurface::with_base_url(ApiKey::new("k"), mock_server.uri());
        let err = surface.create_message(request()).await.unwrap_err();

        assert_eq!(err.kind, InferenceErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        // Port 9 (discard) is not expected to serve HTTP.
        let surface = AnthropicSurface::with_base_url(ApiKey::new("k"), "http://127.0.0.1:9");
        let err = surface.create_message(request()).await.unwrap_err();

        assert_eq!(err.kind, InferenceErrorKind::Network);
    }
}
