//! Minimal inference client bound to one resolved credential.

use std::sync::Arc;

use tracing::warn;

use crate::Result;
use crate::auth::{Credential, CredentialResolver};
use crate::error::InferenceError;
use crate::providers::{
    AnthropicSurface, ConversationTurn, DEFAULT_BASE_URL, InferenceSurface, MessageRequest,
};

/// Model used when the caller does not name one.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Token limit used when the caller does not give one.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Prefix marking a rendered failure in the string-returning calls.
pub const ERROR_PREFIX: &str = "Error: ";

/// Defaults applied to every request made by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ClientOptions {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Sends messages to the inference surface using one credential.
///
/// The credential is resolved when the client is built, so a missing key
/// fails construction rather than the first request. To switch keys, build
/// a new client.
pub struct InferenceClient {
    credential: Credential,
    surface: Arc<dyn InferenceSurface>,
    options: ClientOptions,
}

impl InferenceClient {
    /// Resolve a credential from the process environment and `./.env`.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingCredential` if no key is available.
    pub fn new(explicit: Option<&str>) -> Result<Self> {
        Self::with_resolver(
            &CredentialResolver::from_process(),
            explicit,
            ClientOptions::default(),
        )
    }

    /// Resolve a credential with `resolver` and talk to the Anthropic API.
    pub fn with_resolver(
        resolver: &CredentialResolver,
        explicit: Option<&str>,
        options: ClientOptions,
    ) -> Result<Self> {
        let credential = resolver.resolve(explicit)?;
        let surface = AnthropicSurface::with_base_url(credential.value().clone(), &options.base_url);
        Ok(Self {
            credential,
            surface: Arc::new(surface),
            options,
        })
    }

    /// Build a client over an arbitrary surface.
    pub fn with_surface(
        credential: Credential,
        surface: Arc<dyn InferenceSurface>,
        options: ClientOptions,
    ) -> Self {
        Self {
            credential,
            surface,
            options,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Send a single user message and return the reply text.
    pub async fn try_send_message(
        &self,
        text: &str,
        model: Option<&str>,
        max_tokens: Option<u32>,
    ) -> std::result::Result<String, InferenceError> {
        let turns = [ConversationTurn::user(text)];
        self.try_chat(&turns, model, max_tokens).await
    }

    /// Send a conversation, oldest turn first, and return the reply text.
    pub async fn try_chat(
        &self,
        turns: &[ConversationTurn],
        model: Option<&str>,
        max_tokens: Option<u32>,
    ) -> std::result::Result<String, InferenceError> {
        if turns.is_empty() {
            return Err(InferenceError::invalid_request(
                "conversation must contain at least one turn",
            ));
        }

        let request = MessageRequest::new(
            model.unwrap_or(&self.options.model),
            max_tokens.unwrap_or(self.options.max_tokens),
            turns.to_vec(),
        );
        let response = self.surface.create_message(request).await?;

        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| InferenceError::malformed("response contained no text block"))
    }

    /// Like [`try_send_message`](Self::try_send_message), but failures come
    /// back as a string starting with [`ERROR_PREFIX`].
    pub async fn send_message(
        &self,
        text: &str,
        model: Option<&str>,
        max_tokens: Option<u32>,
    ) -> String {
        render(self.try_send_message(text, model, max_tokens).await)
    }

    /// Like [`try_chat`](Self::try_chat), but failures come back as a
    /// string starting with [`ERROR_PREFIX`].
    pub async fn chat(
        &self,
        turns: &[ConversationTurn],
        model: Option<&str>,
        max_tokens: Option<u32>,
    ) -> String {
        render(self.try_chat(turns, model, max_tokens).await)
    }

    /// Make one minimal request to check the key is accepted.
    pub async fn ping(&self) -> std::result::Result<(), InferenceError> {
        let request = MessageRequest::new(
            self.options.model.as_str(),
            1,
            vec![ConversationTurn::user("Hi")],
        );
        self.surface.create_message(request).await.map(|_| ())
    }
}

fn render(result: std::result::Result<String, InferenceError>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "inference request failed");
            format!("{ERROR_PREFIX}{e}")
        }
    }
}
