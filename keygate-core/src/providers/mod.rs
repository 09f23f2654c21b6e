//! Remote inference surface.
//!
//! The [`InferenceSurface`] trait is the seam between [`InferenceClient`]
//! and the network. [`AnthropicSurface`] talks to the real Messages API;
//! tests substitute their own implementation.
//!
//! [`InferenceClient`]: crate::InferenceClient
//!
//! # Example
//!
//! ```ignore
//! use keygate_core::providers::{InferenceSurface, MessageRequest, ConversationTurn};
//!
//! async fn ask(surface: &dyn InferenceSurface) {
//!     let request = MessageRequest::new(
//!         "claude-3-5-sonnet-20241022",
//!         1024,
//!         vec![ConversationTurn::user("Hello!")],
//!     );
//!
//!     let response = surface.create_message(request).await?;
//!     println!("Response: {:?}", response.first_text());
//! }
//! ```

mod anthropic;
mod types;

use async_trait::async_trait;

pub use anthropic::{API_VERSION, AnthropicSurface, DEFAULT_BASE_URL};
pub use types::{
    ContentBlock, ConversationTurn, MessageRequest, MessageResponse, Role, StopReason, Usage,
};

use crate::error::InferenceError;

/// A remote endpoint that turns a conversation into a reply.
///
/// Implementations make exactly one attempt per call: no retries, no
/// streaming.
#[async_trait]
pub trait InferenceSurface: Send + Sync {
    /// Surface identifier (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send one request and return the decoded response.
    async fn create_message(&self, request: MessageRequest)
    -> Result<MessageResponse, InferenceError>;
}
