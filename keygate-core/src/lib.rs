//! Anthropic API key provisioning for keygate.
//!
//! This crate provides:
//! - Credential resolution with a fixed precedence order
//! - Persistence of the key to the session environment and/or a `.env` file
//! - A minimal Messages API client bound to the resolved key
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                   InferenceClient                      │
//! │        (send_message / chat over one credential)       │
//! └───────────────────────────────────────────────────────┘
//!             │ resolve                     │ create_message
//!             ▼                             ▼
//! ┌───────────────────────┐     ┌───────────────────────────┐
//! │  CredentialResolver   │     │     InferenceSurface      │
//! │ explicit > env > file │     │   (AnthropicSurface)      │
//! └───────────────────────┘     └───────────────────────────┘
//!             │
//!             ▼
//! ┌───────────────────────┐     ┌───────────────────────────┐
//! │   CredentialStore     │◀────│    CredentialWriter       │
//! │     (.env file)       │     │ (session / file / both)   │
//! └───────────────────────┘     └───────────────────────────┘
//! ```

mod error;

pub mod auth;
pub mod client;
pub mod providers;

pub use client::{
    ClientOptions, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, ERROR_PREFIX, InferenceClient,
};
pub use error::{Error, InferenceError, InferenceErrorKind, Result};
