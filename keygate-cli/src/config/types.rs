use keygate_core::auth::{CredentialStore, DEFAULT_FILE_NAME};
use keygate_core::providers::DEFAULT_BASE_URL;
use keygate_core::{ClientOptions, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawKeygateConfig {
    #[serde(default)]
    pub credentials: RawCredentialsConfig,

    #[serde(default)]
    pub client: RawClientConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawCredentialsConfig {
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawClientConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct KeygateConfig {
    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub client: ClientConfig,
}

impl KeygateConfig {
    /// Credentials store, with `override_path` taking precedence over config.
    pub fn credential_store(&self, override_path: Option<&Path>) -> CredentialStore {
        match override_path {
            Some(path) => CredentialStore::new(path),
            None => CredentialStore::new(&self.credentials.file),
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::default()
            .with_base_url(&self.client.base_url)
            .with_model(&self.client.model)
            .with_max_tokens(self.client.max_tokens)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CredentialsConfig {
    /// Path of the KEY=VALUE credentials file
    pub file: PathBuf,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_FILE_NAME),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the Messages API
    pub base_url: String,

    /// Model used when none is given on the command line
    pub model: String,

    /// Token limit used when none is given on the command line
    pub max_tokens: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}
