//! Subcommands for the keygate CLI.

pub mod ask;
pub mod chat;
pub mod config;
pub mod console;
pub mod login;
pub mod prompts;
pub mod set_key;
pub mod status;
pub mod verify;

use std::path::PathBuf;

use clap::Args;
use keygate_core::InferenceClient;
use keygate_core::auth::{CredentialResolver, CredentialStore, CredentialWriter};

use crate::config::KeygateConfig;

/// Loaded configuration plus command-line overrides.
pub struct Context {
    pub config: KeygateConfig,
    env_file: Option<PathBuf>,
}

impl Context {
    pub fn new(config: KeygateConfig, env_file: Option<PathBuf>) -> Self {
        Self { config, env_file }
    }

    pub fn store(&self) -> CredentialStore {
        self.config.credential_store(self.env_file.as_deref())
    }

    pub fn resolver(&self) -> CredentialResolver {
        CredentialResolver::with_store(self.store())
    }

    pub fn writer(&self) -> CredentialWriter {
        CredentialWriter::with_store(self.store())
    }

    /// Build a client, resolving the key now.
    pub fn client(&self, api_key: Option<&str>) -> keygate_core::Result<InferenceClient> {
        InferenceClient::with_resolver(&self.resolver(), api_key, self.config.client_options())
    }
}

/// Options shared by the commands that talk to the API.
#[derive(Args, Debug, Clone, Default)]
pub struct ClientArgs {
    /// Model to use (defaults to the configured model)
    #[arg(long)]
    pub model: Option<String>,

    /// Maximum tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// API key to use instead of the environment or credentials file
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use keygate_core::auth::{CredentialSource, ENV_VAR};
    use keygate_core::{DEFAULT_MODEL, Error};
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn env_file_override_beats_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.env");
        let ctx = Context::new(KeygateConfig::default(), Some(path.clone()));
        assert_eq!(ctx.store().path(), path.as_path());
    }

    #[test]
    fn client_uses_configured_options() {
        let ctx = Context::new(KeygateConfig::default(), None);
        let client = ctx.client(Some("sk-ant-explicit")).unwrap();
        assert_eq!(client.options().model, DEFAULT_MODEL);
        assert_eq!(client.credential().source(), CredentialSource::Explicit);
    }

    #[test]
    #[serial]
    fn client_reads_file_from_override_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".env");
        std::fs::write(&path, format!("{ENV_VAR}=sk-ant-from-file\n")).unwrap();

        let saved = std::env::var(ENV_VAR).ok();
        unsafe { std::env::remove_var(ENV_VAR) };

        let ctx = Context::new(KeygateConfig::default(), Some(path));
        let client = ctx.client(None);

        if let Some(value) = saved {
            unsafe { std::env::set_var(ENV_VAR, value) };
        }

        let client = client.unwrap();
        assert_eq!(client.credential().source(), CredentialSource::File);
    }

    #[test]
    #[serial]
    fn client_without_any_key_fails() {
        let temp_dir = TempDir::new().unwrap();
        let saved = std::env::var(ENV_VAR).ok();
        unsafe { std::env::remove_var(ENV_VAR) };

        let ctx = Context::new(
            KeygateConfig::default(),
            Some(temp_dir.path().join("missing.env")),
        );
        let result = ctx.client(None);

        if let Some(value) = saved {
            unsafe { std::env::set_var(ENV_VAR, value) };
        }

        assert!(matches!(result, Err(Error::MissingCredential)));
    }
}
