//! Effective-credential resolution.
//!
//! # Precedence
//!
//! First non-empty value wins, used exactly as given:
//! 1. Explicit override passed by the caller
//! 2. `ANTHROPIC_API_KEY` in the environment
//! 3. `ANTHROPIC_API_KEY` in the credentials file
//!
//! Every call re-reads the environment and the file.

use std::sync::Arc;

use tracing::{debug, warn};

use super::credential::{Credential, CredentialSource, ENV_VAR, looks_valid, mask};
use super::env::{EnvAccess, ProcessEnv};
use super::store::CredentialStore;
use crate::{Error, Result};

/// Snapshot of what resolution would currently yield, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStatus {
    /// Winning source, or `None` when no key is configured.
    pub source: Option<CredentialSource>,
    /// Masked key.
    pub masked: Option<String>,
    /// Key length in characters.
    pub length: usize,
    /// Result of the prefix check.
    pub looks_valid: bool,
    /// Whether `ANTHROPIC_API_KEY` is set to a non-empty value in the
    /// environment, whichever source won.
    pub env_set: bool,
}

impl CredentialStatus {
    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }
}

/// Determines the effective API key.
#[derive(Clone)]
pub struct CredentialResolver {
    env: Arc<dyn EnvAccess>,
    store: CredentialStore,
}

impl CredentialResolver {
    pub fn new(env: Arc<dyn EnvAccess>, store: CredentialStore) -> Self {
        Self { env, store }
    }

    /// Resolver over the process environment and `./.env`.
    pub fn from_process() -> Self {
        Self::new(Arc::new(ProcessEnv), CredentialStore::default_location())
    }

    /// Resolver over the process environment and a specific file.
    pub fn with_store(store: CredentialStore) -> Self {
        Self::new(Arc::new(ProcessEnv), store)
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Resolve the effective credential.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingCredential` when no source has a non-empty
    /// value, and `Error::Persistence` when the file exists but cannot be read.
    pub fn resolve(&self, explicit: Option<&str>) -> Result<Credential> {
        let credential = self.lookup(explicit)?.ok_or(Error::MissingCredential)?;

        if !credential.looks_valid() {
            warn!(
                key = %credential.value().masked(),
                source = %credential.source(),
                "API key does not start with the expected 'sk-ant-' prefix"
            );
        }
        Ok(credential)
    }

    /// Report the current resolution outcome without failing when absent.
    pub fn status(&self) -> Result<CredentialStatus> {
        let env_set = non_empty(self.env.get(ENV_VAR).as_deref()).is_some();
        let status = match self.lookup(None)? {
            Some(credential) => {
                let value = credential.value().expose_secret();
                CredentialStatus {
                    source: Some(credential.source()),
                    masked: Some(mask(value)),
                    length: value.chars().count(),
                    looks_valid: looks_valid(value),
                    env_set,
                }
            }
            None => CredentialStatus {
                source: None,
                masked: None,
                length: 0,
                looks_valid: false,
                env_set,
            },
        };
        Ok(status)
    }

    fn lookup(&self, explicit: Option<&str>) -> Result<Option<Credential>> {
        if let Some(value) = non_empty(explicit) {
            debug!("using explicit API key");
            return Ok(Some(Credential::with_source(
                value,
                CredentialSource::Explicit,
            )));
        }

        if let Some(value) = non_empty(self.env.get(ENV_VAR).as_deref()) {
            debug!(var = ENV_VAR, "using API key from environment");
            return Ok(Some(Credential::with_source(
                value,
                CredentialSource::Environment,
            )));
        }

        if let Some(value) = non_empty(self.store.get(ENV_VAR)?.as_deref()) {
            debug!(path = %self.store.path().display(), "using API key from credentials file");
            return Ok(Some(Credential::with_source(value, CredentialSource::File)));
        }

        Ok(None)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
