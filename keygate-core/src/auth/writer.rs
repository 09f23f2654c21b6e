//! Persistence policy for a chosen credential.

use std::fmt;
use std::io::{self, ErrorKind};
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info};

use super::credential::{Credential, ENV_VAR, unusable_reason};
use super::env::{EnvAccess, ProcessEnv};
use super::store::CredentialStore;
use crate::{Error, Result};

/// Which destinations receive a new credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistenceMode {
    /// Process environment only; gone when the process exits.
    SessionOnly,
    /// Credentials file only.
    #[default]
    FileOnly,
    /// Environment first, then the file.
    Both,
}

impl PersistenceMode {
    pub fn writes_env(self) -> bool {
        matches!(self, Self::SessionOnly | Self::Both)
    }

    pub fn writes_file(self) -> bool {
        matches!(self, Self::FileOnly | Self::Both)
    }
}

impl fmt::Display for PersistenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SessionOnly => "session",
            Self::FileOnly => "file",
            Self::Both => "both",
        };
        f.write_str(name)
    }
}

impl FromStr for PersistenceMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "session" | "env" => Ok(Self::SessionOnly),
            "file" => Ok(Self::FileOnly),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "unknown persistence mode '{other}' (expected session, file, or both)"
            )),
        }
    }
}

/// What a [`CredentialWriter::persist`] call actually touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersistResult {
    pub wrote_env: bool,
    pub wrote_file: bool,
}

/// Writes a credential to the environment and/or the credentials file.
///
/// File writes merge into the existing file so unrelated keys survive.
/// `Both` is not transactional: if the file write fails the environment
/// has already been updated.
#[derive(Clone)]
pub struct CredentialWriter {
    env: Arc<dyn EnvAccess>,
    store: CredentialStore,
}

impl CredentialWriter {
    pub fn new(env: Arc<dyn EnvAccess>, store: CredentialStore) -> Self {
        Self { env, store }
    }

    /// Writer over the process environment and `./.env`.
    pub fn from_process() -> Self {
        Self::new(Arc::new(ProcessEnv), CredentialStore::default_location())
    }

    /// Writer over the process environment and a specific file.
    pub fn with_store(store: CredentialStore) -> Self {
        Self::new(Arc::new(ProcessEnv), store)
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Persist `credential` according to `mode`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Persistence` if the credentials file cannot be read
    /// or written. A value no destination of `mode` can hold is rejected
    /// with kind `InvalidInput` before anything is touched.
    pub fn persist(&self, credential: &Credential, mode: PersistenceMode) -> Result<PersistResult> {
        let value = credential.value().expose_secret();
        self.check_value(value, mode)?;
        let mut result = PersistResult::default();

        if mode.writes_env() {
            self.env.set(ENV_VAR, value);
            result.wrote_env = true;
            debug!(var = ENV_VAR, "set API key in session environment");
        }

        if mode.writes_file() {
            self.store.set(ENV_VAR, value)?;
            result.wrote_file = true;
        }

        info!(
            key = %credential.value().masked(),
            %mode,
            path = %self.store.path().display(),
            "persisted API key"
        );
        Ok(result)
    }

    fn check_value(&self, value: &str, mode: PersistenceMode) -> Result<()> {
        let reason = match unusable_reason(value) {
            Some(reason) => reason,
            // The file format trims values on read.
            None if mode.writes_file() && value.trim() != value => {
                "value has surrounding whitespace"
            }
            None => return Ok(()),
        };
        Err(Error::persistence(
            self.store.path(),
            io::Error::new(ErrorKind::InvalidInput, reason),
        ))
    }

    /// Remove the key from the session environment. The file is left alone.
    ///
    /// Returns whether a value was set.
    pub fn forget_session(&self) -> bool {
        let removed = self.env.remove(ENV_VAR);
        debug!(removed, "cleared API key from session environment");
        removed
    }
}
