//! Credential value types and the soft shape check.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

/// Environment variable and file key holding the API key.
pub const ENV_VAR: &str = "ANTHROPIC_API_KEY";

/// Prefix every current Anthropic API key starts with.
pub const API_KEY_PREFIX: &str = "sk-ant-";

/// Number of leading characters shown by [`mask`].
const MASK_VISIBLE: usize = 10;

/// A secure API key that prevents accidental logging.
///
/// The key is wrapped in `SecretString` which:
/// - Implements `Debug` as `"[REDACTED]"`
/// - Zeroizes memory on drop
/// - Requires explicit `.expose_secret()` to access the value
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Create a new API key from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Expose the secret key value.
    ///
    /// Use sparingly - only when actually sending to an API.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    /// Masked form safe for display and logs.
    pub fn masked(&self) -> String {
        mask(self.expose_secret())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Passed in by the caller.
    Explicit,
    /// Read from `ANTHROPIC_API_KEY`.
    Environment,
    /// Read from the credentials file.
    File,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Explicit => "explicit",
            Self::Environment => "environment",
            Self::File => "file",
        };
        f.write_str(name)
    }
}

/// A resolved, non-empty API key together with its origin.
///
/// Immutable once built. The resolver is the only producer of
/// `Environment` and `File` credentials.
#[derive(Debug, Clone)]
pub struct Credential {
    value: ApiKey,
    source: CredentialSource,
}

impl Credential {
    /// Build an explicit credential from a caller-supplied value.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidCredential` for an empty value, or one holding a
    /// NUL byte or line break.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if let Some(reason) = unusable_reason(&value) {
            return Err(Error::InvalidCredential(reason.to_string()));
        }
        Ok(Self::with_source(value, CredentialSource::Explicit))
    }

    pub(crate) fn with_source(value: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            value: ApiKey::new(value),
            source,
        }
    }

    pub fn value(&self) -> &ApiKey {
        &self.value
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }

    /// Whether the value follows the expected key shape.
    pub fn looks_valid(&self) -> bool {
        looks_valid(self.value.expose_secret())
    }
}

/// Why `value` cannot be stored or exported, if it cannot.
pub(crate) fn unusable_reason(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some("value is empty")
    } else if value.contains('\0') {
        Some("value contains a NUL byte")
    } else if value.contains(['\n', '\r']) {
        Some("value contains a line break")
    } else {
        None
    }
}

/// Soft shape check: `true` when the key starts with [`API_KEY_PREFIX`].
///
/// A `false` result is a warning, never a reason to reject the key.
pub fn looks_valid(value: &str) -> bool {
    value.trim().starts_with(API_KEY_PREFIX)
}

/// Render a key for display: the first ten characters followed by `...`.
///
/// Keys too short to hide anything are shown as `****`.
pub fn mask(value: &str) -> String {
    if value.chars().count() <= MASK_VISIBLE + 4 {
        return "****".to_string();
    }
    let visible: String = value.chars().take(MASK_VISIBLE).collect();
    format!("{visible}...")
}
