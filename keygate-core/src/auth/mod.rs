//! Credential management for the Anthropic API key.
//!
//! Resolution order is explicit override, then `ANTHROPIC_API_KEY` in the
//! environment, then the credentials file.
//!
//! # Example
//!
//! ```no_run
//! use keygate_core::auth::{Credential, CredentialResolver, CredentialWriter, PersistenceMode};
//!
//! # fn main() -> keygate_core::Result<()> {
//! let writer = CredentialWriter::from_process();
//! writer.persist(&Credential::new("sk-ant-...")?, PersistenceMode::Both)?;
//!
//! let credential = CredentialResolver::from_process().resolve(None)?;
//! println!("using key from {}", credential.source());
//! # Ok(())
//! # }
//! ```

mod credential;
mod env;
mod resolver;
mod store;
mod writer;

pub use credential::{
    API_KEY_PREFIX, ApiKey, Credential, CredentialSource, ENV_VAR, looks_valid, mask,
};
pub use env::{EnvAccess, MemoryEnv, ProcessEnv};
pub use resolver::{CredentialResolver, CredentialStatus};
pub use store::{CredentialStore, DEFAULT_FILE_NAME};
pub use writer::{CredentialWriter, PersistResult, PersistenceMode};
