//! Environment variable access.
//!
//! The resolver and writer only see the environment through [`EnvAccess`],
//! so tests and embedders can swap the process environment for a
//! [`MemoryEnv`].

use std::collections::HashMap;
use std::env;
use std::sync::Mutex;

/// Read/write access to a set of environment variables.
pub trait EnvAccess: Send + Sync {
    /// Value of `key`, or `None` when unset or not valid Unicode.
    fn get(&self, key: &str) -> Option<String>;

    /// Set `key` to `value`.
    fn set(&self, key: &str, value: &str);

    /// Remove `key`. Returns whether it was set before.
    fn remove(&self, key: &str) -> bool;
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvAccess for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }

    fn set(&self, key: &str, value: &str) {
        // SAFETY: the credential subsystem is single-threaded by contract;
        // callers sharing the environment across threads serialize access.
        unsafe { env::set_var(key, value) };
    }

    fn remove(&self, key: &str) -> bool {
        let was_set = env::var_os(key).is_some();
        // SAFETY: see `set`.
        unsafe { env::remove_var(key) };
        was_set
    }
}

/// An in-memory environment, isolated from the process.
#[derive(Debug, Default)]
pub struct MemoryEnv {
    vars: Mutex<HashMap<String, String>>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an environment pre-populated with `vars`.
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            vars: Mutex::new(vars),
        }
    }

    fn vars(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.vars.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl EnvAccess for MemoryEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.vars().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) -> bool {
        self.vars().remove(key).is_some()
    }
}
