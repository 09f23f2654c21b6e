//! The on-disk credentials file.
//!
//! A plain `KEY=VALUE` file in the `.env` style. The store only reads and
//! rewrites whole files; precedence lives in the resolver and merge policy
//! in the writer.
//!
//! # Format
//!
//! ```text
//! # Anthropic API key
//! # Keep this file out of version control
//!
//! ANTHROPIC_API_KEY=sk-ant-...
//! ```
//!
//! There is no quoting or escaping. Lines without `=`, and lines that are
//! not valid UTF-8, are skipped on read.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::{Error, Result};

/// Default file name, relative to the working directory.
pub const DEFAULT_FILE_NAME: &str = ".env";

const HEADER: &str = "# Anthropic API key\n# Keep this file out of version control\n\n";

/// Reads and writes the persisted credentials file.
///
/// No locking is done; concurrent writers race and the last full rewrite wins.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Create a store backed by `path`. The file need not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `.env` in the working directory.
    pub fn default_location() -> Self {
        Self::new(DEFAULT_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Parse the file into a map. A missing file reads as empty.
    pub fn read(&self) -> Result<BTreeMap<String, String>> {
        match fs::read(&self.path) {
            Ok(contents) => Ok(parse(&contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(Error::persistence(&self.path, e)),
        }
    }

    /// Replace the file's contents with `entries`.
    ///
    /// Parent directories are created as needed. Entries that cannot be
    /// represented in the format are rejected before anything is written.
    pub fn write(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        for (key, value) in entries {
            validate_entry(key, value).map_err(|e| Error::persistence(&self.path, e))?;
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::persistence(&self.path, e))?;
        }

        fs::write(&self.path, render(entries)).map_err(|e| Error::persistence(&self.path, e))?;
        debug!(path = %self.path.display(), entries = entries.len(), "wrote credentials file");
        Ok(())
    }

    /// Value of a single key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read()?.remove(key))
    }

    /// Set one key, keeping every other entry in the file.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read()?;
        entries.insert(key.to_string(), value.to_string());
        self.write(&entries)
    }
}

fn parse(contents: &[u8]) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    for (lineno, line) in contents.split(|&b| b == b'\n').enumerate() {
        let Ok(line) = std::str::from_utf8(line) else {
            trace!(line = lineno + 1, "skipping line that is not valid UTF-8");
            continue;
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            trace!(line = lineno + 1, "skipping line without '='");
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            trace!(line = lineno + 1, "skipping line with empty key");
            continue;
        }
        entries.insert(key.to_string(), value.trim().to_string());
    }
    entries
}

fn render(entries: &BTreeMap<String, String>) -> String {
    let mut out = String::from(HEADER);
    for (key, value) in entries {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

fn validate_entry(key: &str, value: &str) -> io::Result<()> {
    let invalid = |msg: String| Err(io::Error::new(ErrorKind::InvalidInput, msg));
    if key.trim().is_empty() {
        return invalid("empty key".to_string());
    }
    if key.contains('=') || key.starts_with('#') || key.trim() != key {
        return invalid(format!("key {key:?} cannot be stored"));
    }
    if key.contains(['\n', '\r']) || value.contains(['\n', '\r']) {
        return invalid(format!("entry {key:?} contains a line break"));
    }
    // Values are trimmed on read.
    if value.trim() != value {
        return invalid(format!("value for {key:?} has surrounding whitespace"));
    }
    Ok(())
}
