//! Non-interactive key persistence.

use anyhow::{Context as _, Result, bail};
use clap::Args;
use keygate_core::auth::{Credential, PersistenceMode};

use super::Context;
use super::prompts::{key_shape_warning, print_persist_result, print_warning, prompt_for_key};

#[derive(Args, Debug)]
pub struct SetKeyArgs {
    /// API key to save (prompted for when omitted)
    pub key: Option<String>,

    /// Where to save it: session, file or both
    #[arg(long, default_value_t = PersistenceMode::FileOnly)]
    pub mode: PersistenceMode,
}

pub fn run(args: SetKeyArgs, ctx: &Context) -> Result<()> {
    let key = match args.key {
        Some(key) => key.trim().to_string(),
        None => prompt_for_key()?,
    };
    if key.is_empty() {
        bail!("API key cannot be empty");
    }

    let credential = Credential::new(key)?;
    if !credential.looks_valid() {
        print_warning(&key_shape_warning());
    }

    let writer = ctx.writer();
    let result = writer
        .persist(&credential, args.mode)
        .with_context(|| format!("saving API key ({} mode)", args.mode))?;

    print_persist_result(&result, writer.store().path());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeygateConfig;
    use keygate_core::auth::{CredentialStore, ENV_VAR};
    use tempfile::TempDir;

    #[test]
    fn file_mode_writes_trimmed_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".env");
        std::fs::write(&path, "OTHER=1\n").unwrap();
        let ctx = Context::new(KeygateConfig::default(), Some(path.clone()));

        run(
            SetKeyArgs {
                key: Some("  sk-ant-cli-key \n".to_string()),
                mode: PersistenceMode::FileOnly,
            },
            &ctx,
        )
        .unwrap();

        let store = CredentialStore::new(&path);
        assert_eq!(
            store.get(ENV_VAR).unwrap().as_deref(),
            Some("sk-ant-cli-key")
        );
        assert_eq!(store.get("OTHER").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn blank_key_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".env");
        let ctx = Context::new(KeygateConfig::default(), Some(path.clone()));

        let err = run(
            SetKeyArgs {
                key: Some("   ".to_string()),
                mode: PersistenceMode::FileOnly,
            },
            &ctx,
        )
        .unwrap_err();

        assert!(err.to_string().contains("empty"));
        assert!(!path.exists());
    }

    #[test]
    fn unusual_key_is_still_saved() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".env");
        let ctx = Context::new(KeygateConfig::default(), Some(path.clone()));

        run(
            SetKeyArgs {
                key: Some("not-a-real-key".to_string()),
                mode: PersistenceMode::FileOnly,
            },
            &ctx,
        )
        .unwrap();

        assert_eq!(
            CredentialStore::new(&path).get(ENV_VAR).unwrap().as_deref(),
            Some("not-a-real-key")
        );
    }
}
