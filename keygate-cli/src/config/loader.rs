use super::types::{
    ClientConfig, CredentialsConfig, KeygateConfig, RawClientConfig, RawCredentialsConfig,
    RawKeygateConfig,
};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<KeygateConfig> {
        let mut raw = RawKeygateConfig::default();

        // Layer 1: User config
        if let Some(user_path) = Self::user_config_path()
            && user_path.exists()
        {
            raw = Self::merge_raw(raw, Self::read_raw(&user_path)?);
        }

        // Layer 2: Project config
        let project_path = Self::project_config_path();
        if project_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(&project_path)?);
        }

        Ok(Self::finalize(raw))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "keygate").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with KEYGATE_PROJECT_CONFIG_DIR env var (useful for isolated e2e tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("KEYGATE_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".keygate/config.toml")
        }
    }

    fn read_raw(path: &Path) -> Result<RawKeygateConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawKeygateConfig, overlay: RawKeygateConfig) -> RawKeygateConfig {
        RawKeygateConfig {
            credentials: RawCredentialsConfig {
                file: overlay.credentials.file.or(base.credentials.file),
            },
            client: RawClientConfig {
                base_url: overlay.client.base_url.or(base.client.base_url),
                model: overlay.client.model.or(base.client.model),
                max_tokens: overlay.client.max_tokens.or(base.client.max_tokens),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawKeygateConfig) -> KeygateConfig {
        let credentials = CredentialsConfig::default();
        let client = ClientConfig::default();
        KeygateConfig {
            credentials: CredentialsConfig {
                file: raw.credentials.file.unwrap_or(credentials.file),
            },
            client: ClientConfig {
                base_url: raw.client.base_url.unwrap_or(client.base_url),
                model: raw.client.model.unwrap_or(client.model),
                max_tokens: raw.client.max_tokens.unwrap_or(client.max_tokens),
            },
        }
    }

    /// Load config from a specific path (for testing)
    #[cfg(test)]
    pub fn load_from_path(path: &Path) -> Result<KeygateConfig> {
        if path.exists() {
            Ok(Self::finalize(Self::read_raw(path)?))
        } else {
            Ok(KeygateConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_missing_path_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_from_path(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, KeygateConfig::default());
    }

    #[test]
    fn test_load_from_path_applies_defaults_to_unset_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[credentials]\nfile = \"secrets/.env\"\n").unwrap();

        let config = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(config.credentials.file, PathBuf::from("secrets/.env"));
        assert_eq!(config.client, ClientConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[client\nmodel = ").unwrap();

        let err = ConfigLoader::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("parsing"));
    }

    #[test]
    fn test_merge_overlay_wins_when_set() {
        let base = RawKeygateConfig {
            client: RawClientConfig {
                model: Some("base-model".to_string()),
                max_tokens: Some(100),
                ..Default::default()
            },
            ..Default::default()
        };
        let overlay = RawKeygateConfig {
            client: RawClientConfig {
                model: Some("overlay-model".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = ConfigLoader::finalize(ConfigLoader::merge_raw(base, overlay));
        assert_eq!(merged.client.model, "overlay-model");
        assert_eq!(merged.client.max_tokens, 100);
    }

    #[test]
    #[serial]
    fn test_project_config_dir_override() {
        unsafe {
            std::env::set_var("KEYGATE_PROJECT_CONFIG_DIR", "/tmp/keygate-test");
        }
        let path = ConfigLoader::project_config_path();
        unsafe {
            std::env::remove_var("KEYGATE_PROJECT_CONFIG_DIR");
        }
        assert_eq!(path, PathBuf::from("/tmp/keygate-test/config.toml"));
        assert_eq!(
            ConfigLoader::project_config_path(),
            PathBuf::from(".keygate/config.toml")
        );
    }
}
