use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PixdexConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    pub cache_path: String,
    pub sidecar_path: String,
    pub albums_path: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Initial admin password, restored after the index is recreated.
    pub admin_password: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let dir = default_pixdex_dir();
        let path = |name: &str| dir.join(name).to_string_lossy().into_owned();
        Self {
            db_path: path("index.db"),
            cache_path: path("cache"),
            sidecar_path: path("sidecar"),
            albums_path: path("albums"),
        }
    }
}

/// Returns `~/.pixdex/`
pub fn default_pixdex_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pixdex")
}

/// Returns the default config file path: `~/.pixdex/config.toml`
pub fn default_config_path() -> PathBuf {
    default_pixdex_dir().join("config.toml")
}

impl PixdexConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            PixdexConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut String); 6] = [
            ("PIXDEX_DB", &mut self.storage.db_path),
            ("PIXDEX_CACHE_PATH", &mut self.storage.cache_path),
            ("PIXDEX_SIDECAR_PATH", &mut self.storage.sidecar_path),
            ("PIXDEX_ALBUMS_PATH", &mut self.storage.albums_path),
            ("PIXDEX_ADMIN_PASSWORD", &mut self.auth.admin_password),
            ("PIXDEX_LOG_LEVEL", &mut self.server.log_level),
        ];
        for (key, slot) in overrides {
            if let Ok(val) = std::env::var(key) {
                *slot = val;
            }
        }
    }

    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn cache_path(&self) -> PathBuf {
        expand_tilde(&self.storage.cache_path)
    }

    pub fn sidecar_path(&self) -> PathBuf {
        expand_tilde(&self.storage.sidecar_path)
    }

    pub fn albums_path(&self) -> PathBuf {
        expand_tilde(&self.storage.albums_path)
    }

    /// The configured admin password, `None` when unset or empty.
    pub fn admin_password(&self) -> Option<&str> {
        Some(self.auth.admin_password.as_str()).filter(|p| !p.is_empty())
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
