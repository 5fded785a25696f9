use std::path::{Path, PathBuf};
use serde::Deserialize;
use anyhow::{Context, Result};

pub const DEFAULT_SECRET: &str = "change-me";

const ENV_LISTEN: &str = "ASSETD_LISTEN";
const ENV_SECRET: &str = "ASSETD_SECRET_KEY";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// JSON array of records inserted (if absent) at startup
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Signs the notice cookie
    #[serde(default = "default_secret")]
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    #[serde(default)]
    pub camera_index: u32,
    /// Upper bound on a live scan
    #[serde(default = "default_scan_timeout")]
    pub timeout_secs: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("/var/lib/asset-track/assets.db")
}

fn default_listen() -> String {
    "[::]:5000".to_string()
}

fn default_secret() -> String {
    DEFAULT_SECRET.to_string()
}

fn default_scan_timeout() -> u64 {
    30
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            seed_path: None,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            timeout_secs: default_scan_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    /// Apply `ASSETD_LISTEN` / `ASSETD_SECRET_KEY` on top of the file values
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(listen) = lookup(ENV_LISTEN).filter(|v| !v.is_empty()) {
            self.api.listen = listen;
        }
        if let Some(secret) = lookup(ENV_SECRET).filter(|v| !v.is_empty()) {
            self.session.secret = secret;
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.session.secret == DEFAULT_SECRET
    }
}
