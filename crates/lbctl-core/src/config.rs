use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const TOKEN_ENV: &str = "LBCTL_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub actions: ActionsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        let dirs =
            ProjectDirs::from("dev", "lbctl", "lbctl").context("cannot locate config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(PathBuf::from).unwrap_or_else(|| {
            Config::default_path().unwrap_or_else(|_| PathBuf::from("./config.toml"))
        });
        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading config at {:?}", path))?;
            toml::from_str(&content).context("parsing config")?
        } else {
            Config::default()
        };
        cfg.expand_paths();
        Ok(cfg)
    }

    /// Applies `LBCTL_TOKEN` on top of whatever the file provided.
    pub fn apply_env(&mut self) {
        self.apply_token(std::env::var(TOKEN_ENV).ok());
    }

    pub fn apply_token(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.api.token = Some(token.trim().to_string());
        }
    }

    pub fn expand_paths(&mut self) {
        if let Some(file) = &self.logging.file {
            self.logging.file = Some(expand_tilde(file));
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "ApiConfig::default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "ApiConfig::default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            token: None,
            timeout: Self::default_timeout(),
        }
    }
}

impl ApiConfig {
    fn default_endpoint() -> String {
        "https://api.hetzner.cloud/v1".into()
    }

    fn default_timeout() -> Duration {
        Duration::from_secs(30)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsConfig {
    #[serde(default = "ActionsConfig::default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            poll_interval: Self::default_poll_interval(),
        }
    }
}

impl ActionsConfig {
    fn default_poll_interval() -> Duration {
        Duration::from_millis(500)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    fn default_level() -> String {
        "warn".into()
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if !path_str.starts_with('~') {
        return path.to_path_buf();
    }

    let home = BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    if path_str == "~" {
        home
    } else {
        let mut expanded = home;
        expanded.push(path_str.trim_start_matches("~/"));
        expanded
    }
}
