use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub trakt: TraktConfig,
    pub tmdb: TmdbConfig,
    pub storage: StorageConfig,
    pub http: HttpConfig,
    pub cache: CacheConfig,
    pub widget: WidgetConfig,
    pub profanity: ProfanityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraktConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_base: String,
    pub authorize_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    pub api_key: String,
    pub api_base: String,
    pub image_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub image_capacity: usize,
    pub css_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub max_recents: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfanityConfig {
    pub extra_words: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub directory: String,
}

impl AppConfig {
    /// Load config: user file (if exists) merged over built-in defaults, then
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let mut merged: toml::Value =
            toml::from_str(DEFAULT_CONFIG).map_err(|e| CoreError::Config(e.to_string()))?;

        let user_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        if user_path.exists() {
            let user_str = std::fs::read_to_string(&user_path)?;
            let user: toml::Value =
                toml::from_str(&user_str).map_err(|e| CoreError::Config(e.to_string()))?;
            merge(&mut merged, user);
        } else if path.is_some() {
            return Err(CoreError::Config(format!(
                "config file not found: {}",
                user_path.display()
            )));
        }

        let mut config: AppConfig = merged
            .try_into()
            .map_err(|e: toml::de::Error| CoreError::Config(e.to_string()))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override secrets and deployment settings from the environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("TRAKT_CLIENT_ID") {
            self.trakt.client_id = v;
        }
        if let Some(v) = lookup("TRAKT_CLIENT_SECRET") {
            self.trakt.client_secret = v;
        }
        if let Some(v) = lookup("TMDB_API_KEY") {
            self.tmdb.api_key = v;
        }
        if let Some(v) = lookup("BASE_URL") {
            self.server.base_url = v;
        }
        if let Some(v) = lookup("NOWWATCHING_BIND") {
            self.server.bind = v;
        }
        if let Some(v) = lookup("NOWWATCHING_DB") {
            self.storage.db_path = v;
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.server.base_url.trim_end_matches('/')
    }

    /// OAuth redirect URI registered with Trakt.
    pub fn redirect_uri(&self) -> String {
        format!("{}/trakt_callback", self.base_url())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs.max(1))
    }

    pub fn tmdb_api_key(&self) -> Option<String> {
        Some(self.tmdb.api_key.clone()).filter(|k| !k.is_empty())
    }

    pub fn log_directory(&self) -> Option<PathBuf> {
        Some(self.logging.directory.as_str())
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the credential database.
    pub fn db_path(&self) -> PathBuf {
        if !self.storage.db_path.is_empty() {
            return PathBuf::from(&self.storage.db_path);
        }
        Self::project_dirs()
            .map(|d| d.data_dir().join("nowwatching.db"))
            .unwrap_or_else(|| PathBuf::from("nowwatching.db"))
    }

    /// Ensure the data directory exists and return the DB path.
    pub fn ensure_db_path(&self) -> Result<PathBuf, CoreError> {
        let path = self.db_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "nowwatching")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

/// Recursively overlay `overlay` tables onto `base`.
fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.cache.image_capacity, 128);
        assert_eq!(config.widget.max_recents, 20);
        assert_eq!(config.tmdb.image_base, "https://image.tmdb.org/t/p/w300");
        assert!(config.tmdb_api_key().is_none());
    }

    #[test]
    fn test_partial_user_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nbase_url = \"https://badge.example/api/\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.base_url(), "https://badge.example/api");
        assert_eq!(config.server.bind, "0.0.0.0:5003");
        assert_eq!(config.http.timeout_secs, 10);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TRAKT_CLIENT_ID", "cid"),
            ("TMDB_API_KEY", "tmdb"),
            ("BASE_URL", "https://badge.example/api"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.trakt.client_id, "cid");
        assert_eq!(config.tmdb_api_key().as_deref(), Some("tmdb"));
        assert_eq!(
            config.redirect_uri(),
            "https://badge.example/api/trakt_callback"
        );
    }
}
