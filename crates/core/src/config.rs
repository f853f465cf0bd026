//! Site configuration.
//!
//! Resolution order: explicit path, `./yx.toml`, `~/.yx/config.toml`, then
//! built-in defaults. `YX_*` environment variables override file values:
//!
//! ```toml
//! [cms]
//! base_url = "http://127.0.0.1:1337"
//! timeout_secs = 10
//!
//! [search]
//! debounce_ms = 300
//! article_limit = 100
//!
//! [server]
//! port = 8080
//! ```

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::ConfigError;

/// Config file looked up in the working directory
const LOCAL_CONFIG_FILENAME: &str = "yx.toml";
/// Directory name in home
const YX_HOME_DIR: &str = ".yx";
const HOME_CONFIG_FILENAME: &str = "config.toml";

pub const ENV_CMS_URL: &str = "YX_CMS_URL";
pub const ENV_CMS_TIMEOUT_SECS: &str = "YX_CMS_TIMEOUT_SECS";
pub const ENV_HOST: &str = "YX_HOST";
pub const ENV_PORT: &str = "YX_PORT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub cms: CmsConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
}

/// Headless CMS connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// Origin of the CMS, or `<site>/api` when going through the proxy.
    pub base_url: String,
    pub timeout_secs: u64,
    /// Fall back to scanning article bodies for an image URL when no cover image is set.
    pub scan_body_images: bool,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:1337".to_string(),
            timeout_secs: 10,
            scan_body_images: true,
        }
    }
}

impl CmsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    /// How many recent articles are pulled into the corpus.
    pub article_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            article_limit: 100,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl SiteConfig {
    /// Find the config file to use, if any exists.
    pub fn discover(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILENAME);
        if local.exists() {
            return Some(local);
        }
        let home = dirs::home_dir()?.join(YX_HOME_DIR).join(HOME_CONFIG_FILENAME);
        home.exists().then_some(home)
    }

    /// Load configuration from disk and the process environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match Self::discover(explicit) {
            Some(path) => Self::read(&path)?,
            None => {
                debug!("No config file found, using defaults.");
                Self::default()
            }
        };
        config.apply_env(std::env::vars_os())?;
        Ok(config)
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Reading config file.");
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `YX_*` overrides from the given variables.
    ///
    /// Variables whose name is not UTF-8 are skipped; a `YX_*` variable with a
    /// non-UTF-8 value is an error.
    pub fn apply_env<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        for (key, value) in vars {
            let Ok(key) = key.into().into_string() else {
                continue;
            };
            if !matches!(
                key.as_str(),
                ENV_CMS_URL | ENV_CMS_TIMEOUT_SECS | ENV_HOST | ENV_PORT
            ) {
                continue;
            }
            let value = value
                .into()
                .into_string()
                .map_err(|raw| ConfigError::InvalidEnv {
                    key: key.clone(),
                    value: raw.to_string_lossy().into_owned(),
                })?;
            match key.as_str() {
                ENV_CMS_URL => self.cms.base_url = value,
                ENV_CMS_TIMEOUT_SECS => self.cms.timeout_secs = parse_env(&key, &value)?,
                ENV_HOST => self.server.host = value,
                ENV_PORT => self.server.port = parse_env(&key, &value)?,
                _ => {}
            }
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    })
}
