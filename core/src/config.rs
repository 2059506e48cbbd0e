//! Client configuration.
//!
//! Loaded from an optional TOML file, then overridden by environment
//! variables. A missing file means defaults; a malformed one is an error.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::CatalogError;

pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api";
pub const DEFAULT_FAVORITES_KEY: &str = "favorites";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// API root, e.g. `https://rickandmortyapi.com/api`.
    pub base_url: String,
    /// Upper bound on a single request, enforced by the bundled transport.
    pub request_timeout_secs: u64,
    /// Key under which the favorites list is persisted.
    pub favorites_key: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            favorites_key: DEFAULT_FAVORITES_KEY.to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        toml::from_str(contents).map_err(|e| CatalogError::Config(e.to_string()))
    }

    /// Read `path` if it exists, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let config = match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                return Err(CatalogError::Config(format!(
                    "failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `CATALOG_BASE_URL` and `CATALOG_TIMEOUT_SECS` from `lookup`.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CatalogError> {
        if let Some(url) = lookup("CATALOG_BASE_URL") {
            self.base_url = url;
        }
        if let Some(raw) = lookup("CATALOG_TIMEOUT_SECS") {
            self.request_timeout_secs = raw.trim().parse().map_err(|_| {
                CatalogError::Config(format!("CATALOG_TIMEOUT_SECS is not a number: {raw}"))
            })?;
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
