//! Explorer configuration types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::KmsError;

/// Label shown for the native store root.
pub const DEFAULT_NATIVE_ROOT_LABEL: &str = "Quivr";

/// Configuration for the explorer model and front ends.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct ExplorerConfig {
    /// How long an expanded folder's listing may be reused after it is
    /// collapsed, in seconds. 0 re-fetches on every expand.
    #[builder(default = "0")]
    pub cache_ttl_secs: u64,

    /// Root label when exploring the native store.
    #[builder(default = "DEFAULT_NATIVE_ROOT_LABEL.to_string()")]
    pub native_root_label: String,

    /// Show the status column in the knowledge table.
    #[builder(default = "true")]
    pub show_status_column: bool,
}

impl ExplorerConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref label) = self.native_root_label {
            if label.trim().is_empty() {
                return Err("Native root label cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 0,
            native_root_label: DEFAULT_NATIVE_ROOT_LABEL.to_string(),
            show_status_column: true,
        }
    }
}

impl ExplorerConfig {
    /// Create a new config builder.
    pub fn builder() -> ExplorerConfigBuilder {
        ExplorerConfigBuilder::default()
    }

    /// Listing reuse window.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Default config file location.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("kms-explorer").join("config.toml"))
    }

    /// Load from the default location, or return defaults.
    pub fn load() -> Self {
        Self::config_path()
            .filter(|path| path.exists())
            .and_then(|path| match Self::load_from(&path) {
                Ok(config) => Some(config),
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring config file");
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Load from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self, KmsError> {
        let content = std::fs::read_to_string(path).map_err(|e| KmsError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| KmsError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), KmsError> {
        if self.native_root_label.trim().is_empty() {
            return Err(KmsError::InvalidConfig {
                message: "native_root_label cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ExplorerConfig::builder()
            .cache_ttl_secs(30u64)
            .native_root_label("Vault")
            .build()
            .unwrap();

        assert_eq!(config.cache_ttl(), Duration::from_secs(30));
        assert_eq!(config.native_root_label, "Vault");
        assert!(config.show_status_column);
    }

    #[test]
    fn test_config_builder_rejects_empty_label() {
        assert!(ExplorerConfig::builder().native_root_label("  ").build().is_err());
    }

    #[test]
    fn test_default_never_caches() {
        let config = ExplorerConfig::default();
        assert_eq!(config.cache_ttl(), Duration::ZERO);
        assert_eq!(config.native_root_label, DEFAULT_NATIVE_ROOT_LABEL);
    }
}
