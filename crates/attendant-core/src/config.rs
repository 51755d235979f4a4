use crate::error::{AttendantError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// StoreBackend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreBackend {
    /// YAML files under `.attendant/events/`.
    #[default]
    File,
    /// A remote scheduler exposing the positions API.
    Http {
        base_url: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_timeout_secs() -> u64 {
    30
}

// ---------------------------------------------------------------------------
// ReconcileConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Area applied when the operator does not supply one.
    #[serde(default)]
    pub default_area: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub store: StoreBackend,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            store: StoreBackend::default(),
            reconcile: ReconcileConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(AttendantError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like `load`, but an uninitialized root yields the defaults.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        match Self::load(root) {
            Err(AttendantError::NotInitialized) => Ok(Self::new()),
            other => other,
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if let StoreBackend::Http {
            base_url,
            timeout_secs,
        } = &self.store
        {
            let url = base_url.trim();
            if url.is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "store.base_url is empty".to_string(),
                });
            } else if !url.starts_with("http://") && !url.starts_with("https://") {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("store.base_url '{url}' must start with http:// or https://"),
                });
            }
            if *timeout_secs == 0 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: "store.timeout_secs is 0; every request will time out".to_string(),
                });
            }
        }

        if matches!(&self.reconcile.default_area, Some(a) if a.trim().is_empty()) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "reconcile.default_area is blank; omit it instead".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
