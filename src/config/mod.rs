//! Console configuration.
//!
//! User-level config: `~/.category-console/config.yaml`
//! Project-level config: `.category-console/config.yaml` (overrides user keys)
//!
//! Resolution: user config → project config → `CATEGORY_CONSOLE_URL` →
//! command-line flags. Missing files are skipped; unparsable ones are
//! skipped with a warning.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::client::normalize_base_url;
use crate::console::{ConsoleResult, OperationKey};

pub const DEFAULT_BASE_URL: &str = "http://localhost:6666/api/";
pub const URL_ENV_VAR: &str = "CATEGORY_CONSOLE_URL";
const PROJECT_CONFIG: &str = ".category-console/config.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// API base; operation names are appended to it.
    pub base_url: String,
    pub timeout_secs: u64,
    /// Operation selected at startup (wire name, e.g. `getPath`).
    pub initial_operation: String,
    /// Table name the tree-only statement filter looks for.
    pub statement_filter: String,
    /// Start with the tree-only statement filter on.
    pub tree_only: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: 30,
            initial_operation: OperationKey::GetPath.as_str().into(),
            statement_filter: "category_tree".into(),
            tree_only: false,
        }
    }
}

/// One config file; absent keys leave the lower layer alone.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigLayer {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    initial_operation: Option<String>,
    statement_filter: Option<String>,
    tree_only: Option<bool>,
}

/// Path to `~/.category-console/config.yaml`.
fn user_config_path() -> Option<PathBuf> {
    #[cfg(windows)]
    let home = std::env::var("USERPROFILE").ok();
    #[cfg(not(windows))]
    let home = std::env::var("HOME").ok();

    home.map(|h| PathBuf::from(h).join(".category-console").join("config.yaml"))
}

impl ConsoleConfig {
    /// Load user + project files and the env override.
    pub fn load() -> Self {
        let mut config = Self::load_layers(user_config_path().as_deref(), Path::new(PROJECT_CONFIG));
        config.apply_env();
        config
    }

    /// Load exactly one file over the defaults, then the env override.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let layer = read_layer(path)?;
        let mut config = Self::default();
        config.merge(layer);
        config.apply_env();
        Ok(config)
    }

    fn load_layers(user: Option<&Path>, project: &Path) -> Self {
        let mut config = Self::default();
        for path in user.into_iter().chain(std::iter::once(project)) {
            if !path.exists() {
                continue;
            }
            match read_layer(path) {
                Ok(layer) => config.merge(layer),
                Err(e) => warn!("ignoring config: {e}"),
            }
        }
        config
    }

    fn merge(&mut self, layer: ConfigLayer) {
        if let Some(v) = layer.base_url {
            self.base_url = normalize_base_url(v);
        }
        if let Some(v) = layer.timeout_secs {
            self.timeout_secs = v;
        }
        if let Some(v) = layer.initial_operation {
            self.initial_operation = v;
        }
        if let Some(v) = layer.statement_filter {
            self.statement_filter = v;
        }
        if let Some(v) = layer.tree_only {
            self.tree_only = v;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(URL_ENV_VAR) {
            if !url.is_empty() {
                self.base_url = normalize_base_url(url);
            }
        }
    }

    /// Command-line override for the base URL.
    pub fn set_base_url(&mut self, url: String) {
        self.base_url = normalize_base_url(url);
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn initial_operation(&self) -> ConsoleResult<OperationKey> {
        self.initial_operation.parse()
    }
}

fn read_layer(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(ConfigLayer::default());
    }
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.base_url, "http://localhost:6666/api/");
        assert_eq!(config.initial_operation().unwrap(), OperationKey::GetPath);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(!config.tree_only);
    }

    #[test]
    fn project_overrides_user_per_key() {
        let dir = TempDir::new().unwrap();
        let user = write(
            &dir,
            "user.yaml",
            "base_url: http://db-host:6666/api\ntimeout_secs: 5\n",
        );
        let project = write(&dir, "project.yaml", "timeout_secs: 10\ntree_only: true\n");

        let config = ConsoleConfig::load_layers(Some(&user), &project);
        assert_eq!(config.base_url, "http://db-host:6666/api/");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.tree_only);
        assert_eq!(config.statement_filter, "category_tree");
    }

    #[test]
    fn missing_and_broken_files_fall_back() {
        let dir = TempDir::new().unwrap();
        let broken = write(&dir, "broken.yaml", "timeout_secs: [not a number\n");
        let config = ConsoleConfig::load_layers(Some(&broken), &dir.path().join("missing.yaml"));
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn load_file_reports_errors() {
        let dir = TempDir::new().unwrap();
        let err = ConsoleConfig::load_file(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let broken = write(&dir, "broken.yaml", "tree_only: maybe-not\n");
        let err = ConsoleConfig::load_file(&broken).unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn empty_file_is_defaults() {
        let dir = TempDir::new().unwrap();
        let empty = write(&dir, "empty.yaml", "\n");
        let config = ConsoleConfig::load_layers(None, &empty);
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn bad_initial_operation_is_an_error() {
        let config = ConsoleConfig {
            initial_operation: "dropEverything".into(),
            ..ConsoleConfig::default()
        };
        assert!(config.initial_operation().is_err());
    }

    #[test]
    fn round_trip_yaml() {
        let config = ConsoleConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: ConsoleConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }
}
