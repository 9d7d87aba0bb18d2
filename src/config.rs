//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/topictree/topictree.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `TOPICTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, TitleScope};

/// File name of the topic document inside the data directory.
pub const DOCUMENT_FILE_NAME: &str = "topics.xml";

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub title_scope: Option<TitleScope>,
    pub removal_secret: Option<String>,
}

/// Unified configuration for topictree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Topic document (default: `<XDG data dir>/topictree/topics.xml`)
    pub data_file: PathBuf,
    /// Where topic titles have to be unique
    pub title_scope: TitleScope,
    /// Hex SHA-256 digest of the secret guarding `remove`; no gate when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removal_secret: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            title_scope: TitleScope::default(),
            removal_secret: None,
        }
    }
}

fn default_data_file() -> PathBuf {
    ProjectDirs::from("", "", "topictree")
        .map(|dirs| dirs.data_dir().join(DOCUMENT_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DOCUMENT_FILE_NAME))
}

/// Get the XDG config directory for topictree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "topictree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("topictree.toml"))
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
            title_scope: overlay.title_scope.unwrap_or(self.title_scope),
            removal_secret: overlay
                .removal_secret
                .clone()
                .or_else(|| self.removal_secret.clone()),
        }
    }

    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_file.to_string_lossy().as_ref());
        self.data_file = PathBuf::from(expanded);
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional explicit config file (`--config`); it must exist
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), local)
    }

    /// Load from explicit layer files. A missing global file is skipped, a
    /// missing local file is an error.
    pub fn load_layers(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(local_path) = local {
            let raw = load_raw_settings(local_path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        Ok(current)
    }

    /// Apply TOPICTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TOPICTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("title_scope") {
            settings.title_scope = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("removal_secret") {
            settings.removal_secret = Some(val);
        }

        Ok(settings)
    }

    /// Render as TOML, as shown by `config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {e}"),
        })
    }
}
