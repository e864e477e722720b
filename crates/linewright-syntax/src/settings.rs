//! Parser settings.
//!
//! Settings are plain data, usually left at their defaults. A language
//! processor that wants to pin them down can ship a `linewright.toml`:
//!
//! ```toml
//! checklist = "tracking"
//! max-indent-depth = 4
//!
//! [checklist-overrides]
//! Literal = "always-complete"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use linewright_validity::ChecklistPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Conventional settings file name.
pub const SETTINGS_FILE: &str = "linewright.toml";

/// Errors loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file exists but could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Io {
        /// Path of the settings file.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid settings TOML.
    #[error("invalid settings: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Settings shared by every parse in a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParserSettings {
    /// Checklist policy for construct kinds without an override.
    pub checklist: ChecklistPolicy,
    /// Per-kind checklist policy, keyed by construct id.
    pub checklist_overrides: BTreeMap<String, ChecklistPolicy>,
    /// Deepest indented-block nesting accepted; unlimited when absent.
    pub max_indent_depth: Option<usize>,
}

impl ParserSettings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Fails if the text is not valid settings TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads settings from `path`, falling back to defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!("no parser settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        Self::from_toml_str(&contents)
    }

    /// Returns the checklist policy for the construct kind `id`.
    #[must_use]
    pub fn checklist_policy(&self, id: &str) -> ChecklistPolicy {
        self.checklist_overrides
            .get(id)
            .copied()
            .unwrap_or(self.checklist)
    }

    /// Returns true if `depth` exceeds the configured limit.
    #[must_use]
    pub fn exceeds_indent_limit(&self, depth: usize) -> bool {
        self.max_indent_depth.is_some_and(|max| depth > max)
    }
}
