//! Configuration for the extraction pipeline and rule lookup.

use crate::error::TallyError;
use crate::pipeline::pattern::ExtractionPattern;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    /// Extraction pattern shape.
    pub extraction: ExtractionPattern,

    /// Where rules are read from.
    pub rules: RulesConfig,
}

/// Rule store location. `file` (a `rules.json` store) wins over `dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Directory of `*.json` rule files.
    pub dir: PathBuf,

    /// Single-file rule store.
    pub file: Option<PathBuf>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("rules"),
            file: None,
        }
    }
}

impl RulesConfig {
    /// Path to load the rule collection from.
    pub fn source(&self) -> &Path {
        self.file.as_deref().unwrap_or(self.dir.as_path())
    }
}

impl TallyConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, TallyError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, TallyError> {
        Ok(serde_json::from_str(json)?)
    }
}
