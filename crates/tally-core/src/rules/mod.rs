pub mod builtin;
pub mod collection;
pub mod schema;
pub mod validate;

use crate::error::TallyError;
use collection::RuleCollection;
use schema::Rule;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};
use validate::{validate_with, ValidationProfile};

impl Rule {
    /// Build a typed rule from an untyped value, rejecting it with every
    /// accumulated warning when validation fails.
    pub fn from_value(value: Value) -> Result<Rule, TallyError> {
        Rule::from_value_with(value, ValidationProfile::Standard)
    }

    pub fn from_value_with(value: Value, profile: ValidationProfile) -> Result<Rule, TallyError> {
        let validation = validate_with(&value, profile);
        if !validation.valid {
            return Err(TallyError::RuleValidation {
                rule: rule_label(&value),
                warnings: validation.warnings,
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Re-run standard validation on an already typed rule.
    pub fn check(&self) -> Result<(), TallyError> {
        let validation = validate::validate(&serde_json::to_value(self)?);
        if validation.valid {
            Ok(())
        } else {
            Err(TallyError::RuleValidation {
                rule: self.name.clone(),
                warnings: validation.warnings,
            })
        }
    }
}

fn rule_label(value: &Value) -> String {
    value
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("<unnamed>")
        .to_string()
}

/// Parse and validate a single rule from a JSON string.
pub fn parse_rule_str(json: &str) -> Result<Rule, TallyError> {
    let value: Value = serde_json::from_str(json)?;
    Rule::from_value(value)
}

/// Load and validate a single rule file.
pub fn load_rule(path: &Path) -> Result<Rule, TallyError> {
    load_rule_with(path, ValidationProfile::Standard)
}

pub fn load_rule_with(path: &Path, profile: ValidationProfile) -> Result<Rule, TallyError> {
    let content = std::fs::read_to_string(path).map_err(|e| TallyError::RuleLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|e| TallyError::RuleLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Rule::from_value_with(value, profile)
}

/// Load every `*.json` rule in a directory.
///
/// Files that fail to parse or validate are skipped with a warning; they
/// never enter the collection.
pub fn load_rule_dir(dir: &Path) -> Result<RuleCollection, TallyError> {
    let entries = std::fs::read_dir(dir).map_err(|e| TallyError::RuleLoad {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut collection = RuleCollection::new();
    for path in &paths {
        match load_rule(path).and_then(|rule| collection.insert(rule)) {
            Ok(()) => debug!("loaded rule file {}", path.display()),
            Err(e) => warn!("ignoring rule file {}: {}", path.display(), e),
        }
    }

    Ok(collection)
}

/// A single-file rule store: `{ "default": "<name>", "rules": [...] }`.
#[derive(Debug, Deserialize)]
struct RuleStore {
    #[serde(default)]
    default: Option<String>,
    rules: Vec<Value>,
}

/// Load a `rules.json` store. Invalid entries are skipped with a warning.
pub fn load_rule_store(path: &Path) -> Result<RuleCollection, TallyError> {
    let content = std::fs::read_to_string(path).map_err(|e| TallyError::RuleLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_rule_store(&content).map_err(|e| match e {
        TallyError::Json(json) => TallyError::RuleLoad {
            path: path.to_path_buf(),
            reason: json.to_string(),
        },
        other => other,
    })
}

/// Parse a rule store from a JSON string.
pub fn parse_rule_store(json: &str) -> Result<RuleCollection, TallyError> {
    let store: RuleStore = serde_json::from_str(json)?;

    let mut collection = RuleCollection::new();
    for (index, value) in store.rules.into_iter().enumerate() {
        match Rule::from_value(value).and_then(|rule| collection.insert(rule)) {
            Ok(()) => {}
            Err(e) => warn!("ignoring rule #{} of the store: {}", index, e),
        }
    }

    if let Some(name) = store.default {
        collection.set_default_pointer(name);
    }

    Ok(collection)
}

/// Load a collection from a rule directory or a `rules.json` store file.
pub fn load_collection(path: &Path) -> Result<RuleCollection, TallyError> {
    if path.is_dir() {
        load_rule_dir(path)
    } else {
        load_rule_store(path)
    }
}
