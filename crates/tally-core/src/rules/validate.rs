use crate::rules::schema::MAX_DECIMALS;
use serde::Serialize;
use serde_json::{Map, Value};

/// How strict rule validation is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationProfile {
    /// Structural checks the extraction pipeline relies on.
    #[default]
    Standard,
    /// Rule-authoring checks: additionally requires a non-empty
    /// `uom_include` and an explicit `decimals`.
    Authoring,
}

/// Outcome of validating a rule value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    pub warnings: Vec<String>,
}

impl Validation {
    fn finish(warnings: Vec<String>) -> Self {
        Self {
            valid: warnings.is_empty(),
            warnings,
        }
    }
}

/// Validate an untyped rule with the standard profile.
pub fn validate(rule: &Value) -> Validation {
    validate_with(rule, ValidationProfile::Standard)
}

/// Validate an untyped rule.
///
/// Every check contributes its own warning; only a missing container object
/// or a missing `ruleset` stops validation early.
pub fn validate_with(rule: &Value, profile: ValidationProfile) -> Validation {
    let mut warnings = Vec::new();

    let Some(obj) = rule.as_object() else {
        warnings.push("rule must be a JSON object".to_string());
        return Validation::finish(warnings);
    };

    match obj.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => {}
        Some(Value::String(_)) => warnings.push("'name' must not be empty".into()),
        Some(_) => warnings.push("'name' must be a string".into()),
        None => warnings.push("'name' is missing".into()),
    }

    match obj.get("description") {
        Some(Value::String(_)) => {}
        Some(_) => warnings.push("'description' must be a string".into()),
        None => warnings.push("'description' is missing".into()),
    }

    let ruleset = match obj.get("ruleset") {
        Some(Value::Object(ruleset)) => ruleset,
        Some(_) => {
            warnings.push("'ruleset' must be an object".into());
            return Validation::finish(warnings);
        }
        None => {
            warnings.push("'ruleset' is missing".into());
            return Validation::finish(warnings);
        }
    };

    match ruleset.get("filters") {
        Some(Value::Object(filters)) => check_filters(filters, profile, &mut warnings),
        Some(_) => warnings.push("'ruleset.filters' must be an object".into()),
        None => {
            warnings.push("'ruleset.filters' is missing".into());
            if profile == ValidationProfile::Authoring {
                warnings.push("'ruleset.filters.uom_include' must list at least one unit".into());
            }
        }
    }

    match ruleset.get("format") {
        Some(Value::Object(format)) => check_format(format, profile, &mut warnings),
        Some(_) => warnings.push("'ruleset.format' must be an object".into()),
        None => warnings.push("'ruleset.format' is missing".into()),
    }

    match obj.get("isDefault") {
        Some(Value::Bool(_)) => {}
        Some(_) => warnings.push("'isDefault' must be a boolean".into()),
        None => warnings.push("'isDefault' is missing".into()),
    }

    Validation::finish(warnings)
}

fn check_filters(filters: &Map<String, Value>, profile: ValidationProfile, warnings: &mut Vec<String>) {
    let uom_len = check_string_list(filters, "uom_include", warnings);
    check_string_list(filters, "material_prefix", warnings);

    if profile == ValidationProfile::Authoring && uom_len.unwrap_or(0) == 0 {
        warnings.push("'ruleset.filters.uom_include' must list at least one unit".into());
    }
}

/// Returns the list length when `key` is a well-formed string list.
fn check_string_list(
    filters: &Map<String, Value>,
    key: &str,
    warnings: &mut Vec<String>,
) -> Option<usize> {
    match filters.get(key) {
        None => Some(0),
        Some(Value::Array(items)) => {
            if items.iter().all(Value::is_string) {
                Some(items.len())
            } else {
                warnings.push(format!("'ruleset.filters.{}' must contain only strings", key));
                None
            }
        }
        Some(_) => {
            warnings.push(format!("'ruleset.filters.{}' must be an array", key));
            None
        }
    }
}

fn check_format(format: &Map<String, Value>, profile: ValidationProfile, warnings: &mut Vec<String>) {
    match format.get("decimals") {
        None => {
            if profile == ValidationProfile::Authoring {
                warnings.push("'ruleset.format.decimals' is missing".into());
            }
        }
        Some(value) => match value.as_u64() {
            Some(d) if d <= u64::from(MAX_DECIMALS) => {}
            Some(_) => warnings.push(format!(
                "'ruleset.format.decimals' must be at most {}",
                MAX_DECIMALS
            )),
            None => warnings.push("'ruleset.format.decimals' must be a non-negative integer".into()),
        },
    }
}
