use serde::{Deserialize, Serialize};

/// Precision used when a rule's `format` object omits `decimals`.
pub const DEFAULT_DECIMALS: u32 = 3;

/// Largest precision a rule may declare (the maximum scale of `Decimal`).
pub const MAX_DECIMALS: u32 = 28;

/// A named configuration describing which extracted records to keep and how
/// to format their totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub description: String,
    pub ruleset: RuleSet,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
}

/// The `filters`/`format` payload of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub filters: Filters,
    pub format: Format,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    /// Accepted unit tokens. Empty means any unit the extractor found.
    #[serde(default)]
    pub uom_include: Vec<String>,
    /// Accepted identifier prefixes. Empty means any identifier.
    #[serde(default)]
    pub material_prefix: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
        }
    }
}

fn default_decimals() -> u32 {
    DEFAULT_DECIMALS
}

impl Rule {
    pub fn new(name: impl Into<String>, description: impl Into<String>, ruleset: RuleSet) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ruleset,
            is_default: false,
        }
    }

    pub fn filters(&self) -> &Filters {
        &self.ruleset.filters
    }

    pub fn decimals(&self) -> u32 {
        self.ruleset.format.decimals
    }
}

impl RuleSet {
    pub fn new(uom_include: &[&str], material_prefix: &[&str], decimals: u32) -> Self {
        Self {
            filters: Filters {
                uom_include: uom_include.iter().map(|s| s.to_string()).collect(),
                material_prefix: material_prefix.iter().map(|s| s.to_string()).collect(),
            },
            format: Format { decimals },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_rule() {
        let json = r#"{
            "name": "ft-only",
            "description": "Feet of bar stock",
            "ruleset": {
                "filters": { "uom_include": ["FT"], "material_prefix": ["BDA", "WTK"] },
                "format": { "decimals": 2 }
            },
            "isDefault": true
        }"#;
        let rule: Rule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.name, "ft-only");
        assert_eq!(rule.filters().uom_include, vec!["FT"]);
        assert_eq!(rule.filters().material_prefix, vec!["BDA", "WTK"]);
        assert_eq!(rule.decimals(), 2);
        assert!(rule.is_default);
    }

    #[test]
    fn test_missing_filter_lists_mean_unfiltered() {
        let json = r#"{
            "name": "all",
            "description": "",
            "ruleset": { "filters": {}, "format": {} },
            "isDefault": false
        }"#;
        let rule: Rule = serde_json::from_str(json).unwrap();
        assert!(rule.filters().uom_include.is_empty());
        assert!(rule.filters().material_prefix.is_empty());
        assert_eq!(rule.decimals(), DEFAULT_DECIMALS);
    }

    #[test]
    fn test_serializes_is_default_in_camel_case() {
        let rule = Rule::new("x", "", RuleSet::new(&[], &[], 0));
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["isDefault"], serde_json::Value::Bool(false));
    }
}
