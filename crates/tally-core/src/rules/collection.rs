use crate::error::TallyError;
use crate::rules::schema::Rule;
use std::collections::BTreeMap;
use tracing::warn;

/// Name under which a rule store may expose its default rule.
pub const DEFAULT_RULE_KEY: &str = "default";

/// A read-only set of validated rules keyed by name, with an optional
/// designated default.
#[derive(Debug, Clone, Default)]
pub struct RuleCollection {
    rules: BTreeMap<String, Rule>,
    default: Option<String>,
}

impl RuleCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule after re-validating it. Names must be unique.
    pub fn insert(&mut self, rule: Rule) -> Result<(), TallyError> {
        rule.check()?;
        if self.rules.contains_key(&rule.name) {
            return Err(TallyError::DuplicateRule(rule.name));
        }
        self.rules.insert(rule.name.clone(), rule);
        Ok(())
    }

    /// Record the store's default pointer without touching rule flags.
    ///
    /// An unknown name is ignored with a warning, since the store may point
    /// at a rule file that failed validation.
    pub(crate) fn set_default_pointer(&mut self, name: String) {
        if self.rules.contains_key(&name) {
            self.default = Some(name);
        } else {
            warn!("default rule '{}' is not in the collection, ignoring", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// The collection's default rule, if any.
    ///
    /// Checked in order: the explicit default pointer, a rule flagged
    /// `isDefault`, a rule named `default`.
    pub fn default_rule(&self) -> Option<&Rule> {
        if let Some(rule) = self.default.as_deref().and_then(|name| self.rules.get(name)) {
            return Some(rule);
        }

        let mut flagged = self.rules.values().filter(|r| r.is_default);
        if let Some(first) = flagged.next() {
            let others: Vec<&str> = flagged.map(|r| r.name.as_str()).collect();
            if !others.is_empty() {
                warn!(
                    "several rules are flagged as default; using '{}' and ignoring {}",
                    first.name,
                    others.join(", ")
                );
            }
            return Some(first);
        }

        self.rules.get(DEFAULT_RULE_KEY)
    }
}

/// Pick the rule governing a run: the requested rule when present in the
/// collection, otherwise the collection's default.
pub fn resolve<'a>(
    requested: Option<&str>,
    collection: &'a RuleCollection,
) -> Result<&'a Rule, TallyError> {
    if let Some(rule) = requested.and_then(|name| collection.get(name)) {
        return Ok(rule);
    }

    if let Some(name) = requested {
        warn!("requested rule '{}' not found, falling back to the default rule", name);
    }

    collection
        .default_rule()
        .ok_or_else(|| TallyError::NoRuleResolved {
            requested: requested.map(str::to_string),
        })
}
