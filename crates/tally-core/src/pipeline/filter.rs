use crate::model::ExtractedRecord;
use crate::rules::schema::{Filters, Rule};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a record was dropped by the filter stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Unit not listed in `uom_include`.
    Unit,
    /// Identifier matches none of `material_prefix`.
    Prefix,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::Unit => write!(f, "unit not included by the rule"),
            ExclusionReason::Prefix => write!(f, "identifier prefix not included by the rule"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedRecord {
    pub record: ExtractedRecord,
    pub reason: ExclusionReason,
}

/// Check one record against the rule's filters. Empty lists accept anything.
pub fn check(record: &ExtractedRecord, filters: &Filters) -> Result<(), ExclusionReason> {
    if !filters.uom_include.is_empty() && !filters.uom_include.contains(&record.unit) {
        return Err(ExclusionReason::Unit);
    }
    if !filters.material_prefix.is_empty()
        && !filters
            .material_prefix
            .iter()
            .any(|prefix| record.identifier.starts_with(prefix.as_str()))
    {
        return Err(ExclusionReason::Prefix);
    }
    Ok(())
}

/// Keep the records accepted by the rule, preserving order.
pub fn filter(records: Vec<ExtractedRecord>, rule: &Rule) -> Vec<ExtractedRecord> {
    records
        .into_iter()
        .filter(|r| check(r, rule.filters()).is_ok())
        .collect()
}

/// Split records into the kept ones and the excluded ones with reasons.
/// Both halves preserve arrival order.
pub fn partition(
    records: Vec<ExtractedRecord>,
    rule: &Rule,
) -> (Vec<ExtractedRecord>, Vec<ExcludedRecord>) {
    let mut kept = Vec::new();
    let mut excluded = Vec::new();

    for record in records {
        match check(&record, rule.filters()) {
            Ok(()) => kept.push(record),
            Err(reason) => excluded.push(ExcludedRecord { record, reason }),
        }
    }

    (kept, excluded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::schema::RuleSet;
    use rust_decimal_macros::dec;

    fn records() -> Vec<ExtractedRecord> {
        vec![
            ExtractedRecord::new("BDA12345", dec!(10.5), "FT"),
            ExtractedRecord::new("WTK99999", dec!(3), "EA"),
            ExtractedRecord::new("ZZZ00001", dec!(1), "FT"),
        ]
    }

    fn rule(units: &[&str], prefixes: &[&str]) -> Rule {
        Rule::new("r", "", RuleSet::new(units, prefixes, 2))
    }

    #[test]
    fn test_empty_filters_keep_everything() {
        assert_eq!(filter(records(), &rule(&[], &[])), records());
    }

    #[test]
    fn test_unit_filter() {
        let kept = filter(records(), &rule(&["FT"], &[]));
        let ids: Vec<&str> = kept.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["BDA12345", "ZZZ00001"]);
    }

    #[test]
    fn test_prefix_filter() {
        let kept = filter(records(), &rule(&[], &["BDA", "WTK"]));
        let ids: Vec<&str> = kept.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["BDA12345", "WTK99999"]);
    }

    #[test]
    fn test_filters_compose() {
        let kept = filter(records(), &rule(&["FT"], &["BDA", "WTK"]));
        assert_eq!(kept, vec![ExtractedRecord::new("BDA12345", dec!(10.5), "FT")]);
    }

    #[test]
    fn test_unit_match_is_exact() {
        assert!(filter(records(), &rule(&["ft"], &[])).is_empty());
    }

    #[test]
    fn test_partition_reports_reasons() {
        let (kept, excluded) = partition(records(), &rule(&["FT"], &["BDA", "WTK"]));
        assert_eq!(kept.len(), 1);
        assert_eq!(excluded.len(), 2);
        assert_eq!(excluded[0].record.identifier, "WTK99999");
        assert_eq!(excluded[0].reason, ExclusionReason::Unit);
        assert_eq!(excluded[1].record.identifier, "ZZZ00001");
        assert_eq!(excluded[1].reason, ExclusionReason::Prefix);
    }
}
