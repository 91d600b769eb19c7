pub mod aggregate;
pub mod filter;
pub mod outcome;
pub mod pattern;
pub mod report;

pub use aggregate::{aggregate, Aggregate};
pub use filter::{filter, partition, ExclusionReason};
pub use outcome::{AnalysisResult, ExcludedEntry};
pub use pattern::{extract, CompiledPattern, ExtractionPattern};

use crate::error::TallyError;
use crate::extraction::linearize::LinearText;
use crate::rules::schema::Rule;
use tracing::debug;

/// Run extraction, filtering, aggregation and formatting over linearized
/// text. Each stage consumes the full output of the previous one.
pub fn run(
    linear: &LinearText,
    rule: &Rule,
    pattern: &CompiledPattern,
) -> Result<AnalysisResult, TallyError> {
    let records = extract(linear.as_str(), pattern);
    let extracted = records.len();

    let (kept, excluded) = partition(records, rule);
    debug!(
        "rule '{}': {} record(s) extracted, {} kept, {} excluded",
        rule.name,
        extracted,
        kept.len(),
        excluded.len()
    );

    let totals = aggregate(&kept)?;
    let report = report::format(&totals, rule);

    let excluded = excluded
        .into_iter()
        .map(|e| ExcludedEntry {
            page: linear.page_of(e.record.offset),
            excluded: e,
        })
        .collect();

    Ok(AnalysisResult {
        rule_name: rule.name.clone(),
        decimals: rule.decimals(),
        pages: linear.page_count(),
        extracted,
        kept: kept.len(),
        entries: totals.entries().to_vec(),
        excluded,
        report,
    })
}
