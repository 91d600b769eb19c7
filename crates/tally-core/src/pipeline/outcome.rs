use crate::model::AggregateEntry;
use crate::pipeline::filter::ExcludedRecord;
use serde::Serialize;

/// Structured result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Name of the rule that was applied.
    pub rule_name: String,
    /// Decimal places used in the report.
    pub decimals: u32,
    /// Number of pages read from the document.
    pub pages: usize,
    /// Records found by the extractor before filtering.
    pub extracted: usize,
    /// Records that passed the rule's filters.
    pub kept: usize,
    /// Totals in report order.
    pub entries: Vec<AggregateEntry>,
    /// Records dropped by the filters, with the page they came from.
    pub excluded: Vec<ExcludedEntry>,
    /// The rendered report.
    pub report: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExcludedEntry {
    #[serde(flatten)]
    pub excluded: ExcludedRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
}
