pub mod config;
pub mod error;
pub mod extraction;
pub mod model;
pub mod pipeline;
pub mod rules;

use error::TallyError;
use extraction::linearize::linearize;
use extraction::text::TextDocument;
use extraction::PagedDocument;
use pipeline::{AnalysisResult, CompiledPattern, ExtractionPattern};
use rules::collection::{resolve, RuleCollection};
use rules::schema::Rule;
use tracing::info;

/// Main API entry point: run the full pipeline over a decoded document with
/// the default extraction pattern and return the rendered report.
///
/// The rule is re-validated first; an invalid rule fails fast instead of
/// producing a report.
pub fn analyze(document: &dyn PagedDocument, rule: &Rule) -> Result<String, TallyError> {
    let pattern = ExtractionPattern::default().compile()?;
    Ok(analyze_with(document, rule, &pattern)?.report)
}

/// Run the full pipeline with a caller-supplied pattern and return the
/// structured result.
pub fn analyze_with(
    document: &dyn PagedDocument,
    rule: &Rule,
    pattern: &CompiledPattern,
) -> Result<AnalysisResult, TallyError> {
    rule.check()?;

    let linear = linearize(document)?;
    let result = pipeline::run(&linear, rule, pattern)?;

    info!(
        "analyzed {} page(s) with rule '{}': {} entr{}",
        result.pages,
        result.rule_name,
        result.entries.len(),
        if result.entries.len() == 1 { "y" } else { "ies" }
    );

    Ok(result)
}

/// Run the pipeline over text that was already extracted, with pages
/// separated by form feeds.
pub fn analyze_text(
    text: &str,
    rule: &Rule,
    pattern: &CompiledPattern,
) -> Result<AnalysisResult, TallyError> {
    analyze_with(&TextDocument::from_text(text), rule, pattern)
}

/// Select the rule for a run: the requested one if the collection has it,
/// otherwise the collection's default. Never falls back to a built-in rule.
pub fn resolve_rule<'a>(
    requested: Option<&str>,
    collection: &'a RuleCollection,
) -> Result<&'a Rule, TallyError> {
    resolve(requested, collection)
}
