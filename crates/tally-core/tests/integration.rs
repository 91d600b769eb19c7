//! Integration tests for analyze() end-to-end pipeline.
//!
//! Uses a MockDocument that hands out pre-built PageContent without
//! invoking pdftotext, so these tests run without poppler-utils.

use rust_decimal_macros::dec;
use tally_core::config::TallyConfig;
use tally_core::error::TallyError;
use tally_core::extraction::{PageContent, PagedDocument};
use tally_core::pipeline::ExclusionReason;
use tally_core::rules::collection::RuleCollection;
use tally_core::rules::schema::{Rule, RuleSet};
use tally_core::rules::{builtin, load_collection, parse_rule_store};
use tally_core::{analyze, analyze_text, analyze_with, resolve_rule};

struct MockDocument {
    pages: Vec<Result<PageContent, String>>,
}

impl MockDocument {
    fn new(pages: Vec<PageContent>) -> Self {
        Self {
            pages: pages.into_iter().map(Ok).collect(),
        }
    }
}

impl PagedDocument for MockDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<PageContent, TallyError> {
        match self.pages.get(index - 1) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(reason)) => Err(TallyError::DocumentRead {
                page: index,
                reason: reason.clone(),
            }),
            None => Err(TallyError::DocumentRead {
                page: index,
                reason: "no such page".into(),
            }),
        }
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn page(number: usize, lines: &[&str]) -> PageContent {
    PageContent::from_texts(number, lines)
}

fn rule(name: &str, units: &[&str], prefixes: &[&str], decimals: u32) -> Rule {
    Rule::new(name, "", RuleSet::new(units, prefixes, decimals))
}

const SCENARIO: &str = "BDA12345 qty 10.5 FT some other text WTK99999 3 EA";

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------
#[test]
fn scenario_unit_filter_excludes_each() {
    let doc = MockDocument::new(vec![page(1, &[SCENARIO])]);
    let r = rule("ft-only", &["FT"], &["BDA", "WTK"], 2);

    let report = analyze(&doc, &r).unwrap();

    assert_eq!(report, "* BDA12345 → 10.50 FT\n");
}

#[test]
fn scenario_no_filters_keeps_everything() {
    let doc = MockDocument::new(vec![page(1, &[SCENARIO])]);
    let r = rule("all", &[], &[], 0);

    let report = analyze(&doc, &r).unwrap();

    // 10.5 rounds half away from zero
    assert_eq!(report, "* BDA12345 → 11 FT\n* WTK99999 → 3 EA\n");
}

#[test]
fn scenario_structured_result() {
    let doc = MockDocument::new(vec![page(1, &[SCENARIO])]);
    let r = rule("ft-only", &["FT"], &["BDA", "WTK"], 2);
    let pattern = TallyConfig::default().extraction.compile().unwrap();

    let result = analyze_with(&doc, &r, &pattern).unwrap();

    assert_eq!(result.rule_name, "ft-only");
    assert_eq!(result.pages, 1);
    assert_eq!(result.extracted, 2);
    assert_eq!(result.kept, 1);
    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].total, dec!(10.5));
    assert_eq!(result.excluded.len(), 1);
    assert_eq!(result.excluded[0].excluded.record.identifier, "WTK99999");
    assert_eq!(result.excluded[0].excluded.reason, ExclusionReason::Unit);
    assert_eq!(result.excluded[0].page, Some(1));
}

// ---------------------------------------------------------------------------
// Aggregation across pages
// ---------------------------------------------------------------------------
#[test]
fn totals_sum_across_pages() {
    let doc = MockDocument::new(vec![
        page(1, &["Bill of materials", "BDA12345 length 4.25 FT"]),
        page(2, &["BDA12345 2 EA", "BDA12345 extra run 1.125 FT"]),
        page(3, &["WTK00001 7 MT", "BDA12345 0.625 FT"]),
    ]);
    let r = rule("all", &[], &[], 3);

    let report = analyze(&doc, &r).unwrap();

    assert_eq!(
        report,
        "* BDA12345 → 6.000 FT\n* BDA12345 → 2.000 EA\n* WTK00001 → 7.000 MT\n"
    );
}

#[test]
fn excluded_records_carry_their_page() {
    let doc = MockDocument::new(vec![
        page(1, &["BDA12345 1 FT"]),
        page(2, &["XYZ77777 5 FT"]),
    ]);
    let r = rule("bda", &[], &["BDA"], 0);
    let pattern = TallyConfig::default().extraction.compile().unwrap();

    let result = analyze_with(&doc, &r, &pattern).unwrap();

    assert_eq!(result.excluded.len(), 1);
    assert_eq!(result.excluded[0].excluded.reason, ExclusionReason::Prefix);
    assert_eq!(result.excluded[0].page, Some(2));
}

// ---------------------------------------------------------------------------
// Determinism and filter monotonicity
// ---------------------------------------------------------------------------
#[test]
fn same_input_same_report() {
    let doc = MockDocument::new(vec![
        page(1, &[SCENARIO]),
        page(2, &["MT-2000-A 12.5 MT", "BDA12345 3 FT"]),
    ]);
    let r = rule("all", &[], &[], 1);

    let first = analyze(&doc, &r).unwrap();
    let second = analyze(&doc, &r).unwrap();

    assert_eq!(first, second);
}

#[test]
fn adding_a_filter_never_grows_the_result() {
    let text = "BDA12345 4 FT\nWTK99999 3 EA\nXYZ00001 2 MT\nBDA67890 1 EA\n";
    let pattern = TallyConfig::default().extraction.compile().unwrap();

    let open = analyze_text(text, &rule("open", &[], &[], 0), &pattern).unwrap();
    let by_unit = analyze_text(text, &rule("unit", &["EA"], &[], 0), &pattern).unwrap();
    let by_both = analyze_text(text, &rule("both", &["EA"], &["BDA"], 0), &pattern).unwrap();

    assert_eq!(open.entries.len(), 4);
    assert_eq!(by_unit.entries.len(), 2);
    assert_eq!(by_both.entries.len(), 1);
    for (narrow, wide) in [(&by_unit, &open), (&by_both, &by_unit)] {
        for entry in &narrow.entries {
            let wider = wide
                .entries
                .iter()
                .find(|e| e.identifier == entry.identifier && e.unit == entry.unit)
                .expect("narrower rule produced a key the wider rule lacks");
            assert!(entry.total <= wider.total);
        }
    }
}

// ---------------------------------------------------------------------------
// Empty results
// ---------------------------------------------------------------------------
#[test]
fn no_matches_yields_empty_line() {
    let doc = MockDocument::new(vec![page(1, &["Nothing to count here."])]);
    let r = rule("ft-only", &["FT"], &[], 2);

    let report = analyze(&doc, &r).unwrap();

    assert_eq!(report, "No data matched the filters of rule 'ft-only'.\n");
}

#[test]
fn everything_filtered_yields_empty_line() {
    let doc = MockDocument::new(vec![page(1, &[SCENARIO])]);
    let r = rule("meters", &["MT"], &[], 2);

    let report = analyze(&doc, &r).unwrap();

    assert_eq!(report, "No data matched the filters of rule 'meters'.\n");
}

#[test]
fn empty_document_yields_empty_line() {
    let doc = MockDocument::new(vec![]);
    let r = rule("any", &[], &[], 0);

    let report = analyze(&doc, &r).unwrap();

    assert_eq!(report, "No data matched the filters of rule 'any'.\n");
}

// ---------------------------------------------------------------------------
// Rule resolution
// ---------------------------------------------------------------------------
#[test]
fn resolver_precedence() {
    let mut both = RuleCollection::new();
    both.insert(rule("X", &["FT"], &[], 2)).unwrap();
    both.insert(rule("default", &["EA"], &[], 0)).unwrap();

    assert_eq!(resolve_rule(Some("X"), &both).unwrap().name, "X");
    assert_eq!(resolve_rule(None, &both).unwrap().name, "default");
    assert_eq!(resolve_rule(Some("missing"), &both).unwrap().name, "default");

    let empty = RuleCollection::new();
    assert!(matches!(
        resolve_rule(Some("X"), &empty),
        Err(TallyError::NoRuleResolved { .. })
    ));
}

#[test]
fn store_default_drives_analysis() {
    let store = r#"{
        "default": "each",
        "rules": [
            {
                "name": "feet",
                "description": "Feet only",
                "ruleset": { "filters": { "uom_include": ["FT"] }, "format": { "decimals": 2 } },
                "isDefault": false
            },
            {
                "name": "each",
                "description": "Each only",
                "ruleset": { "filters": { "uom_include": ["EA"] }, "format": { "decimals": 0 } },
                "isDefault": false
            }
        ]
    }"#;
    let collection = parse_rule_store(store).unwrap();
    let doc = MockDocument::new(vec![page(1, &[SCENARIO])]);

    let r = resolve_rule(None, &collection).unwrap();
    let report = analyze(&doc, r).unwrap();

    assert_eq!(report, "* WTK99999 → 3 EA\n");
}

#[test]
fn shipped_rules_directory_loads() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../rules");
    let collection = load_collection(&dir).unwrap();

    assert_eq!(collection.len(), 2);
    assert_eq!(resolve_rule(None, &collection).unwrap().name, "ft-materials");

    let each = resolve_rule(Some("each-counts"), &collection).unwrap();
    let doc = MockDocument::new(vec![page(1, &[SCENARIO])]);
    assert_eq!(analyze(&doc, each).unwrap(), "* WTK99999 → 3 EA\n");
}

#[test]
fn builtin_template_runs() {
    let template = builtin::template().unwrap();
    let doc = MockDocument::new(vec![page(1, &[SCENARIO])]);

    let report = analyze(&doc, &template).unwrap();

    assert!(report.starts_with("* BDA12345 → 10.5"));
    assert!(!report.contains("EA"));
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------
#[test]
fn unreadable_page_aborts_the_run() {
    let doc = MockDocument {
        pages: vec![
            Ok(page(1, &["BDA12345 1 FT"])),
            Err("corrupt content stream".into()),
        ],
    };
    let r = rule("all", &[], &[], 0);

    match analyze(&doc, &r) {
        Err(TallyError::DocumentRead { page, reason }) => {
            assert_eq!(page, 2);
            assert_eq!(reason, "corrupt content stream");
        }
        other => panic!("expected DocumentRead, got {:?}", other),
    }
}

#[test]
fn invalid_rule_is_rejected_before_extraction() {
    let doc = MockDocument::new(vec![page(1, &[SCENARIO])]);
    let r = rule("", &["FT"], &[], 2);

    assert!(matches!(
        analyze(&doc, &r),
        Err(TallyError::RuleValidation { .. })
    ));
}

#[test]
fn overflowing_total_is_an_error() {
    let pattern = TallyConfig::default().extraction.compile().unwrap();
    let text = "BDA12345 79228162514264337593543950335 FT BDA12345 1 FT";

    match analyze_text(text, &rule("all", &[], &[], 0), &pattern) {
        Err(TallyError::Overflow { identifier, unit }) => {
            assert_eq!(identifier, "BDA12345");
            assert_eq!(unit, "FT");
        }
        other => panic!("expected Overflow, got {:?}", other),
    }
}

#[test]
fn largest_quantity_alone_is_reported() {
    let pattern = TallyConfig::default().extraction.compile().unwrap();
    let text = "BDA12345 79228162514264337593543950335 FT";

    let result = analyze_text(text, &rule("all", &[], &[], 0), &pattern).unwrap();

    assert_eq!(result.report, "* BDA12345 → 79228162514264337593543950335 FT\n");
}

#[test]
fn malformed_pattern_from_config() {
    let config = TallyConfig::from_json(r#"{ "extraction": { "units": ["F T"] } }"#).unwrap();

    assert!(matches!(
        config.extraction.compile(),
        Err(TallyError::MalformedPattern(_))
    ));
}

#[test]
fn narrower_window_from_config_drops_distant_quantities() {
    let config = TallyConfig::from_json(r#"{ "extraction": { "window": 4 } }"#).unwrap();
    let pattern = config.extraction.compile().unwrap();

    let result = analyze_text(SCENARIO, &rule("all", &[], &[], 0), &pattern).unwrap();

    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].identifier, "WTK99999");
}
