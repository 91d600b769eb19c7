use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TallyError {
    #[error("failed to read page {page} of the document: {reason}")]
    DocumentRead { page: usize, reason: String },

    #[error("rule '{rule}' failed validation: {}", .warnings.join("; "))]
    RuleValidation { rule: String, warnings: Vec<String> },

    #[error("{}", no_rule_message(.requested))]
    NoRuleResolved { requested: Option<String> },

    #[error("malformed extraction pattern: {0}")]
    MalformedPattern(String),

    #[error("document extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to load rules from {path}: {reason}")]
    RuleLoad { path: PathBuf, reason: String },

    #[error("a rule named '{0}' already exists in the collection")]
    DuplicateRule(String),

    #[error("total of '{identifier}' in {unit} is too large to represent")]
    Overflow { identifier: String, unit: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn no_rule_message(requested: &Option<String>) -> String {
    match requested {
        Some(name) => format!(
            "could not resolve a rule: '{}' is not in the collection and no default rule is set",
            name
        ),
        None => "could not resolve a rule: no rule requested and no default rule is set".into(),
    }
}
