pub mod analyze;
pub mod extract;
pub mod rules;

use std::path::{Path, PathBuf};
use tally_core::config::TallyConfig;
use tally_core::error::TallyError;
use tally_core::extraction::pdftotext::PdftotextExtractor;
use tally_core::extraction::text::TextDocument;
use tally_core::extraction::{DecodedDocument, PagedDocument};
use tally_core::rules::collection::RuleCollection;
use tracing::info;

/// Rule location given on the command line. Overrides the config file.
pub struct RuleSource {
    dir: Option<PathBuf>,
    file: Option<PathBuf>,
}

impl RuleSource {
    pub fn new(dir: Option<PathBuf>, file: Option<PathBuf>) -> Self {
        Self { dir, file }
    }

    /// Load the rule collection read-only.
    pub fn load(self, config: &TallyConfig) -> Result<RuleCollection, TallyError> {
        let path = self
            .file
            .or(self.dir)
            .unwrap_or_else(|| config.rules.source().to_path_buf());
        let collection = tally_core::rules::load_collection(&path)?;
        info!("loaded {} rule(s) from {}", collection.len(), path.display());
        Ok(collection)
    }
}

pub fn load_config(path: Option<&Path>) -> Result<TallyConfig, TallyError> {
    match path {
        Some(path) => TallyConfig::from_file(path),
        None => Ok(TallyConfig::default()),
    }
}

/// Decode the input by extension: `.pdf` through pdftotext, `.json` as a
/// pre-decoded document, anything else as form-feed-paged text.
pub fn load_document(path: &Path) -> Result<Box<dyn PagedDocument>, TallyError> {
    let bytes = std::fs::read(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let document: Box<dyn PagedDocument> = match ext.as_deref() {
        Some("pdf") => Box::new(PdftotextExtractor::new().decode(&bytes)?),
        Some("json") => Box::new(DecodedDocument::from_json(&bytes)?),
        _ => Box::new(TextDocument::from_bytes(&bytes)),
    };

    info!(
        "decoded {} page(s) from {} with the {} backend",
        document.page_count(),
        path.display(),
        document.backend_name()
    );
    Ok(document)
}
