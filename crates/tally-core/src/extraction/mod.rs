pub mod linearize;
pub mod pdftotext;
pub mod text;

use crate::error::TallyError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

/// A piece of text positioned on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,
}

impl TextFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bbox: None,
        }
    }
}

/// Text fragments of a single page, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    pub page_number: usize,
    pub fragments: Vec<TextFragment>,
}

impl PageContent {
    pub fn from_texts(page_number: usize, texts: &[&str]) -> Self {
        Self {
            page_number,
            fragments: texts.iter().map(|t| TextFragment::new(*t)).collect(),
        }
    }
}

/// A decoded paginated document.
///
/// Pages are addressed by their 1-based position; decoding a single page may
/// fail independently of the others.
pub trait PagedDocument {
    fn page_count(&self) -> usize;

    /// Decode the page at 1-based position `index`.
    fn page(&self, index: usize) -> Result<PageContent, TallyError>;

    /// Name of the decoding backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// An in-memory document whose pages are already decoded, e.g. loaded from
/// JSON produced by another decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedDocument {
    pub pages: Vec<PageContent>,
}

impl DecodedDocument {
    /// Build a document, ordering pages by page number.
    pub fn new(mut pages: Vec<PageContent>) -> Self {
        pages.sort_by_key(|p| p.page_number);
        Self { pages }
    }

    pub fn from_json(json: &[u8]) -> Result<Self, TallyError> {
        let doc: DecodedDocument = serde_json::from_slice(json)?;
        Ok(Self::new(doc.pages))
    }
}

impl PagedDocument for DecodedDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<PageContent, TallyError> {
        index
            .checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .cloned()
            .ok_or_else(|| TallyError::DocumentRead {
                page: index,
                reason: format!("document has {} page(s)", self.pages.len()),
            })
    }

    fn backend_name(&self) -> &str {
        "decoded"
    }
}
