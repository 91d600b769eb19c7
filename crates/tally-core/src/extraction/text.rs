use crate::error::TallyError;
use crate::extraction::{PageContent, PagedDocument, TextFragment};

/// Plain text already pulled out of a document, with pages separated by form
/// feeds (`\x0c`), the convention of `pdftotext` output.
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    pages: Vec<String>,
}

impl TextDocument {
    pub fn from_text(text: &str) -> Self {
        let mut pages: Vec<String> = text.split('\x0c').map(str::to_string).collect();
        // pdftotext terminates every page with a form feed.
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }
        Self { pages }
    }

    /// Decode bytes as UTF-8, replacing invalid sequences.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_text(&String::from_utf8_lossy(bytes))
    }
}

impl PagedDocument for TextDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<PageContent, TallyError> {
        let text = index
            .checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .ok_or_else(|| TallyError::DocumentRead {
                page: index,
                reason: format!("document has {} page(s)", self.pages.len()),
            })?;

        Ok(PageContent {
            page_number: index,
            fragments: text.lines().map(TextFragment::new).collect(),
        })
    }

    fn backend_name(&self) -> &str {
        "text"
    }
}
