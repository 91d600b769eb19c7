use crate::error::TallyError;
use crate::extraction::PagedDocument;
use tracing::debug;

/// A document flattened into one text buffer, one line per page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearText {
    pub text: String,
    /// `(page_number, byte offset where the page starts)`, ascending.
    page_starts: Vec<(usize, usize)>,
}

impl LinearText {
    /// Page number containing byte `offset` of the text.
    pub fn page_of(&self, offset: usize) -> Option<usize> {
        if offset >= self.text.len() {
            return None;
        }
        let idx = self.page_starts.partition_point(|&(_, start)| start <= offset);
        idx.checked_sub(1).map(|i| self.page_starts[i].0)
    }

    pub fn page_count(&self) -> usize {
        self.page_starts.len()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Flatten a document into a single buffer.
///
/// Pages are read in ascending order. Each page's fragments are joined by
/// single spaces with every whitespace run collapsed, and the page ends with
/// `\n`. The first page that fails to decode aborts the whole document.
pub fn linearize(document: &dyn PagedDocument) -> Result<LinearText, TallyError> {
    let mut out = LinearText::default();

    for index in 1..=document.page_count() {
        let page = document.page(index).map_err(|e| match e {
            TallyError::DocumentRead { .. } => e,
            other => TallyError::DocumentRead {
                page: index,
                reason: other.to_string(),
            },
        })?;

        out.page_starts.push((page.page_number, out.text.len()));

        let mut first = true;
        for fragment in &page.fragments {
            for word in fragment.text.split_whitespace() {
                if !first {
                    out.text.push(' ');
                }
                out.text.push_str(word);
                first = false;
            }
        }
        out.text.push('\n');
    }

    debug!(
        "linearized {} page(s) from {} backend into {} bytes",
        out.page_count(),
        document.backend_name(),
        out.text.len()
    );

    Ok(out)
}
