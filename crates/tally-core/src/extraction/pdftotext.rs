use crate::error::TallyError;
use crate::extraction::{BBox, PageContent, PagedDocument, TextFragment};
use std::io::Write;
use std::process::Command;
use tracing::{debug, warn};

/// PDF decoding backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -bbox-layout`, which reports every text line with its
/// bounding box. Each line becomes one positioned fragment.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }

    /// Decode PDF bytes into pages of positioned fragments.
    pub fn decode(&self, pdf_bytes: &[u8]) -> Result<PdfDocument, TallyError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| TallyError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| TallyError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-bbox-layout")
            .arg(tmpfile.path())
            .arg("-")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TallyError::PdftotextNotFound
                } else {
                    TallyError::Extraction(format!("pdftotext -bbox-layout failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(TallyError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let pages = parse_bbox_xml(&xml);
        debug!("pdftotext produced {} page(s)", pages.len());
        Ok(PdfDocument { pages })
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Pages decoded by pdftotext. A page whose markup could not be read is kept
/// as a failure so the linearizer can report it by number.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    pages: Vec<Result<PageContent, String>>,
}

impl PagedDocument for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<PageContent, TallyError> {
        match index.checked_sub(1).and_then(|i| self.pages.get(i)) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(reason)) => Err(TallyError::DocumentRead {
                page: index,
                reason: reason.clone(),
            }),
            None => Err(TallyError::DocumentRead {
                page: index,
                reason: format!("document has {} page(s)", self.pages.len()),
            }),
        }
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

#[derive(Default)]
struct PageState {
    fragments: Vec<TextFragment>,
    error: Option<String>,
}

/// Split `-bbox-layout` XHTML into pages. Pages are numbered by the order of
/// their `<page>` elements.
fn parse_bbox_xml(xml: &str) -> Vec<Result<PageContent, String>> {
    let mut out = Vec::new();
    let mut current: Option<PageState> = None;
    let mut current_bbox: Option<BBox> = None;
    let mut current_words: Vec<String> = Vec::new();

    for raw in xml.lines() {
        let line = raw.trim();

        if line.starts_with("<page") {
            if let Some(open) = current.take() {
                let number = out.len() + 1;
                warn!("page {} has no closing tag", number);
                out.push(finish_page(number, open, Some("page markup is truncated")));
            }
            current = Some(PageState::default());
            continue;
        }

        let Some(page) = current.as_mut() else {
            continue;
        };

        if line.starts_with("<line ") {
            current_bbox = parse_bbox(line);
            if current_bbox.is_none() && page.error.is_none() {
                page.error = Some(format!("malformed line bounding box: {}", line));
            }
            current_words.clear();
            continue;
        }

        if line.starts_with("<word ") {
            if let Some(word_text) = parse_word_text(line) {
                let w = decode_xml_entities(&word_text).trim().to_string();
                if !w.is_empty() {
                    current_words.push(w);
                }
            }
            continue;
        }

        if line.starts_with("</line>") {
            let text = current_words.join(" ");
            if !text.is_empty() {
                page.fragments.push(TextFragment {
                    text,
                    bbox: current_bbox.take(),
                });
            }
            current_bbox = None;
            current_words.clear();
            continue;
        }

        if line.starts_with("</page>") {
            if let Some(done) = current.take() {
                let number = out.len() + 1;
                out.push(finish_page(number, done, None));
            }
        }
    }

    if let Some(open) = current.take() {
        let number = out.len() + 1;
        out.push(finish_page(number, open, Some("page markup is truncated")));
    }

    out
}

fn finish_page(
    page_number: usize,
    state: PageState,
    forced_error: Option<&str>,
) -> Result<PageContent, String> {
    if let Some(reason) = forced_error {
        return Err(reason.to_string());
    }
    match state.error {
        Some(reason) => Err(reason),
        None => Ok(PageContent {
            page_number,
            fragments: state.fragments,
        }),
    }
}

fn parse_attr_f32(tag: &str, name: &str) -> Option<f32> {
    parse_attr(tag, name)?.parse().ok()
}

fn parse_attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{}=\"", name);
    let start = tag.find(&needle)? + needle.len();
    let rest = &tag[start..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

fn parse_bbox(line_tag: &str) -> Option<BBox> {
    Some(BBox {
        x_min: parse_attr_f32(line_tag, "xMin")?,
        y_min: parse_attr_f32(line_tag, "yMin")?,
        x_max: parse_attr_f32(line_tag, "xMax")?,
        y_max: parse_attr_f32(line_tag, "yMax")?,
    })
}

fn parse_word_text(word_tag: &str) -> Option<String> {
    let start = word_tag.find('>')? + 1;
    let end = word_tag.rfind("</word>")?;
    Some(word_tag[start..end].to_string())
}

fn decode_xml_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
