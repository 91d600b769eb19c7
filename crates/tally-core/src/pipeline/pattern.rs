//! Windowed `identifier → quantity → unit` scanner.
//!
//! The scan is a small three-state machine: find the next identifier token,
//! look for a quantity start within a bounded window after it, then require a
//! unit token right after the quantity. Regexes only match the individual
//! tokens; the window and the resume rules live here.

use crate::error::TallyError;
use crate::model::ExtractedRecord;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::trace;

pub const DEFAULT_UNITS: &[&str] = &["FT", "EA", "MT"];
pub const DEFAULT_MIN_IDENTIFIER_LEN: usize = 5;
pub const DEFAULT_WINDOW: usize = 100;

/// Structural description of the extraction pattern. Not part of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionPattern {
    /// Shortest run of `[A-Z0-9.-]` accepted as an identifier.
    pub min_identifier_len: usize,
    /// Maximum number of characters between an identifier and its quantity.
    pub window: usize,
    /// Unit vocabulary, matched case-sensitively.
    pub units: Vec<String>,
}

impl Default for ExtractionPattern {
    fn default() -> Self {
        Self {
            min_identifier_len: DEFAULT_MIN_IDENTIFIER_LEN,
            window: DEFAULT_WINDOW,
            units: DEFAULT_UNITS.iter().map(|u| u.to_string()).collect(),
        }
    }
}

impl ExtractionPattern {
    pub fn compile(&self) -> Result<CompiledPattern, TallyError> {
        if self.min_identifier_len == 0 {
            return Err(TallyError::MalformedPattern(
                "min_identifier_len must be at least 1".into(),
            ));
        }
        if self.window == 0 {
            return Err(TallyError::MalformedPattern("window must be at least 1".into()));
        }
        if self.units.is_empty() {
            return Err(TallyError::MalformedPattern(
                "unit vocabulary must not be empty".into(),
            ));
        }
        for unit in &self.units {
            if unit.is_empty() || !unit.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(TallyError::MalformedPattern(format!(
                    "unit '{}' must be a non-empty alphanumeric token",
                    unit
                )));
            }
        }

        let mut units: Vec<&str> = self.units.iter().map(String::as_str).collect();
        units.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        units.dedup();
        let alternation = units
            .iter()
            .map(|u| regex::escape(u))
            .collect::<Vec<_>>()
            .join("|");

        let identifier = Regex::new(r"\b[A-Z0-9](?:[A-Z0-9.\-]*[A-Z0-9])?\b")
            .map_err(|e| TallyError::MalformedPattern(e.to_string()))?;
        let quantity_unit = Regex::new(&format!(r"^(\d+(?:\.\d+)?)\s*({})\b", alternation))
            .map_err(|e| TallyError::MalformedPattern(e.to_string()))?;

        Ok(CompiledPattern {
            identifier,
            quantity_unit,
            min_identifier_len: self.min_identifier_len,
            window: self.window,
        })
    }
}

/// A validated, ready-to-scan pattern. Immutable and shareable across
/// threads.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    identifier: Regex,
    quantity_unit: Regex,
    min_identifier_len: usize,
    window: usize,
}

impl CompiledPattern {
    /// Lazily scan `text` for records.
    pub fn records<'p, 't>(&'p self, text: &'t str) -> Records<'p, 't> {
        Records {
            pattern: self,
            text,
            pos: 0,
        }
    }

    /// Find the quantity and unit following an identifier that ends at byte
    /// `from`. Returns `(quantity, unit, end byte)`.
    fn quantity_after(&self, text: &str, from: usize) -> Option<(Decimal, String, usize)> {
        let rest = &text[from..];
        let mut prev = text[..from].chars().next_back();

        for (gap, (offset, ch)) in rest.char_indices().enumerate() {
            if gap > self.window {
                break;
            }

            // A quantity never starts in the middle of another number.
            let starts_number =
                ch.is_ascii_digit() && !matches!(prev, Some(p) if p.is_ascii_digit() || p == '.');
            prev = Some(ch);
            if !starts_number {
                continue;
            }

            let Some(caps) = self.quantity_unit.captures(&rest[offset..]) else {
                continue;
            };
            let (Some(raw_qty), Some(unit), Some(whole)) = (caps.get(1), caps.get(2), caps.get(0))
            else {
                continue;
            };

            match Decimal::from_str(raw_qty.as_str()) {
                Ok(quantity) => {
                    return Some((quantity, unit.as_str().to_string(), from + offset + whole.end()))
                }
                Err(e) => trace!("skipping malformed quantity '{}': {}", raw_qty.as_str(), e),
            }
        }

        None
    }
}

/// Iterator over the records of one text. Re-creating it on the same text
/// yields the same records.
pub struct Records<'p, 't> {
    pattern: &'p CompiledPattern,
    text: &'t str,
    pos: usize,
}

impl Iterator for Records<'_, '_> {
    type Item = ExtractedRecord;

    fn next(&mut self) -> Option<ExtractedRecord> {
        while self.pos < self.text.len() {
            let m = self.pattern.identifier.find_at(self.text, self.pos)?;
            self.pos = m.end();

            if m.as_str().chars().count() < self.pattern.min_identifier_len {
                continue;
            }

            if let Some((quantity, unit, end)) = self.pattern.quantity_after(self.text, m.end()) {
                self.pos = end;
                return Some(ExtractedRecord {
                    identifier: m.as_str().to_string(),
                    quantity,
                    unit,
                    offset: m.start(),
                });
            }

            trace!("identifier '{}' has no quantity in its window", m.as_str());
        }
        None
    }
}

/// Scan `text` and collect every record.
pub fn extract(text: &str, pattern: &CompiledPattern) -> Vec<ExtractedRecord> {
    pattern.records(text).collect()
}
