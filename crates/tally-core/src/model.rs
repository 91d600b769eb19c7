use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate `identifier quantity unit` match found in the linear text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub identifier: String,
    pub quantity: Decimal,
    pub unit: String,
    /// Byte offset of the identifier in the linear text.
    #[serde(default)]
    pub offset: usize,
}

impl ExtractedRecord {
    pub fn new(identifier: impl Into<String>, quantity: Decimal, unit: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            quantity,
            unit: unit.into(),
            offset: 0,
        }
    }

    pub fn key(&self) -> AggregateKey {
        AggregateKey {
            identifier: self.identifier.clone(),
            unit: self.unit.clone(),
        }
    }
}

impl fmt::Display for ExtractedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.identifier, self.quantity, self.unit)
    }
}

/// Grouping key of the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AggregateKey {
    pub identifier: String,
    pub unit: String,
}

/// Running total for one `(identifier, unit)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub identifier: String,
    pub unit: String,
    pub total: Decimal,
    /// Number of records that contributed to `total`.
    pub count: usize,
}
