use crate::error::TallyError;
use crate::model::{AggregateEntry, AggregateKey, ExtractedRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Totals per `(identifier, unit)` in the order keys were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    entries: Vec<AggregateEntry>,
    #[serde(skip)]
    index: HashMap<AggregateKey, usize>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record's quantity to its key, creating the entry on first use.
    ///
    /// A sum past the range of `Decimal` fails and leaves the entry unchanged.
    pub fn add(&mut self, record: &ExtractedRecord) -> Result<(), TallyError> {
        let key = record.key();
        match self.index.get(&key) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.total = entry.total.checked_add(record.quantity).ok_or_else(|| {
                    TallyError::Overflow {
                        identifier: record.identifier.clone(),
                        unit: record.unit.clone(),
                    }
                })?;
                entry.count += 1;
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(AggregateEntry {
                    identifier: record.identifier.clone(),
                    unit: record.unit.clone(),
                    total: record.quantity,
                    count: 1,
                });
            }
        }
        Ok(())
    }

    /// Entries in creation order.
    pub fn entries(&self) -> &[AggregateEntry] {
        &self.entries
    }

    pub fn get(&self, identifier: &str, unit: &str) -> Option<&AggregateEntry> {
        let key = AggregateKey {
            identifier: identifier.to_string(),
            unit: unit.to_string(),
        };
        self.index.get(&key).map(|&i| &self.entries[i])
    }

    /// Total for a key, zero when the key never occurred.
    pub fn total(&self, identifier: &str, unit: &str) -> Decimal {
        self.get(identifier, unit)
            .map(|e| e.total)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group records by `(identifier, unit)` and sum their quantities.
pub fn aggregate(records: &[ExtractedRecord]) -> Result<Aggregate, TallyError> {
    let mut agg = Aggregate::new();
    for record in records {
        agg.add(record)?;
    }
    Ok(agg)
}
