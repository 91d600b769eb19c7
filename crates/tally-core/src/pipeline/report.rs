use crate::pipeline::aggregate::Aggregate;
use crate::rules::schema::{Rule, MAX_DECIMALS};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write;

/// Round half away from zero to `decimals` places and print exactly that many
/// fractional digits.
pub fn format_total(total: Decimal, decimals: u32) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    let rounded = total.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.prec$}", rounded, prec = decimals as usize)
}

/// Line printed when nothing survived extraction and filtering.
pub fn empty_report(rule: &Rule) -> String {
    format!("No data matched the filters of rule '{}'.\n", rule.name)
}

/// Render one `* <identifier> → <total> <unit>` line per entry, in entry
/// creation order.
pub fn format(aggregate: &Aggregate, rule: &Rule) -> String {
    if aggregate.is_empty() {
        return empty_report(rule);
    }

    let mut out = String::new();
    for entry in aggregate.entries() {
        let _ = writeln!(
            out,
            "* {} → {} {}",
            entry.identifier,
            format_total(entry.total, rule.decimals()),
            entry.unit
        );
    }
    out
}
