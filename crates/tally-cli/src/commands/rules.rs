use serde_json::Value;
use std::path::Path;
use tally_core::error::TallyError;
use tally_core::rules::builtin;
use tally_core::rules::schema::Rule;
use tally_core::rules::validate::ValidationProfile;

use super::{load_config, RuleSource};

pub fn list(source: RuleSource, config_path: Option<&Path>) -> Result<(), TallyError> {
    let config = load_config(config_path)?;
    let collection = source.load(&config)?;

    if collection.is_empty() {
        println!("No rules found.");
        return Ok(());
    }

    let default_name = collection.default_rule().map(|r| r.name.as_str());

    println!("Available rules:\n");
    for rule in collection.iter() {
        let marker = if Some(rule.name.as_str()) == default_name {
            " (default)"
        } else {
            ""
        };
        println!("  {}{}", rule.name, marker);
        if !rule.description.is_empty() {
            println!("      {}", rule.description);
        }
        println!("      {}", summary(rule));
        println!();
    }
    Ok(())
}

fn summary(rule: &Rule) -> String {
    let filters = rule.filters();
    let units = if filters.uom_include.is_empty() {
        "any unit".to_string()
    } else {
        filters.uom_include.join(", ")
    };
    let prefixes = if filters.material_prefix.is_empty() {
        "any identifier".to_string()
    } else {
        filters.material_prefix.join(", ")
    };
    format!(
        "units: {}; prefixes: {}; decimals: {}",
        units,
        prefixes,
        rule.decimals()
    )
}

pub fn validate(file: &Path, strict: bool) -> Result<(), TallyError> {
    let content = std::fs::read_to_string(file)?;
    let value: Value = serde_json::from_str(&content)?;

    let profile = if strict {
        ValidationProfile::Authoring
    } else {
        ValidationProfile::Standard
    };
    let rule = Rule::from_value_with(value, profile)?;

    println!("Rule '{}' is valid.", rule.name);
    println!("  {}", summary(&rule));
    if rule.is_default {
        println!("  Flagged as the default rule.");
    }

    // Hints, not errors
    let hints = hints(&rule);
    if !hints.is_empty() {
        println!("\nHints:");
        for h in &hints {
            println!("  - {}", h);
        }
    }

    Ok(())
}

fn hints(rule: &Rule) -> Vec<String> {
    let mut hints = Vec::new();
    let filters = rule.filters();
    for unit in &filters.uom_include {
        if unit.chars().any(|c| c.is_ascii_lowercase()) {
            hints.push(format!(
                "unit '{}' contains lowercase letters; units are matched case-sensitively",
                unit
            ));
        }
    }
    for prefix in &filters.material_prefix {
        if prefix.is_empty() {
            hints.push("an empty prefix accepts every identifier".to_string());
        }
    }
    hints
}

pub fn schema() -> Result<(), TallyError> {
    print!(
        r#"JSON Rule Schema
================

A rule decides which extracted records are kept and how their totals are
printed. When you run `tally analyze`, every `IDENTIFIER quantity UNIT`
record found in the document is checked against the rule's filters, and
the survivors are summed per identifier and unit.

Top-level fields:
  name          (string, required)  Unique, non-empty rule name
  description   (string, required)  Free text, informational only
  isDefault     (boolean, required) Marks the collection's default rule.
                                    At most one rule should carry it.
  ruleset       (object, required)  Filters and format (see below)

ruleset.filters (object, required):
  uom_include   (array, optional)   Units to keep, e.g. ["FT", "EA"].
                                    Matched case-sensitively.
                                    Empty or missing keeps every unit.
  material_prefix
                (array, optional)   Identifier prefixes to keep,
                                    e.g. ["BDA", "WTK"].
                                    Empty or missing keeps every identifier.

ruleset.format (object, required):
  decimals      (integer, optional) Decimal places in the report,
                                    0 to 28. Default: 3. Totals are rounded
                                    half away from zero.

Example:
{}
Validate a file with `tally rules validate <FILE>`. Add `--strict` to also
require a non-empty uom_include and an explicit decimals value.
"#,
        builtin::template_json().trim_end()
    );
    Ok(())
}

pub fn template() -> Result<(), TallyError> {
    print!("{}", builtin::template_json());
    Ok(())
}

pub fn resolve(
    requested: Option<&str>,
    source: RuleSource,
    config_path: Option<&Path>,
) -> Result<(), TallyError> {
    let config = load_config(config_path)?;
    let collection = source.load(&config)?;
    let rule = tally_core::resolve_rule(requested, &collection)?;

    match requested {
        Some(name) if name == rule.name => println!("Using requested rule '{}'.", rule.name),
        Some(name) => println!(
            "Rule '{}' not found; using default rule '{}'.",
            name, rule.name
        ),
        None => println!("Using default rule '{}'.", rule.name),
    }
    println!("  {}", summary(rule));
    Ok(())
}
