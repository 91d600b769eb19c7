use std::path::Path;
use tally_core::error::TallyError;

use super::{load_config, load_document, RuleSource};
use crate::output;

pub fn run(
    input_file: &Path,
    requested: Option<&str>,
    source: RuleSource,
    config_path: Option<&Path>,
    output_format: &str,
    verbose: bool,
) -> Result<(), TallyError> {
    let config = load_config(config_path)?;
    let pattern = config.extraction.compile()?;

    let collection = source.load(&config)?;
    let rule = tally_core::resolve_rule(requested, &collection)?;

    let document = load_document(input_file)?;
    let result = tally_core::analyze_with(document.as_ref(), rule, &pattern)?;

    match output_format {
        "json" => output::json::print(&result)?,
        _ => output::table::print(&result, verbose),
    }

    Ok(())
}
