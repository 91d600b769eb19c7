use std::path::{Path, PathBuf};
use tally_core::error::TallyError;
use tally_core::extraction::linearize::linearize;
use tally_core::pipeline::extract;

use super::{load_config, load_document};

pub fn run(
    input_file: &Path,
    config_path: Option<&Path>,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), TallyError> {
    let config = load_config(config_path)?;
    let document = load_document(input_file)?;
    let linear = linearize(document.as_ref())?;

    let output_str = match output_format {
        "json" => {
            let pattern = config.extraction.compile()?;
            let records = extract(linear.as_str(), &pattern);
            serde_json::to_string_pretty(&records)?
        }
        _ => linear.text.clone(),
    };

    match output_file {
        Some(path) => {
            std::fs::write(&path, &output_str)?;
            eprintln!(
                "Linearized {} page(s), written to {}",
                linear.page_count(),
                path.display()
            );
        }
        None => print!("{output_str}"),
    }

    Ok(())
}
