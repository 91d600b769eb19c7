use tally_core::error::TallyError;
use tally_core::pipeline::AnalysisResult;

pub fn print(result: &AnalysisResult) -> Result<(), TallyError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
