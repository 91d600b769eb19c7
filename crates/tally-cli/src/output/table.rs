use tally_core::pipeline::AnalysisResult;

pub fn print(result: &AnalysisResult, verbose: bool) {
    println!("=== {} ===\n", result.rule_name);
    print!("{}", result.report);

    if !verbose {
        return;
    }

    println!();
    println!(
        "  {} page(s), {} record(s) extracted, {} kept, {} excluded",
        result.pages,
        result.extracted,
        result.kept,
        result.excluded.len()
    );

    if result.excluded.is_empty() {
        return;
    }

    println!("\nExcluded:");
    let max_name = result
        .excluded
        .iter()
        .map(|e| e.excluded.record.identifier.len())
        .max()
        .unwrap_or(10);

    for entry in &result.excluded {
        let record = &entry.excluded.record;
        let page = match entry.page {
            Some(p) => format!("p.{}", p),
            None => "-".to_string(),
        };
        println!(
            "  {:<5} {:<width$}  {} {}  -> {}",
            page,
            record.identifier,
            record.quantity,
            record.unit,
            entry.excluded.reason,
            width = max_name
        );
    }
}
