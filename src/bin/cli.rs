#![cfg(not(tarpaulin_include))]

use report_card::html::HtmlRenderer;
use report_card::{RawTable, ReportConfig, ingest, statistics};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Characters that cannot appear in a file name on common platforms.
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("Usage: {} <scores.xlsx|scores.csv> <output-dir> [config.json]", args[0]);
        return Ok(());
    }

    let start = Instant::now();
    let config = match args.get(3) {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };

    let table = RawTable::from_path(&args[1])?;
    let dataset = ingest(&table)?;

    let out_dir = Path::new(&args[2]);
    fs::create_dir_all(out_dir)?;

    let renderer = HtmlRenderer::new()?;
    let batch = renderer.export_all(&dataset, &config);
    for report in &batch.reports {
        let rank = dataset.students()[report.index].rank;
        let path = out_dir.join(format!("{:03}-{}.html", rank, file_safe(&report.name)));
        fs::write(&path, &report.html)?;
    }
    for warning in &batch.warnings {
        eprintln!("warning: {}", warning);
    }

    let stats = statistics::compute(&dataset);
    fs::write(
        out_dir.join("statistics.json"),
        serde_json::to_string_pretty(&stats)?,
    )?;

    println!(
        "Wrote {} reports ({} warnings) to {} in {:.1}s",
        batch.total_reports,
        batch.warnings.len(),
        out_dir.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
