#![cfg(not(tarpaulin_include))]

use report_card::ServerSettings;
use report_card::app;

/// Main entry point for the report card web service
///
/// Reads `HOST`, `PORT`, `REPORT_CONFIG` and `MAX_UPLOAD_BYTES` from the
/// environment and serves the JSON API until the process is stopped.
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = ServerSettings::from_env();
    app::run(settings).await
}
