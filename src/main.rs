//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `svcb_status` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use svcb_status::initialization::init_logger_with;
use svcb_status::{run_scan, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // Run the scan using the library
    match run_scan(config).await {
        Ok(report) => {
            println!(
                "✅ Checked {} domain{} ({} queries, {} with HTTPS records, {} query errors) in {:.1}s",
                report.total_domains,
                if report.total_domains == 1 { "" } else { "s" },
                report.total_queries,
                report.with_https_record,
                report.query_errors,
                report.elapsed_seconds
            );
            println!("Results saved in {}", report.csv_path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("svcb_status error: {:#}", e);
            process::exit(1);
        }
    }
}
