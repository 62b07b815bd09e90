//! CSV report writing.
//!
//! One row per query result, in the flat column layout downstream analysis
//! expects. Optional fields serialize as empty strings.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use super::RunMetadata;
use crate::models::NormalizedRecord;

/// Fixed CSV column layout.
pub const CSV_HEADER: [&str; 17] = [
    "script_version",
    "timestamp",
    "dns_server",
    "domain",
    "subdomain",
    "full_domain",
    "has_https_record",
    "https_priority",
    "https_target",
    "alpn_protocols",
    "has_http3",
    "port",
    "ipv4hint",
    "ipv6hint",
    "ech_config",
    "query_error",
    "record_type",
];

/// Writes all results to a CSV file, creating parent directories as needed.
///
/// # Returns
///
/// The number of records written.
pub fn write_csv_report(
    records: &[NormalizedRecord],
    metadata: &RunMetadata,
    path: &Path,
) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(CSV_HEADER)?;

    let timestamp = metadata.scan_started.to_rfc3339();
    for record in records {
        writer.write_record(&csv_row(record, metadata, &timestamp))?;
    }

    writer.flush().context("Failed to flush CSV output")?;
    Ok(records.len())
}

fn csv_row(record: &NormalizedRecord, metadata: &RunMetadata, timestamp: &str) -> [String; 17] {
    [
        metadata.version.clone(),
        timestamp.to_string(),
        metadata.dns_servers.clone(),
        record.domain.clone(),
        record.subdomain.clone(),
        record.full_domain.clone(),
        record.has_https_record.to_string(),
        opt_number(record.https_priority),
        record.https_target.clone().unwrap_or_default(),
        record.alpn_protocols.clone().unwrap_or_default(),
        record.has_http3.to_string(),
        opt_number(record.port),
        record.ipv4hint.clone().unwrap_or_default(),
        record.ipv6hint.clone().unwrap_or_default(),
        record.ech_config.to_string(),
        record.query_error.clone().unwrap_or_default(),
        record.record_kind.to_string(),
    ]
}

fn opt_number(value: Option<u16>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
