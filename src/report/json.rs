//! JSON analysis report.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use super::RunMetadata;
use crate::metrics::{
    analyze_alpn_protocols, calculate_compliance_metrics, calculate_error_statistics,
    calculate_priority_distribution, identify_top_performers,
};
use crate::models::NormalizedRecord;
use crate::validate::DatasetQualityReport;

const TOP_PERFORMER_COUNT: usize = 10;

/// Builds the full analysis report: metadata, compliance metrics,
/// distributions, top performers, error statistics, and the dataset quality
/// section.
pub fn build_analysis_report(
    records: &[NormalizedRecord],
    metadata: &RunMetadata,
    quality: &DatasetQualityReport,
) -> Value {
    let metrics = calculate_compliance_metrics(records);
    let alpn = analyze_alpn_protocols(records);
    let priorities = calculate_priority_distribution(records);
    let top_performers = identify_top_performers(records, TOP_PERFORMER_COUNT);
    let errors = calculate_error_statistics(records);

    json!({
        "metadata": {
            "version": metadata.version,
            "scan_date": metadata.scan_started.to_rfc3339(),
            "dns_servers": metadata.dns_servers,
            "total_records": records.len(),
        },
        "metrics": metrics,
        "distributions": {
            "alpn_protocols": alpn
                .iter()
                .map(|(protocol, count)| json!({"protocol": protocol, "count": count}))
                .collect::<Vec<_>>(),
            "priorities": priorities,
        },
        "top_performers": top_performers
            .iter()
            .map(|(domain, score)| json!({"domain": domain, "score": score}))
            .collect::<Vec<_>>(),
        "error_statistics": errors,
        "data_quality": quality,
    })
}

/// Writes the analysis report as pretty-printed JSON.
pub fn write_json_report(report: &Value, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    serde_json::to_writer_pretty(file, report).context("Failed to serialize JSON report")?;
    Ok(())
}
