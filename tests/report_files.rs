//! Report file generation tests: CSV, JSON, and Markdown outputs.

use chrono::Utc;
use serde_json::Value;

use svcb_status::report::{
    build_analysis_report, build_markdown_report, write_csv_report, write_json_report,
    write_markdown_report, RunMetadata, CSV_HEADER,
};
use svcb_status::validate::RecordValidator;
use svcb_status::{DomainValidator, NormalizedRecord, RecordKind, SUBDOMAIN_ROOT, SUBDOMAIN_WWW};

fn metadata() -> RunMetadata {
    RunMetadata {
        version: "0.1.0".to_string(),
        scan_started: Utc::now(),
        dns_servers: "8.8.8.8,1.1.1.1".to_string(),
    }
}

fn sample_records() -> Vec<NormalizedRecord> {
    let mut full = NormalizedRecord::empty("example.com", SUBDOMAIN_ROOT, "example.com", RecordKind::Https);
    full.has_https_record = true;
    full.https_priority = Some(1);
    full.https_target = Some("example.com.".to_string());
    full.alpn_protocols = Some("h3,h2".to_string());
    full.has_http3 = true;
    full.ech_config = true;
    full.ipv6hint = Some("2001:db8::1".to_string());

    let mut www = NormalizedRecord::empty("example.com", SUBDOMAIN_WWW, "www.example.com", RecordKind::Https);
    www.query_error = Some("No HTTPS record".to_string());

    let mut gone = NormalizedRecord::empty("gone.org", SUBDOMAIN_ROOT, "gone.org", RecordKind::Https);
    gone.query_error = Some("NXDOMAIN".to_string());

    vec![full, www, gone]
}

fn quality_for(records: &[NormalizedRecord]) -> svcb_status::validate::DatasetQualityReport {
    let rows: Vec<Value> = records
        .iter()
        .map(|r| serde_json::to_value(r).unwrap())
        .collect();
    RecordValidator::new(DomainValidator::permissive()).validate_dataset(&rows)
}

#[test]
fn test_csv_report_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compliance.csv");
    let records = sample_records();

    let written = write_csv_report(&records, &metadata(), &path).unwrap();
    assert_eq!(written, 3);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    let header_fields: Vec<&str> = headers.iter().collect();
    assert_eq!(header_fields, CSV_HEADER);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);

    // First row carries the full record.
    assert_eq!(&rows[0][3], "example.com");
    assert_eq!(&rows[0][6], "true");
    assert_eq!(&rows[0][9], "h3,h2");
    assert_eq!(&rows[0][10], "true");
    assert_eq!(&rows[0][16], "HTTPS");
    // Error rows carry the error string and empty record fields.
    assert_eq!(&rows[2][6], "false");
    assert_eq!(&rows[2][7], "");
    assert_eq!(&rows[2][15], "NXDOMAIN");
}

#[test]
fn test_json_report_structure_and_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analysis.json");
    let records = sample_records();
    let quality = quality_for(&records);

    let report = build_analysis_report(&records, &metadata(), &quality);
    write_json_report(&report, &path).unwrap();

    let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(parsed["metadata"]["version"], "0.1.0");
    assert_eq!(parsed["metadata"]["total_records"], 3);
    // One of three rows has a record: 33.33% overall adoption.
    assert_eq!(parsed["metrics"]["adoption"]["overall_adoption"], 33.33);
    assert_eq!(parsed["metrics"]["features"]["http3_support"]["count"], 1);
    assert_eq!(parsed["error_statistics"]["NXDOMAIN"], 1);
    assert_eq!(parsed["error_statistics"]["No HTTPS record"], 1);
    assert_eq!(parsed["data_quality"]["valid_records"], 3);
    assert_eq!(parsed["data_quality"]["validity_rate"], 100.0);

    let top = parsed["top_performers"].as_array().unwrap();
    assert_eq!(top[0]["domain"], "example.com");
}

#[test]
fn test_markdown_report_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.md");
    let records = sample_records();
    let quality = quality_for(&records);

    let content = build_markdown_report(&records, &metadata(), &quality);
    write_markdown_report(&content, &path).unwrap();

    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert!(on_disk.starts_with("# RFC 9460 Compliance Report"));
    assert!(on_disk.contains("## Summary"));
    assert!(on_disk.contains("## Adoption Metrics"));
    assert!(on_disk.contains("## Feature Distribution"));
    assert!(on_disk.contains("## Top Performers"));
    assert!(on_disk.contains("example.com"));
}
