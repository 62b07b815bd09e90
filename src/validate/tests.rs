// Validator tests over loose JSON rows.

use super::*;
use serde_json::json;
use strum::IntoEnumIterator;

fn validator() -> RecordValidator {
    RecordValidator::new(DomainValidator::permissive())
}

fn well_formed_record() -> Value {
    json!({
        "domain": "example.com",
        "subdomain": "root",
        "full_domain": "example.com",
        "record_type": "HTTPS",
        "has_https_record": true,
        "https_priority": 1,
        "https_target": "svc.example.com.",
        "alpn_protocols": "h3,h2",
        "has_http3": true,
        "port": 8443,
        "ipv4hint": "192.0.2.1,192.0.2.2",
        "ipv6hint": "2001:db8::1",
        "ech_config": true,
        "query_error": null
    })
}

fn kinds(issues: &[ValidationIssue]) -> Vec<IssueKind> {
    issues.iter().map(|i| i.kind).collect()
}

#[test]
fn test_well_formed_record_has_no_issues() {
    let issues = validator().validate_record(&well_formed_record());
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[test]
fn test_missing_priority_yields_exactly_one_issue() {
    let mut record = well_formed_record();
    record.as_object_mut().unwrap().remove("https_priority");
    let issues = validator().validate_record(&record);
    assert_eq!(kinds(&issues), vec![IssueKind::InvalidPriority]);
}

#[test]
fn test_null_priority_yields_invalid_priority() {
    let mut record = well_formed_record();
    record["https_priority"] = Value::Null;
    let issues = validator().validate_record(&record);
    assert_eq!(kinds(&issues), vec![IssueKind::InvalidPriority]);
}

#[test]
fn test_priority_out_of_range() {
    let mut record = well_formed_record();
    record["https_priority"] = json!(70000);
    let issues = validator().validate_record(&record);
    assert_eq!(kinds(&issues), vec![IssueKind::InvalidPriority]);
}

#[test]
fn test_priority_not_checked_without_record() {
    let mut record = well_formed_record();
    record["has_https_record"] = json!(false);
    record.as_object_mut().unwrap().remove("https_priority");
    let issues = validator().validate_record(&record);
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[test]
fn test_empty_object_reports_all_required_fields() {
    let issues = validator().validate_record(&json!({}));
    assert_eq!(issues.len(), 4);
    assert!(issues.iter().all(|i| i.kind == IssueKind::MissingField));
}

#[test]
fn test_null_required_field_counts_as_missing() {
    let mut record = well_formed_record();
    record["domain"] = Value::Null;
    let issues = validator().validate_record(&record);
    assert_eq!(kinds(&issues), vec![IssueKind::MissingField]);
}

#[test]
fn test_invalid_subdomain() {
    let mut record = well_formed_record();
    record["subdomain"] = json!("mail");
    let issues = validator().validate_record(&record);
    assert_eq!(kinds(&issues), vec![IssueKind::InvalidSubdomain]);
}

#[test]
fn test_invalid_domain_reported_per_field() {
    let mut record = well_formed_record();
    record["domain"] = json!("no spaces allowed.com");
    record["full_domain"] = json!("-bad.example.com");
    let issues = validator().validate_record(&record);
    assert_eq!(kinds(&issues), vec![IssueKind::InvalidDomain, IssueKind::InvalidDomain]);
}

#[test]
fn test_target_trailing_dot_stripped_before_check() {
    let mut record = well_formed_record();
    record["https_target"] = json!("svc.example.com.");
    assert!(validator().validate_record(&record).is_empty());

    // A bare dot target strips down to nothing and is invalid.
    record["https_target"] = json!(".");
    let issues = validator().validate_record(&record);
    assert_eq!(kinds(&issues), vec![IssueKind::InvalidTarget]);
}

#[test]
fn test_null_target_is_accepted() {
    let mut record = well_formed_record();
    record["https_target"] = Value::Null;
    assert!(validator().validate_record(&record).is_empty());
}

#[test]
fn test_unrecognized_alpn_token() {
    let mut record = well_formed_record();
    record["alpn_protocols"] = json!("h2,ftp");
    let issues = validator().validate_record(&record);
    assert_eq!(kinds(&issues), vec![IssueKind::InvalidAlpnProtocol]);
    assert!(issues[0].detail.contains("ftp"));
}

#[test]
fn test_h3_draft_prefix_accepted() {
    let mut record = well_formed_record();
    record["alpn_protocols"] = json!("h3-34,h3-Q050,doq");
    assert!(validator().validate_record(&record).is_empty());
}

#[test]
fn test_port_zero_rejected_null_accepted() {
    let mut record = well_formed_record();
    record["port"] = json!(0);
    assert_eq!(kinds(&validator().validate_record(&record)), vec![IssueKind::InvalidPort]);

    record["port"] = Value::Null;
    assert!(validator().validate_record(&record).is_empty());
}

#[test]
fn test_ip_hints_validated_per_literal() {
    let mut record = well_formed_record();
    record["ipv4hint"] = json!("192.0.2.1,999.0.0.1");
    let issues = validator().validate_record(&record);
    assert_eq!(kinds(&issues), vec![IssueKind::InvalidIPv4Hint]);
    assert!(issues[0].detail.contains("999.0.0.1"));

    let mut record = well_formed_record();
    record["ipv6hint"] = json!("not-an-address");
    assert_eq!(
        kinds(&validator().validate_record(&record)),
        vec![IssueKind::InvalidIPv6Hint]
    );
}

#[test]
fn test_boolean_fields_type_checked() {
    let mut record = well_formed_record();
    record["has_http3"] = json!("yes");
    let issues = validator().validate_record(&record);
    assert_eq!(kinds(&issues), vec![IssueKind::WrongType]);
    assert!(issues[0].detail.contains("has_http3"));
}

#[test]
fn test_non_boolean_has_https_record_skips_https_checks() {
    let mut record = well_formed_record();
    record["has_https_record"] = json!("true");
    record["https_priority"] = Value::Null;
    // The mistyped flag is reported, but the record is not treated as
    // record-bearing, so the null priority is not flagged.
    let issues = validator().validate_record(&record);
    assert_eq!(kinds(&issues), vec![IssueKind::WrongType]);
}

#[test]
fn test_non_object_record() {
    let issues = validator().validate_record(&json!([1, 2, 3]));
    assert_eq!(kinds(&issues), vec![IssueKind::WrongType]);
}

#[test]
fn test_dataset_counts_and_rate() {
    let mut bad_subdomain = well_formed_record();
    bad_subdomain["subdomain"] = json!("mail");
    let mut bad_port = well_formed_record();
    bad_port["port"] = json!(0);

    let records = vec![
        well_formed_record(),
        bad_subdomain,
        well_formed_record(),
        bad_port,
        well_formed_record(),
    ];
    let report = validator().validate_dataset(&records);

    assert_eq!(report.total_records, 5);
    assert_eq!(report.valid_records, 3);
    assert_eq!(report.invalid_records, 2);
    assert_eq!(report.valid_records + report.invalid_records, report.total_records);
    assert_eq!(report.validity_rate, 60.0);
    assert_eq!(report.invalid_record_indices, vec![1, 3]);
    assert_eq!(report.issue_counts.get("InvalidSubdomain"), Some(&1));
    assert_eq!(report.issue_counts.get("InvalidPort"), Some(&1));
    assert!(report.sample_issues[0].starts_with("record 1:"));
}

#[test]
fn test_dataset_rate_rounded_to_two_decimals() {
    let mut bad = well_formed_record();
    bad["subdomain"] = json!("mail");
    let mut records = vec![well_formed_record(), well_formed_record()];
    records.push(bad);
    // 2/3 valid = 66.666... -> 66.67
    let report = validator().validate_dataset(&records);
    assert_eq!(report.validity_rate, 66.67);
}

#[test]
fn test_empty_dataset() {
    let report = validator().validate_dataset(&[]);
    assert_eq!(report.total_records, 0);
    assert_eq!(report.valid_records, 0);
    assert_eq!(report.invalid_records, 0);
    assert_eq!(report.validity_rate, 0.0);
    assert!(report.invalid_record_indices.is_empty());
    assert!(report.issue_counts.is_empty());
    assert!(report.sample_issues.is_empty());
}

#[test]
fn test_dataset_samples_are_bounded() {
    let mut bad = well_formed_record();
    bad["port"] = json!(0);
    let records: Vec<Value> = std::iter::repeat(bad).take(12).collect();

    let report = validator().validate_dataset(&records);
    assert_eq!(report.invalid_records, 12);
    assert_eq!(report.invalid_record_indices.len(), 10);
    assert_eq!(report.sample_issues.len(), 10);
    assert_eq!(report.issue_counts.get("InvalidPort"), Some(&12));
}

#[test]
fn test_issue_kind_set_is_closed() {
    assert_eq!(IssueKind::iter().count(), 10);
}
