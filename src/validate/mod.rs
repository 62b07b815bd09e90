//! Record and dataset validation.
//!
//! Validation runs over loosely-typed rows (`serde_json::Value` maps, the
//! shape results have once serialized to or re-loaded from a report), so
//! structural problems such as missing fields or mistyped booleans are
//! detectable and reportable. Failures are always data: nothing here returns
//! an error, every finding becomes a [`ValidationIssue`].

use std::collections::BTreeMap;
use std::net::{Ipv4Addr, Ipv6Addr};

use serde::Serialize;
use serde_json::Value;
use strum_macros::{Display, EnumIter};

use crate::domain::DomainValidator;
use crate::metrics::round2;

/// ALPN protocol identifiers accepted by the validator. Tokens with an
/// `h3-` prefix are additionally accepted to cover future HTTP/3 drafts.
pub const RECOGNIZED_ALPN_PROTOCOLS: &[&str] = &[
    "http/0.9", "http/1.0", "http/1.1", "spdy/1", "spdy/2", "spdy/3", "spdy/3.1", "h2", "h2c",
    "h3", "h3-29", "h3-Q050", "h3-T051", "hq", "hq-29", "doq", "doq-i00",
];

/// Upper bound on sampled indices and issue descriptions in a
/// [`DatasetQualityReport`].
const MAX_SAMPLED: usize = 10;

/// The closed set of problems a record can be flagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum IssueKind {
    /// A required field is absent (or explicitly null).
    MissingField,
    /// `domain` or `full_domain` fails domain validation.
    InvalidDomain,
    /// `subdomain` is neither `"root"` nor `"www"`.
    InvalidSubdomain,
    /// `https_priority` is missing, null, or outside `[0, 65535]` on a
    /// record-bearing row.
    InvalidPriority,
    /// `https_target` fails domain validation.
    InvalidTarget,
    /// An ALPN token is outside the recognized set.
    InvalidAlpnProtocol,
    /// `port` is outside `[1, 65535]` or not an integer.
    InvalidPort,
    /// An IPv4 hint is not a valid IPv4 literal.
    InvalidIPv4Hint,
    /// An IPv6 hint is not a valid IPv6 literal.
    InvalidIPv6Hint,
    /// A boolean-typed field holds a non-boolean value.
    WrongType,
}

/// A single validation finding against one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Index of the offending record within the validated dataset. Zero for
    /// issues produced by a standalone [`RecordValidator::validate_record`]
    /// call; [`RecordValidator::validate_dataset`] fills in the real index.
    pub record_index: usize,
    /// What kind of problem was found.
    pub kind: IssueKind,
    /// Free-text detail, usually carrying the offending value.
    pub detail: String,
}

impl ValidationIssue {
    fn new(kind: IssueKind, detail: String) -> Self {
        ValidationIssue {
            record_index: 0,
            kind,
            detail,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record {}: {}: {}", self.record_index, self.kind, self.detail)
    }
}

/// Aggregate quality report over a validated dataset.
///
/// Invariants: `valid_records + invalid_records == total_records`;
/// `validity_rate` is zero for an empty dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetQualityReport {
    /// Number of records examined.
    pub total_records: usize,
    /// Records with no issues.
    pub valid_records: usize,
    /// Records with at least one issue.
    pub invalid_records: usize,
    /// Percentage of valid records, rounded to two decimals.
    pub validity_rate: f64,
    /// Indices of the first ten invalid records.
    pub invalid_record_indices: Vec<usize>,
    /// Issue counts keyed by issue kind name.
    pub issue_counts: BTreeMap<String, usize>,
    /// The first ten issue descriptions, for quick inspection.
    pub sample_issues: Vec<String>,
}

/// Checks whether an ALPN token is recognized.
pub fn is_recognized_alpn(token: &str) -> bool {
    RECOGNIZED_ALPN_PROTOCOLS.contains(&token) || token.starts_with("h3-")
}

/// Validator for normalized result rows and whole datasets.
///
/// Carries a [`DomainValidator`] so domain and target checks honor the same
/// TLD registry as the query layer.
pub struct RecordValidator {
    domains: DomainValidator,
}

impl RecordValidator {
    /// Creates a validator using the given domain validator for name checks.
    pub fn new(domains: DomainValidator) -> Self {
        RecordValidator { domains }
    }

    /// Validates a single record, returning every issue found.
    ///
    /// The record is expected to be a JSON object; anything else yields a
    /// single `WrongType` issue.
    pub fn validate_record(&self, record: &Value) -> Vec<ValidationIssue> {
        let Some(map) = record.as_object() else {
            return vec![ValidationIssue::new(
                IssueKind::WrongType,
                format!("record should be an object, got {}", json_type_name(record)),
            )];
        };

        let mut issues = Vec::new();

        for field in ["domain", "subdomain", "full_domain", "has_https_record"] {
            if map.get(field).map_or(true, Value::is_null) {
                issues.push(ValidationIssue::new(
                    IssueKind::MissingField,
                    format!("missing required field: {field}"),
                ));
            }
        }

        for field in ["domain", "full_domain"] {
            if let Some(value) = map.get(field) {
                if value.is_null() {
                    continue;
                }
                let valid = value
                    .as_str()
                    .map(|name| self.domains.validate(name, true))
                    .unwrap_or(false);
                if !valid {
                    issues.push(ValidationIssue::new(
                        IssueKind::InvalidDomain,
                        format!("{field} is not a valid domain: {value}"),
                    ));
                }
            }
        }

        if let Some(value) = map.get("subdomain") {
            if !value.is_null() && !matches!(value.as_str(), Some("root") | Some("www")) {
                issues.push(ValidationIssue::new(
                    IssueKind::InvalidSubdomain,
                    format!("unexpected subdomain value: {value}"),
                ));
            }
        }

        let has_record = map
            .get("has_https_record")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if has_record {
            self.check_https_fields(map, &mut issues);
        }

        for field in ["has_https_record", "has_http3", "ech_config"] {
            if let Some(value) = map.get(field) {
                if !value.is_null() && !value.is_boolean() {
                    issues.push(ValidationIssue::new(
                        IssueKind::WrongType,
                        format!("field {field} should be boolean, got {}", json_type_name(value)),
                    ));
                }
            }
        }

        issues
    }

    /// Validates every record independently (no short-circuiting) and
    /// aggregates the findings into a quality report.
    pub fn validate_dataset(&self, records: &[Value]) -> DatasetQualityReport {
        let total_records = records.len();
        let mut invalid_records = 0usize;
        let mut invalid_record_indices = Vec::new();
        let mut issue_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut sample_issues = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let issues = self.validate_record(record);
            if issues.is_empty() {
                continue;
            }

            invalid_records += 1;
            if invalid_record_indices.len() < MAX_SAMPLED {
                invalid_record_indices.push(index);
            }

            for issue in issues {
                let issue = ValidationIssue {
                    record_index: index,
                    ..issue
                };
                *issue_counts.entry(issue.kind.to_string()).or_insert(0) += 1;
                if sample_issues.len() < MAX_SAMPLED {
                    sample_issues.push(issue.to_string());
                }
            }
        }

        let valid_records = total_records - invalid_records;
        let validity_rate = if total_records == 0 {
            0.0
        } else {
            round2(valid_records as f64 / total_records as f64 * 100.0)
        };

        DatasetQualityReport {
            total_records,
            valid_records,
            invalid_records,
            validity_rate,
            invalid_record_indices,
            issue_counts,
            sample_issues,
        }
    }

    fn check_https_fields(
        &self,
        map: &serde_json::Map<String, Value>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let priority_valid = map
            .get("https_priority")
            .and_then(Value::as_u64)
            .map_or(false, |p| p <= u64::from(u16::MAX));
        if !priority_valid {
            let shown = map.get("https_priority").cloned().unwrap_or(Value::Null);
            issues.push(ValidationIssue::new(
                IssueKind::InvalidPriority,
                format!("https_priority missing or out of range: {shown}"),
            ));
        }

        if let Some(value) = map.get("https_target") {
            if !value.is_null() {
                let valid = value
                    .as_str()
                    .map(|target| {
                        let target = target.strip_suffix('.').unwrap_or(target);
                        self.domains.validate(target, true)
                    })
                    .unwrap_or(false);
                if !valid {
                    issues.push(ValidationIssue::new(
                        IssueKind::InvalidTarget,
                        format!("https_target is not a valid domain: {value}"),
                    ));
                }
            }
        }

        if let Some(value) = map.get("alpn_protocols") {
            if !value.is_null() {
                match value.as_str() {
                    Some("") => {}
                    Some(list) => {
                        for token in list.split(',') {
                            let token = token.trim();
                            if !is_recognized_alpn(token) {
                                issues.push(ValidationIssue::new(
                                    IssueKind::InvalidAlpnProtocol,
                                    format!("unrecognized ALPN protocol: {token}"),
                                ));
                            }
                        }
                    }
                    None => issues.push(ValidationIssue::new(
                        IssueKind::InvalidAlpnProtocol,
                        format!("alpn_protocols should be a string, got {}", json_type_name(value)),
                    )),
                }
            }
        }

        if let Some(value) = map.get("port") {
            if !value.is_null() {
                let port_valid = value
                    .as_u64()
                    .map_or(false, |p| (1..=u64::from(u16::MAX)).contains(&p));
                if !port_valid {
                    issues.push(ValidationIssue::new(
                        IssueKind::InvalidPort,
                        format!("port out of range: {value}"),
                    ));
                }
            }
        }

        check_ip_hints::<Ipv4Addr>(map, "ipv4hint", IssueKind::InvalidIPv4Hint, issues);
        check_ip_hints::<Ipv6Addr>(map, "ipv6hint", IssueKind::InvalidIPv6Hint, issues);
    }
}

/// Validates a comma-joined list of address hints, one literal at a time.
fn check_ip_hints<A: std::str::FromStr>(
    map: &serde_json::Map<String, Value>,
    field: &str,
    kind: IssueKind,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(value) = map.get(field) else {
        return;
    };
    if value.is_null() {
        return;
    }

    match value.as_str() {
        Some("") => {}
        Some(list) => {
            for literal in list.split(',') {
                let literal = literal.trim();
                if literal.parse::<A>().is_err() {
                    issues.push(ValidationIssue::new(
                        kind,
                        format!("{field} is not a valid address literal: {literal}"),
                    ));
                }
            }
        }
        None => issues.push(ValidationIssue::new(
            kind,
            format!("{field} should be a string, got {}", json_type_name(value)),
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
