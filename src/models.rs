//! Result row types shared across querying, validation, and reporting.

use serde::{Deserialize, Serialize};

/// Subdomain label used for queries against the bare domain.
pub const SUBDOMAIN_ROOT: &str = "root";
/// Subdomain label used for queries against the `www` name.
pub const SUBDOMAIN_WWW: &str = "www";

/// DNS record type a result row was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// HTTPS resource record (RFC 9460 type 65).
    #[serde(rename = "HTTPS")]
    Https,
    /// SVCB resource record (RFC 9460 type 64).
    #[serde(rename = "SVCB")]
    Svcb,
}

impl RecordKind {
    /// The record type name as it appears in DNS tooling and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Https => "HTTPS",
            RecordKind::Svcb => "SVCB",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized query result: a single (domain, subdomain, record type)
/// lookup flattened into the row shape used by reports.
///
/// A row is built once per query and not mutated afterwards. Transport
/// failures are data here (`query_error`), not errors: a row always exists
/// for every query that was attempted.
///
/// Invariant: when `has_https_record` is true, `https_priority` and
/// `https_target` are both set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Base domain the query was issued for.
    pub domain: String,
    /// Subdomain label: `"root"` or `"www"`.
    pub subdomain: String,
    /// Full name that was actually queried (e.g. `www.example.com`).
    pub full_domain: String,
    /// Record type this row was produced from.
    #[serde(rename = "record_type")]
    pub record_kind: RecordKind,
    /// Whether an HTTPS record was found for the queried name.
    pub has_https_record: bool,
    /// Priority of the selected HTTPS record (lower wins).
    pub https_priority: Option<u16>,
    /// Target name of the selected HTTPS record.
    pub https_target: Option<String>,
    /// Comma-joined ALPN protocol identifiers, in record order.
    pub alpn_protocols: Option<String>,
    /// Whether `"h3"` appears among the ALPN identifiers (exact match).
    pub has_http3: bool,
    /// Alternative port advertised by the record.
    pub port: Option<u16>,
    /// Comma-joined IPv4 address hints.
    pub ipv4hint: Option<String>,
    /// Comma-joined IPv6 address hints.
    pub ipv6hint: Option<String>,
    /// Whether the record carries an ECH configuration blob.
    pub ech_config: bool,
    /// Query failure, when the lookup did not produce an answer:
    /// `"NXDOMAIN"`, `"No HTTPS record"`, `"No SVCB record"`, `"Timeout"`,
    /// or the literal resolver error message.
    pub query_error: Option<String>,
    /// Whether an SVCB record was found (SVCB rows only).
    pub has_svcb_record: bool,
    /// Priority of the selected SVCB record.
    pub svcb_priority: Option<u16>,
    /// Target name of the selected SVCB record.
    pub svcb_target: Option<String>,
}

impl NormalizedRecord {
    /// Creates an empty row for a query that is about to be issued. All
    /// record fields start at their "no answer" defaults.
    pub fn empty(domain: &str, subdomain: &str, full_domain: &str, kind: RecordKind) -> Self {
        NormalizedRecord {
            domain: domain.to_string(),
            subdomain: subdomain.to_string(),
            full_domain: full_domain.to_string(),
            record_kind: kind,
            has_https_record: false,
            https_priority: None,
            https_target: None,
            alpn_protocols: None,
            has_http3: false,
            port: None,
            ipv4hint: None,
            ipv6hint: None,
            ech_config: false,
            query_error: None,
            has_svcb_record: false,
            svcb_priority: None,
            svcb_target: None,
        }
    }

    /// Creates a row recording a query that failed before or during the
    /// lookup.
    pub fn error_row(
        domain: &str,
        subdomain: &str,
        full_domain: &str,
        kind: RecordKind,
        error: String,
    ) -> Self {
        let mut record = NormalizedRecord::empty(domain, subdomain, full_domain, kind);
        record.query_error = Some(error);
        record
    }
}
