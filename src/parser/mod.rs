//! Pure parsing of SVCB/HTTPS record answers.
//!
//! This module turns the raw answers handed over by the DNS transport into
//! normalized record fragments. It performs no I/O and never fails: every
//! malformed sub-value degrades to a null/empty field with a logged warning,
//! so a bad parameter never discards an otherwise usable record.

use std::collections::BTreeMap;

use log::warn;

/// Service parameter key for ALPN protocol identifiers.
pub const PARAM_KEY_ALPN: u16 = 1;
/// Service parameter key for an alternative port.
pub const PARAM_KEY_PORT: u16 = 3;
/// Service parameter key for IPv4 address hints.
pub const PARAM_KEY_IPV4HINT: u16 = 4;
/// Service parameter key for the ECH configuration blob.
pub const PARAM_KEY_ECH: u16 = 5;
/// Service parameter key for IPv6 address hints.
pub const PARAM_KEY_IPV6HINT: u16 = 6;

/// Wire shapes a decoded service-parameter value can arrive in.
///
/// The transport layer maps each parameter it understands onto one of these
/// shapes; the per-key decoders below accept the shapes that make sense for
/// their key and fall back to a default on anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A single textual scalar (a port number, one address literal).
    Text(String),
    /// An ordered list of textual items (ALPN identifiers, address hints).
    List(Vec<String>),
    /// An opaque binary payload (ECH configuration, unknown encodings).
    Bytes(Vec<u8>),
}

/// One raw SVCB/HTTPS answer as supplied by the DNS transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RawServiceRecord {
    /// Record priority; lower numeric value means higher precedence.
    pub priority: u16,
    /// Target name, possibly in FQDN form with a trailing dot.
    pub target: String,
    /// Service parameters keyed by their registry number. Unrecognized keys
    /// are carried through and ignored by the HTTPS decoder.
    pub params: BTreeMap<u16, ParamValue>,
}

/// Parsed fields extracted from a set of HTTPS answers.
///
/// This is a fragment, not a full result row: the caller owns the query
/// context (domain, subdomain, full name) and merges these fields in. An
/// all-default fragment means no answer was selected and the caller must
/// treat the query as having found no record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpsFragment {
    /// Priority of the selected record.
    pub priority: Option<u16>,
    /// Target name of the selected record.
    pub target: Option<String>,
    /// Comma-joined ALPN identifiers; `None` when the list is empty or the
    /// parameter was absent.
    pub alpn_protocols: Option<String>,
    /// Whether the literal identifier `"h3"` was present (exact match only;
    /// draft identifiers such as `"h3-29"` do not count).
    pub has_http3: bool,
    /// Alternative port, when the record advertised a parsable one.
    pub port: Option<u16>,
    /// Comma-joined IPv4 hints; `None` when absent or empty.
    pub ipv4hint: Option<String>,
    /// Comma-joined IPv6 hints; `None` when absent or empty.
    pub ipv6hint: Option<String>,
    /// Whether an ECH configuration parameter was present.
    pub ech_config: bool,
}

/// Parsed fields extracted from a set of SVCB answers.
///
/// SVCB answers are general-purpose, so no per-key parameter semantics are
/// applied: the parameters of the selected record are captured as a raw
/// key-to-rendered-value map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvcbFragment {
    /// Priority of the selected record.
    pub priority: Option<u16>,
    /// Target name of the selected record.
    pub target: Option<String>,
    /// Raw parameter rendering of the selected record.
    pub params: BTreeMap<u16, String>,
}

/// Parses a set of HTTPS answers into a record fragment.
///
/// The authoritative answer is the one with the numerically smallest
/// priority (RFC 9460: lower priority number means higher precedence). An
/// empty answer set yields the default fragment.
pub fn parse_https_answers(answers: &[RawServiceRecord]) -> HttpsFragment {
    let Some(record) = select_authoritative(answers) else {
        return HttpsFragment::default();
    };

    let mut fragment = HttpsFragment {
        priority: Some(record.priority),
        target: Some(record.target.clone()),
        ..HttpsFragment::default()
    };

    if let Some(value) = record.params.get(&PARAM_KEY_ALPN) {
        let alpn = decode_alpn(value);
        fragment.has_http3 = alpn.iter().any(|id| id == "h3");
        if !alpn.is_empty() {
            fragment.alpn_protocols = Some(alpn.join(","));
        }
    }

    if let Some(value) = record.params.get(&PARAM_KEY_PORT) {
        fragment.port = decode_port(value);
    }

    if let Some(value) = record.params.get(&PARAM_KEY_IPV4HINT) {
        let hints = decode_ip_hints(value);
        if !hints.is_empty() {
            fragment.ipv4hint = Some(hints.join(","));
        }
    }

    if let Some(value) = record.params.get(&PARAM_KEY_IPV6HINT) {
        let hints = decode_ip_hints(value);
        if !hints.is_empty() {
            fragment.ipv6hint = Some(hints.join(","));
        }
    }

    fragment.ech_config = record.params.contains_key(&PARAM_KEY_ECH);

    fragment
}

/// Parses a set of SVCB answers into a record fragment.
///
/// Applies the same minimum-priority selection as [`parse_https_answers`]
/// but captures parameters verbatim instead of decoding them per key.
pub fn parse_svcb_answers(answers: &[RawServiceRecord]) -> SvcbFragment {
    let Some(record) = select_authoritative(answers) else {
        return SvcbFragment::default();
    };

    SvcbFragment {
        priority: Some(record.priority),
        target: Some(record.target.clone()),
        params: record
            .params
            .iter()
            .map(|(key, value)| (*key, render_param(value)))
            .collect(),
    }
}

/// Picks the answer with the smallest priority. The first record carrying
/// the minimum wins on ties, so duplicate minimums resolve to transport
/// order; no secondary ordering is applied.
fn select_authoritative(answers: &[RawServiceRecord]) -> Option<&RawServiceRecord> {
    let mut best: Option<&RawServiceRecord> = None;
    for record in answers {
        match best {
            Some(current) if current.priority <= record.priority => {}
            _ => best = Some(record),
        }
    }
    best
}

fn decode_alpn(value: &ParamValue) -> Vec<String> {
    match value {
        ParamValue::List(ids) => ids.clone(),
        ParamValue::Text(id) => vec![id.clone()],
        ParamValue::Bytes(bytes) => {
            warn!("Unknown ALPN encoding ({} bytes), ignoring value", bytes.len());
            Vec::new()
        }
    }
}

fn decode_port(value: &ParamValue) -> Option<u16> {
    match value {
        ParamValue::Text(text) => match text.trim().parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                warn!("Could not parse port value: {text:?}");
                None
            }
        },
        // Two network-order octets, the port's wire form.
        ParamValue::Bytes(bytes) if bytes.len() == 2 => {
            Some(u16::from_be_bytes([bytes[0], bytes[1]]))
        }
        other => {
            warn!("Could not parse port value: {other:?}");
            None
        }
    }
}

fn decode_ip_hints(value: &ParamValue) -> Vec<String> {
    match value {
        ParamValue::List(addresses) => addresses.clone(),
        ParamValue::Text(address) if !address.is_empty() => vec![address.clone()],
        ParamValue::Text(_) => Vec::new(),
        ParamValue::Bytes(bytes) => {
            warn!("Unknown IP hint encoding ({} bytes), ignoring value", bytes.len());
            Vec::new()
        }
    }
}

fn render_param(value: &ParamValue) -> String {
    match value {
        ParamValue::Text(text) => text.clone(),
        ParamValue::List(items) => items.join(","),
        ParamValue::Bytes(bytes) => bytes.iter().map(|b| format!("{b:02x}")).collect(),
    }
}
