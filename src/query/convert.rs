//! Conversion from hickory answers to raw service records, and resolver
//! error classification.

use std::collections::BTreeMap;

use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::lookup::Lookup;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::rdata::svcb::{SvcParamValue, SVCB};
use hickory_resolver::proto::rr::RData;

use crate::models::RecordKind;
use crate::parser::{
    ParamValue, RawServiceRecord, PARAM_KEY_ALPN, PARAM_KEY_ECH, PARAM_KEY_IPV4HINT,
    PARAM_KEY_IPV6HINT, PARAM_KEY_PORT,
};

/// Why a lookup produced no usable answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum QueryFailure {
    /// The name does not exist.
    NxDomain,
    /// The name exists but carries no record of the requested type.
    NoRecords,
    /// The resolver gave up waiting.
    Timeout,
    /// Anything else, carrying the resolver's message.
    Other(String),
}

impl QueryFailure {
    /// Renders the failure into the `query_error` string recorded on rows.
    pub(crate) fn into_error_string(self, kind: RecordKind) -> String {
        match self {
            QueryFailure::NxDomain => "NXDOMAIN".to_string(),
            QueryFailure::NoRecords => format!("No {} record", kind.as_str()),
            QueryFailure::Timeout => "Timeout".to_string(),
            QueryFailure::Other(message) => message,
        }
    }
}

/// Classifies a resolver error into the small closed set of failure kinds.
pub(crate) fn classify_resolve_error(error: &ResolveError) -> QueryFailure {
    match error.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. }
            if *response_code == ResponseCode::NXDomain =>
        {
            QueryFailure::NxDomain
        }
        ResolveErrorKind::NoRecordsFound { .. } => QueryFailure::NoRecords,
        ResolveErrorKind::Timeout => QueryFailure::Timeout,
        _ => QueryFailure::Other(error.to_string()),
    }
}

/// Extracts the HTTPS answers from a lookup as raw service records. Other
/// record data in the answer section (CNAME chain members) is skipped.
pub(crate) fn https_answers(lookup: &Lookup) -> Vec<RawServiceRecord> {
    lookup
        .iter()
        .filter_map(|rdata| match rdata {
            RData::HTTPS(https) => Some(raw_from_svcb(&https.0)),
            _ => None,
        })
        .collect()
}

/// Extracts the SVCB answers from a lookup as raw service records.
pub(crate) fn svcb_answers(lookup: &Lookup) -> Vec<RawServiceRecord> {
    lookup
        .iter()
        .filter_map(|rdata| match rdata {
            RData::SVCB(svcb) => Some(raw_from_svcb(svcb)),
            _ => None,
        })
        .collect()
}

/// Maps hickory's decoded service parameters onto the tagged wire shapes the
/// parser decodes. ALPN identifiers arrive as ASCII text, IP hints as
/// address literals, ECH as its opaque payload. Parameters outside the
/// well-known set are dropped here; the parser would ignore them anyway.
fn raw_from_svcb(svcb: &SVCB) -> RawServiceRecord {
    let mut params = BTreeMap::new();

    for (_key, value) in svcb.svc_params() {
        match value {
            SvcParamValue::Alpn(alpn) => {
                params.insert(PARAM_KEY_ALPN, ParamValue::List(alpn.0.clone()));
            }
            SvcParamValue::Port(port) => {
                params.insert(PARAM_KEY_PORT, ParamValue::Text(port.to_string()));
            }
            SvcParamValue::Ipv4Hint(hint) => {
                params.insert(
                    PARAM_KEY_IPV4HINT,
                    ParamValue::List(hint.0.iter().map(|a| a.0.to_string()).collect()),
                );
            }
            SvcParamValue::EchConfig(ech) => {
                params.insert(PARAM_KEY_ECH, ParamValue::Bytes(ech.0.clone()));
            }
            SvcParamValue::Ipv6Hint(hint) => {
                params.insert(
                    PARAM_KEY_IPV6HINT,
                    ParamValue::List(hint.0.iter().map(|a| a.0.to_string()).collect()),
                );
            }
            _ => {}
        }
    }

    RawServiceRecord {
        priority: svcb.svc_priority(),
        target: svcb.target_name().to_utf8(),
        params,
    }
}
