//! Syntactic domain-name validation.
//!
//! Validation is purely syntactic (RFC 1035 length and label rules) with an
//! optional cross-check of the final label against an injected TLD registry.
//! The validator itself never touches the network; the registry is loaded
//! elsewhere and handed in, so tests can substitute a fixed set.

use std::sync::Arc;

use crate::tld::TldRegistry;

/// Maximum total length of a domain name, excluding the trailing dot.
const MAX_NAME_LENGTH: usize = 253;

/// Maximum length of a single label.
const MAX_LABEL_LENGTH: usize = 63;

/// Domain-name validator with an optionally injected TLD registry.
///
/// Without a registry the validator still enforces the syntactic rules and
/// the two-label minimum, but accepts any final label.
#[derive(Debug, Clone, Default)]
pub struct DomainValidator {
    tlds: Option<Arc<TldRegistry>>,
}

impl DomainValidator {
    /// Creates a validator cross-checking TLDs against the given registry.
    pub fn new(tlds: Option<Arc<TldRegistry>>) -> Self {
        DomainValidator { tlds }
    }

    /// Creates a validator without a TLD registry. Any syntactically valid
    /// final label is accepted.
    pub fn permissive() -> Self {
        DomainValidator { tlds: None }
    }

    /// Validates a domain name.
    ///
    /// One trailing dot (FQDN form) is stripped before checking, so
    /// `example.com.` and `example.com` validate identically.
    ///
    /// With `check_tld` set, the name must have at least two labels and the
    /// final label must pass the registry check (when one is injected; a
    /// degraded registry with no entries accepts any TLD). Without
    /// `check_tld`, single-label names are allowed, which is useful for
    /// internal or test names.
    pub fn validate(&self, name: &str, check_tld: bool) -> bool {
        if name.is_empty() || name.len() > MAX_NAME_LENGTH {
            return false;
        }

        let name = name.strip_suffix('.').unwrap_or(name);
        if name.is_empty() {
            return false;
        }

        let labels: Vec<&str> = name.split('.').collect();
        if check_tld && labels.len() < 2 {
            return false;
        }

        if !labels.iter().all(|label| validate_label(label)) {
            return false;
        }

        if check_tld {
            if let (Some(tlds), Some(tld)) = (&self.tlds, labels.last()) {
                if !tlds.is_valid_tld(tld) {
                    return false;
                }
            }
        }

        true
    }
}

/// Validates a single domain label: 1-63 characters, ASCII alphanumerics
/// and hyphens only, first and last character alphanumeric.
pub fn validate_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_LABEL_LENGTH {
        return false;
    }

    if !bytes[0].is_ascii_alphanumeric() || !bytes[bytes.len() - 1].is_ascii_alphanumeric() {
        return false;
    }

    bytes
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
