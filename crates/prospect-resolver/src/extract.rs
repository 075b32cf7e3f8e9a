//! Email candidate extraction from raw person records.
//!
//! The upstream scatters email data across a dozen field names depending
//! on endpoint and plan. Extraction scans them in a fixed priority order,
//! takes the first valid hit as the primary candidate, then sweeps the
//! array-valued fields for additional distinct addresses. Per-field
//! failures are logged and skipped, never fatal.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder token the upstream substitutes for emails the current plan
/// has not unlocked. Any address containing it is rejected.
pub const LOCKED_PLACEHOLDER: &str = "email_not_unlocked";

/// Consumer mail domains; candidates on these get `free_domain: true`.
const FREE_DOMAINS: [&str; 6] = [
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "live.com",
    "icloud.com",
];

/// Scalar fields swept after the named priority probes. Fields whose name
/// mentions "verified" rank higher than the rest.
const SCALAR_SWEEP_FIELDS: [&str; 4] = [
    "business_email",
    "primary_email",
    "verified_email",
    "professional_email",
];

/// Array fields swept for secondary candidates. Entries may be objects
/// carrying an `email` key or bare strings.
const ARRAY_SWEEP_FIELDS: [&str; 4] = [
    "contact_emails",
    "personal_emails",
    "work_emails",
    "business_emails",
];

/// One extracted email with its provenance and confidence score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailCandidate {
    /// The address itself; always contains `@`, never the locked token.
    pub email: String,
    /// Verification status: `verified`, `guessed`, or `available`.
    pub status: String,
    /// Name of the record field the address came from.
    pub source: String,
    /// 1-based rank within the result; the primary candidate is 1.
    pub position: u32,
    /// Whether the domain is a consumer mail provider.
    pub free_domain: bool,
    /// Confidence score, 0-100.
    pub confidence: u8,
}

/// Whether a string is an acceptable email: contains `@` and is not the
/// upstream's locked placeholder.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@') && !email.contains(LOCKED_PLACEHOLDER)
}

/// Whether the address' domain is a consumer mail provider.
#[must_use]
pub fn is_free_domain(email: &str) -> bool {
    email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| FREE_DOMAINS.contains(&domain.to_lowercase().as_str()))
}

/// Extract email candidates from a raw person record.
///
/// The first valid address found in priority order becomes the primary
/// candidate at position 1; the secondary sweep appends further distinct
/// addresses from the array fields at position index + 2.
#[must_use]
pub fn extract_email_candidates(record: &Value) -> Vec<EmailCandidate> {
    let mut candidates: Vec<EmailCandidate> = Vec::new();

    if let Some(primary) = primary_candidate(record) {
        candidates.push(primary);
    }

    for field in ARRAY_SWEEP_FIELDS {
        let Some(entries) = record.get(field).and_then(Value::as_array) else {
            continue;
        };
        for (idx, entry) in entries.iter().enumerate() {
            let Some(email) = entry_email(entry) else {
                tracing::debug!("skipping unreadable entry in '{field}'");
                continue;
            };
            if !is_valid_email(email) {
                continue;
            }
            if candidates.iter().any(|c| c.email == email) {
                continue;
            }
            #[allow(clippy::cast_possible_truncation)]
            let position = (idx + 2) as u32;
            candidates.push(EmailCandidate {
                email: email.to_string(),
                status: entry_status(entry).unwrap_or("guessed").to_string(),
                source: field.to_string(),
                position,
                free_domain: is_free_domain(email),
                confidence: entry_confidence(entry).unwrap_or(70),
            });
        }
    }

    candidates
}

/// Walk the priority probes and return the first valid hit.
fn primary_candidate(record: &Value) -> Option<EmailCandidate> {
    if let Some(email) = scalar_field(record, "email") {
        return Some(candidate(email, "verified", "email", 95));
    }

    for (field, confidence) in [("personal_emails", 90), ("contact_emails", 85)] {
        let first = record.get(field).and_then(Value::as_array).and_then(|a| a.first());
        if let Some(entry) = first {
            if let Some(email) = entry_email(entry).filter(|e| is_valid_email(e)) {
                let status = entry_status(entry).unwrap_or("verified");
                return Some(candidate(email, status, field, confidence));
            }
        }
    }

    if let Some(email) = scalar_field(record, "work_email") {
        return Some(candidate(email, "verified", "work_email", 80));
    }

    if let Some(email) = scalar_field(record, "extrapolated_email") {
        #[allow(clippy::cast_possible_truncation)]
        let confidence = record
            .get("extrapolated_email_confidence")
            .and_then(Value::as_u64)
            .map_or(70, |c| c.min(100) as u8);
        return Some(candidate(email, "guessed", "extrapolated_email", confidence));
    }

    for field in SCALAR_SWEEP_FIELDS {
        if let Some(email) = scalar_field(record, field) {
            let (status, confidence) = if field.contains("verified") {
                ("verified", 85)
            } else {
                ("guessed", 60)
            };
            return Some(candidate(email, status, field, confidence));
        }
    }

    None
}

fn candidate(email: &str, status: &str, source: &str, confidence: u8) -> EmailCandidate {
    EmailCandidate {
        email: email.to_string(),
        status: status.to_string(),
        source: source.to_string(),
        position: 1,
        free_domain: is_free_domain(email),
        confidence,
    }
}

fn scalar_field<'a>(record: &'a Value, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|e| is_valid_email(e))
}

/// The address inside a sweep entry: either the object's `email` field or
/// the entry itself when it is a bare string.
fn entry_email(entry: &Value) -> Option<&str> {
    entry
        .get("email")
        .and_then(Value::as_str)
        .or_else(|| entry.as_str())
}

fn entry_status(entry: &Value) -> Option<&str> {
    entry
        .get("email_status")
        .or_else(|| entry.get("status"))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn entry_confidence(entry: &Value) -> Option<u8> {
    entry
        .get("email_confidence")
        .or_else(|| entry.get("confidence"))
        .and_then(Value::as_u64)
        .map(|c| {
            #[allow(clippy::cast_possible_truncation)]
            let c = c.min(100) as u8;
            c
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_email_is_primary_verified() {
        let record = json!({"id": "p1", "email": "jane@gmail.com"});
        let candidates = extract_email_candidates(&record);
        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.email, "jane@gmail.com");
        assert_eq!(c.status, "verified");
        assert_eq!(c.source, "email");
        assert_eq!(c.position, 1);
        assert_eq!(c.confidence, 95);
        assert!(c.free_domain);
    }

    #[test]
    fn test_locked_placeholder_is_skipped() {
        let record = json!({
            "email": "email_not_unlocked@domain.com",
            "work_email": "jane@acme.com"
        });
        let candidates = extract_email_candidates(&record);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].email, "jane@acme.com");
        assert_eq!(candidates[0].source, "work_email");
        assert_eq!(candidates[0].confidence, 80);
    }

    #[test]
    fn test_extrapolated_only_is_guessed() {
        let record = json!({"extrapolated_email": "jane@acme.com"});
        let candidates = extract_email_candidates(&record);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].status, "guessed");
        assert_eq!(candidates[0].confidence, 70);
        assert_eq!(candidates[0].source, "extrapolated_email");
    }

    #[test]
    fn test_extrapolated_confidence_field_is_used() {
        let record = json!({
            "extrapolated_email": "jane@acme.com",
            "extrapolated_email_confidence": 42
        });
        let candidates = extract_email_candidates(&record);
        assert_eq!(candidates[0].confidence, 42);
    }

    #[test]
    fn test_personal_emails_beat_work_email() {
        let record = json!({
            "personal_emails": [{"email": "jane@gmail.com", "email_status": "available"}],
            "work_email": "jane@acme.com"
        });
        let candidates = extract_email_candidates(&record);
        assert_eq!(candidates[0].email, "jane@gmail.com");
        assert_eq!(candidates[0].status, "available");
        assert_eq!(candidates[0].confidence, 90);
    }

    #[test]
    fn test_verified_scalar_sweep_field() {
        let record = json!({"verified_email": "jane@acme.com"});
        let candidates = extract_email_candidates(&record);
        assert_eq!(candidates[0].status, "verified");
        assert_eq!(candidates[0].confidence, 85);

        let record = json!({"primary_email": "jane@acme.com"});
        let candidates = extract_email_candidates(&record);
        assert_eq!(candidates[0].status, "guessed");
        assert_eq!(candidates[0].confidence, 60);
    }

    #[test]
    fn test_secondary_sweep_appends_distinct_addresses() {
        let record = json!({
            "email": "jane@acme.com",
            "contact_emails": [
                {"email": "jane@acme.com"},
                {"email": "j.roe@acme.com", "email_status": "verified", "email_confidence": 88},
                "jane.roe@gmail.com"
            ]
        });
        let candidates = extract_email_candidates(&record);
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].email, "jane@acme.com");

        assert_eq!(candidates[1].email, "j.roe@acme.com");
        assert_eq!(candidates[1].position, 3);
        assert_eq!(candidates[1].status, "verified");
        assert_eq!(candidates[1].confidence, 88);

        // Bare-string entry defaults to guessed/70.
        assert_eq!(candidates[2].email, "jane.roe@gmail.com");
        assert_eq!(candidates[2].position, 4);
        assert_eq!(candidates[2].status, "guessed");
        assert_eq!(candidates[2].confidence, 70);
        assert!(candidates[2].free_domain);
    }

    #[test]
    fn test_no_candidate_contains_locked_token() {
        let record = json!({
            "email": "email_not_unlocked@domain.com",
            "contact_emails": [
                {"email": "email_not_unlocked@domain.com"},
                {"email": "real@acme.com"}
            ]
        });
        let candidates = extract_email_candidates(&record);
        assert_eq!(candidates.len(), 1);
        for c in &candidates {
            assert!(c.email.contains('@'));
            assert!(!c.email.contains(LOCKED_PLACEHOLDER));
        }
    }

    #[test]
    fn test_free_domain_detection() {
        assert!(is_free_domain("a@gmail.com"));
        assert!(is_free_domain("a@Outlook.COM"));
        assert!(!is_free_domain("a@acme.com"));
        assert!(!is_free_domain("no-at-sign"));
    }

    #[test]
    fn test_empty_record_yields_nothing() {
        assert!(extract_email_candidates(&json!({})).is_empty());
        assert!(extract_email_candidates(&json!(null)).is_empty());
    }
}
