//! Multi-strategy contact resolution against the upstream match endpoints.

use crate::extract::{extract_email_candidates, EmailCandidate};
use prospect_api::{ApiClient, PhoneRecord};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Shown when every strategy has been tried without a usable response.
const EXHAUSTED_MESSAGE: &str = "Could not resolve contact details. Possible causes: \
     invalid person id or person not found, network connectivity issues, \
     plan limitations on contact reveals, or a request timeout. Please try again.";

/// Outcome of one contact resolution. Always well-formed: a failed lookup
/// carries `success: false`, empty lists, and an explanatory message.
#[derive(Debug, Clone, Serialize)]
pub struct EmailSearchResult {
    /// The resolved raw person record, or null on failure.
    pub person: Value,
    /// Extracted email candidates, primary first.
    pub emails: Vec<EmailCandidate>,
    /// Phone numbers attached to the resolved record.
    pub phone_numbers: Vec<PhoneRecord>,
    /// Whether a usable record was obtained.
    pub success: bool,
    /// Human-readable summary of the outcome.
    pub message: String,
}

impl EmailSearchResult {
    /// A failure result with empty lists.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            person: Value::Null,
            emails: Vec::new(),
            phone_numbers: Vec::new(),
            success: false,
            message: message.into(),
        }
    }

    /// A success result built from a usable person record.
    #[must_use]
    pub fn from_record(record: Value) -> Self {
        let emails = extract_email_candidates(&record);
        let phone_numbers: Vec<PhoneRecord> = record
            .get("phone_numbers")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();
        let message = format!(
            "{} email(s), {} phone number(s) found",
            emails.len(),
            phone_numbers.len()
        );
        Self {
            person: record,
            emails,
            phone_numbers,
            success: true,
            message,
        }
    }
}

/// Lookup strategies, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    /// POST `people/match` with the reveal flags as query parameters.
    MatchQueryFlags,
    /// POST `people/match` with the reveal flags inside the body.
    MatchBodyFlags,
    /// GET `people/{id}`, read-only.
    DirectLookup,
}

const STRATEGY_ORDER: [Strategy; 3] = [
    Strategy::MatchQueryFlags,
    Strategy::MatchBodyFlags,
    Strategy::DirectLookup,
];

/// Resolves contact details for one person at a time.
///
/// Each strategy is bounded by the strategy timeout; when it fires, the
/// in-flight request is dropped and the chain moves on.
pub struct ContactResolver {
    client: ApiClient,
    strategy_timeout: Duration,
}

impl ContactResolver {
    /// Create a resolver with the default 30 second strategy timeout.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            strategy_timeout: Duration::from_secs(30),
        }
    }

    /// Override the per-strategy timeout.
    #[must_use]
    pub fn with_strategy_timeout(mut self, timeout: Duration) -> Self {
        self.strategy_timeout = timeout;
        self
    }

    /// Resolve emails and phone numbers for `person_id`.
    ///
    /// Never errors: an empty id, a timeout, or an exhausted strategy
    /// chain all produce a failure result.
    pub async fn resolve(&self, person_id: &str, organization_id: Option<&str>) -> EmailSearchResult {
        let person_id = person_id.trim();
        if person_id.is_empty() {
            return EmailSearchResult::failure("No person id provided for contact lookup.");
        }

        for strategy in STRATEGY_ORDER {
            tracing::debug!(?strategy, person_id, "trying lookup strategy");
            let attempt = tokio::time::timeout(
                self.strategy_timeout,
                self.run_strategy(strategy, person_id, organization_id),
            );
            match attempt.await {
                Ok(Ok(raw)) => {
                    if let Some(record) = usable_record(raw) {
                        tracing::debug!(?strategy, person_id, "lookup strategy succeeded");
                        return EmailSearchResult::from_record(record);
                    }
                    tracing::debug!(?strategy, person_id, "response not usable, trying next");
                }
                Ok(Err(e)) => {
                    tracing::warn!(?strategy, person_id, "lookup strategy failed: {e}");
                }
                Err(_) => {
                    tracing::warn!(
                        ?strategy,
                        person_id,
                        "lookup strategy timed out after {:?}",
                        self.strategy_timeout
                    );
                }
            }
        }

        EmailSearchResult::failure(EXHAUSTED_MESSAGE)
    }

    async fn run_strategy(
        &self,
        strategy: Strategy,
        person_id: &str,
        organization_id: Option<&str>,
    ) -> prospect_api::Result<Value> {
        match strategy {
            Strategy::MatchQueryFlags => {
                let body = match_body(person_id, organization_id);
                self.client
                    .post_json_with_query(
                        "people/match",
                        &[
                            ("reveal_personal_emails", "true"),
                            ("reveal_phone_number", "true"),
                        ],
                        &body,
                    )
                    .await
            }
            Strategy::MatchBodyFlags => {
                let mut body = match_body(person_id, organization_id);
                body["reveal_personal_emails"] = json!(true);
                body["reveal_phone_number"] = json!(true);
                self.client.post_json("people/match", &body).await
            }
            Strategy::DirectLookup => self.client.get_json(&format!("people/{person_id}")).await,
        }
    }
}

fn match_body(person_id: &str, organization_id: Option<&str>) -> Value {
    let mut body = json!({"id": person_id});
    if let Some(org_id) = organization_id.map(str::trim).filter(|o| !o.is_empty()) {
        body["organization_id"] = json!(org_id);
    }
    body
}

/// A response is usable when it carries a `person` object or a top-level
/// `id`. The record is the nested person when present, otherwise the
/// response itself.
fn usable_record(raw: Value) -> Option<Value> {
    if raw.get("person").is_some_and(Value::is_object) {
        return raw.get("person").cloned();
    }
    if raw.get("id").is_some() {
        return Some(raw);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_record_prefers_nested_person() {
        let raw = json!({"person": {"id": "p1", "email": "a@b.com"}, "status": "ok"});
        let record = usable_record(raw).expect("usable");
        assert_eq!(record["id"], "p1");
        assert!(record.get("status").is_none());
    }

    #[test]
    fn test_usable_record_accepts_top_level_id() {
        let raw = json!({"id": "p1", "email": "a@b.com"});
        let record = usable_record(raw).expect("usable");
        assert_eq!(record["email"], "a@b.com");
    }

    #[test]
    fn test_unusable_record_rejected() {
        assert!(usable_record(json!({"status": "ok"})).is_none());
        assert!(usable_record(json!({"person": "not an object"})).is_none());
    }

    #[test]
    fn test_match_body_includes_trimmed_org() {
        let body = match_body("p1", Some(" org-1 "));
        assert_eq!(body["organization_id"], "org-1");

        let body = match_body("p1", Some("  "));
        assert!(body.get("organization_id").is_none());
    }

    #[test]
    fn test_success_result_message_counts() {
        let record = json!({
            "id": "p1",
            "email": "jane@acme.com",
            "phone_numbers": [{"raw_number": "+1 555 0100", "type": "work"}]
        });
        let result = EmailSearchResult::from_record(record);
        assert!(result.success);
        assert_eq!(result.message, "1 email(s), 1 phone number(s) found");
        assert_eq!(result.phone_numbers[0].kind.as_deref(), Some("work"));
    }

    #[tokio::test]
    async fn test_empty_person_id_short_circuits() {
        let client = ApiClient::new(
            "http://127.0.0.1:9",
            prospect_core::ApiKey::new("k").expect("valid key"),
        )
        .expect("create client");
        let resolver = ContactResolver::new(client);

        let result = resolver.resolve("   ", None).await;
        assert!(!result.success);
        assert!(result.emails.is_empty());
        assert!(result.phone_numbers.is_empty());
        assert_eq!(result.message, "No person id provided for contact lookup.");
    }
}
