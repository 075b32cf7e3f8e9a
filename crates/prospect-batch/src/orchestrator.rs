//! The sequential capture loop.

use prospect_api::Person;
use prospect_core::config::BatchConfig;
use prospect_core::PersonId;
use prospect_resolver::{extract_email_candidates, ContactResolver, EmailSearchResult};
use serde::Serialize;
use std::time::Duration;

/// One person's capture outcome, paired with the input record.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureOutcome {
    /// The input person, unchanged.
    pub person: Person,
    /// The resolution result recorded for this person.
    pub result: EmailSearchResult,
}

/// Progress report emitted after every processed item.
#[derive(Debug, Clone, Serialize)]
pub struct BatchProgress {
    /// 1-based index of the item just finished.
    pub current: usize,
    /// Total number of items in the run.
    pub total: usize,
    /// Display name of the person just processed.
    pub person_name: String,
    /// The item's result, as recorded in the output.
    pub result: EmailSearchResult,
}

/// Sequential batch orchestrator.
///
/// Items are processed strictly in order with a fixed delay before every
/// item except the first. A person without a usable id is recorded as a
/// failure and skipped without a network call or delay.
pub struct BatchOrchestrator {
    resolver: ContactResolver,
    delay_between_items: Duration,
    item_timeout: Duration,
}

impl BatchOrchestrator {
    /// Create an orchestrator with default pacing (2s delay, 45s item
    /// timeout).
    #[must_use]
    pub fn new(resolver: ContactResolver) -> Self {
        Self {
            resolver,
            delay_between_items: Duration::from_millis(2000),
            item_timeout: Duration::from_secs(45),
        }
    }

    /// Create an orchestrator paced by the given batch configuration.
    #[must_use]
    pub fn from_config(resolver: ContactResolver, config: &BatchConfig) -> Self {
        Self {
            resolver,
            delay_between_items: Duration::from_millis(config.delay_between_items_ms),
            item_timeout: Duration::from_secs(config.item_timeout_secs),
        }
    }

    /// Override the inter-item delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_between_items = delay;
        self
    }

    /// Override the per-item timeout.
    #[must_use]
    pub fn with_item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout = timeout;
        self
    }

    /// Run the capture across `people`, reporting progress after every
    /// item through `progress`.
    ///
    /// The output has exactly one outcome per input person, in input
    /// order, regardless of failures.
    pub async fn run<F>(&self, people: &[Person], mut progress: F) -> Vec<CaptureOutcome>
    where
        F: FnMut(BatchProgress),
    {
        let total = people.len();
        let mut outcomes = Vec::with_capacity(total);
        tracing::info!(total, "starting batch capture");

        for (index, person) in people.iter().enumerate() {
            let result = match PersonId::new(&person.id) {
                Err(_) => {
                    tracing::warn!(index, "skipping person without id");
                    EmailSearchResult::failure("person record has no id")
                }
                Ok(person_id) => {
                    if index > 0 {
                        tokio::time::sleep(self.delay_between_items).await;
                    }
                    self.capture_one(person, &person_id).await
                }
            };

            progress(BatchProgress {
                current: index + 1,
                total,
                person_name: person.display_name(),
                result: result.clone(),
            });
            outcomes.push(CaptureOutcome {
                person: person.clone(),
                result,
            });
        }

        let found = outcomes.iter().filter(|o| o.result.success).count();
        tracing::info!(total, found, "batch capture finished");
        outcomes
    }

    /// Capture one person: existing record data first, then the resolver,
    /// the whole item bounded by the item timeout.
    async fn capture_one(&self, person: &Person, person_id: &PersonId) -> EmailSearchResult {
        match tokio::time::timeout(self.item_timeout, self.lookup(person, person_id)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(%person_id, "capture timed out");
                EmailSearchResult::failure(format!(
                    "Lookup timed out after {:?}",
                    self.item_timeout
                ))
            }
        }
    }

    async fn lookup(&self, person: &Person, person_id: &PersonId) -> EmailSearchResult {
        // The search result may already carry usable email data; in that
        // case no network call is needed.
        if let Ok(raw) = serde_json::to_value(person) {
            if !extract_email_candidates(&raw).is_empty() {
                tracing::debug!(%person_id, "emails present on input record");
                return EmailSearchResult::from_record(raw);
            }
        }

        let result = self
            .resolver
            .resolve(person_id.as_str(), person.organization_ref())
            .await;

        // A resolved record without a single email is a failure at this
        // level, even though the lookup itself went through.
        if result.success && result.emails.is_empty() {
            let mut failed = result;
            failed.success = false;
            failed.message = "No email addresses found for this person.".to_string();
            return failed;
        }
        result
    }
}
