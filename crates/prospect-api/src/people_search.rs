//! People search with endpoint fallbacks and response normalization.
//!
//! Mirrors the company search structure: a primary endpoint chain, a
//! broader alternative chain when the primary yields nothing, and a
//! normalizer that probes the several field names the upstream uses for
//! the people array.

use crate::client::ApiClient;
use crate::error::Result;
use crate::records::{Pagination, Person};
use serde_json::{json, Value};

/// Field names probed in order for the people array.
const PRIMARY_ITEM_FIELDS: [&str; 3] = ["contacts", "people", "results"];
const ALTERNATE_ITEM_FIELDS: [&str; 5] = ["data", "persons", "employees", "members", "team"];

/// Filters for a people search.
#[derive(Debug, Clone, Default)]
pub struct PeopleFilters {
    /// Restrict to one organization
    pub organization_id: Option<String>,
    /// Job title filters
    pub person_titles: Vec<String>,
    /// Seniority filters
    pub person_seniorities: Vec<String>,
    /// Location filters
    pub person_locations: Vec<String>,
    /// Free-text keywords
    pub keywords: Option<String>,
    /// Page number (1-based; 0 means 1)
    pub page: u32,
    /// Results per page (0 means 100)
    pub per_page: u32,
}

/// The fixed response envelope for people search.
#[derive(Debug, Clone)]
pub struct PeopleSearchResponse {
    /// Normalized person records; empty rather than missing.
    pub items: Vec<Person>,
    /// Raw breadcrumb metadata from the upstream.
    pub breadcrumbs: Vec<Value>,
    /// Upstream flag: only part of the result set was returned.
    pub partial_results_only: bool,
    /// Upstream flag: EU prospecting is disabled for this account.
    pub disable_eu_prospecting: bool,
    /// Upstream count of fetched results; falls back to the item count.
    pub num_fetch_result: u64,
    /// Pagination block with defaults applied.
    pub pagination: Pagination,
}

/// Search people; when the primary chain returns nothing, run the broad
/// alternative chain before giving up.
///
/// The alternative chain never errors: its last resort is a valid empty
/// envelope.
pub async fn search_people(
    client: &ApiClient,
    filters: &PeopleFilters,
) -> Result<PeopleSearchResponse> {
    tracing::debug!(?filters, "people search");

    let raw = primary_search(client, filters).await?;
    let response = normalize_people_response(&raw);
    if !response.items.is_empty() {
        return Ok(response);
    }

    tracing::debug!("primary people search empty, trying broad alternative");
    let raw = alternative_search(client, filters).await;
    Ok(normalize_people_response(&raw))
}

/// Primary chain: `mixed_people/search`, then `contacts/search` with the
/// same body. The original error is preserved when both fail.
async fn primary_search(client: &ApiClient, filters: &PeopleFilters) -> Result<Value> {
    let body = build_body(filters);

    match client.post_json("mixed_people/search", &body).await {
        Ok(raw) => Ok(raw),
        Err(primary_err) => {
            tracing::warn!("mixed_people/search failed ({primary_err}), trying contacts/search");
            match client.post_json("contacts/search", &body).await {
                Ok(raw) => Ok(raw),
                Err(_) => Err(primary_err),
            }
        }
    }
}

/// Broad alternative: `people/search` with a reduced body, then
/// `organizations/people`, then an empty response.
async fn alternative_search(client: &ApiClient, filters: &PeopleFilters) -> Value {
    let mut broad_body = json!({
        "page": 1,
        "per_page": 100,
        "reveal_personal_emails": true,
        "include_emails": true,
    });
    if let Some(org_id) = trimmed(&filters.organization_id) {
        broad_body["organization_ids"] = json!([org_id]);
    }
    if !filters.person_titles.is_empty() {
        broad_body["person_titles"] = json!(filters.person_titles);
    }

    match client.post_json("people/search", &broad_body).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("people/search failed ({e}), trying organizations/people");
            let org_body = json!({
                "organization_id": filters.organization_id,
                "page": 1,
                "per_page": 100,
            });
            match client.post_json("organizations/people", &org_body).await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("organizations/people failed ({e}), returning empty result");
                    json!({
                        "contacts": [],
                        "people": [],
                        "pagination": {
                            "page": 1,
                            "per_page": 25,
                            "total_entries": 0,
                            "total_pages": 0,
                        }
                    })
                }
            }
        }
    }
}

/// Translate filters into the upstream request body.
fn build_body(filters: &PeopleFilters) -> Value {
    let mut body = json!({
        "page": filters.page.max(1),
        "per_page": if filters.per_page == 0 { 100 } else { filters.per_page },
        "reveal_personal_emails": true,
        "include_emails": true,
        "prospected_by_current_team": false,
    });

    if let Some(org_id) = trimmed(&filters.organization_id) {
        body["organization_ids"] = json!([org_id]);
    }
    if !filters.person_titles.is_empty() {
        body["person_titles"] = json!(filters.person_titles);
    }
    if !filters.person_seniorities.is_empty() {
        body["person_seniorities"] = json!(filters.person_seniorities);
    }
    if !filters.person_locations.is_empty() {
        body["person_locations"] = json!(filters.person_locations);
    }
    if let Some(keywords) = trimmed(&filters.keywords) {
        body["q_keywords"] = json!(keywords);
    }

    body
}

fn trimmed(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Normalize a raw people search response into the fixed envelope.
///
/// Never fails: missing or misshapen fields default to empty collections,
/// and pagination falls back to the item count.
#[must_use]
pub fn normalize_people_response(raw: &Value) -> PeopleSearchResponse {
    let mut items_raw: Vec<Value> = Vec::new();
    for field in PRIMARY_ITEM_FIELDS.iter().chain(ALTERNATE_ITEM_FIELDS.iter()) {
        if let Some(found) = raw.get(*field).and_then(Value::as_array) {
            if !found.is_empty() {
                tracing::debug!("people items found under field '{field}'");
                items_raw = found.clone();
                break;
            }
        }
    }

    let items: Vec<Person> = items_raw
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).unwrap_or_else(|e| {
                tracing::warn!("unparseable person record: {e}");
                Person::default()
            })
        })
        .collect();

    let count = items.len() as u64;
    let mut pagination = Pagination::from_raw(raw);
    if pagination.total_entries == 0 {
        pagination.total_entries = count;
    }
    if pagination.total_pages == 0 && count > 0 {
        pagination.total_pages = 1;
    }

    let num_fetch_result = raw
        .get("num_fetch_result")
        .and_then(Value::as_u64)
        .unwrap_or(count);

    PeopleSearchResponse {
        items,
        breadcrumbs: raw
            .get("breadcrumbs")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        partial_results_only: raw
            .get("partial_results_only")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        disable_eu_prospecting: raw
            .get("disable_eu_prospecting")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        num_fetch_result,
        pagination,
    }
}
