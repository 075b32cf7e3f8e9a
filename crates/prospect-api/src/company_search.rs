//! Company search with endpoint fallbacks and response normalization.
//!
//! The primary endpoint occasionally rejects filter combinations that the
//! secondary accepts, and result arrays show up under several different
//! field names between plans. The search therefore walks a small fallback
//! chain and then normalizes whatever came back into a fixed envelope.

use crate::client::ApiClient;
use crate::error::Result;
use crate::records::{Company, Pagination};
use serde_json::{json, Value};

/// Alternate field names the upstream has been observed to use for the
/// company array when `organizations` is absent.
const ALTERNATE_ITEM_FIELDS: [&str; 6] =
    ["results", "data", "items", "records", "accounts", "entries"];

/// Filters for a company search.
#[derive(Debug, Clone, Default)]
pub struct CompanyFilters {
    /// Company name query
    pub company_name: Option<String>,
    /// Location query (single location)
    pub location: Option<String>,
    /// Business area keyword tag
    pub business_area: Option<String>,
    /// Employee range as `"min,max"`
    pub employee_range: Option<String>,
    /// Page number (1-based; 0 means 1)
    pub page: u32,
    /// Results per page (0 means 25)
    pub per_page: u32,
}

/// The fixed response envelope for company search.
#[derive(Debug, Clone)]
pub struct CompanySearchResponse {
    /// Normalized company records; empty rather than missing.
    pub items: Vec<Company>,
    /// Raw breadcrumb metadata from the upstream.
    pub breadcrumbs: Vec<Value>,
    /// Upstream flag: only part of the result set was returned.
    pub partial_results_only: bool,
    /// Upstream flag: EU prospecting is disabled for this account.
    pub disable_eu_prospecting: bool,
    /// Upstream count of fetched results.
    pub num_fetch_result: u64,
    /// Pagination block with defaults applied.
    pub pagination: Pagination,
}

/// Search companies through the fallback chain and normalize the result.
///
/// Chain: `mixed_companies/search`, then `organizations/search` with the
/// same body, then `organizations/search` with a simplified body. When
/// every attempt fails the error from the first attempt is returned, as
/// it is the most diagnostic.
pub async fn search_companies(
    client: &ApiClient,
    filters: &CompanyFilters,
) -> Result<CompanySearchResponse> {
    let body = build_body(filters);
    tracing::debug!(?filters, "company search");

    let raw = match client.post_json("mixed_companies/search", &body).await {
        Ok(raw) => raw,
        Err(primary_err) => {
            tracing::warn!(
                "mixed_companies/search failed ({primary_err}), trying organizations/search"
            );
            match client.post_json("organizations/search", &body).await {
                Ok(raw) => raw,
                Err(fallback_err) => {
                    tracing::warn!(
                        "organizations/search failed ({fallback_err}), trying simplified body"
                    );
                    match client
                        .post_json("organizations/search", &simplified_body(filters))
                        .await
                    {
                        Ok(raw) => raw,
                        Err(_) => return Err(primary_err),
                    }
                }
            }
        }
    };

    Ok(normalize_company_response(&raw))
}

/// Translate filters into the upstream request body.
fn build_body(filters: &CompanyFilters) -> Value {
    let mut body = json!({
        "page": filters.page.max(1),
        "per_page": if filters.per_page == 0 { 25 } else { filters.per_page },
    });

    if let Some(name) = trimmed(&filters.company_name) {
        body["q_organization_name"] = json!(name);
    }
    if let Some(location) = trimmed(&filters.location) {
        body["organization_locations"] = json!([location]);
    }
    if let Some(area) = trimmed(&filters.business_area) {
        body["q_organization_keyword_tags"] = json!([area.to_lowercase()]);
    }
    if let Some(range) = trimmed(&filters.employee_range) {
        // Expected as "min,max"; anything else is dropped.
        let parts: Vec<&str> = range.splitn(2, ',').collect();
        if let [min, max] = parts.as_slice() {
            if !min.is_empty() && !max.is_empty() {
                body["organization_num_employees_ranges"] = json!([format!("{min},{max}")]);
            }
        }
    }

    body
}

/// A minimal last-resort body: first page, location or name only.
fn simplified_body(filters: &CompanyFilters) -> Value {
    let mut body = json!({
        "page": 1,
        "per_page": 25,
    });

    if let Some(location) = trimmed(&filters.location) {
        body["organization_locations"] = json!([location]);
    } else if let Some(name) = trimmed(&filters.company_name) {
        body["q_organization_name"] = json!(name);
    }

    body
}

fn trimmed(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Normalize a raw company search response into the fixed envelope.
///
/// Never fails: missing or misshapen fields default to empty collections.
#[must_use]
pub fn normalize_company_response(raw: &Value) -> CompanySearchResponse {
    let pagination = Pagination::from_raw(raw);

    let mut items_raw = raw
        .get("organizations")
        .or_else(|| raw.get("companies"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    // Some plans bury the array under another field while still reporting
    // total_entries; probe the known alternates before giving up.
    if items_raw.is_empty() && pagination.total_entries > 0 {
        for field in ALTERNATE_ITEM_FIELDS {
            if let Some(found) = raw.get(field).and_then(Value::as_array) {
                if !found.is_empty() {
                    tracing::debug!("company items found under alternate field '{field}'");
                    items_raw = found.clone();
                    break;
                }
            }
        }
    }

    let breadcrumbs = raw
        .get("breadcrumbs")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let backfill = BreadcrumbBackfill::from_breadcrumbs(&breadcrumbs);

    let items = items_raw
        .into_iter()
        .map(|item| {
            let mut company: Company = serde_json::from_value(item).unwrap_or_else(|e| {
                tracing::warn!("unparseable company record: {e}");
                Company::default()
            });
            backfill.apply(&mut company);
            company
        })
        .collect();

    CompanySearchResponse {
        items,
        breadcrumbs,
        partial_results_only: raw
            .get("partial_results_only")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        disable_eu_prospecting: raw
            .get("disable_eu_prospecting")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        num_fetch_result: raw
            .get("num_fetch_result")
            .and_then(Value::as_u64)
            .unwrap_or(0),
        pagination,
    }
}

/// Derived fields recovered from response breadcrumbs, used to back-fill
/// items that lack them.
#[derive(Debug, Default)]
struct BreadcrumbBackfill {
    employees_range: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    industry: Option<String>,
}

impl BreadcrumbBackfill {
    fn from_breadcrumbs(breadcrumbs: &[Value]) -> Self {
        let mut backfill = Self::default();

        for b in breadcrumbs {
            let signal = b.get("signal_field_name").and_then(Value::as_str);
            let label = b.get("label").and_then(Value::as_str);
            let display_name = b.get("display_name").and_then(Value::as_str);
            let value = b.get("value").and_then(Value::as_str);

            if signal == Some("organization_num_employees_ranges") || label == Some("# Employees") {
                backfill.employees_range = value.or(display_name).map(ToString::to_string);
            }
            if signal == Some("organization_locations") || label == Some("Company Locations") {
                // display_name like "Campinas, State of Sao Paulo, Brazil"
                if let Some(display) = display_name {
                    let mut parts = display.split(',').map(str::trim);
                    backfill.city = parts.next().filter(|s| !s.is_empty()).map(String::from);
                    backfill.state = parts.next().filter(|s| !s.is_empty()).map(String::from);
                    backfill.country = parts.next().filter(|s| !s.is_empty()).map(String::from);
                }
            }
            if signal == Some("q_organization_keyword_tags")
                || label == Some("Company Keywords Contain ANY Of")
            {
                backfill.industry = display_name.or(value).map(ToString::to_string);
            }
        }

        backfill
    }

    /// Fill derived fields into a company only where the item lacks them.
    fn apply(&self, company: &mut Company) {
        if company.num_employees_range.is_none() {
            company.num_employees_range = self.employees_range.clone();
        }
        if company.organization_city.is_none() {
            company.organization_city = self.city.clone();
        }
        if company.organization_state.is_none() {
            company.organization_state = self.state.clone();
        }
        if company.organization_country.is_none() {
            company.organization_country = self.country.clone();
        }
        if company.industry.is_none() {
            company.industry = self.industry.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_body_full_filters() {
        let filters = CompanyFilters {
            company_name: Some(" Acme ".to_string()),
            location: Some("Lisbon".to_string()),
            business_area: Some("Software".to_string()),
            employee_range: Some("11,50".to_string()),
            page: 2,
            per_page: 50,
        };

        let body = build_body(&filters);
        assert_eq!(body["page"], 2);
        assert_eq!(body["per_page"], 50);
        assert_eq!(body["q_organization_name"], "Acme");
        assert_eq!(body["organization_locations"], json!(["Lisbon"]));
        assert_eq!(body["q_organization_keyword_tags"], json!(["software"]));
        assert_eq!(
            body["organization_num_employees_ranges"],
            json!(["11,50"])
        );
    }

    #[test]
    fn test_build_body_skips_blank_filters() {
        let filters = CompanyFilters {
            company_name: Some("   ".to_string()),
            employee_range: Some("50".to_string()), // missing max, dropped
            ..CompanyFilters::default()
        };

        let body = build_body(&filters);
        assert_eq!(body["page"], 1);
        assert_eq!(body["per_page"], 25);
        assert!(body.get("q_organization_name").is_none());
        assert!(body.get("organization_num_employees_ranges").is_none());
    }

    #[test]
    fn test_simplified_body_prefers_location() {
        let filters = CompanyFilters {
            company_name: Some("Acme".to_string()),
            location: Some("Lisbon".to_string()),
            ..CompanyFilters::default()
        };
        let body = simplified_body(&filters);
        assert_eq!(body["organization_locations"], json!(["Lisbon"]));
        assert!(body.get("q_organization_name").is_none());

        let filters = CompanyFilters {
            company_name: Some("Acme".to_string()),
            ..CompanyFilters::default()
        };
        let body = simplified_body(&filters);
        assert_eq!(body["q_organization_name"], "Acme");
    }

    #[test]
    fn test_normalize_standard_response() {
        let raw = json!({
            "organizations": [
                {"id": "c1", "name": "Acme"},
                {"id": "c2", "name": "Globex"}
            ],
            "pagination": {"page": 1, "per_page": 25, "total_entries": 2, "total_pages": 1}
        });

        let resp = normalize_company_response(&raw);
        assert_eq!(resp.items.len(), 2);
        assert_eq!(resp.items[0].name.as_deref(), Some("Acme"));
        assert_eq!(resp.pagination.total_entries, 2);
    }

    #[test]
    fn test_normalize_alternate_field() {
        let raw = json!({
            "accounts": [{"id": "c1", "name": "Acme"}],
            "pagination": {"total_entries": 1}
        });

        let resp = normalize_company_response(&raw);
        assert_eq!(resp.items.len(), 1);
        assert_eq!(resp.items[0].id, "c1");
    }

    #[test]
    fn test_normalize_empty_with_total_entries_does_not_fail() {
        // total_entries claims results but no known field holds them;
        // the envelope still comes back with an empty items list.
        let raw = json!({
            "pagination": {"total_entries": 42}
        });

        let resp = normalize_company_response(&raw);
        assert!(resp.items.is_empty());
        assert_eq!(resp.pagination.total_entries, 42);
    }

    #[test]
    fn test_normalize_breadcrumb_backfill() {
        let raw = json!({
            "organizations": [
                {"id": "c1", "name": "Acme"},
                {"id": "c2", "name": "Globex", "industry": "aerospace",
                 "organization_city": "Porto"}
            ],
            "breadcrumbs": [
                {"signal_field_name": "organization_num_employees_ranges", "value": "11,50"},
                {"label": "Company Locations",
                 "display_name": "Campinas, State of Sao Paulo, Brazil"},
                {"signal_field_name": "q_organization_keyword_tags", "display_name": "software"}
            ],
            "pagination": {"total_entries": 2}
        });

        let resp = normalize_company_response(&raw);
        let acme = &resp.items[0];
        assert_eq!(acme.num_employees_range.as_deref(), Some("11,50"));
        assert_eq!(acme.organization_city.as_deref(), Some("Campinas"));
        assert_eq!(acme.organization_state.as_deref(), Some("State of Sao Paulo"));
        assert_eq!(acme.organization_country.as_deref(), Some("Brazil"));
        assert_eq!(acme.industry.as_deref(), Some("software"));

        // Item-level fields win over breadcrumb values.
        let globex = &resp.items[1];
        assert_eq!(globex.industry.as_deref(), Some("aerospace"));
        assert_eq!(globex.organization_city.as_deref(), Some("Porto"));
    }
}
