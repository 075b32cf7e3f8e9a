//! Domain records returned by the upstream API.
//!
//! The upstream populates fields inconsistently between endpoints, so
//! everything beyond the identifier is optional and unknown fields are
//! preserved in a flattened map. Records are immutable inputs: a
//! successful contact resolution produces a new record keyed by the same
//! identifier, never an in-place mutation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A person as returned by people search or contact match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)] // field names mirror the upstream schema
pub struct Person {
    /// Upstream identifier; empty when the record is unusable.
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<Organization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Organization>,
    pub phone_numbers: Vec<PhoneRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seniority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Raw upstream fields not modeled above. The email candidate fields
    /// (`personal_emails`, `contact_emails`, `work_email`,
    /// `extrapolated_email`, ...) live here and are consumed by the
    /// contact resolver's extraction pass.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Person {
    /// The organization id for contact matching: the nested organization's
    /// id when present, otherwise the flat `organization_id` field.
    #[must_use]
    pub fn organization_ref(&self) -> Option<&str> {
        self.organization
            .as_ref()
            .and_then(|o| o.id.as_deref())
            .or(self.organization_id.as_deref())
    }

    /// Display name: `name`, or first/last joined, or the id.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if joined.trim().is_empty() {
            self.id.clone()
        } else {
            joined
        }
    }
}

/// Organization reference nested inside person records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Organization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_domain: Option<String>,
}

/// A phone number entry attached to a person.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct PhoneRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitized_number: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dnc_status: Option<String>,
}

/// A company as returned by organization search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Company {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_employees: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_employees_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_phone: Option<CompanyPhone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headquarters_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    pub keywords: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Primary phone entry on a company record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct CompanyPhone {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Pagination block of the fixed response envelope.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total_entries: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Read a pagination block out of a raw response, applying the
    /// standard defaults for missing fields.
    #[must_use]
    pub fn from_raw(raw: &Value) -> Self {
        let p = raw.get("pagination");
        let get_u64 = |field: &str| {
            p.and_then(|p| p.get(field))
                .and_then(Value::as_u64)
                .unwrap_or(0)
        };
        #[allow(clippy::cast_possible_truncation)]
        Self {
            page: get_u64("page").max(1) as u32,
            per_page: if get_u64("per_page") == 0 {
                25
            } else {
                get_u64("per_page") as u32
            },
            total_entries: get_u64("total_entries"),
            total_pages: get_u64("total_pages") as u32,
        }
    }
}
