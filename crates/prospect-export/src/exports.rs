//! The export paths: capture results, combined leads, companies, people.

use crate::csv::{build, or_missing, MISSING};
use prospect_api::{Company, Person};
use prospect_batch::CaptureOutcome;
use prospect_core::{ProspectError, Result};
use prospect_resolver::is_valid_email;
use std::fs;
use std::path::Path;

/// Columns for the capture results export.
const CAPTURE_HEADER: [&str; 9] = [
    "Name",
    "Company",
    "Title",
    "Original Email",
    "Emails Found",
    "Email Status",
    "Phones",
    "LinkedIn",
    "Location",
];

const LEADS_HEADER: [&str; 8] = [
    "Type", "Name", "Title", "Company", "Email", "Phone", "Location", "LinkedIn",
];

const COMPANIES_HEADER: [&str; 11] = [
    "Name",
    "Website",
    "Employees (Range)",
    "Industry",
    "Founded",
    "Phone",
    "City",
    "State",
    "Country",
    "LinkedIn",
    "ID",
];

const PEOPLE_HEADER: [&str; 7] = [
    "Name", "Title", "Email", "Phone", "Company", "Location", "LinkedIn",
];

/// Capture results as comma-delimited CSV, one row per outcome.
#[must_use]
pub fn capture_results_csv(outcomes: &[CaptureOutcome]) -> String {
    let rows: Vec<Vec<String>> = outcomes
        .iter()
        .map(|outcome| {
            let person = &outcome.person;
            let result = &outcome.result;

            let emails_found = if result.emails.is_empty() {
                "No email found".to_string()
            } else {
                result
                    .emails
                    .iter()
                    .map(|c| c.email.clone())
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            let status = if result.success {
                "Email found"
            } else if result.person.is_null() {
                "Lookup failed"
            } else {
                "Email not available"
            };
            let phones = if result.phone_numbers.is_empty() {
                MISSING.to_string()
            } else {
                result
                    .phone_numbers
                    .iter()
                    .filter_map(|p| p.raw_number.as_deref().or(p.sanitized_number.as_deref()))
                    .collect::<Vec<_>>()
                    .join("; ")
            };

            vec![
                person.display_name(),
                or_missing(person.organization.as_ref().and_then(|o| o.name.as_deref())),
                or_missing(person.title.as_deref()),
                or_missing(person.email.as_deref()),
                emails_found,
                status.to_string(),
                phones,
                or_missing(person.linkedin_url.as_deref()),
                location_cell(
                    person.city.as_deref(),
                    person.state.as_deref(),
                    person.country.as_deref(),
                ),
            ]
        })
        .collect();

    tracing::debug!(rows = rows.len(), "built capture results csv");
    build(&CAPTURE_HEADER, &rows, ',')
}

/// People and companies combined into one comma-delimited export, person
/// rows first.
#[must_use]
pub fn leads_csv(people: &[Person], companies: &[Company]) -> String {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(people.len() + companies.len());

    for person in people {
        rows.push(vec![
            "Person".to_string(),
            person.display_name(),
            or_missing(person.title.as_deref()),
            or_missing(person.organization.as_ref().and_then(|o| o.name.as_deref())),
            or_missing(person.email.as_deref()),
            or_missing(person_phone(person)),
            location_cell(
                person.city.as_deref(),
                person.state.as_deref(),
                person.country.as_deref(),
            ),
            or_missing(person.linkedin_url.as_deref()),
        ]);
    }
    for company in companies {
        rows.push(vec![
            "Company".to_string(),
            or_missing(company.name.as_deref()),
            MISSING.to_string(),
            or_missing(company.name.as_deref()),
            MISSING.to_string(),
            or_missing(company_phone(company)),
            location_cell(
                company.organization_city.as_deref(),
                company.organization_state.as_deref(),
                company.organization_country.as_deref(),
            ),
            or_missing(company.linkedin_url.as_deref()),
        ]);
    }

    build(&LEADS_HEADER, &rows, ',')
}

/// Company search results as semicolon-delimited CSV.
#[must_use]
pub fn companies_csv(companies: &[Company]) -> String {
    let rows: Vec<Vec<String>> = companies
        .iter()
        .map(|company| {
            vec![
                or_missing(company.name.as_deref()),
                or_missing(
                    company
                        .website_url
                        .as_deref()
                        .or(company.primary_domain.as_deref()),
                ),
                employees_cell(company),
                or_missing(company.industry.as_deref()),
                company
                    .founded_year
                    .map_or_else(|| MISSING.to_string(), |y| y.to_string()),
                or_missing(company_phone(company)),
                or_missing(company.organization_city.as_deref()),
                or_missing(company.organization_state.as_deref()),
                or_missing(company.organization_country.as_deref()),
                or_missing(company.linkedin_url.as_deref()),
                company.id.clone(),
            ]
        })
        .collect();

    build(&COMPANIES_HEADER, &rows, ';')
}

/// People search results as semicolon-delimited CSV.
///
/// The email cell renders "Email not available" unless the person's email
/// is a real address rather than a locked or sample value.
#[must_use]
pub fn people_csv(people: &[Person]) -> String {
    let rows: Vec<Vec<String>> = people
        .iter()
        .map(|person| {
            let email = person
                .email
                .as_deref()
                .filter(|e| displayable_email(e))
                .map_or_else(|| "Email not available".to_string(), ToString::to_string);
            vec![
                person.display_name(),
                or_missing(person.title.as_deref()),
                email,
                or_missing(person_phone(person)),
                or_missing(person.organization.as_ref().and_then(|o| o.name.as_deref())),
                location_cell(
                    person.city.as_deref(),
                    person.state.as_deref(),
                    person.country.as_deref(),
                ),
                or_missing(person.linkedin_url.as_deref()),
            ]
        })
        .collect();

    build(&PEOPLE_HEADER, &rows, ';')
}

/// Write a finished CSV document to disk.
pub fn write_csv_file(path: &Path, csv: &str) -> Result<()> {
    fs::write(path, csv).map_err(|e| {
        ProspectError::Export(format!("failed to write {}: {e}", path.display()))
    })?;
    tracing::info!(path = %path.display(), "csv written");
    Ok(())
}

/// `{prefix}_{YYYY-MM-DD}.{extension}` using the local date.
#[must_use]
pub fn dated_filename(prefix: &str, extension: &str) -> String {
    format!(
        "{prefix}_{}.{extension}",
        chrono::Local::now().format("%Y-%m-%d")
    )
}

/// Join city/state/country with `, `, skipping blanks; `N/A` when all
/// are blank.
fn location_cell(city: Option<&str>, state: Option<&str>, country: Option<&str>) -> String {
    let parts: Vec<&str> = [city, state, country]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        MISSING.to_string()
    } else {
        parts.join(", ")
    }
}

/// An email fit for display: a real address, not the locked placeholder,
/// not an upstream sample value on the `domain.com` placeholder domain.
fn displayable_email(email: &str) -> bool {
    if !is_valid_email(email) {
        return false;
    }
    email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| !domain.eq_ignore_ascii_case("domain.com"))
}

fn person_phone(person: &Person) -> Option<&str> {
    person
        .phone_numbers
        .first()
        .and_then(|p| p.raw_number.as_deref().or(p.sanitized_number.as_deref()))
}

fn company_phone(company: &Company) -> Option<&str> {
    company
        .phone
        .as_deref()
        .or_else(|| company.primary_phone.as_ref().and_then(|p| p.number.as_deref()))
}

fn employees_cell(company: &Company) -> String {
    match (company.num_employees, company.num_employees_range.as_deref()) {
        (Some(n), Some(range)) => format!("{n} ({range})"),
        (Some(n), None) => n.to_string(),
        (None, Some(range)) => range.to_string(),
        (None, None) => MISSING.to_string(),
    }
}
