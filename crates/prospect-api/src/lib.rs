//! Prospect API - upstream search client.
//!
//! This crate wraps the third-party prospecting REST API: request plumbing
//! with per-request authentication, HTTP error mapping to user-facing
//! messages, and the company/people search operations with their endpoint
//! fallback chains and response normalization.
//!
//! The upstream returns heterogeneous response shapes; everything here
//! normalizes into a fixed envelope whose `items` list defaults to empty
//! rather than erroring on a missing field.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod client;
pub mod company_search;
pub mod error;
pub mod people_search;
pub mod records;

pub use client::ApiClient;
pub use company_search::{search_companies, CompanyFilters, CompanySearchResponse};
pub use error::{ApiError, Result};
pub use people_search::{search_people, PeopleFilters, PeopleSearchResponse};
pub use records::{Company, Organization, Pagination, Person, PhoneRecord};
