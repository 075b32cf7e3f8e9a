//! Prospect Resolver - contact email and phone resolution.
//!
//! Two pieces: a pure extraction pass that scans a raw person record for
//! email candidates in a fixed priority order, and an async resolver that
//! walks an ordered chain of upstream lookup strategies until one returns
//! a usable person record.
//!
//! The resolver never returns `Err` and never hangs: every strategy is
//! bounded by a timeout, and exhausting the chain produces a well-formed
//! failure result instead of an error.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod extract;
pub mod resolver;

pub use extract::{extract_email_candidates, is_free_domain, is_valid_email, EmailCandidate};
pub use resolver::{ContactResolver, EmailSearchResult};
