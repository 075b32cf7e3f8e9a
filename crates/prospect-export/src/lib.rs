//! Prospect Export - CSV generation for search and capture results.
//!
//! Every export produces UTF-8 text with a BOM prefix, every field
//! quoted, and embedded quotes doubled. The delimiter varies by export
//! path: capture results and combined leads use commas, the company and
//! people exports use semicolons. Missing values render as `N/A`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod csv;
pub mod exports;

pub use exports::{
    capture_results_csv, companies_csv, dated_filename, leads_csv, people_csv, write_csv_file,
};
