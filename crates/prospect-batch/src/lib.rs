//! Prospect Batch - sequential batch capture orchestration.
//!
//! Drives the contact resolver across an ordered list of people: one item
//! at a time, a fixed delay between items, a hard timeout per item, and a
//! progress report after every item. The run never aborts early and its
//! output always has one outcome per input person, in input order.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod orchestrator;

pub use orchestrator::{BatchOrchestrator, BatchProgress, CaptureOutcome};
