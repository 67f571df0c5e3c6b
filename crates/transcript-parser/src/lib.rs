//! # transcript-parser
//!
//! Parse the text transcript of a Tanaguru/Asqatasun accessibility audit
//! into a structured [`AuditResult`].
//!
//! ## Overview
//!
//! A transcript is line oriented:
//! - two header lines (finish time, audit id)
//! - either a crash stack trace ending with a `crash (id+message): ` line,
//! - or an 8-line audit summary followed by one block per page
//!   (`Subject : <url>`, an 8-line page summary, then the page's tests with
//!   their nested elements and details)
//!
//! ## Example
//!
//! ```ignore
//! use transcript_parser::{parse_transcript, Outcome};
//!
//! let result = parse_transcript(&text)?;
//! println!("audit {} finished at {}", result.audit_id, result.finished_at);
//!
//! if let Some(summary) = result.summary() {
//!     println!("RawMark: {}", summary.raw_mark);
//! }
//!
//! for page in result.pages() {
//!     let failed = page.tests_with(Outcome::Failed).count();
//!     println!("{}: {} failed tests", page.url, failed);
//! }
//!
//! // Same field names as previously stored JSON reports
//! let json = serde_json::to_string_pretty(&result)?;
//! ```

mod cursor;
mod error;
mod outcome;
mod parser;
mod report;
mod summary;

pub use error::TranscriptError;
pub use outcome::Outcome;
pub use parser::parse_transcript;
pub use report::{AuditOutcome, AuditResult, AuditSummary, Mark, PageResult, TestElement, TestResult};
