mod fetch;
mod report;
mod threshold;

pub use fetch::{remove_first_line, AuditFetcher, FetchError};
pub use report::ReportWriter;
pub use threshold::{check_min_mark, MarkVerdict};
