use tracing::{error, info, warn};
use transcript_parser::AuditResult;

/// Result of comparing an audit's RawMark against the accepted minimum.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkVerdict {
    Passed { raw_mark: f64 },
    BelowMinimum { raw_mark: f64, min_mark: f64 },
    /// The audit crashed, there is no mark to compare
    Crashed,
}

impl MarkVerdict {
    pub fn is_success(&self) -> bool {
        matches!(self, MarkVerdict::Passed { .. })
    }
}

pub fn check_min_mark(min_mark: f64, result: &AuditResult) -> MarkVerdict {
    info!("minimum accepted RawMark: {min_mark}%");
    let Some(summary) = result.summary() else {
        error!(
            "audit {} failed:\n{}",
            result.audit_id,
            result.stack_trace().unwrap_or_default()
        );
        return MarkVerdict::Crashed;
    };

    let raw_mark = summary.raw_mark.value();
    if raw_mark < min_mark {
        warn!("RawMark {raw_mark}% is below {min_mark}%");
        MarkVerdict::BelowMinimum { raw_mark, min_mark }
    } else {
        info!("RawMark {raw_mark}% accepted");
        MarkVerdict::Passed { raw_mark }
    }
}
