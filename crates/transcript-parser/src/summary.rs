//! The fixed 8-line summary block.

use std::sync::OnceLock;

use regex::Regex;

use crate::report::{AuditSummary, Mark};

/// Number of lines in every summary block.
pub(crate) const SUMMARY_LINES: usize = 8;

static SUMMARY_RE: OnceLock<Regex> = OnceLock::new();

fn summary_re() -> &'static Regex {
    SUMMARY_RE.get_or_init(|| {
        Regex::new(concat!(
            r"^RawMark : ([0-9.]+%)\n",
            r"WeightedMark : ([0-9.]+%)\n",
            r"Nb Passed : ([0-9]+)\n",
            r"Nb Failed test : ([0-9]+)\n",
            r"Nb Failed occurences : ([0-9]+)\n",
            r"Nb Pre-qualified : ([0-9]+)\n",
            r"Nb Not Applicable : ([0-9]+)\n",
            r"Nb Not Tested : ([0-9]+)$",
        ))
        .unwrap()
    })
}

/// Parse a summary block. Fewer than [`SUMMARY_LINES`] lines never match.
pub(crate) fn parse_summary(lines: &[&str]) -> Option<AuditSummary> {
    let block = lines.join("\n");
    let caps = summary_re().captures(&block)?;
    let count = |i: usize| caps.get(i)?.as_str().parse::<u32>().ok();

    Some(AuditSummary {
        raw_mark: Mark::parse(caps.get(1)?.as_str())?,
        weighted_mark: Mark::parse(caps.get(2)?.as_str())?,
        nb_passed: count(3)?,
        nb_failed_test: count(4)?,
        nb_failed_occurences: count(5)?,
        nb_pre_qualified: count(6)?,
        nb_not_applicable: count(7)?,
        nb_not_tested: count(8)?,
    })
}
