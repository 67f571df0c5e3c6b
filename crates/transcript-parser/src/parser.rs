//! Parser for audit transcript text.

use tracing::debug;

use crate::cursor::{Line, LineCursor};
use crate::error::TranscriptError;
use crate::outcome::Outcome;
use crate::report::{AuditOutcome, AuditResult, AuditSummary, PageResult, TestElement, TestResult};
use crate::summary::{parse_summary, SUMMARY_LINES};

const FINISHED_AT_PREFIX: &str = "Audit terminated with success at ";
const AUDIT_ID_PREFIX: &str = "Audit Id : ";
const CRASH_PREFIX: &str = "crash (id+message): ";
const PAGE_PREFIX: &str = "Subject : ";
const DETAIL_PREFIX: &str = "    -> ";
/// Width of the marker in front of an element line (`"  -> "`)
const ELEMENT_MARKER_WIDTH: usize = 5;
/// The audit summary starts right after the two header lines
const SUMMARY_START: usize = 2;

/// Parse an audit transcript.
///
/// Blank lines are ignored. The first two lines must be the finish time and
/// the audit id. A transcript whose last line is a crash marker yields a
/// crashed result carrying the lines in between as stack trace; anything
/// else must be a complete audit (summary, then pages with their tests).
///
/// Any deviation from the format fails the whole parse.
pub fn parse_transcript(text: &str) -> Result<AuditResult, TranscriptError> {
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    debug!("transcript has {} non-empty lines", lines.len());

    let finished_at = header(&lines, 0, FINISHED_AT_PREFIX)?;
    let audit_id = header(&lines, 1, AUDIT_ID_PREFIX)?;
    let audit_id = audit_id
        .trim()
        .parse::<u64>()
        .map_err(|_| TranscriptError::MalformedAuditId {
            value: audit_id.to_string(),
        })?;

    let outcome = match lines.last() {
        // line 1 is the audit id, so a crash marker sits at index 2 or later
        Some(last) if last.starts_with(CRASH_PREFIX) => AuditOutcome::Crashed {
            stack_trace: lines[SUMMARY_START..lines.len() - 1].join("\n"),
        },
        _ => parse_completed(&lines)?,
    };

    Ok(AuditResult {
        finished_at: finished_at.to_string(),
        audit_id,
        outcome,
    })
}

fn header<'a>(lines: &[&'a str], index: usize, prefix: &str) -> Result<&'a str, TranscriptError> {
    lines
        .get(index)
        .and_then(|line| line.strip_prefix(prefix))
        .ok_or(TranscriptError::MalformedHeader { line: index })
}

fn parse_completed(lines: &[&str]) -> Result<AuditOutcome, TranscriptError> {
    let mut cursor = LineCursor::new(lines, SUMMARY_START);
    let summary = summary_block(&mut cursor)?;

    let mut pages: Vec<PageResult> = Vec::new();
    while let Some(line) = cursor.advance() {
        if let Some(url) = line.text.strip_prefix(PAGE_PREFIX) {
            let summary = summary_block(&mut cursor)?;
            pages.push(PageResult {
                url: url.to_string(),
                summary,
                tests: Vec::new(),
            });
            continue;
        }

        let Some(page) = pages.last_mut() else {
            return Err(TranscriptError::TestOutsidePage { line: line.index });
        };
        page.tests.push(parse_test(line, &mut cursor)?);
    }

    debug!(
        "parsed {} pages, {} tests",
        pages.len(),
        pages.iter().map(|page| page.tests.len()).sum::<usize>()
    );
    Ok(AuditOutcome::Completed { summary, pages })
}

fn summary_block(cursor: &mut LineCursor<'_>) -> Result<AuditSummary, TranscriptError> {
    let line = cursor.position();
    parse_summary(cursor.take(SUMMARY_LINES)).ok_or(TranscriptError::MalformedSummary { line })
}

/// `<test id>: <KEYWORD>`, followed by its element lines.
fn parse_test(header: Line<'_>, cursor: &mut LineCursor<'_>) -> Result<TestResult, TranscriptError> {
    let (test_id, keyword) = header
        .text
        .split_once(": ")
        .ok_or_else(|| TranscriptError::MalformedTest {
            line: header.index,
            content: header.text.to_string(),
        })?;
    let outcome = parse_outcome(header.index, keyword)?;

    let mut elements = Vec::new();
    while let Some(line) = cursor.next_if(|text| text.starts_with(' ')) {
        elements.push(parse_element(line, cursor)?);
    }

    Ok(TestResult {
        test_id: test_id.to_string(),
        outcome,
        elements,
    })
}

/// `  -> <KEYWORD> <message>`, followed by its detail lines.
fn parse_element(line: Line<'_>, cursor: &mut LineCursor<'_>) -> Result<TestElement, TranscriptError> {
    let body = line
        .text
        .char_indices()
        .nth(ELEMENT_MARKER_WIDTH)
        .map_or("", |(start, _)| &line.text[start..]);

    let mut tokens = body.split(' ');
    let outcome = parse_outcome(line.index, tokens.next().unwrap_or_default())?;
    let message = tokens
        .next()
        .filter(|message| !message.is_empty())
        .ok_or_else(|| TranscriptError::MalformedElement {
            line: line.index,
            content: line.text.to_string(),
        })?;

    let mut details = Vec::new();
    while let Some(detail) = cursor
        .peek()
        .and_then(|line| line.text.strip_prefix(DETAIL_PREFIX))
    {
        details.push(detail.to_string());
        cursor.advance();
    }

    Ok(TestElement {
        outcome,
        message: message.to_string(),
        details,
    })
}

fn parse_outcome(line: usize, keyword: &str) -> Result<Outcome, TranscriptError> {
    Outcome::from_keyword(keyword).ok_or_else(|| TranscriptError::UnknownOutcome {
        line,
        keyword: keyword.to_string(),
    })
}
