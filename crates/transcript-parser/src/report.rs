//! Parsed audit result types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

/// A parsed audit transcript.
///
/// Serializes to the flat shape stored by the audit tooling:
/// `finishedAt`, `auditId`, `error`, and then either `stackTrace` or
/// `summary` + `pages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RawAuditResult", try_from = "RawAuditResult")]
pub struct AuditResult {
    /// Finish timestamp, verbatim from the first header line
    pub finished_at: String,
    /// Audit id from the second header line
    pub audit_id: u64,
    /// Either the completed audit or the crash report
    pub outcome: AuditOutcome,
}

/// How an audit ended.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditOutcome {
    /// The audit ran to completion
    Completed {
        summary: AuditSummary,
        pages: Vec<PageResult>,
    },
    /// The audit server crashed; the transcript only carries a stack trace
    Crashed { stack_trace: String },
}

impl AuditResult {
    /// Returns true if the audit crashed.
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, AuditOutcome::Crashed { .. })
    }

    /// Audit-wide summary, absent for crashed audits.
    pub fn summary(&self) -> Option<&AuditSummary> {
        match &self.outcome {
            AuditOutcome::Completed { summary, .. } => Some(summary),
            AuditOutcome::Crashed { .. } => None,
        }
    }

    /// Audited pages in transcript order. Empty for crashed audits.
    pub fn pages(&self) -> &[PageResult] {
        match &self.outcome {
            AuditOutcome::Completed { pages, .. } => pages,
            AuditOutcome::Crashed { .. } => &[],
        }
    }

    pub fn stack_trace(&self) -> Option<&str> {
        match &self.outcome {
            AuditOutcome::Crashed { stack_trace } => Some(stack_trace),
            AuditOutcome::Completed { .. } => None,
        }
    }

    /// First page audited under `url`.
    pub fn page(&self, url: &str) -> Option<&PageResult> {
        self.pages().iter().find(|page| page.url == url)
    }
}

/// Percentage mark such as `77.78%`, kept verbatim next to its numeric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Mark {
    text: String,
    value: f64,
}

impl Mark {
    /// Parse `<float>%`. Returns `None` without the trailing percent sign or
    /// when the number is not a finite float.
    pub fn parse(text: &str) -> Option<Self> {
        let value: f64 = text.strip_suffix('%')?.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            value,
        })
    }

    /// Numeric value without the percent sign.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<Mark> for String {
    fn from(mark: Mark) -> Self {
        mark.text
    }
}

impl TryFrom<String> for Mark {
    type Error = String;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Mark::parse(&text).ok_or_else(|| format!("invalid mark: {text:?}"))
    }
}

/// Summary statistics of an audit or of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub raw_mark: Mark,
    pub weighted_mark: Mark,
    pub nb_passed: u32,
    pub nb_failed_test: u32,
    pub nb_failed_occurences: u32,
    pub nb_pre_qualified: u32,
    pub nb_not_applicable: u32,
    pub nb_not_tested: u32,
}

/// One audited page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub url: String,
    pub summary: AuditSummary,
    pub tests: Vec<TestResult>,
}

impl PageResult {
    /// Tests of this page that ended with `outcome`.
    pub fn tests_with(&self, outcome: Outcome) -> impl Iterator<Item = &TestResult> {
        self.tests.iter().filter(move |test| test.outcome == outcome)
    }

    pub fn test(&self, test_id: &str) -> Option<&TestResult> {
        self.tests.iter().find(|test| test.test_id == test_id)
    }
}

/// One accessibility rule applied to a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// Rule identifier (e.g. "Rgaa30-1-2-1")
    pub test_id: String,
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Elements the rule flagged; absent on the wire when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<TestElement>,
}

/// A single element flagged by a test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestElement {
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Diagnostic code (e.g. "H1TagMissing")
    pub message: String,
    /// Free-text annotations such as offending attribute values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuditResult {
    finished_at: String,
    audit_id: u64,
    error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stack_trace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<AuditSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pages: Option<Vec<PageResult>>,
}

impl From<AuditResult> for RawAuditResult {
    fn from(result: AuditResult) -> Self {
        let mut raw = RawAuditResult {
            finished_at: result.finished_at,
            audit_id: result.audit_id,
            error: false,
            stack_trace: None,
            summary: None,
            pages: None,
        };
        match result.outcome {
            AuditOutcome::Completed { summary, pages } => {
                raw.summary = Some(summary);
                raw.pages = Some(pages);
            }
            AuditOutcome::Crashed { stack_trace } => {
                raw.error = true;
                raw.stack_trace = Some(stack_trace);
            }
        }
        raw
    }
}

impl TryFrom<RawAuditResult> for AuditResult {
    type Error = String;

    fn try_from(raw: RawAuditResult) -> Result<Self, Self::Error> {
        let outcome = if raw.error {
            if raw.summary.is_some() || raw.pages.is_some() {
                return Err("error result must not carry summary or pages".to_string());
            }
            AuditOutcome::Crashed {
                stack_trace: raw.stack_trace.ok_or("error result without stackTrace")?,
            }
        } else {
            if raw.stack_trace.is_some() {
                return Err("successful result must not carry a stackTrace".to_string());
            }
            AuditOutcome::Completed {
                summary: raw.summary.ok_or("successful result without summary")?,
                pages: raw.pages.unwrap_or_default(),
            }
        };
        Ok(AuditResult {
            finished_at: raw.finished_at,
            audit_id: raw.audit_id,
            outcome,
        })
    }
}
