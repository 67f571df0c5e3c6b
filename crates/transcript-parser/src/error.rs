//! Error types for transcript-parser.

use thiserror::Error;

/// Errors that can occur while parsing an audit transcript.
///
/// Line numbers index the working lines of the transcript, i.e. after blank
/// lines have been dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptError {
    /// Header line 0 or 1 is missing or lacks its fixed prefix
    #[error("unexpected line {line}")]
    MalformedHeader { line: usize },

    /// The audit id header does not hold a base-10 integer
    #[error("audit id is not a number: {value:?}")]
    MalformedAuditId { value: String },

    /// An 8-line summary block does not match the summary grammar
    #[error("could not parse summary starting at line {line}")]
    MalformedSummary { line: usize },

    /// A test line without the `": "` separator
    #[error("line {line} is not a test result: {content:?}")]
    MalformedTest { line: usize, content: String },

    /// An element line without a message token
    #[error("line {line} is not a test element: {content:?}")]
    MalformedElement { line: usize, content: String },

    /// Outcome keyword other than NOT_APPLICABLE, NEED_MORE_INFO, PASSED or FAILED
    #[error("unknown outcome {keyword:?} at line {line}")]
    UnknownOutcome { line: usize, keyword: String },

    /// A test line before the first `Subject : ` line
    #[error("test result at line {line} does not belong to any page")]
    TestOutsidePage { line: usize },
}

impl TranscriptError {
    /// The working-line index the error was raised at, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            TranscriptError::MalformedHeader { line }
            | TranscriptError::MalformedSummary { line }
            | TranscriptError::MalformedTest { line, .. }
            | TranscriptError::MalformedElement { line, .. }
            | TranscriptError::UnknownOutcome { line, .. }
            | TranscriptError::TestOutsidePage { line } => Some(*line),
            TranscriptError::MalformedAuditId { .. } => None,
        }
    }
}
