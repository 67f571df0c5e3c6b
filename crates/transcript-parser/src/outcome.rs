//! Outcome of a test or of one of its elements.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The result of a test, or of a single element inside a test.
///
/// On the wire this is one of four boolean flags (`notApplicable`,
/// `needMoreInfo`, `passed`, `failed`), exactly one present and `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "OutcomeFlags", try_from = "OutcomeFlags")]
pub enum Outcome {
    NotApplicable,
    NeedMoreInfo,
    Passed,
    Failed,
}

impl Outcome {
    /// Map a transcript keyword (e.g. `NEED_MORE_INFO`) to an outcome.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "NOT_APPLICABLE" => Some(Outcome::NotApplicable),
            "NEED_MORE_INFO" => Some(Outcome::NeedMoreInfo),
            "PASSED" => Some(Outcome::Passed),
            "FAILED" => Some(Outcome::Failed),
            _ => None,
        }
    }

    /// The keyword used for this outcome in transcripts.
    pub fn keyword(&self) -> &'static str {
        match self {
            Outcome::NotApplicable => "NOT_APPLICABLE",
            Outcome::NeedMoreInfo => "NEED_MORE_INFO",
            Outcome::Passed => "PASSED",
            Outcome::Failed => "FAILED",
        }
    }

    /// Returns true if this is [`Outcome::Passed`].
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    /// Returns true if this is [`Outcome::Failed`].
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeFlags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    not_applicable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    need_more_info: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    passed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failed: Option<bool>,
}

impl From<Outcome> for OutcomeFlags {
    fn from(outcome: Outcome) -> Self {
        let mut flags = OutcomeFlags::default();
        match outcome {
            Outcome::NotApplicable => flags.not_applicable = Some(true),
            Outcome::NeedMoreInfo => flags.need_more_info = Some(true),
            Outcome::Passed => flags.passed = Some(true),
            Outcome::Failed => flags.failed = Some(true),
        }
        flags
    }
}

impl TryFrom<OutcomeFlags> for Outcome {
    type Error = String;

    fn try_from(flags: OutcomeFlags) -> Result<Self, Self::Error> {
        let set: Vec<Outcome> = [
            (flags.not_applicable, Outcome::NotApplicable),
            (flags.need_more_info, Outcome::NeedMoreInfo),
            (flags.passed, Outcome::Passed),
            (flags.failed, Outcome::Failed),
        ]
        .into_iter()
        .filter(|(flag, _)| *flag == Some(true))
        .map(|(_, outcome)| outcome)
        .collect();

        match set.as_slice() {
            [outcome] => Ok(*outcome),
            [] => Err("no outcome flag set".to_string()),
            _ => Err(format!("several outcome flags set: {set:?}")),
        }
    }
}
