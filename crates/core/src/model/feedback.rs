use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// When the user learns whether an answer was right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeedbackMode {
    /// Only in the final results.
    #[default]
    AtEnd,
    /// Right after each selection.
    Immediate,
}

impl FeedbackMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AtEnd => "end",
            Self::Immediate => "immediate",
        }
    }
}

impl fmt::Display for FeedbackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown feedback mode: {0}")]
pub struct ParseFeedbackModeError(pub String);

impl FromStr for FeedbackMode {
    type Err = ParseFeedbackModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "end" => Ok(Self::AtEnd),
            "immediate" => Ok(Self::Immediate),
            other => Err(ParseFeedbackModeError(other.to_string())),
        }
    }
}
