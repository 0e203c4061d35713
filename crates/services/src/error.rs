//! Shared error types for the services crate.

use thiserror::Error;

use content::LoadError;

/// Errors emitted by quiz sessions.
///
/// Apart from `Load`, these flag a caller that ignored the session's bounds or
/// `can_finish`; they are reported rather than silently ignored.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for the selected section")]
    EmptySet,
    #[error("quiz has not been started")]
    NotStarted,
    #[error("question index {index} is out of range for {len} questions")]
    OutOfRange { index: usize, len: usize },
    #[error("option {option} is out of range for question {index} with {len} options")]
    OptionOutOfRange {
        index: usize,
        option: usize,
        len: usize,
    },
    #[error("presentation order covers {got} questions, expected {expected}")]
    OrderMismatch { expected: usize, got: usize },
    #[error("quiz cannot be finished before the last question is answered")]
    PrematureFinish,
    #[error("quiz already completed")]
    Completed,
    #[error(transparent)]
    Load(#[from] LoadError),
}
