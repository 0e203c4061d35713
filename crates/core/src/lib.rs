//! Domain model and pure algorithms for multiple-choice quizzes.

#![forbid(unsafe_code)]

pub mod model;
pub mod order;
pub mod scoring;
pub mod sections;

pub use order::{OrderError, PresentationOrder};
pub use scoring::{MissedQuestion, SessionResult, UserAnswer, score};
pub use sections::SectionIndex;
