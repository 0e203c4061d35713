#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use sessions as session;

pub use error::SessionError;

pub use sessions::{
    CurrentQuestion, Direction, NavigationState, OpenedQuiz, OptionFeedback, OptionView,
    QuestionView, QuizService, QuizSession, SessionProgress,
};
