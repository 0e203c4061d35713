mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::{NavigationState, SessionProgress};
pub use service::{CurrentQuestion, Direction, QuizSession};
pub use view::{OptionFeedback, OptionView, QuestionView, option_label};
pub use workflow::{OpenedQuiz, QuizService};
