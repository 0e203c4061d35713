mod answers;
mod chapter;
mod definition;
mod feedback;
mod question;
mod quiz;
mod section;

pub use answers::AnswerRecord;
pub use chapter::{Chapter, ChapterKey, RawChapter};
pub use definition::{ChapterDocument, QuizDefinition, ValidatedDefinition, ValidationError};
pub use feedback::{FeedbackMode, ParseFeedbackModeError};
pub use question::{Question, QuestionError, RawQuestion};
pub use quiz::{QuizContent, QuizEntry, QuizLayout};
pub use section::{ALL_SECTIONS, SectionDescriptor, SectionSelection, SectionSummary};
