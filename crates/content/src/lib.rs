#![forbid(unsafe_code)]

pub mod fs;
pub mod http;
pub mod loader;
pub mod source;

pub use fs::FileSource;
pub use http::{HttpSource, is_http_url};
pub use loader::{LoadError, LoadedQuiz, QuizLoader, SkippedChapter};
pub use source::{InMemorySource, QuizSource, ResourceRef, SourceError};
