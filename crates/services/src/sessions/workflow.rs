use std::sync::Arc;

use content::{QuizLoader, QuizSource, ResourceRef, SkippedChapter};
use quiz_core::model::FeedbackMode;

use super::service::QuizSession;
use crate::error::SessionError;

/// A freshly loaded quiz, ready for section selection and `start`.
#[derive(Debug)]
pub struct OpenedQuiz {
    pub session: QuizSession,
    /// Chapters left out because they failed to load.
    pub skipped: Vec<SkippedChapter>,
}

/// Loads a quiz from a source and builds sessions over it.
#[derive(Clone)]
pub struct QuizService {
    loader: QuizLoader,
    root: ResourceRef,
    feedback: FeedbackMode,
    seed: Option<u64>,
}

impl QuizService {
    #[must_use]
    pub fn new(source: Arc<dyn QuizSource>, root: ResourceRef) -> Self {
        Self {
            loader: QuizLoader::new(source),
            root,
            feedback: FeedbackMode::default(),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_feedback_mode(mut self, feedback: FeedbackMode) -> Self {
        self.feedback = feedback;
        self
    }

    /// Seed the session RNG so shuffles are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn root(&self) -> &ResourceRef {
        &self.root
    }

    /// Load the quiz and open a session over all of it.
    ///
    /// There is no retry; call again to reload.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Load` if the root document cannot be fetched,
    /// parsed or validated.
    pub async fn open_session(&self) -> Result<OpenedQuiz, SessionError> {
        let loaded = self.loader.load_quiz(&self.root).await?;

        let mut session =
            QuizSession::new(Arc::new(loaded.content)).with_feedback_mode(self.feedback);
        if let Some(seed) = self.seed {
            session = session.with_seed(seed);
        }

        Ok(OpenedQuiz {
            session,
            skipped: loaded.skipped,
        })
    }
}
