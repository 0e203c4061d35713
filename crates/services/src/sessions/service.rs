use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use std::sync::Arc;

use quiz_core::model::{AnswerRecord, FeedbackMode, Question, QuizContent, SectionSelection, SectionSummary};
use quiz_core::{PresentationOrder, SectionIndex, SessionResult, score};

use super::progress::{NavigationState, SessionProgress};
use super::view::QuestionView;
use crate::error::SessionError;

//
// ─── NAVIGATION ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// The question at the current display position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentQuestion {
    pub display_position: usize,
    pub canonical_index: usize,
    pub question: Arc<Question>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz attempt over a loaded quiz.
///
/// Answers are keyed by canonical index (position in the active, filtered
/// question list), never by display position, so reshuffling the
/// presentation order cannot misattribute them.
pub struct QuizSession {
    content: Arc<QuizContent>,
    sections: SectionIndex,
    selection: SectionSelection,
    active: Vec<Arc<Question>>,
    order: Option<PresentationOrder>,
    randomize: bool,
    feedback: FeedbackMode,
    position: usize,
    answers: AnswerRecord,
    complete: bool,
    rng: StdRng,
}

impl QuizSession {
    /// Create a session over the whole quiz. Call `start` before answering.
    #[must_use]
    pub fn new(content: Arc<QuizContent>) -> Self {
        let sections = SectionIndex::compute(&content);
        let active = content.select(&SectionSelection::All);
        Self {
            content,
            sections,
            selection: SectionSelection::All,
            active,
            order: None,
            randomize: false,
            feedback: FeedbackMode::default(),
            position: 0,
            answers: AnswerRecord::new(),
            complete: false,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    #[must_use]
    pub fn with_feedback_mode(mut self, feedback: FeedbackMode) -> Self {
        self.feedback = feedback;
        self
    }

    /// Use a deterministic RNG for shuffling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn set_feedback_mode(&mut self, feedback: FeedbackMode) {
        self.feedback = feedback;
    }

    #[must_use]
    pub fn feedback_mode(&self) -> FeedbackMode {
        self.feedback
    }

    #[must_use]
    pub fn content(&self) -> &QuizContent {
        &self.content
    }

    #[must_use]
    pub fn sections(&self) -> &SectionIndex {
        &self.sections
    }

    #[must_use]
    pub fn selection(&self) -> &SectionSelection {
        &self.selection
    }

    /// Active questions in canonical order.
    #[must_use]
    pub fn questions(&self) -> &[Arc<Question>] {
        &self.active
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    #[must_use]
    pub fn order(&self) -> Option<&PresentationOrder> {
        self.order.as_ref()
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    /// Current display position (0-based).
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.order.is_some()
    }

    #[must_use]
    pub fn is_randomized(&self) -> bool {
        self.randomize
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Switch the active section. Unknown ids fall back to the whole quiz.
    ///
    /// Clears answers, completion and position, and drops the presentation
    /// order so the next `start` builds a fresh one.
    pub fn select_section(&mut self, raw: &str) -> &SectionSelection {
        let selection = self.sections.resolve(raw);
        self.active = self.content.select(&selection);
        log::debug!(
            "section {selection} selected: {} questions",
            self.active.len()
        );
        self.selection = selection;
        self.order = None;
        self.clear_attempt();
        &self.selection
    }

    /// Begin a fresh attempt over the active questions.
    ///
    /// With `randomize` the order is reshuffled on every call.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptySet` if the active section has no questions;
    /// the session is left untouched.
    pub fn start(&mut self, randomize: bool) -> Result<(), SessionError> {
        if self.active.is_empty() {
            return Err(SessionError::EmptySet);
        }
        let order = self.build_order(randomize);
        self.begin(order, randomize);
        Ok(())
    }

    /// Begin a fresh attempt with an explicit presentation order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptySet` for an empty section and
    /// `SessionError::OrderMismatch` if `order` does not cover the active questions.
    pub fn start_with_order(&mut self, order: PresentationOrder) -> Result<(), SessionError> {
        if self.active.is_empty() {
            return Err(SessionError::EmptySet);
        }
        if order.len() != self.active.len() {
            return Err(SessionError::OrderMismatch {
                expected: self.active.len(),
                got: order.len(),
            });
        }
        let randomize = !order.is_identity();
        self.begin(order, randomize);
        Ok(())
    }

    /// Retake: clear answers and completion, go back to the first question,
    /// and reshuffle if the attempt was randomized.
    pub fn reset(&mut self) {
        if self.order.is_some() && self.randomize {
            self.order = Some(self.build_order(true));
        }
        self.clear_attempt();
        log::debug!("session reset (randomized: {})", self.randomize);
    }

    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` if there are no active questions and
    /// `SessionError::NotStarted` before `start`.
    pub fn current_question(&self) -> Result<CurrentQuestion, SessionError> {
        if self.active.is_empty() {
            return Err(SessionError::OutOfRange {
                index: self.position,
                len: 0,
            });
        }
        let order = self.order.as_ref().ok_or(SessionError::NotStarted)?;
        let canonical_index = order
            .canonical_at(self.position)
            .ok_or(SessionError::OutOfRange {
                index: self.position,
                len: order.len(),
            })?;

        Ok(CurrentQuestion {
            display_position: self.position,
            canonical_index,
            question: Arc::clone(&self.active[canonical_index]),
        })
    }

    /// Record `option` as the answer to the question at `canonical`, replacing any earlier pick.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted`, `Completed`, `OutOfRange` or `OptionOutOfRange`.
    pub fn select_answer(&mut self, canonical: usize, option: usize) -> Result<(), SessionError> {
        if self.order.is_none() {
            return Err(SessionError::NotStarted);
        }
        if self.complete {
            return Err(SessionError::Completed);
        }
        let question = self.active.get(canonical).ok_or(SessionError::OutOfRange {
            index: canonical,
            len: self.active.len(),
        })?;
        if option >= question.option_count() {
            return Err(SessionError::OptionOutOfRange {
                index: canonical,
                option,
                len: question.option_count(),
            });
        }

        self.answers.record(canonical, option);
        Ok(())
    }

    /// Answer the question at the current display position.
    ///
    /// Returns its canonical index.
    ///
    /// # Errors
    ///
    /// See `current_question` and `select_answer`.
    pub fn select_current(&mut self, option: usize) -> Result<usize, SessionError> {
        let canonical = self.current_question()?.canonical_index;
        self.select_answer(canonical, option)?;
        Ok(canonical)
    }

    /// Move one step; stops at either end instead of wrapping.
    pub fn advance(&mut self, direction: Direction) -> usize {
        let last = self.active.len().saturating_sub(1);
        self.position = match direction {
            Direction::Previous => self.position.saturating_sub(1),
            Direction::Next => (self.position + 1).min(last),
        };
        self.position
    }

    #[must_use]
    pub fn is_answered(&self, canonical: usize) -> bool {
        self.answers.contains(canonical)
    }

    /// Selected option for `canonical`, if any.
    #[must_use]
    pub fn answer(&self, canonical: usize) -> Option<usize> {
        self.answers.get(canonical)
    }

    /// True on the last display slot once its question is answered.
    #[must_use]
    pub fn can_finish(&self) -> bool {
        let Some(order) = &self.order else {
            return false;
        };
        let Some(last) = order.len().checked_sub(1) else {
            return false;
        };
        self.position == last
            && order
                .canonical_at(last)
                .is_some_and(|canonical| self.is_answered(canonical))
    }

    /// Complete the attempt and score it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PrematureFinish` unless `can_finish()` holds.
    pub fn finish(&mut self) -> Result<SessionResult, SessionError> {
        if !self.can_finish() {
            return Err(SessionError::PrematureFinish);
        }
        self.complete = true;
        let result = self.result();
        log::debug!(
            "quiz finished: {}/{} ({}%)",
            result.correct,
            result.total,
            result.percentage
        );
        Ok(result)
    }

    /// Score the current answers without completing the attempt.
    #[must_use]
    pub fn result(&self) -> SessionResult {
        score(&self.active, &self.answers)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.active.len();
        let position = if self.is_started() && total > 0 {
            self.position + 1
        } else {
            0
        };
        let percent = if total == 0 {
            0
        } else {
            u32::try_from((position * 100 + total / 2) / total).unwrap_or(100)
        };
        SessionProgress {
            position,
            total,
            answered: self.answers.len(),
            remaining: total.saturating_sub(self.answers.len()),
            percent,
            is_complete: self.complete,
        }
    }

    #[must_use]
    pub fn navigation(&self) -> NavigationState {
        let Ok(current) = self.current_question() else {
            return NavigationState::default();
        };
        if self.complete {
            return NavigationState::default();
        }
        let answered = self.is_answered(current.canonical_index);
        let on_last = self.position + 1 == self.active.len();
        NavigationState {
            previous_enabled: self.position > 0,
            next_visible: !on_last,
            next_enabled: !on_last && answered,
            finish_visible: on_last,
            finish_enabled: on_last && answered,
        }
    }

    /// View of the current question, including selection and feedback state.
    ///
    /// # Errors
    ///
    /// See `current_question`.
    pub fn question_view(&self) -> Result<QuestionView, SessionError> {
        let current = self.current_question()?;
        Ok(QuestionView::build(
            &current.question,
            current.display_position,
            self.active.len(),
            current.canonical_index,
            self.answer(current.canonical_index),
            self.feedback,
        ))
    }

    #[must_use]
    pub fn section_summary(&self) -> SectionSummary {
        self.sections.summary(&self.selection)
    }

    fn build_order(&mut self, randomize: bool) -> PresentationOrder {
        if randomize {
            PresentationOrder::shuffled(self.active.len(), &mut self.rng)
        } else {
            PresentationOrder::identity(self.active.len())
        }
    }

    fn begin(&mut self, order: PresentationOrder, randomize: bool) {
        log::debug!(
            "starting {} questions in section {} (randomized: {randomize})",
            order.len(),
            self.selection
        );
        self.order = Some(order);
        self.randomize = randomize;
        self.clear_attempt();
    }

    fn clear_attempt(&mut self) {
        self.answers.clear();
        self.complete = false;
        self.position = 0;
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("selection", &self.selection)
            .field("active_len", &self.active.len())
            .field("order", &self.order)
            .field("randomize", &self.randomize)
            .field("feedback", &self.feedback)
            .field("position", &self.position)
            .field("answers_len", &self.answers.len())
            .field("complete", &self.complete)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
