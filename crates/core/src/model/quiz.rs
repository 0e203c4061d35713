use std::sync::Arc;

use crate::model::chapter::{Chapter, ChapterKey};
use crate::model::question::Question;
use crate::model::section::SectionSelection;

/// How the quiz content is organised. The two layouts never mix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizLayout {
    /// A single question list; questions may carry a section tag.
    Flat,
    /// Chapters that resolved successfully, in declaration order.
    Chapters(Vec<Chapter>),
}

/// A question together with the chapter it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizEntry {
    pub question: Arc<Question>,
    pub chapter: Option<ChapterKey>,
}

/// The full canonical question set of a loaded quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizContent {
    layout: QuizLayout,
    entries: Vec<QuizEntry>,
}

impl QuizContent {
    #[must_use]
    pub fn flat(questions: Vec<Question>) -> Self {
        let entries = questions
            .into_iter()
            .map(|question| QuizEntry {
                question: Arc::new(question),
                chapter: None,
            })
            .collect();
        Self {
            layout: QuizLayout::Flat,
            entries,
        }
    }

    /// Concatenate resolved chapters in the given order.
    #[must_use]
    pub fn from_chapters(chapters: Vec<(Chapter, Vec<Question>)>) -> Self {
        let mut layout = Vec::with_capacity(chapters.len());
        let mut entries = Vec::new();
        for (chapter, questions) in chapters {
            entries.extend(questions.into_iter().map(|question| QuizEntry {
                question: Arc::new(question),
                chapter: Some(chapter.key().clone()),
            }));
            layout.push(chapter);
        }
        Self {
            layout: QuizLayout::Chapters(layout),
            entries,
        }
    }

    #[must_use]
    pub fn layout(&self) -> &QuizLayout {
        &self.layout
    }

    #[must_use]
    pub fn is_chapter_based(&self) -> bool {
        matches!(self.layout, QuizLayout::Chapters(_))
    }

    /// Resolved chapters; empty for flat quizzes.
    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        match &self.layout {
            QuizLayout::Chapters(chapters) => chapters,
            QuizLayout::Flat => &[],
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[QuizEntry] {
        &self.entries
    }

    pub fn questions(&self) -> impl Iterator<Item = &Arc<Question>> {
        self.entries.iter().map(|e| &e.question)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Questions matching `selection`, in canonical order.
    ///
    /// Chapter quizzes match on the chapter key; flat quizzes on the trimmed section tag.
    #[must_use]
    pub fn select(&self, selection: &SectionSelection) -> Vec<Arc<Question>> {
        let SectionSelection::Section(id) = selection else {
            return self.questions().cloned().collect();
        };
        let chapter_based = self.is_chapter_based();
        self.entries
            .iter()
            .filter(|entry| {
                if chapter_based {
                    entry.chapter.as_ref().is_some_and(|k| k.as_str() == id)
                } else {
                    entry.question.section() == Some(id.as_str())
                }
            })
            .map(|entry| Arc::clone(&entry.question))
            .collect()
    }
}
