use futures::future::join_all;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;

use quiz_core::model::{
    Chapter, ChapterDocument, ChapterKey, Question, QuizContent, QuizDefinition,
    ValidatedDefinition, ValidationError,
};

use crate::source::{QuizSource, ResourceRef, SourceError};

/// Errors raised while loading a quiz resource.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to fetch {resource}: {source}")]
    Fetch {
        resource: ResourceRef,
        #[source]
        source: SourceError,
    },

    #[error("failed to parse {resource}: {source}")]
    Parse {
        resource: ResourceRef,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid quiz data in {resource}: {source}")]
    Validation {
        resource: ResourceRef,
        #[source]
        source: ValidationError,
    },
}

impl LoadError {
    #[must_use]
    pub fn resource(&self) -> &ResourceRef {
        match self {
            Self::Fetch { resource, .. }
            | Self::Parse { resource, .. }
            | Self::Validation { resource, .. } => resource,
        }
    }
}

/// A chapter that could not be loaded and was left out of the quiz.
#[derive(Debug)]
pub struct SkippedChapter {
    pub chapter: ChapterKey,
    pub error: LoadError,
}

/// Loaded quiz content plus diagnostics for chapters that were skipped.
#[derive(Debug)]
pub struct LoadedQuiz {
    pub content: QuizContent,
    pub skipped: Vec<SkippedChapter>,
}

impl LoadedQuiz {
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Fetches, parses and validates quiz definitions from a `QuizSource`.
#[derive(Clone)]
pub struct QuizLoader {
    source: Arc<dyn QuizSource>,
}

impl QuizLoader {
    #[must_use]
    pub fn new(source: Arc<dyn QuizSource>) -> Self {
        Self { source }
    }

    /// Load and fully resolve the quiz rooted at `root`.
    ///
    /// Failures of the root document are fatal. Failures of individual
    /// chapters are logged and reported in `LoadedQuiz::skipped`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the root document cannot be fetched, parsed or validated.
    pub async fn load_quiz(&self, root: &ResourceRef) -> Result<LoadedQuiz, LoadError> {
        let definition = self.load(root).await?;
        let loaded = match Self::validate(root, &definition)? {
            ValidatedDefinition::Flat(questions) => LoadedQuiz {
                content: QuizContent::flat(questions),
                skipped: Vec::new(),
            },
            ValidatedDefinition::Chapters(chapters) => {
                self.resolve_chapters(root, &chapters).await
            }
        };

        log::info!(
            "loaded quiz {root}: {} questions, {} chapters skipped",
            loaded.content.len(),
            loaded.skipped.len()
        );
        Ok(loaded)
    }

    /// Fetch and parse the root definition.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Fetch` or `LoadError::Parse`.
    pub async fn load(&self, root: &ResourceRef) -> Result<QuizDefinition, LoadError> {
        self.fetch_json(root).await
    }

    /// Validate a root definition, attributing errors to `root`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Validation`.
    pub fn validate(
        root: &ResourceRef,
        definition: &QuizDefinition,
    ) -> Result<ValidatedDefinition, LoadError> {
        definition
            .validate()
            .map_err(|source| LoadError::Validation {
                resource: root.clone(),
                source,
            })
    }

    /// Fetch every enabled chapter and concatenate them in declaration order.
    ///
    /// Chapters are fetched concurrently; the result is only assembled once all
    /// of them have either loaded or been skipped.
    pub async fn resolve_chapters(&self, root: &ResourceRef, chapters: &[Chapter]) -> LoadedQuiz {
        let enabled: Vec<&Chapter> = chapters.iter().filter(|c| c.is_enabled()).collect();
        log::debug!(
            "resolving {} of {} chapters from {root}",
            enabled.len(),
            chapters.len()
        );

        let attempts = join_all(
            enabled
                .iter()
                .map(|chapter| self.load_chapter(root, chapter)),
        )
        .await;

        let mut resolved = Vec::with_capacity(enabled.len());
        let mut skipped = Vec::new();
        for (chapter, attempt) in enabled.into_iter().zip(attempts) {
            match attempt {
                Ok(questions) => resolved.push((chapter.clone(), questions)),
                Err(error) => {
                    log::warn!("skipping chapter {}: {error}", chapter.key());
                    skipped.push(SkippedChapter {
                        chapter: chapter.key().clone(),
                        error,
                    });
                }
            }
        }

        LoadedQuiz {
            content: QuizContent::from_chapters(resolved),
            skipped,
        }
    }

    async fn load_chapter(
        &self,
        root: &ResourceRef,
        chapter: &Chapter,
    ) -> Result<Vec<Question>, LoadError> {
        let resource = self
            .source
            .resolve(root, chapter.file())
            .map_err(|source| LoadError::Fetch {
                resource: ResourceRef::new(chapter.file()),
                source,
            })?;
        let document: ChapterDocument = self.fetch_json(&resource).await?;
        document
            .validate()
            .map_err(|source| LoadError::Validation { resource, source })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, resource: &ResourceRef) -> Result<T, LoadError> {
        let body = self
            .source
            .fetch(resource)
            .await
            .map_err(|source| LoadError::Fetch {
                resource: resource.clone(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|source| LoadError::Parse {
            resource: resource.clone(),
            source,
        })
    }
}
