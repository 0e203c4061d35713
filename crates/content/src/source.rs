use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Errors surfaced by quiz sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid resource reference: {0}")]
    InvalidReference(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Location of a quiz document within a source (a path, URL or key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef(String);

impl ResourceRef {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Where quiz documents come from.
#[async_trait]
pub trait QuizSource: Send + Sync {
    /// Fetch the raw bytes of a resource.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the resource is unreachable or the request is unsuccessful.
    async fn fetch(&self, resource: &ResourceRef) -> Result<Vec<u8>, SourceError>;

    /// Resolve a reference found inside `base` (e.g. a chapter file) to a fetchable resource.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::InvalidReference` if the reference cannot be resolved.
    fn resolve(&self, base: &ResourceRef, reference: &str) -> Result<ResourceRef, SourceError> {
        let _ = base;
        Ok(ResourceRef::new(reference))
    }
}

/// Keyed in-memory documents; references resolve verbatim.
#[derive(Clone, Default)]
pub struct InMemorySource {
    documents: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document.
    pub fn insert(&self, key: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), body.into());
    }

    #[must_use]
    pub fn with(self, key: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.insert(key, body);
        self
    }

    /// Remove a document, returning whether it existed.
    pub fn remove(&self, key: &str) -> bool {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }
}

impl fmt::Debug for InMemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.documents.lock().map_or(0, |g| g.len());
        f.debug_struct("InMemorySource")
            .field("documents", &len)
            .finish()
    }
}

#[async_trait]
impl QuizSource for InMemorySource {
    async fn fetch(&self, resource: &ResourceRef) -> Result<Vec<u8>, SourceError> {
        let guard = self
            .documents
            .lock()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;
        guard
            .get(resource.as_str())
            .cloned()
            .ok_or_else(|| SourceError::NotFound(resource.to_string()))
    }
}
