use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::source::{QuizSource, ResourceRef, SourceError};

/// Reads quiz documents from the local filesystem.
///
/// Relative chapter files resolve against the directory of the manifest that names them.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    root: Option<PathBuf>,
}

impl FileSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative root references against `root` instead of the working directory.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    fn path_for(&self, resource: &ResourceRef) -> PathBuf {
        let path = Path::new(resource.as_str());
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl QuizSource for FileSource {
    async fn fetch(&self, resource: &ResourceRef) -> Result<Vec<u8>, SourceError> {
        let path = self.path_for(resource);
        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                SourceError::NotFound(path.display().to_string())
            } else {
                SourceError::Io(e)
            }
        })
    }

    fn resolve(&self, base: &ResourceRef, reference: &str) -> Result<ResourceRef, SourceError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(SourceError::InvalidReference(reference.to_string()));
        }
        let path = Path::new(reference);
        if path.is_absolute() {
            return Ok(ResourceRef::new(reference));
        }
        let joined = Path::new(base.as_str())
            .parent()
            .map_or_else(|| path.to_path_buf(), |dir| dir.join(path));
        Ok(ResourceRef::new(joined.to_string_lossy()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_references_resolve_next_to_the_manifest() {
        let source = FileSource::new();
        let resolved = source
            .resolve(&"data/quiz.json".into(), "chapters/one.json")
            .unwrap();
        assert_eq!(
            Path::new(resolved.as_str()),
            Path::new("data/chapters/one.json")
        );

        let bare = source.resolve(&"quiz.json".into(), "one.json").unwrap();
        assert_eq!(bare.as_str(), "one.json");
    }

    #[test]
    fn blank_reference_is_invalid() {
        let err = FileSource::new()
            .resolve(&"quiz.json".into(), "  ")
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn reads_files_relative_to_root() {
        let dir = std::env::temp_dir().join(format!("quiz-fs-source-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("quiz.json"), b"{\"questions\": []}")
            .await
            .unwrap();

        let source = FileSource::new().with_root(&dir);
        let body = source.fetch(&"quiz.json".into()).await.unwrap();
        assert_eq!(body, b"{\"questions\": []}");

        let err = source.fetch(&"absent.json".into()).await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
