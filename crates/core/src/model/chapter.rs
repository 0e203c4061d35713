use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Identifier of a chapter (trimmed, non-empty).
///
/// Quiz files use either strings or numbers for `chapterNumber`; both are
/// normalised to their textual form so `3` and `"3"` name the same chapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChapterKey(String);

impl ChapterKey {
    /// Returns `None` if the key is empty after trimming.
    #[must_use]
    pub fn new(value: impl AsRef<str>) -> Option<Self> {
        let trimmed = value.as_ref().trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChapterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chapter declared in a chapter-based quiz manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    key: ChapterKey,
    title: Option<String>,
    file: String,
    enabled: bool,
}

impl Chapter {
    #[must_use]
    pub fn new(key: ChapterKey, title: Option<String>, file: impl Into<String>, enabled: bool) -> Self {
        let title = title.filter(|t| !t.trim().is_empty());
        Self {
            key,
            title,
            file: file.into(),
            enabled,
        }
    }

    #[must_use]
    pub fn key(&self) -> &ChapterKey {
        &self.key
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Title for display, falling back to the chapter key.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title().unwrap_or(self.key.as_str())
    }

    /// Reference to the resource holding this chapter's questions.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Chapter entry as it appears in quiz JSON, before validation.
///
/// Fields are kept as raw JSON values; `QuizDefinition::validate` checks their
/// types and reports the offending field. A missing `enabled` flag means the
/// chapter is disabled.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawChapter {
    pub chapter_number: Option<Value>,
    pub chapter_title: Option<Value>,
    pub chapter_file: Option<Value>,
    pub enabled: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_trimmed_and_blank_keys_rejected() {
        assert_eq!(ChapterKey::new(" 3 ").unwrap().as_str(), "3");
        assert!(ChapterKey::new("  ").is_none());
    }

    #[test]
    fn missing_enabled_defaults_to_disabled() {
        let raw: RawChapter =
            serde_json::from_value(json!({"chapterNumber": 1, "chapterFile": "c1.json"})).unwrap();
        assert_eq!(raw.enabled, None);
    }

    #[test]
    fn display_title_falls_back_to_key() {
        let key = ChapterKey::new("2").unwrap();
        let chapter = Chapter::new(key, Some(" ".into()), "c2.json", true);
        assert_eq!(chapter.display_title(), "2");
    }
}
