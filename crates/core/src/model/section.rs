use std::fmt;

/// Synthetic section id meaning "no filter".
pub const ALL_SECTIONS: &str = "all";

/// Which part of the quiz is active.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SectionSelection {
    #[default]
    All,
    Section(String),
}

impl SectionSelection {
    /// Parse a raw selector value. Blank input and `"all"` both mean `All`.
    ///
    /// Whether a named section actually exists is decided by `SectionIndex::resolve`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == ALL_SECTIONS {
            Self::All
        } else {
            Self::Section(trimmed.to_string())
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::All => ALL_SECTIONS,
            Self::Section(id) => id,
        }
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for SectionSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A section as offered to the user: a chapter or a distinct question tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDescriptor {
    pub id: String,
    pub title: String,
    pub count: usize,
}

/// What is currently selected and how much of the quiz it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub selection: SectionSelection,
    /// Section title; `None` for the whole quiz.
    pub title: Option<String>,
    pub count: usize,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_treats_blank_and_all_as_all() {
        assert_eq!(SectionSelection::parse(""), SectionSelection::All);
        assert_eq!(SectionSelection::parse(" all "), SectionSelection::All);
        assert_eq!(
            SectionSelection::parse(" Basics "),
            SectionSelection::Section("Basics".into())
        );
        assert_eq!(SectionSelection::All.to_string(), "all");
    }
}
