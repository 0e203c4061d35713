use std::collections::HashMap;

use crate::model::{QuizContent, QuizLayout, SectionDescriptor, SectionSelection, SectionSummary};

/// Sections offered for filtering, with per-section question counts.
///
/// Chapter quizzes yield one section per resolved chapter in declaration
/// order. Flat quizzes yield one per distinct section tag in first-seen order;
/// untagged questions only count toward `total`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionIndex {
    sections: Vec<SectionDescriptor>,
    total: usize,
}

impl SectionIndex {
    #[must_use]
    pub fn compute(content: &QuizContent) -> Self {
        let sections = match content.layout() {
            QuizLayout::Chapters(chapters) => chapters
                .iter()
                .map(|chapter| SectionDescriptor {
                    id: chapter.key().to_string(),
                    title: chapter.display_title().to_string(),
                    count: content
                        .entries()
                        .iter()
                        .filter(|e| e.chapter.as_ref() == Some(chapter.key()))
                        .count(),
                })
                .collect(),
            QuizLayout::Flat => {
                let mut sections: Vec<SectionDescriptor> = Vec::new();
                let mut positions: HashMap<&str, usize> = HashMap::new();
                for tag in content.questions().filter_map(|q| q.section()) {
                    match positions.get(tag) {
                        Some(&pos) => sections[pos].count += 1,
                        None => {
                            positions.insert(tag, sections.len());
                            sections.push(SectionDescriptor {
                                id: tag.to_string(),
                                title: tag.to_string(),
                                count: 1,
                            });
                        }
                    }
                }
                sections
            }
        };

        Self {
            sections,
            total: content.len(),
        }
    }

    #[must_use]
    pub fn sections(&self) -> &[SectionDescriptor] {
        &self.sections
    }

    /// Size of the whole quiz, regardless of layout.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// True when there is nothing to choose between.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SectionDescriptor> {
        self.sections.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Parse a selector value, falling back to `All` for unknown ids.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> SectionSelection {
        match SectionSelection::parse(raw) {
            SectionSelection::Section(id) if !self.contains(&id) => {
                log::debug!("unknown section {id:?}; using all sections");
                SectionSelection::All
            }
            selection => selection,
        }
    }

    #[must_use]
    pub fn count(&self, selection: &SectionSelection) -> usize {
        match selection {
            SectionSelection::All => self.total,
            SectionSelection::Section(id) => self.get(id).map_or(0, |s| s.count),
        }
    }

    #[must_use]
    pub fn summary(&self, selection: &SectionSelection) -> SectionSummary {
        let title = match selection {
            SectionSelection::All => None,
            SectionSelection::Section(id) => {
                Some(self.get(id).map_or_else(|| id.clone(), |s| s.title.clone()))
            }
        };
        SectionSummary {
            selection: selection.clone(),
            title,
            count: self.count(selection),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Chapter, ChapterKey, Question};

    fn question(text: &str) -> Question {
        Question::new(text, vec!["a".into(), "b".into()], 0).unwrap()
    }

    fn chapter(key: &str, title: Option<&str>) -> Chapter {
        Chapter::new(
            ChapterKey::new(key).unwrap(),
            title.map(str::to_string),
            format!("{key}.json"),
            true,
        )
    }

    #[test]
    fn flat_sections_follow_first_seen_order() {
        let content = QuizContent::flat(vec![
            question("1").with_section("Beta"),
            question("2").with_section("Alpha"),
            question("3"),
            question("4").with_section(" Beta"),
        ]);

        let index = SectionIndex::compute(&content);
        let ids: Vec<_> = index.sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["Beta", "Alpha"]);
        assert_eq!(index.get("Beta").unwrap().count, 2);
        assert_eq!(index.get("Alpha").unwrap().count, 1);
        assert_eq!(index.total(), 4);
    }

    #[test]
    fn untagged_flat_quiz_has_no_sections() {
        let content = QuizContent::flat(vec![question("1"), question("2")]);
        let index = SectionIndex::compute(&content);
        assert!(index.is_empty());
        assert_eq!(index.total(), 2);
    }

    #[test]
    fn chapter_sections_use_titles_and_counts() {
        let content = QuizContent::from_chapters(vec![
            (chapter("1", Some("Intro")), vec![question("a"), question("b")]),
            (chapter("2", None), vec![]),
            (chapter("3", Some("Outro")), vec![question("c")]),
        ]);

        let index = SectionIndex::compute(&content);
        let got: Vec<_> = index
            .sections()
            .iter()
            .map(|s| (s.id.as_str(), s.title.as_str(), s.count))
            .collect();
        assert_eq!(got, [("1", "Intro", 2), ("2", "2", 0), ("3", "Outro", 1)]);
        assert_eq!(index.total(), 3);
    }

    #[test]
    fn compute_is_deterministic() {
        let content = QuizContent::flat(vec![
            question("1").with_section("X"),
            question("2").with_section("Y"),
            question("3").with_section("Z"),
        ]);
        assert_eq!(SectionIndex::compute(&content), SectionIndex::compute(&content));
    }

    #[test]
    fn resolve_falls_back_to_all_for_unknown_ids() {
        let content = QuizContent::flat(vec![question("1").with_section("X")]);
        let index = SectionIndex::compute(&content);

        assert_eq!(index.resolve("X"), SectionSelection::Section("X".into()));
        assert_eq!(index.resolve("nope"), SectionSelection::All);
        assert_eq!(index.resolve("all"), SectionSelection::All);
    }

    #[test]
    fn summary_reports_counts() {
        let content = QuizContent::from_chapters(vec![
            (chapter("1", Some("Intro")), vec![question("a")]),
            (chapter("2", None), vec![question("b"), question("c")]),
        ]);
        let index = SectionIndex::compute(&content);

        let summary = index.summary(&SectionSelection::Section("1".into()));
        assert_eq!(summary.title.as_deref(), Some("Intro"));
        assert_eq!((summary.count, summary.total), (1, 3));

        let all = index.summary(&SectionSelection::All);
        assert_eq!(all.title, None);
        assert_eq!(all.count, 3);
    }
}
