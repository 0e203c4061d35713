use std::collections::BTreeMap;

/// Selected option per canonical question index.
///
/// Absence of an entry means the question is unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerRecord(BTreeMap<usize, usize>);

impl AnswerRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `option` for `canonical`, returning the previous selection.
    pub fn record(&mut self, canonical: usize, option: usize) -> Option<usize> {
        self.0.insert(canonical, option)
    }

    #[must_use]
    pub fn get(&self, canonical: usize) -> Option<usize> {
        self.0.get(&canonical).copied()
    }

    #[must_use]
    pub fn contains(&self, canonical: usize) -> bool {
        self.0.contains_key(&canonical)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// `(canonical, option)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(usize, usize)> for AnswerRecord {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
