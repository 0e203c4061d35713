/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based display position; 0 when nothing is shown.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// Share of the quiz reached so far (`position / total`), as a whole percent.
    pub percent: u32,
    pub is_complete: bool,
}

/// Which navigation actions the presentation layer should offer.
///
/// `next` is shown everywhere but on the last question, where `finish` takes
/// its place; both are only enabled once the current question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub previous_enabled: bool,
    pub next_visible: bool,
    pub next_enabled: bool,
    pub finish_visible: bool,
    pub finish_enabled: bool,
}
