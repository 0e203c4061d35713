use quiz_core::model::{FeedbackMode, Question};

/// Immediate-feedback marking of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionFeedback {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub index: usize,
    pub label: char,
    pub text: String,
    pub selected: bool,
    pub feedback: Option<OptionFeedback>,
}

/// Everything needed to render the question at the current display position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based position in display order.
    pub number: usize,
    pub total: usize,
    pub canonical_index: usize,
    pub text: String,
    pub options: Vec<OptionView>,
    pub answered: bool,
    /// Revealed in immediate mode after a wrong pick.
    pub explanation: Option<String>,
}

/// Letter shown next to an option: `A`, `B`, ... (`?` past `Z`).
#[must_use]
pub fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map_or('?', |i| char::from(b'A' + i))
}

impl QuestionView {
    pub(crate) fn build(
        question: &Question,
        display_position: usize,
        total: usize,
        canonical_index: usize,
        selected: Option<usize>,
        feedback: FeedbackMode,
    ) -> Self {
        let reveal = feedback == FeedbackMode::Immediate && selected.is_some();
        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let is_selected = selected == Some(index);
                let marking = if !reveal {
                    None
                } else if question.is_correct(index) {
                    Some(OptionFeedback::Correct)
                } else if is_selected {
                    Some(OptionFeedback::Incorrect)
                } else {
                    None
                };
                OptionView {
                    index,
                    label: option_label(index),
                    text: text.clone(),
                    selected: is_selected,
                    feedback: marking,
                }
            })
            .collect();

        let picked_wrong = selected.is_some_and(|s| !question.is_correct(s));
        let explanation = (reveal && picked_wrong)
            .then(|| question.explanation().map(str::to_string))
            .flatten();

        Self {
            number: display_position + 1,
            total,
            canonical_index,
            text: question.text().to_string(),
            options,
            answered: selected.is_some(),
            explanation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question::new("Capital of France?", vec!["Rome".into(), "Paris".into(), "Oslo".into()], 1)
            .unwrap()
            .with_explanation("Paris has been the capital since 987.")
    }

    #[test]
    fn labels_are_letters() {
        assert_eq!(option_label(0), 'A');
        assert_eq!(option_label(3), 'D');
        assert_eq!(option_label(26), '?');
    }

    #[test]
    fn end_mode_never_marks_options() {
        let view = QuestionView::build(&question(), 0, 3, 2, Some(0), FeedbackMode::AtEnd);
        assert!(view.options.iter().all(|o| o.feedback.is_none()));
        assert!(view.options[0].selected);
        assert_eq!(view.explanation, None);
        assert_eq!(view.number, 1);
    }

    #[test]
    fn immediate_mode_marks_wrong_pick_and_reveals_explanation() {
        let view = QuestionView::build(&question(), 1, 3, 0, Some(2), FeedbackMode::Immediate);
        let marks: Vec<_> = view.options.iter().map(|o| o.feedback).collect();
        assert_eq!(
            marks,
            [None, Some(OptionFeedback::Correct), Some(OptionFeedback::Incorrect)]
        );
        assert!(view.explanation.is_some());
    }

    #[test]
    fn immediate_mode_hides_explanation_for_right_pick() {
        let view = QuestionView::build(&question(), 0, 3, 0, Some(1), FeedbackMode::Immediate);
        assert_eq!(view.options[1].feedback, Some(OptionFeedback::Correct));
        assert_eq!(view.explanation, None);
    }

    #[test]
    fn unanswered_question_has_no_feedback() {
        let view = QuestionView::build(&question(), 0, 3, 0, None, FeedbackMode::Immediate);
        assert!(!view.answered);
        assert!(view.options.iter().all(|o| o.feedback.is_none() && !o.selected));
    }
}
