use std::sync::Arc;

use crate::model::{AnswerRecord, Question};

/// What the user picked for a missed question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAnswer {
    NotAnswered,
    Answered(String),
}

impl UserAnswer {
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::NotAnswered => None,
            Self::Answered(text) => Some(text),
        }
    }
}

/// A question that was answered incorrectly or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissedQuestion {
    pub canonical_index: usize,
    pub question_text: String,
    pub user_answer: UserAnswer,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

/// Final tally for a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    pub total: usize,
    pub correct: usize,
    /// `100 * correct / total`, rounded half up; 0 for an empty quiz.
    pub percentage: u32,
    /// Missed questions in canonical order.
    pub missed: Vec<MissedQuestion>,
}

impl SessionResult {
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.missed.is_empty()
    }

    #[must_use]
    pub fn wrong(&self) -> usize {
        self.total - self.correct
    }
}

/// Score `answers` against `questions` in canonical order.
#[must_use]
pub fn score(questions: &[Arc<Question>], answers: &AnswerRecord) -> SessionResult {
    let mut correct = 0;
    let mut missed = Vec::new();

    for (index, question) in questions.iter().enumerate() {
        let picked = answers.get(index);
        if picked.is_some_and(|option| question.is_correct(option)) {
            correct += 1;
            continue;
        }

        let user_answer = match picked.and_then(|option| question.option(option)) {
            Some(text) => UserAnswer::Answered(text.to_string()),
            None => UserAnswer::NotAnswered,
        };
        missed.push(MissedQuestion {
            canonical_index: index,
            question_text: question.text().to_string(),
            user_answer,
            correct_answer: question.correct_option().to_string(),
            explanation: question.explanation().map(str::to_string),
        });
    }

    SessionResult {
        total: questions.len(),
        correct,
        percentage: percentage(correct, questions.len()),
        missed,
    }
}

/// Integer percentage, rounded half up.
#[must_use]
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * correct + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, correct: usize) -> Arc<Question> {
        Arc::new(
            Question::new(
                text,
                vec!["o0".into(), "o1".into(), "o2".into()],
                correct,
            )
            .unwrap()
            .with_explanation(format!("because {text}")),
        )
    }

    #[test]
    fn scores_mixed_answers() {
        let questions: Vec<_> = [0, 1, 0, 1, 2]
            .iter()
            .enumerate()
            .map(|(i, &c)| question(&format!("q{i}"), c))
            .collect();
        let answers: AnswerRecord = [(0, 0), (1, 1), (2, 1), (4, 2)].into_iter().collect();

        let result = score(&questions, &answers);

        assert_eq!(result.total, 5);
        assert_eq!(result.correct, 3);
        assert_eq!(result.percentage, 60);
        assert_eq!(result.missed.len(), 2);

        let wrong = &result.missed[0];
        assert_eq!(wrong.canonical_index, 2);
        assert_eq!(wrong.user_answer, UserAnswer::Answered("o1".into()));
        assert_eq!(wrong.correct_answer, "o0");
        assert_eq!(wrong.explanation.as_deref(), Some("because q2"));

        let skipped = &result.missed[1];
        assert_eq!(skipped.canonical_index, 3);
        assert_eq!(skipped.user_answer, UserAnswer::NotAnswered);
        assert_eq!(skipped.correct_answer, "o1");
    }

    #[test]
    fn empty_quiz_scores_zero() {
        let result = score(&[], &AnswerRecord::new());
        assert_eq!(result.total, 0);
        assert_eq!(result.percentage, 0);
        assert!(result.is_perfect());
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(3, 3), 100);
        assert_eq!(percentage(0, 3), 0);
    }
}
