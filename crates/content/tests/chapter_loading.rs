use std::sync::Arc;

use content::{InMemorySource, LoadError, QuizLoader, SourceError};
use quiz_core::SectionIndex;
use quiz_core::model::{QuestionError, QuizLayout, ValidationError};

fn chapter_manifest() -> &'static str {
    r#"{
        "chapters": [
            {"chapterNumber": 1, "chapterTitle": "Basics", "chapterFile": "c1.json", "enabled": true},
            {"chapterNumber": 2, "chapterTitle": "Broken", "chapterFile": "c2.json", "enabled": true},
            {"chapterNumber": 3, "chapterTitle": "Hidden", "chapterFile": "c3.json", "enabled": false},
            {"chapterNumber": "4", "chapterTitle": "Missing", "chapterFile": "c4.json", "enabled": true},
            {"chapterNumber": 5, "chapterTitle": "Advanced", "chapterFile": "c5.json", "enabled": true}
        ]
    }"#
}

fn chapter(questions: &[(&str, usize)]) -> String {
    let items: Vec<String> = questions
        .iter()
        .map(|(text, correct)| {
            format!(
                r#"{{"question": "{text}", "options": ["a", "b", "c"], "correctAnswer": {correct}}}"#
            )
        })
        .collect();
    format!(r#"{{"questions": [{}]}}"#, items.join(","))
}

#[tokio::test]
async fn failed_chapters_are_skipped_and_order_is_kept() {
    let source = InMemorySource::new()
        .with("quiz.json", chapter_manifest())
        .with("c1.json", chapter(&[("one-a", 0), ("one-b", 1)]))
        .with("c2.json", "{ broken")
        .with("c3.json", chapter(&[("three", 0)]))
        .with("c5.json", chapter(&[("five", 2)]));
    let loader = QuizLoader::new(Arc::new(source));

    let loaded = loader.load_quiz(&"quiz.json".into()).await.unwrap();

    let texts: Vec<_> = loaded.content.questions().map(|q| q.text()).collect();
    assert_eq!(texts, ["one-a", "one-b", "five"]);

    assert!(loaded.is_partial());
    let skipped: Vec<_> = loaded
        .skipped
        .iter()
        .map(|s| s.chapter.as_str())
        .collect();
    assert_eq!(skipped, ["2", "4"]);
    assert!(matches!(loaded.skipped[0].error, LoadError::Parse { .. }));
    assert!(matches!(
        loaded.skipped[1].error,
        LoadError::Fetch {
            source: SourceError::NotFound(_),
            ..
        }
    ));

    let QuizLayout::Chapters(chapters) = loaded.content.layout() else {
        panic!("expected chapter layout");
    };
    let keys: Vec<_> = chapters.iter().map(|c| c.key().as_str()).collect();
    assert_eq!(keys, ["1", "5"]);

    let index = SectionIndex::compute(&loaded.content);
    let sections: Vec<_> = index
        .sections()
        .iter()
        .map(|s| (s.id.as_str(), s.title.as_str(), s.count))
        .collect();
    assert_eq!(sections, [("1", "Basics", 2), ("5", "Advanced", 1)]);
    assert_eq!(index.total(), 3);
}

#[tokio::test]
async fn invalid_chapter_questions_skip_the_chapter() {
    let source = InMemorySource::new()
        .with(
            "quiz.json",
            r#"{"chapters": [
                {"chapterNumber": 1, "chapterFile": "c1.json", "enabled": true},
                {"chapterNumber": 2, "chapterFile": "c2.json", "enabled": true}
            ]}"#,
        )
        .with("c1.json", chapter(&[("ok", 0)]))
        .with("c2.json", chapter(&[("fine", 0), ("bad", 9)]));
    let loader = QuizLoader::new(Arc::new(source));

    let loaded = loader.load_quiz(&"quiz.json".into()).await.unwrap();

    assert_eq!(loaded.content.len(), 1);
    assert_eq!(loaded.skipped.len(), 1);
    assert!(matches!(
        loaded.skipped[0].error,
        LoadError::Validation {
            source: ValidationError::Question { index: 1, .. },
            ..
        }
    ));
}

#[tokio::test]
async fn empty_chapter_still_forms_a_section() {
    let source = InMemorySource::new()
        .with(
            "quiz.json",
            r#"{"chapters": [{"chapterNumber": 7, "chapterFile": "c7.json", "enabled": true}]}"#,
        )
        .with("c7.json", "{}");
    let loader = QuizLoader::new(Arc::new(source));

    let loaded = loader.load_quiz(&"quiz.json".into()).await.unwrap();

    assert!(loaded.content.is_empty());
    assert!(!loaded.is_partial());
    let index = SectionIndex::compute(&loaded.content);
    assert_eq!(index.get("7").map(|s| s.count), Some(0));
}

#[tokio::test]
async fn every_chapter_failing_yields_empty_content() {
    let source = InMemorySource::new().with("quiz.json", chapter_manifest());
    let loader = QuizLoader::new(Arc::new(source));

    let loaded = loader.load_quiz(&"quiz.json".into()).await.unwrap();

    assert!(loaded.content.is_empty());
    assert_eq!(loaded.skipped.len(), 4);
}

#[tokio::test]
async fn flat_quiz_loads_directly() {
    let source = InMemorySource::new().with(
        "quiz.json",
        r#"{"questions": [
            {"question": "q1", "options": ["a", "b"], "correctAnswer": 1, "section": "A"},
            {"question": "q2", "options": ["a", "b"], "correctAnswer": 0}
        ]}"#,
    );
    let loader = QuizLoader::new(Arc::new(source));

    let loaded = loader.load_quiz(&"quiz.json".into()).await.unwrap();

    assert_eq!(loaded.content.layout(), &QuizLayout::Flat);
    assert_eq!(loaded.content.len(), 2);
    assert!(loaded.skipped.is_empty());
}

#[tokio::test]
async fn invalid_flat_question_is_fatal() {
    let source = InMemorySource::new().with(
        "quiz.json",
        r#"{"questions": [{"question": "q1", "options": [], "correctAnswer": 0}]}"#,
    );
    let loader = QuizLoader::new(Arc::new(source));

    let err = loader.load_quiz(&"quiz.json".into()).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("question 0"), "{message}");
}

#[tokio::test]
async fn mistyped_fields_are_validation_errors_not_parse_errors() {
    let source = InMemorySource::new()
        .with(
            "quiz.json",
            r#"{"questions": [
                {"question": "ok", "options": ["a", "b"], "correctAnswer": 0},
                {"question": "bad", "options": ["a", 2], "correctAnswer": 0}
            ]}"#,
        )
        .with(
            "numbered.json",
            r#"{"questions": [{"question": 42, "options": ["a"], "correctAnswer": 0}]}"#,
        );
    let loader = QuizLoader::new(Arc::new(source));

    let err = loader.load_quiz(&"quiz.json".into()).await.unwrap_err();
    assert!(
        matches!(
            err,
            LoadError::Validation {
                source: ValidationError::Question {
                    index: 1,
                    source: QuestionError::InvalidOption { option: 1 },
                },
                ..
            }
        ),
        "{err}"
    );

    let err = loader.load_quiz(&"numbered.json".into()).await.unwrap_err();
    assert!(
        matches!(
            err,
            LoadError::Validation {
                source: ValidationError::Question {
                    index: 0,
                    source: QuestionError::InvalidText,
                },
                ..
            }
        ),
        "{err}"
    );
}
