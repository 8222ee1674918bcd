use std::sync::Arc;

use serde_json::Value;
use validator::Validate;

use crate::{
    constants::prompts,
    errors::{AppError, AppResult},
    models::domain::{quiz_question::CHOICES_PER_QUESTION, Message, QuizQuestion},
    services::{json_extract::extract_json, model_service::ChatModel, prompt_template::PromptTemplate},
};

const QUIZ: PromptTemplate = PromptTemplate::new(
    prompts::QUIZ_PROMPT,
    &["n_questions", "topic", "difficulty", "schema"],
);

pub struct QuizService {
    model: Arc<dyn ChatModel>,
}

impl QuizService {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Asks the model for `n_questions` multiple-choice questions and
    /// validates the reply before handing it back.
    ///
    /// Parsing problems keep their own error kinds so the offending text stays
    /// attached. Missing credentials are reported as such; any other failure
    /// becomes a generic internal error with a descriptive message.
    pub async fn generate_quiz(
        &self,
        topic: &str,
        difficulty: &str,
        n_questions: usize,
    ) -> AppResult<Vec<QuizQuestion>> {
        if n_questions == 0 {
            return Err(AppError::ValidationError(
                "Question count must be at least 1".to_string(),
            ));
        }

        log::info!(
            "Generating {} {} questions about '{}'",
            n_questions,
            difficulty,
            topic
        );

        match self.request_quiz(topic, difficulty, n_questions).await {
            Ok(questions) => Ok(questions),
            Err(
                err @ (AppError::MissingConfiguration(_)
                | AppError::JsonNotFound { .. }
                | AppError::MalformedJson { .. }
                | AppError::InvalidQuizShape(_)),
            ) => {
                log::warn!("Quiz generation failed: {}", err);
                Err(err)
            }
            Err(err) => {
                log::error!("An unexpected error occurred in generate_quiz: {}", err);
                Err(AppError::InternalError(format!(
                    "An unexpected error occurred: {}",
                    err
                )))
            }
        }
    }

    async fn request_quiz(
        &self,
        topic: &str,
        difficulty: &str,
        n_questions: usize,
    ) -> AppResult<Vec<QuizQuestion>> {
        let prompt = build_prompt(topic, difficulty, n_questions)?;
        let raw = self.model.complete(&[Message::user(prompt)]).await?;
        let value = extract_json(&raw)?;
        parse_questions(value, n_questions)
    }
}

pub fn build_prompt(topic: &str, difficulty: &str, n_questions: usize) -> AppResult<String> {
    let n_questions = n_questions.to_string();
    let schema = question_schema();
    QUIZ.render(&[
        ("n_questions", n_questions.as_str()),
        ("topic", topic),
        ("difficulty", difficulty),
        ("schema", schema.as_str()),
    ])
}

/// JSON schema of a single question, embedded in the prompt.
pub fn question_schema() -> String {
    serde_json::to_string(&schemars::schema_for!(QuizQuestion)).unwrap_or_default()
}

/// Checks the parsed reply against the quiz shape, failing closed.
///
/// Accepts an array of questions, an object with a `questions` array, or a
/// lone question object.
pub fn parse_questions(value: Value, expected: usize) -> AppResult<Vec<QuizQuestion>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut fields) => match fields.remove("questions") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(AppError::InvalidQuizShape(
                    "'questions' must be an array".to_string(),
                ))
            }
            None => vec![Value::Object(fields)],
        },
        other => {
            return Err(AppError::InvalidQuizShape(format!(
                "expected a JSON array of questions, got {}",
                other
            )))
        }
    };

    if items.len() != expected {
        return Err(AppError::InvalidQuizShape(format!(
            "expected {} questions, got {}",
            expected,
            items.len()
        )));
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let question: QuizQuestion = serde_json::from_value(item).map_err(|err| {
                AppError::InvalidQuizShape(format!("question {}: {}", index + 1, err))
            })?;
            question.validate().map_err(|err| {
                AppError::InvalidQuizShape(format!(
                    "question {} must have non-empty text, {} choices and an answer index below {}: {}",
                    index + 1,
                    CHOICES_PER_QUESTION,
                    CHOICES_PER_QUESTION,
                    err
                ))
            })?;
            Ok(question)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::model_service::MockChatModel;

    const ONE_QUESTION: &str =
        r#"[{"question":"Q","choices":["a","b","c","d"],"correct_answer":1}]"#;

    fn service_replying(reply: &'static str) -> QuizService {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(move |_: &[Message]| Ok(reply.to_string()));
        QuizService::new(Arc::new(model))
    }

    #[tokio::test]
    async fn exact_json_reply_parses() {
        let questions = service_replying(ONE_QUESTION)
            .generate_quiz("arithmetic", "easy", 1)
            .await
            .expect("quiz should parse");

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer, 1);
        assert_eq!(questions[0].choices.len(), 4);
    }

    #[tokio::test]
    async fn prose_wrapped_reply_parses_identically() {
        let plain = service_replying(ONE_QUESTION)
            .generate_quiz("arithmetic", "easy", 1)
            .await
            .expect("quiz should parse");

        let wrapped = service_replying(
            "Here is your quiz:\n[{\"question\":\"Q\",\"choices\":[\"a\",\"b\",\"c\",\"d\"],\"correct_answer\":1}]\nEnjoy!",
        )
        .generate_quiz("arithmetic", "easy", 1)
        .await
        .expect("quiz should parse");

        assert_eq!(plain, wrapped);
    }

    #[tokio::test]
    async fn reply_without_json_keeps_raw_text() {
        let raw = "Sorry, I can't help with that.";
        let err = service_replying(raw)
            .generate_quiz("arithmetic", "easy", 1)
            .await
            .unwrap_err();

        match err {
            AppError::JsonNotFound { raw: returned } => assert_eq!(returned, raw),
            other => panic!("expected JsonNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_json_keeps_extracted_text() {
        let err = service_replying("[{'question': 'Q'}]")
            .generate_quiz("arithmetic", "easy", 1)
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "MALFORMED_JSON");
        assert_eq!(err.raw_text(), Some("[{'question': 'Q'}]"));
    }

    #[tokio::test]
    async fn trailing_comma_array_is_malformed_not_truncated() {
        let reply = r#"[{"question":"Q1","choices":["a","b","c","d"],"correct_answer":1},{"question":"Q2","choices":["a","b","c","d"],"correct_answer":2},]"#;

        for count in [1, 2] {
            let err = service_replying(reply)
                .generate_quiz("arithmetic", "easy", count)
                .await
                .unwrap_err();

            assert_eq!(err.error_code(), "MALFORMED_JSON");
            assert_eq!(err.raw_text(), Some(reply));
        }
    }

    #[tokio::test]
    async fn three_choices_fail_closed() {
        let err = service_replying(r#"[{"question":"Q","choices":["a","b","c"],"correct_answer":1}]"#)
            .generate_quiz("arithmetic", "easy", 1)
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "INVALID_QUIZ_SHAPE");
    }

    #[tokio::test]
    async fn wrong_question_count_fails_closed() {
        let err = service_replying(ONE_QUESTION)
            .generate_quiz("arithmetic", "easy", 2)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("expected 2 questions, got 1"));
    }

    #[tokio::test]
    async fn upstream_failure_becomes_generic_error() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .returning(|_: &[Message]| Err(AppError::Upstream("connection reset".to_string())));

        let err = QuizService::new(Arc::new(model))
            .generate_quiz("arithmetic", "easy", 1)
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert!(err.to_string().contains("An unexpected error occurred"));
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn missing_configuration_is_reported_as_is() {
        let mut model = MockChatModel::new();
        model.expect_complete().returning(|_: &[Message]| {
            Err(AppError::MissingConfiguration("GROQ_API_KEY not found".to_string()))
        });

        let err = QuizService::new(Arc::new(model))
            .generate_quiz("arithmetic", "easy", 1)
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "MISSING_CONFIGURATION");
    }

    #[tokio::test]
    async fn zero_questions_is_rejected_without_calling_the_model() {
        let model = MockChatModel::new();

        let err = QuizService::new(Arc::new(model))
            .generate_quiz("arithmetic", "easy", 0)
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn prompt_mentions_topic_difficulty_count_and_schema() {
        let prompt = build_prompt("photosynthesis", "hard", 7).expect("prompt should render");

        assert!(prompt.starts_with("Generate exactly 7 multiple-choice questions about the topic: 'photosynthesis'."));
        assert!(prompt.contains("The difficulty level should be hard."));
        assert!(prompt.contains("\"correct_answer\""));
        assert!(prompt.contains(&question_schema()));
    }

    #[test]
    fn questions_wrapper_object_is_accepted() {
        let value = serde_json::json!({
            "questions": [{"question": "Q", "choices": ["a", "b", "c", "d"], "correct_answer": 3}]
        });

        let questions = parse_questions(value, 1).expect("should parse");
        assert_eq!(questions[0].correct_answer, 3);
    }

    #[test]
    fn scalar_value_is_rejected() {
        let err = parse_questions(serde_json::json!(3), 1).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_QUIZ_SHAPE");
    }
}
