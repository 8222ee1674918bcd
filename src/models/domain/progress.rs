use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{AppError, AppResult},
    models::domain::QuizQuestion,
};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
    pub score: f64, // percent, 0..=100
}

impl QuizScore {
    /// Grades `answers` positionally against `questions`.
    pub fn grade(questions: &[QuizQuestion], answers: &[u8]) -> AppResult<Self> {
        if questions.is_empty() {
            return Err(AppError::ValidationError(
                "Cannot grade a quiz with no questions".to_string(),
            ));
        }
        if answers.len() != questions.len() {
            return Err(AppError::ValidationError(format!(
                "Number of answers ({}) must match number of questions ({})",
                answers.len(),
                questions.len()
            )));
        }

        let correct = questions
            .iter()
            .zip(answers)
            .filter(|(question, answer)| question.is_correct(**answer))
            .count();
        let total = questions.len();

        Ok(QuizScore {
            correct,
            total,
            score: correct as f64 / total as f64 * 100.0,
        })
    }
}

/// One graded quiz, kept as history alongside the per-topic progress.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizResult {
    pub id: String,
    pub topic: String,
    pub correct: usize,
    pub total: usize,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}

impl QuizResult {
    pub fn new(topic: &str, score: &QuizScore) -> Self {
        QuizResult {
            id: uuid::Uuid::new_v4().to_string(),
            topic: topic.to_string(),
            correct: score.correct,
            total: score.total,
            score: score.score,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Progress {
    pub topic: String,
    pub completed_percent: f64,
    pub last_updated: DateTime<Utc>,
}

impl Progress {
    pub fn new(topic: &str) -> Self {
        Progress {
            topic: topic.to_string(),
            completed_percent: 0.0,
            last_updated: Utc::now(),
        }
    }

    /// Folds a quiz score in: progress keeps the best score seen, capped at 100.
    pub fn record(&mut self, score: f64) {
        self.completed_percent = self.completed_percent.max(score).min(100.0);
        self.last_updated = Utc::now();
    }
}
