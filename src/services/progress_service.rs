use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::domain::{Progress, QuizQuestion, QuizResult, QuizScore},
    repositories::ProgressRepository,
};

#[derive(Clone, Debug, PartialEq)]
pub struct ProgressReport {
    pub score: QuizScore,
    pub progress: Progress,
}

pub struct ProgressService {
    repository: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    pub fn new(repository: Arc<dyn ProgressRepository>) -> Self {
        Self { repository }
    }

    /// Grades `answers`, then stores the result and folds it into the topic's progress.
    pub async fn submit(
        &self,
        topic: &str,
        questions: &[QuizQuestion],
        answers: &[u8],
    ) -> AppResult<ProgressReport> {
        let score = QuizScore::grade(questions, answers)?;
        let progress = self.record(topic, &score).await?;
        Ok(ProgressReport { score, progress })
    }

    pub async fn record(&self, topic: &str, score: &QuizScore) -> AppResult<Progress> {
        self.repository
            .append_result(QuizResult::new(topic, score))
            .await?;

        let mut progress = self
            .repository
            .find_by_topic(topic)
            .await?
            .unwrap_or_else(|| Progress::new(topic));
        progress.record(score.score);

        let progress = self.repository.save(progress).await?;
        log::info!(
            "Recorded {:.0}% on '{}'; progress is {:.0}%",
            score.score,
            topic,
            progress.completed_percent
        );
        Ok(progress)
    }

    pub async fn progress(&self) -> AppResult<Vec<Progress>> {
        self.repository.list().await
    }

    pub async fn history(&self, topic: Option<&str>) -> AppResult<Vec<QuizResult>> {
        self.repository.list_results(topic.map(str::to_string)).await
    }
}
