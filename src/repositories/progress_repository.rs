use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{Progress, QuizResult},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn find_by_topic(&self, topic: &str) -> AppResult<Option<Progress>>;
    /// Inserts or replaces the progress row for `progress.topic`.
    async fn save(&self, progress: Progress) -> AppResult<Progress>;
    async fn list(&self) -> AppResult<Vec<Progress>>;
    async fn append_result(&self, result: QuizResult) -> AppResult<QuizResult>;
    async fn list_results(&self, topic: Option<String>) -> AppResult<Vec<QuizResult>>;
}

pub struct MongoProgressRepository {
    progress: Collection<Progress>,
    results: Collection<QuizResult>,
}

impl MongoProgressRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            progress: db.get_collection("progress"),
            results: db.get_collection("quiz_results"),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for progress and quiz_results collections");

        let topic_index = IndexModel::builder()
            .keys(doc! { "topic": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("topic_unique".to_string())
                    .build(),
            )
            .build();

        let result_topic_index = IndexModel::builder()
            .keys(doc! { "topic": 1, "created_at": 1 })
            .options(
                IndexOptions::builder()
                    .name("topic_created_at".to_string())
                    .build(),
            )
            .build();

        self.progress.create_index(topic_index).await?;
        self.results.create_index(result_topic_index).await?;

        log::info!("Successfully created indexes for progress and quiz_results collections");
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for MongoProgressRepository {
    async fn find_by_topic(&self, topic: &str) -> AppResult<Option<Progress>> {
        let progress = self.progress.find_one(doc! { "topic": topic }).await?;
        Ok(progress)
    }

    async fn save(&self, progress: Progress) -> AppResult<Progress> {
        self.progress
            .replace_one(doc! { "topic": &progress.topic }, &progress)
            .upsert(true)
            .await?;
        Ok(progress)
    }

    async fn list(&self) -> AppResult<Vec<Progress>> {
        let rows = self
            .progress
            .find(doc! {})
            .sort(doc! { "topic": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(rows)
    }

    async fn append_result(&self, result: QuizResult) -> AppResult<QuizResult> {
        self.results.insert_one(&result).await?;
        Ok(result)
    }

    async fn list_results(&self, topic: Option<String>) -> AppResult<Vec<QuizResult>> {
        let filter = match topic {
            Some(topic) => doc! { "topic": topic },
            None => doc! {},
        };
        let results = self
            .results
            .find(filter)
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }
}
