use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoChunkRepository, MongoProgressRepository},
    services::{
        embedding_service::HttpEmbedder,
        model_service::{ChatModel, OpenAiChatModel},
        progress_service::ProgressService,
        quiz_service::QuizService,
        retrieval::LopdfExtractor,
        retrieval_service::RetrievalService,
        syllabus_service::SyllabusService,
        teaching_service::TeachingService,
    },
};

const QUIZ_TEMPERATURE: f32 = 0.3;
const TEACHING_TEMPERATURE: f32 = 0.9;
const RAG_TEMPERATURE: f32 = 0.2;

/// Services that only talk to the model. Retrieval and progress tracking also
/// need MongoDB and are connected on demand.
#[derive(Clone)]
pub struct AppState {
    pub syllabus_service: Arc<SyllabusService>,
    pub quiz_service: Arc<QuizService>,
    pub teaching_service: Arc<TeachingService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let syllabus_model: Arc<dyn ChatModel> = Arc::new(OpenAiChatModel::new(&config));
        let syllabus_service = Arc::new(SyllabusService::new(
            syllabus_model,
            config.syllabus_strategy,
        ));

        let quiz_model: Arc<dyn ChatModel> =
            Arc::new(OpenAiChatModel::new(&config).with_temperature(QUIZ_TEMPERATURE));
        let quiz_service = Arc::new(QuizService::new(quiz_model));

        let teaching_model: Arc<dyn ChatModel> =
            Arc::new(OpenAiChatModel::new(&config).with_temperature(TEACHING_TEMPERATURE));
        let teaching_service = Arc::new(TeachingService::new(teaching_model));

        Self {
            syllabus_service,
            quiz_service,
            teaching_service,
            config: Arc::new(config),
        }
    }

    pub async fn connect_progress(&self) -> AppResult<ProgressService> {
        let db = Database::connect(&self.config).await?;
        let progress_repository = Arc::new(MongoProgressRepository::new(&db));
        progress_repository.ensure_indexes().await?;

        Ok(ProgressService::new(progress_repository))
    }

    pub async fn connect_retrieval(&self) -> AppResult<RetrievalService> {
        let db = Database::connect(&self.config).await?;
        let chunk_repository = Arc::new(MongoChunkRepository::new(
            &db,
            &self.config.chunks_collection,
        ));

        let rag_model: Arc<dyn ChatModel> =
            Arc::new(OpenAiChatModel::new(&self.config).with_temperature(RAG_TEMPERATURE));

        Ok(RetrievalService::new(
            Arc::new(LopdfExtractor),
            Arc::new(HttpEmbedder::new(&self.config)),
            chunk_repository,
            rag_model,
        )
        .with_top_k(self.config.retrieval_top_k)
        .with_embedding_batch_size(self.config.embedding_batch_size))
    }
}
