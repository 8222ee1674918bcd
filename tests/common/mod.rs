#![allow(dead_code)]

use std::{
    collections::{BTreeMap, VecDeque},
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use learnwise::{
    errors::{AppError, AppResult},
    models::domain::{IndexedChunk, Message, Progress, QuizResult},
    repositories::{ChunkRepository, ProgressRepository, ScoredChunk},
    services::{
        embedding_service::Embedder,
        model_service::ChatModel,
        retrieval::{cosine_similarity, top_k, PdfTextExtractor},
    },
};

pub struct InMemoryChunkRepository {
    chunks: Arc<RwLock<Vec<IndexedChunk>>>,
    index_creations: Arc<RwLock<usize>>,
}

impl InMemoryChunkRepository {
    pub fn new() -> Self {
        Self {
            chunks: Arc::new(RwLock::new(Vec::new())),
            index_creations: Arc::new(RwLock::new(0)),
        }
    }

    pub async fn stored(&self) -> Vec<IndexedChunk> {
        self.chunks.read().await.clone()
    }

    pub async fn index_creations(&self) -> usize {
        *self.index_creations.read().await
    }
}

#[async_trait]
impl ChunkRepository for InMemoryChunkRepository {
    async fn index_exists(&self) -> AppResult<bool> {
        Ok(!self.chunks.read().await.is_empty())
    }

    async fn create_index(&self) -> AppResult<()> {
        *self.index_creations.write().await += 1;
        Ok(())
    }

    async fn append(&self, chunks: Vec<IndexedChunk>) -> AppResult<usize> {
        let added = chunks.len();
        self.chunks.write().await.extend(chunks);
        Ok(added)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.chunks.read().await.len() as u64)
    }

    async fn search(&self, embedding: &[f32], k: usize) -> AppResult<Vec<ScoredChunk>> {
        let chunks = self.chunks.read().await;
        let scored = chunks.iter().map(|indexed| {
            (
                indexed.chunk.clone(),
                cosine_similarity(embedding, &indexed.embedding),
            )
        });
        Ok(top_k(scored, k)
            .into_iter()
            .map(|(chunk, score)| ScoredChunk { chunk, score })
            .collect())
    }
}

pub struct InMemoryProgressRepository {
    progress: Arc<RwLock<BTreeMap<String, Progress>>>,
    results: Arc<RwLock<Vec<QuizResult>>>,
}

impl InMemoryProgressRepository {
    pub fn new() -> Self {
        Self {
            progress: Arc::new(RwLock::new(BTreeMap::new())),
            results: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn find_by_topic(&self, topic: &str) -> AppResult<Option<Progress>> {
        Ok(self.progress.read().await.get(topic).cloned())
    }

    async fn save(&self, progress: Progress) -> AppResult<Progress> {
        self.progress
            .write()
            .await
            .insert(progress.topic.clone(), progress.clone());
        Ok(progress)
    }

    async fn list(&self) -> AppResult<Vec<Progress>> {
        Ok(self.progress.read().await.values().cloned().collect())
    }

    async fn append_result(&self, result: QuizResult) -> AppResult<QuizResult> {
        self.results.write().await.push(result.clone());
        Ok(result)
    }

    async fn list_results(&self, topic: Option<String>) -> AppResult<Vec<QuizResult>> {
        let results = self.results.read().await;
        Ok(results
            .iter()
            .filter(|result| topic.as_deref().map_or(true, |topic| result.topic == topic))
            .cloned()
            .collect())
    }
}

/// Serves fixed page texts regardless of the path.
pub struct FakePdf {
    pages: Vec<String>,
}

impl FakePdf {
    pub fn with_pages(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|page| page.to_string()).collect(),
        }
    }
}

impl PdfTextExtractor for FakePdf {
    fn extract_pages(&self, _path: &Path) -> AppResult<Vec<String>> {
        Ok(self.pages.clone())
    }
}

/// Letter-frequency vectors: texts sharing vocabulary land close together.
pub struct LetterEmbedder;

#[async_trait]
impl Embedder for LetterEmbedder {
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut vector = vec![0.0; 26];
        for byte in text.to_ascii_lowercase().bytes() {
            if byte.is_ascii_lowercase() {
                vector[(byte - b'a') as usize] += 1.0;
            }
        }
        Ok(vector)
    }
}

/// Replies from a queue, or echoes the last message once the queue is empty.
pub struct RecordingModel {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl RecordingModel {
    pub fn echoing() -> Self {
        Self::replying(Vec::<String>::new())
    }

    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for RecordingModel {
    async fn complete(&self, messages: &[Message]) -> AppResult<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        if let Some(reply) = self.replies.lock().unwrap().pop_front() {
            return Ok(reply);
        }
        messages
            .last()
            .map(|message| message.content.clone())
            .ok_or_else(|| AppError::Upstream("empty request".to_string()))
    }
}
