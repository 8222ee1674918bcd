use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{DocumentChunk, IndexedChunk},
    services::retrieval::{cosine_similarity, top_k},
};

/// A stored chunk and its similarity to the query that found it.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub score: f32,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChunkRepository: Send + Sync {
    /// True once at least one chunk has been stored.
    async fn index_exists(&self) -> AppResult<bool>;
    async fn create_index(&self) -> AppResult<()>;
    async fn append(&self, chunks: Vec<IndexedChunk>) -> AppResult<usize>;
    async fn count(&self) -> AppResult<u64>;
    async fn search(&self, embedding: &[f32], k: usize) -> AppResult<Vec<ScoredChunk>>;
}

pub struct MongoChunkRepository {
    collection: Collection<IndexedChunk>,
}

impl MongoChunkRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for document chunks collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let source_index = IndexModel::builder()
            .keys(doc! { "source_digest": 1, "position": 1 })
            .options(
                IndexOptions::builder()
                    .name("source_digest_position".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(source_index).await?;

        log::info!("Successfully created indexes for document chunks collection");
        Ok(())
    }
}

#[async_trait]
impl ChunkRepository for MongoChunkRepository {
    async fn index_exists(&self) -> AppResult<bool> {
        Ok(self.count().await? > 0)
    }

    async fn create_index(&self) -> AppResult<()> {
        self.ensure_indexes().await
    }

    async fn append(&self, chunks: Vec<IndexedChunk>) -> AppResult<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }
        let result = self.collection.insert_many(&chunks).await?;
        Ok(result.inserted_ids.len())
    }

    async fn count(&self) -> AppResult<u64> {
        let total = self.collection.count_documents(doc! {}).await?;
        Ok(total)
    }

    // Brute-force scan; the collection holds the embeddings of a handful of documents.
    async fn search(&self, embedding: &[f32], k: usize) -> AppResult<Vec<ScoredChunk>> {
        let cursor = self.collection.find(doc! {}).await?;
        let stored: Vec<IndexedChunk> = cursor.try_collect().await?;

        let scored = stored.into_iter().map(|indexed| {
            let score = cosine_similarity(embedding, &indexed.embedding);
            (indexed.chunk, score)
        });

        Ok(top_k(scored, k)
            .into_iter()
            .map(|(chunk, score)| ScoredChunk { chunk, score })
            .collect())
    }
}
