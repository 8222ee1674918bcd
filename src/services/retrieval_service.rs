use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use sha2::{Digest, Sha256};

use crate::{
    constants::prompts,
    errors::{AppError, AppResult},
    models::domain::{DocumentChunk, IndexedChunk, Message},
    repositories::{ChunkRepository, ScoredChunk},
    services::{
        embedding_service::Embedder,
        model_service::ChatModel,
        prompt_template::PromptTemplate,
        retrieval::{join_pages, PdfTextExtractor, TextChunker},
    },
};

const RAG: PromptTemplate = PromptTemplate::new(prompts::RAG_PROMPT, &["context", "question"]);

pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 64;

#[derive(Debug)]
pub struct RagAnswer {
    pub answer: String,
    pub sources: Vec<ScoredChunk>,
}

pub struct RetrievalService {
    extractor: Arc<dyn PdfTextExtractor>,
    chunker: TextChunker,
    embedder: Arc<dyn Embedder>,
    repository: Arc<dyn ChunkRepository>,
    model: Arc<dyn ChatModel>,
    top_k: usize,
    embedding_batch_size: usize,
}

impl RetrievalService {
    pub fn new(
        extractor: Arc<dyn PdfTextExtractor>,
        embedder: Arc<dyn Embedder>,
        repository: Arc<dyn ChunkRepository>,
        model: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            extractor,
            chunker: TextChunker::default(),
            embedder,
            repository,
            model,
            top_k: DEFAULT_TOP_K,
            embedding_batch_size: DEFAULT_EMBEDDING_BATCH_SIZE,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Most chunks sent to the embedding service in one request.
    pub fn with_embedding_batch_size(mut self, batch_size: usize) -> Self {
        self.embedding_batch_size = batch_size.max(1);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Extracts, chunks and embeds a PDF, appending the chunks to the index.
    /// Returns how many chunks were added.
    pub async fn ingest(&self, path: &Path) -> AppResult<usize> {
        log::info!("Ingesting {}", path.display());

        let extractor = self.extractor.clone();
        let owned_path: PathBuf = path.to_path_buf();
        let pages =
            tokio::task::spawn_blocking(move || extractor.extract_pages(&owned_path)).await??;

        let text = join_pages(&pages);
        let pieces = self.chunker.split(&text);
        if pieces.is_empty() {
            log::warn!("No extractable text in {}; index left untouched", path.display());
            return Ok(0);
        }

        let digest = format!("{:x}", Sha256::digest(text.as_bytes()));
        let source = source_name(path);

        let embeddings = self.embed_in_batches(&pieces).await?;
        if embeddings.len() != pieces.len() {
            return Err(AppError::Upstream(format!(
                "Embedding service returned {} vectors for {} chunks",
                embeddings.len(),
                pieces.len()
            )));
        }

        let chunks: Vec<IndexedChunk> = pieces
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(position, (text, embedding))| IndexedChunk {
                chunk: DocumentChunk::new_chunk(&source, &digest, position as u32, text),
                embedding,
            })
            .collect();

        if !self.repository.index_exists().await? {
            log::info!("Creating vector index");
            self.repository.create_index().await?;
        }

        let added = self.repository.append(chunks).await?;
        log::info!("Added {} chunks from {} to the index", added, source);
        Ok(added)
    }

    async fn embed_in_batches(&self, pieces: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(pieces.len());
        for batch in pieces.chunks(self.embedding_batch_size) {
            log::debug!("Embedding batch of {} chunks", batch.len());
            embeddings.extend(self.embedder.embed_batch(batch).await?);
        }
        Ok(embeddings)
    }

    pub async fn query(&self, question: &str) -> AppResult<String> {
        Ok(self.query_with_sources(question).await?.answer)
    }

    /// Answers from the `top_k` chunks closest to the question.
    pub async fn query_with_sources(&self, question: &str) -> AppResult<RagAnswer> {
        if !self.repository.index_exists().await? {
            return Err(AppError::NoIndex);
        }

        let query_embedding = self.embedder.embed(question).await?;
        let sources = self.repository.search(&query_embedding, self.top_k).await?;
        log::debug!("Retrieved {} chunks for '{}'", sources.len(), question);

        let context = sources
            .iter()
            .map(|source| source.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = RAG.render(&[("context", context.as_str()), ("question", question)])?;

        let answer = self.model.complete(&[Message::user(prompt)]).await?;
        Ok(RagAnswer { answer, sources })
    }
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
