pub mod chunk_repository;
pub mod progress_repository;

pub use chunk_repository::{ChunkRepository, MongoChunkRepository, ScoredChunk};
pub use progress_repository::{MongoProgressRepository, ProgressRepository};
