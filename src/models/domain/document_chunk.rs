use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentChunk {
    pub id: String,
    pub source: String,        // file name the text came from
    pub source_digest: String, // sha256 of the extracted document text
    pub position: u32,         // order of the chunk within its document
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl DocumentChunk {
    pub fn new_chunk(source: &str, source_digest: &str, position: u32, text: &str) -> Self {
        DocumentChunk {
            id: uuid::Uuid::new_v4().to_string(),
            source: source.to_string(),
            source_digest: source_digest.to_string(),
            position,
            text: text.to_string(),
            created_at: Some(Utc::now()),
        }
    }
}

/// A chunk together with its embedding, as stored in the vector index.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct IndexedChunk {
    #[serde(flatten)]
    pub chunk: DocumentChunk,
    pub embedding: Vec<f32>,
}
