pub mod chunker;
pub mod pdf_extractor;
pub mod similarity;

pub use chunker::{join_pages, TextChunker, CHUNK_OVERLAP, CHUNK_SIZE};
pub use pdf_extractor::{LopdfExtractor, PdfTextExtractor};
pub use similarity::{cosine_similarity, top_k};
