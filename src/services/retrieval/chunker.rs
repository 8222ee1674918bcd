use crate::errors::{AppError, AppResult};

pub const CHUNK_SIZE: usize = 1000;
pub const CHUNK_OVERLAP: usize = 100;

/// Splits text into fixed-size character windows that overlap their neighbour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            overlap: CHUNK_OVERLAP,
        }
    }
}

impl TextChunker {
    pub fn new(chunk_size: usize, overlap: usize) -> AppResult<Self> {
        if chunk_size == 0 || overlap >= chunk_size {
            return Err(AppError::ValidationError(format!(
                "Chunk overlap ({}) must be smaller than a non-zero chunk size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Every chunk holds at most `chunk_size` characters and starts `overlap`
    /// characters before the previous one ended. The last chunk may be shorter.
    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.trim().chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let step = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}

/// Concatenates page texts, skipping pages with nothing extractable.
pub fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .filter(|page| !page.trim().is_empty())
        .fold(String::new(), |mut text, page| {
            text.push_str(page);
            text.push('\n');
            text
        })
}
