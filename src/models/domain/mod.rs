pub mod document_chunk;
pub mod message;
pub mod progress;
pub mod quiz_question;
pub mod transcript;
pub use document_chunk::{DocumentChunk, IndexedChunk};
pub use message::{Message, Role};
pub use progress::{Progress, QuizResult, QuizScore};
pub use quiz_question::QuizQuestion;
pub use transcript::{Speaker, SyllabusTranscript};
