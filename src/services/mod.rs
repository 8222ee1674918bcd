pub mod conversation_agent;
pub mod embedding_service;
pub mod json_extract;
pub mod model_service;
pub mod progress_service;
pub mod prompt_template;
pub mod quiz_service;
pub mod retrieval;
pub mod retrieval_service;
pub mod syllabus_service;
pub mod teaching_service;
