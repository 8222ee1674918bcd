use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::{Mutex, RwLock};

use crate::{
    constants::prompts,
    errors::{AppError, AppResult},
    services::{
        conversation_agent::ConversationAgent, model_service::ChatModel,
        prompt_template::PromptTemplate,
    },
};

const INSTRUCTOR_INCEPTION: PromptTemplate =
    PromptTemplate::new(prompts::INSTRUCTOR_INCEPTION_PROMPT, &["topic", "syllabus"]);

pub struct TeachingSession {
    topic: String,
    agent: ConversationAgent,
    last_active: Instant,
}

impl TeachingSession {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn agent(&self) -> &ConversationAgent {
        &self.agent
    }

    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }
}

/// Instructor chats keyed by session id.
///
/// Each session owns its own history behind its own lock: steps within one
/// session are serialized, separate sessions never block each other.
///
/// Sessions live until the caller ends them with [`TeachingService::end`] or
/// sweeps them with [`TeachingService::evict_idle`].
pub struct TeachingService {
    model: Arc<dyn ChatModel>,
    sessions: RwLock<HashMap<String, Arc<Mutex<TeachingSession>>>>,
}

impl TeachingService {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Starts (or restarts) a session teaching from `syllabus`.
    pub async fn seed(&self, session_id: &str, syllabus: &str, topic: &str) -> AppResult<()> {
        let system_prompt = INSTRUCTOR_INCEPTION.render(&[("topic", topic), ("syllabus", syllabus)])?;
        let session = TeachingSession {
            topic: topic.to_string(),
            agent: ConversationAgent::new(system_prompt, self.model.clone()),
            last_active: Instant::now(),
        };

        let replaced = self
            .sessions
            .write()
            .await
            .insert(session_id.to_string(), Arc::new(Mutex::new(session)))
            .is_some();

        log::info!(
            "Seeded teaching session '{}' on '{}'{}",
            session_id,
            topic,
            if replaced { " (replaced previous session)" } else { "" }
        );
        Ok(())
    }

    pub async fn chat(&self, session_id: &str, message: &str) -> AppResult<String> {
        let session = self
            .sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Teaching session '{}' not found. Generate a syllabus first.",
                    session_id
                ))
            })?;

        let mut session = session.lock().await;
        session.last_active = Instant::now();
        let reply = session
            .agent
            .step(format!("{}{}", message, prompts::END_OF_TURN))
            .await?;

        Ok(strip_end_of_turn(&reply))
    }

    /// Returns whether a session was removed.
    pub async fn end(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    /// Drops sessions idle for at least `max_idle`. Sessions mid-step are kept.
    /// Returns how many were removed.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => session.idle_for() < max_idle,
            Err(_) => true,
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            log::info!("Evicted {} idle teaching sessions", evicted);
        }
        evicted
    }

    pub async fn session(&self, session_id: &str) -> Option<Arc<Mutex<TeachingSession>>> {
        self.sessions.read().await.get(session_id).cloned()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn strip_end_of_turn(reply: &str) -> String {
    reply
        .trim_end()
        .trim_end_matches(prompts::END_OF_TURN)
        .trim_end()
        .to_string()
}
