use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::domain::{Message, Role},
    services::model_service::ChatModel,
};

/// A message history bound to one model.
///
/// The history always starts with exactly one system message and then
/// alternates user/assistant; a step that fails leaves it as it was.
pub struct ConversationAgent {
    system_message: Message,
    stored_messages: Vec<Message>,
    model: Arc<dyn ChatModel>,
}

impl ConversationAgent {
    pub fn new(system_prompt: impl Into<String>, model: Arc<dyn ChatModel>) -> Self {
        let system_message = Message::system(system_prompt);
        Self {
            stored_messages: vec![system_message.clone()],
            system_message,
            model,
        }
    }

    pub fn reset(&mut self) -> &[Message] {
        self.stored_messages.clear();
        self.stored_messages.push(self.system_message.clone());
        &self.stored_messages
    }

    pub fn history(&self) -> &[Message] {
        &self.stored_messages
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_message.content
    }

    /// Sends `input` with the full history and records the reply.
    pub async fn step(&mut self, input: impl Into<String>) -> AppResult<String> {
        self.stored_messages.push(Message::user(input));

        match self.model.complete(&self.stored_messages).await {
            Ok(reply) => {
                self.stored_messages.push(Message::assistant(reply.clone()));
                Ok(reply)
            }
            Err(err) => {
                self.stored_messages.pop();
                Err(err)
            }
        }
    }

    /// Number of completed user/assistant exchanges.
    pub fn exchange_count(&self) -> usize {
        self.stored_messages
            .iter()
            .filter(|message| message.role == Role::Assistant)
            .count()
    }
}
