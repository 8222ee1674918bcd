#[cfg(test)]
pub mod fixtures {
    use std::{collections::VecDeque, sync::Mutex};

    use async_trait::async_trait;

    use crate::{
        errors::{AppError, AppResult},
        models::domain::{Message, QuizQuestion},
        services::model_service::ChatModel,
    };

    type Responder = Box<dyn Fn(&[Message]) -> AppResult<String> + Send + Sync>;

    /// Chat model that answers from a fixed script and records every request.
    pub struct ScriptedChatModel {
        replies: Mutex<VecDeque<String>>,
        responder: Option<Responder>,
        calls: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedChatModel {
        pub fn new<I, S>(replies: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
                responder: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Answers every request by calling `responder` with the full history.
        pub fn responding_with<F>(responder: F) -> Self
        where
            F: Fn(&[Message]) -> AppResult<String> + Send + Sync + 'static,
        {
            Self {
                replies: Mutex::new(VecDeque::new()),
                responder: Some(Box::new(responder)),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<Vec<Message>> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedChatModel {
        async fn complete(&self, messages: &[Message]) -> AppResult<String> {
            self.calls.lock().unwrap().push(messages.to_vec());

            if let Some(responder) = &self.responder {
                return responder(messages);
            }

            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| AppError::Upstream("scripted model ran out of replies".to_string()))
        }
    }

    pub fn sample_question(correct_answer: u8) -> QuizQuestion {
        QuizQuestion {
            question: "What is 2+2?".to_string(),
            choices: vec!["3".into(), "4".into(), "5".into(), "6".into()],
            correct_answer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::{models::domain::Message, services::model_service::ChatModel};

    #[tokio::test]
    async fn test_scripted_model_replays_in_order() {
        let model = ScriptedChatModel::new(["one", "two"]);

        assert_eq!(model.complete(&[Message::user("a")]).await.unwrap(), "one");
        assert_eq!(model.complete(&[Message::user("b")]).await.unwrap(), "two");
        assert!(model.complete(&[Message::user("c")]).await.is_err());
        assert_eq!(model.call_count(), 3);
    }

    #[test]
    fn test_sample_question_fixture() {
        let question = sample_question(2);
        assert_eq!(question.choices.len(), 4);
        assert_eq!(question.correct_answer, 2);
    }
}
