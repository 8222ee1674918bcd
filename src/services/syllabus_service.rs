use std::sync::Arc;

use crate::{
    config::SyllabusStrategy,
    constants::prompts,
    errors::AppResult,
    models::domain::{Message, Speaker, SyllabusTranscript},
    services::{
        conversation_agent::ConversationAgent, model_service::ChatModel,
        prompt_template::PromptTemplate,
    },
};

/// Maximum learner/instructor exchanges before the transcript is summarized.
pub const CHAT_TURN_LIMIT: usize = 5;

const TASK_SPECIFIER: PromptTemplate = PromptTemplate::new(
    prompts::TASK_SPECIFIER_PROMPT,
    &["assistant_role_name", "user_role_name", "task", "word_limit"],
);
const ASSISTANT_INCEPTION: PromptTemplate = PromptTemplate::new(
    prompts::ASSISTANT_INCEPTION_PROMPT,
    &["assistant_role_name", "user_role_name", "task"],
);
const USER_INCEPTION: PromptTemplate = PromptTemplate::new(
    prompts::USER_INCEPTION_PROMPT,
    &["assistant_role_name", "user_role_name", "task"],
);
const SUMMARIZER_SYSTEM: PromptTemplate =
    PromptTemplate::new(prompts::SUMMARIZER_SYSTEM_PROMPT, &["topic"]);
const SUMMARIZER: PromptTemplate =
    PromptTemplate::new(prompts::SUMMARIZER_PROMPT, &["conversation_history"]);
const SINGLE_CALL_SYLLABUS: PromptTemplate =
    PromptTemplate::new(prompts::SINGLE_CALL_SYLLABUS_PROMPT, &["topic"]);

/// Outcome of the instructor/learner exchange, before summarization.
#[derive(Debug)]
pub struct Negotiation {
    pub specified_task: String,
    pub transcript: SyllabusTranscript,
    /// Whether the learner signalled completion before the turn limit.
    pub finished_early: bool,
}

pub struct SyllabusService {
    model: Arc<dyn ChatModel>,
    strategy: SyllabusStrategy,
}

impl SyllabusService {
    pub fn new(model: Arc<dyn ChatModel>, strategy: SyllabusStrategy) -> Self {
        Self { model, strategy }
    }

    pub fn strategy(&self) -> SyllabusStrategy {
        self.strategy
    }

    pub fn default_task(topic: &str) -> String {
        format!("Generate a course syllabus to teach the topic: {}", topic)
    }

    pub async fn generate_syllabus(&self, topic: &str, task: &str) -> AppResult<String> {
        log::info!(
            "Generating syllabus for topic '{}' using {:?} strategy",
            topic,
            self.strategy
        );

        match self.strategy {
            SyllabusStrategy::Negotiated => {
                let negotiation = self.negotiate(task).await?;
                self.summarize(topic, &negotiation.transcript).await
            }
            SyllabusStrategy::SingleCall => self.generate_single_call(topic).await,
        }
    }

    /// Narrows a free-form task down to a short, concrete one.
    pub async fn specify_task(&self, task: &str) -> AppResult<String> {
        let word_limit = prompts::TASK_WORD_LIMIT.to_string();
        let prompt = TASK_SPECIFIER.render(&[
            ("assistant_role_name", prompts::ASSISTANT_ROLE_NAME),
            ("user_role_name", prompts::USER_ROLE_NAME),
            ("task", task),
            ("word_limit", word_limit.as_str()),
        ])?;

        let mut specifier =
            ConversationAgent::new(prompts::TASK_SPECIFIER_SYSTEM_PROMPT, self.model.clone());
        specifier.step(prompt).await
    }

    /// Runs the learner/instructor exchange for at most [`CHAT_TURN_LIMIT`] turns.
    ///
    /// The learner speaks first. As soon as a learner reply contains the
    /// completion sentinel the loop stops without asking the instructor again.
    pub async fn negotiate(&self, task: &str) -> AppResult<Negotiation> {
        let specified_task = self.specify_task(task).await?;
        log::debug!("Specified task: {}", specified_task);

        let roles = [
            ("assistant_role_name", prompts::ASSISTANT_ROLE_NAME),
            ("user_role_name", prompts::USER_ROLE_NAME),
            ("task", specified_task.as_str()),
        ];
        let instructor_system = ASSISTANT_INCEPTION.render(&roles)?;
        let learner_system = USER_INCEPTION.render(&roles)?;

        let mut instructor = ConversationAgent::new(instructor_system, self.model.clone());
        let mut learner = ConversationAgent::new(learner_system.clone(), self.model.clone());

        let mut instructor_message = format!("{}. Start instructions.", learner_system);
        let mut transcript = SyllabusTranscript::new();
        let mut finished_early = false;

        for turn in 1..=CHAT_TURN_LIMIT {
            let learner_message = learner.step(instructor_message).await?;
            log::debug!("Turn {} learner: {}", turn, learner_message);
            transcript.push(Speaker::Learner, learner_message.as_str());

            if learner_message.contains(prompts::TASK_DONE_SENTINEL) {
                log::info!("Learner finished the syllabus task after {} turns", turn);
                finished_early = true;
                break;
            }

            instructor_message = instructor.step(learner_message).await?;
            log::debug!("Turn {} instructor: {}", turn, instructor_message);
            transcript.push(Speaker::Instructor, instructor_message.as_str());
        }

        Ok(Negotiation {
            specified_task,
            transcript,
            finished_early,
        })
    }

    pub async fn summarize(&self, topic: &str, transcript: &SyllabusTranscript) -> AppResult<String> {
        let system = SUMMARIZER_SYSTEM.render(&[("topic", topic)])?;
        let conversation_history = transcript.render();
        let prompt = SUMMARIZER.render(&[("conversation_history", conversation_history.as_str())])?;

        let mut summarizer = ConversationAgent::new(system, self.model.clone());
        summarizer.step(prompt).await
    }

    async fn generate_single_call(&self, topic: &str) -> AppResult<String> {
        let prompt = SINGLE_CALL_SYLLABUS.render(&[("topic", topic)])?;
        self.model.complete(&[Message::user(prompt)]).await
    }
}
