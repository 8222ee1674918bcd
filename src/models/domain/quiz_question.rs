use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const CHOICES_PER_QUESTION: usize = 4;

/// A multiple-choice question as returned by the quiz generator.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate, JsonSchema)]
pub struct QuizQuestion {
    #[validate(length(min = 1))]
    pub question: String,
    #[validate(length(equal = 4))]
    pub choices: Vec<String>,
    /// 0-indexed position of the correct entry in `choices`.
    #[validate(range(max = 3))]
    pub correct_answer: u8,
}

impl QuizQuestion {
    pub fn is_correct(&self, answer: u8) -> bool {
        self.correct_answer == answer
    }
}
