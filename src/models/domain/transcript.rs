use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Learner,
    Instructor,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::Learner => write!(f, "learner"),
            Speaker::Instructor => write!(f, "instructor"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TranscriptTurn {
    pub speaker: Speaker,
    pub content: String,
}

/// Speaker-labelled record of a syllabus negotiation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyllabusTranscript {
    turns: Vec<TranscriptTurn>,
}

impl SyllabusTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, speaker: Speaker, content: impl Into<String>) {
        self.turns.push(TranscriptTurn {
            speaker,
            content: content.into(),
        });
    }

    pub fn turns(&self) -> &[TranscriptTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Renders the transcript for the summarizer, one labelled turn per line.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("{}: {}", turn.speaker, turn.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_labels_each_turn_in_order() {
        let mut transcript = SyllabusTranscript::new();
        transcript.push(Speaker::Learner, "Instruction: list the modules");
        transcript.push(Speaker::Instructor, "Solution: module one");

        assert_eq!(transcript.len(), 2);
        assert_eq!(
            transcript.render(),
            "learner: Instruction: list the modules\ninstructor: Solution: module one"
        );
    }
}
