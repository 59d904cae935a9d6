// src/models/question.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
}

impl QuestionType {
    /// Number of options a well-formed question of this type carries.
    pub fn option_count(self) -> usize {
        match self {
            QuestionType::MultipleChoice => 4,
            QuestionType::TrueFalse => 2,
        }
    }
}

/// Difficulty is a random label, not derived from the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

/// A generated quiz question. Lives only as long as the session or the
/// result that embeds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub topic_id: String,
    pub chapter_id: String,
    pub subject_id: String,
    pub class_id: String,

    #[serde(rename = "type")]
    pub question_type: QuestionType,

    pub question: String,
    pub options: Vec<String>,

    /// Index into `options`.
    pub correct_answer: usize,

    pub explanation: String,
    pub difficulty: Difficulty,
    pub related_concept: Option<String>,
}

impl Question {
    pub fn is_correct(&self, answer: Option<usize>) -> bool {
        answer == Some(self.correct_answer)
    }
}

/// Question as shown while a test is running (answer key hidden).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub question: String,
    pub options: Vec<String>,
    pub difficulty: Difficulty,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.clone(),
            question_type: q.question_type,
            question: q.question.clone(),
            options: q.options.clone(),
            difficulty: q.difficulty,
        }
    }
}
