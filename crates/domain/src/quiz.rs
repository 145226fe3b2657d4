use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Structured quiz content
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A multiple-choice question with its answer key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct McqQuestion {
    pub question_text: String,
    /// Exactly four options.
    pub options: Vec<String>,
    /// 0-based index of the correct option.
    pub correct_answer_index: usize,
}

/// A short- or long-answer question with an ideal answer for grading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WrittenQuestion {
    pub question_text: String,
    pub ideal_answer: String,
}

/// The structured quiz produced by the language model.
///
/// This is the answer key as well as the question set; what members see
/// is a projection with the keys stripped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct QuizContent {
    #[serde(default)]
    pub mcqs: Vec<McqQuestion>,
    #[serde(default)]
    pub short_answers: Vec<WrittenQuestion>,
    #[serde(default)]
    pub long_answers: Vec<WrittenQuestion>,
}

impl QuizContent {
    pub fn question_count(&self) -> usize {
        self.mcqs.len() + self.short_answers.len() + self.long_answers.len()
    }
}

/// A member's answer to one question, numbered in quiz order
/// (mcqs first, then short, then long).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizAnswer {
    pub number: usize,
    pub answer: String,
}
