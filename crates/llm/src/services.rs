//! The three service contracts the workflow engine consumes.
//!
//! Each call builds a prompt, sends it through the provider, and maps
//! the reply into a typed value. Prompt wording is deliberately boring;
//! quality of the generated content is the model's problem, not ours.

use std::sync::Arc;

use cf_domain::error::{Error, Result};
use cf_domain::quiz::{QuizAnswer, QuizContent};

use crate::traits::{ChatRequest, LlmProvider};

pub struct AiServices {
    provider: Arc<dyn LlmProvider>,
}

impl AiServices {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Generate a structured quiz (questions plus answer key) from source
    /// text. The model replies in JSON mode; the reply is parsed into
    /// [`QuizContent`] and a count mismatch is logged but tolerated.
    pub async fn generate_quiz(
        &self,
        source_text: &str,
        topic: &str,
        num_mcq: usize,
        num_short: usize,
        num_long: usize,
    ) -> Result<QuizContent> {
        let user = format!(
            "Based on the following content about \"{topic}\", generate a quiz with exactly:\n\
             - {num_mcq} multiple choice questions\n\
             - {num_short} short answer questions\n\
             - {num_long} long answer questions\n\n\
             Reply with a single JSON object of the shape:\n\
             {{\"mcqs\": [{{\"question_text\": str, \"options\": [str; 4], \"correct_answer_index\": int}}],\n\
              \"short_answers\": [{{\"question_text\": str, \"ideal_answer\": str}}],\n\
              \"long_answers\": [{{\"question_text\": str, \"ideal_answer\": str}}]}}\n\n\
             Content:\n{source_text}"
        );

        let resp = self
            .provider
            .chat(ChatRequest {
                system: Some("You write course quizzes as strict JSON.".into()),
                user,
                json_mode: true,
                ..Default::default()
            })
            .await?;

        let quiz: QuizContent = serde_json::from_str(resp.content.trim()).map_err(|e| {
            Error::Provider {
                provider: self.provider.provider_id().into(),
                message: format!("quiz reply was not valid quiz JSON: {e}"),
            }
        })?;

        let expected = num_mcq + num_short + num_long;
        if quiz.question_count() != expected {
            tracing::warn!(
                expected,
                got = quiz.question_count(),
                "model returned a different question count than requested"
            );
        }
        Ok(quiz)
    }

    /// Grade a member's answers against the stored key. Returns the
    /// model's free-text grade report (total score plus feedback).
    pub async fn grade_submission(
        &self,
        quiz: &QuizContent,
        answers: &[QuizAnswer],
    ) -> Result<String> {
        let mut submission = String::new();
        let mut number = 0usize;

        for q in &quiz.mcqs {
            number += 1;
            let key = q
                .options
                .get(q.correct_answer_index)
                .map(String::as_str)
                .unwrap_or("(missing option)");
            push_graded_line(&mut submission, number, "mcq", &q.question_text, key, answers);
        }
        for q in &quiz.short_answers {
            number += 1;
            push_graded_line(
                &mut submission,
                number,
                "short",
                &q.question_text,
                &q.ideal_answer,
                answers,
            );
        }
        for q in &quiz.long_answers {
            number += 1;
            push_graded_line(
                &mut submission,
                number,
                "long",
                &q.question_text,
                &q.ideal_answer,
                answers,
            );
        }

        let user = format!(
            "Grade the student's submission below. Score each question out of 10, \
             then give a total score and brief overall feedback.\n\n\
             Format the output STRICTLY as:\n\
             Total Score: <total> / <maximum>\n\n\
             Overall Feedback: <brief feedback>\n\n---\n\n{submission}"
        );

        let resp = self
            .provider
            .chat(ChatRequest {
                system: Some("You are a fair, concise teaching assistant.".into()),
                user,
                ..Default::default()
            })
            .await?;
        Ok(resp.content)
    }

    /// Answer a query against an indexed document. Retrieval itself lives
    /// behind the provider endpoint (a RAG-serving deployment); from the
    /// engine's point of view this is one opaque call keyed by material id.
    pub async fn answer_document_query(&self, material_id: &str, query: &str) -> Result<String> {
        let resp = self
            .provider
            .chat(ChatRequest {
                system: Some(
                    "Answer strictly from the referenced course material. \
                     Say so when the material does not cover the question."
                        .into(),
                ),
                user: format!("[material:{material_id}] {query}"),
                ..Default::default()
            })
            .await?;
        Ok(resp.content)
    }
}

fn push_graded_line(
    out: &mut String,
    number: usize,
    kind: &str,
    question: &str,
    key: &str,
    answers: &[QuizAnswer],
) {
    let given = answers
        .iter()
        .find(|a| a.number == number)
        .map(|a| a.answer.as_str())
        .unwrap_or("Not Answered");
    out.push_str(&format!(
        "Question {number} ({kind}): {question}\nCorrect Answer: {key}\nStudent's Answer: {given}\n\n"
    ));
}
