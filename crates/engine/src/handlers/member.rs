//! Member actions: quizzes and document Q&A.

use chrono::Utc;
use serde::Deserialize;

use cf_directory::Submission;
use cf_domain::error::Result;
use cf_domain::quiz::QuizAnswer;

use crate::context::Services;
use crate::handlers::{parse_payload, require_group, require_org};
use crate::registry::{ActionHandler, ActionRequest};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// list_quizzes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct ListQuizzes;

#[async_trait::async_trait]
impl ActionHandler for ListQuizzes {
    async fn run(&self, services: &Services, req: ActionRequest<'_>) -> Result<String> {
        let org_id = require_org(req.authz)?;
        let group_id = require_group(req.authz)?;
        let quizzes = services.directory.published_quizzes(org_id, group_id);
        if quizzes.is_empty() {
            return Ok("No quizzes published for your group.".into());
        }
        // Listing carries topics and counts only — never the answer key.
        let lines: Vec<String> = quizzes
            .iter()
            .map(|q| {
                format!(
                    "- '{}' with {} questions (id {})",
                    q.topic,
                    q.questions.question_count(),
                    q.id
                )
            })
            .collect();
        Ok(format!("Published quizzes:\n{}", lines.join("\n")))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// submit_quiz
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Deserialize)]
struct SubmitQuizPayload {
    quiz_id: String,
    answers: Vec<QuizAnswer>,
}

/// Grade the member's answers against the stored key and persist the
/// submission with its grade report.
pub struct SubmitQuiz;

#[async_trait::async_trait]
impl ActionHandler for SubmitQuiz {
    async fn run(&self, services: &Services, req: ActionRequest<'_>) -> Result<String> {
        let org_id = require_org(req.authz)?;
        let group_id = require_group(req.authz)?;
        let payload: SubmitQuizPayload = parse_payload(req.payload)?;

        // Out-of-scope or unpublished quizzes read as unknown ids.
        let quiz = services
            .directory
            .get_quiz(&payload.quiz_id)
            .filter(|q| q.published && q.org_id == org_id && q.group_id == group_id);
        let Some(quiz) = quiz else {
            return Ok(format!("Quiz '{}' not found.", payload.quiz_id));
        };

        let grade_report = services
            .ai
            .grade_submission(&quiz.questions, &payload.answers)
            .await?;

        services.directory.insert_submission(Submission {
            id: uuid::Uuid::new_v4().to_string(),
            quiz_id: quiz.id.clone(),
            member_id: req.identity.to_string(),
            answers: payload.answers,
            grade_report: grade_report.clone(),
            submitted_at: Utc::now(),
        });

        Ok(format!("Submission graded.\n{grade_report}"))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ask_document
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Deserialize)]
struct AskDocumentPayload {
    material_id: String,
    query: String,
}

/// Retrieval-augmented answer against an indexed course material.
pub struct AskDocument;

#[async_trait::async_trait]
impl ActionHandler for AskDocument {
    async fn run(&self, services: &Services, req: ActionRequest<'_>) -> Result<String> {
        let payload: AskDocumentPayload = parse_payload(req.payload)?;
        let answer = services
            .ai
            .answer_document_query(&payload.material_id, &payload.query)
            .await?;
        Ok(answer)
    }
}
