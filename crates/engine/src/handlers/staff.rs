//! Staff actions: member provisioning and quiz authoring.

use chrono::Utc;
use serde::Deserialize;

use cf_directory::credentials::{hash_password, mint_temp_password};
use cf_directory::Quiz;
use cf_domain::error::Result;
use cf_domain::principal::{Principal, Role};

use crate::context::Services;
use crate::handlers::{parse_payload, require_group, require_org};
use crate::registry::{ActionHandler, ActionRequest};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// add_member
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Deserialize)]
struct AddMemberPayload {
    name: String,
    email: String,
}

/// Enroll a member into the staff member's own group.
pub struct AddMember;

#[async_trait::async_trait]
impl ActionHandler for AddMember {
    async fn run(&self, services: &Services, req: ActionRequest<'_>) -> Result<String> {
        let org_id = require_org(req.authz)?;
        let group_id = require_group(req.authz)?;
        let payload: AddMemberPayload = parse_payload(req.payload)?;

        let temp_password = mint_temp_password();
        let id = uuid::Uuid::new_v4().to_string();
        services.directory.insert_principal(Principal {
            id: id.clone(),
            name: payload.name.clone(),
            email: payload.email,
            password_hash: hash_password(&temp_password),
            role: Role::Member,
            active: true,
            org_id: Some(org_id.to_string()),
            group_id: Some(group_id.to_string()),
            created_at: Utc::now(),
        })?;

        Ok(format!(
            "Member '{}' enrolled in group {group_id} (id {id}). Temporary password: {temp_password}",
            payload.name
        ))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// list_members
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct ListMembers;

#[async_trait::async_trait]
impl ActionHandler for ListMembers {
    async fn run(&self, services: &Services, req: ActionRequest<'_>) -> Result<String> {
        let org_id = require_org(req.authz)?;
        let group_id = require_group(req.authz)?;
        let members = services.directory.members_in_group(org_id, group_id);
        if members.is_empty() {
            return Ok(format!("No members in group {group_id}."));
        }
        let lines: Vec<String> = members
            .iter()
            .map(|p| format!("- {} <{}> (id {})", p.name, p.email, p.id))
            .collect();
        Ok(format!("Members of group {group_id}:\n{}", lines.join("\n")))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// generate_quiz
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Deserialize)]
struct GenerateQuizPayload {
    topic: String,
    /// Source text the questions are drawn from.
    source_text: String,
    #[serde(default)]
    num_mcq: usize,
    #[serde(default)]
    num_short: usize,
    #[serde(default)]
    num_long: usize,
}

/// Generate a structured quiz from source text and persist it, unpublished,
/// scoped to the author's org and group.
pub struct GenerateQuiz;

#[async_trait::async_trait]
impl ActionHandler for GenerateQuiz {
    async fn run(&self, services: &Services, req: ActionRequest<'_>) -> Result<String> {
        let org_id = require_org(req.authz)?;
        let group_id = require_group(req.authz)?;
        let payload: GenerateQuizPayload = parse_payload(req.payload)?;

        let questions = services
            .ai
            .generate_quiz(
                &payload.source_text,
                &payload.topic,
                payload.num_mcq,
                payload.num_short,
                payload.num_long,
            )
            .await?;

        let quiz = Quiz {
            id: uuid::Uuid::new_v4().to_string(),
            org_id: org_id.to_string(),
            group_id: group_id.to_string(),
            author_id: req.identity.to_string(),
            topic: payload.topic.clone(),
            questions,
            published: false,
            created_at: Utc::now(),
        };
        let count = quiz.questions.question_count();
        let id = quiz.id.clone();
        services.directory.insert_quiz(quiz);

        Ok(format!(
            "Quiz generated on '{}' with {count} questions (id {id}). Publish it to make it visible.",
            payload.topic
        ))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// publish_quiz
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Deserialize)]
struct PublishQuizPayload {
    quiz_id: String,
}

pub struct PublishQuiz;

#[async_trait::async_trait]
impl ActionHandler for PublishQuiz {
    async fn run(&self, services: &Services, req: ActionRequest<'_>) -> Result<String> {
        let payload: PublishQuizPayload = parse_payload(req.payload)?;
        match services
            .directory
            .publish_quiz(&payload.quiz_id, req.identity)
        {
            Some(quiz) => Ok(format!(
                "Quiz '{}' is now visible to group {}.",
                quiz.topic, quiz.group_id
            )),
            None => Ok(format!("Quiz '{}' not found.", payload.quiz_id)),
        }
    }
}
