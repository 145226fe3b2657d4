use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cf_domain::quiz::{QuizAnswer, QuizContent};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Org
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An organization under the institution (a college, a campus, …).
///
/// Removal is a soft delete; deactivating an org also deactivates every
/// principal scoped to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Org {
    pub id: String,
    pub name: String,
    pub contact_email: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Quiz
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A generated quiz, scoped to the authoring staff member's org and group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub org_id: String,
    pub group_id: String,
    pub author_id: String,
    pub topic: String,
    /// Questions plus answer key.
    pub questions: QuizContent,
    /// Only published quizzes are visible to members.
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Submission
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A member's graded answers to one quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub quiz_id: String,
    pub member_id: String,
    pub answers: Vec<QuizAnswer>,
    /// Free-text report from the grading model.
    pub grade_report: String,
    pub submitted_at: DateTime<Utc>,
}
