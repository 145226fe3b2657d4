//! The closed per-role action registry.
//!
//! Every action a menu can dispatch is an [`ActionKind`] variant owned by
//! exactly one role. The registry maps kinds to handler objects and is
//! validated at construction: a missing or duplicate handler fails the
//! build, so an unknown action name can only ever be rejected at the
//! menu, never discovered at dispatch time.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use cf_domain::error::{Error, Result};
use cf_domain::principal::{AuthzContext, Role};

use crate::context::Services;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ActionKind
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Every dispatchable action, across all roles. `logout` is routing,
/// not an action, and deliberately has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    // Tier1 admin
    AddOrg,
    ListOrgs,
    RemoveOrg,
    // Org admin
    AddStaff,
    ListStaff,
    RemoveStaff,
    // Staff
    AddMember,
    ListMembers,
    GenerateQuiz,
    PublishQuiz,
    // Member
    ListQuizzes,
    SubmitQuiz,
    AskDocument,
}

impl ActionKind {
    pub const ALL: [ActionKind; 13] = [
        ActionKind::AddOrg,
        ActionKind::ListOrgs,
        ActionKind::RemoveOrg,
        ActionKind::AddStaff,
        ActionKind::ListStaff,
        ActionKind::RemoveStaff,
        ActionKind::AddMember,
        ActionKind::ListMembers,
        ActionKind::GenerateQuiz,
        ActionKind::PublishQuiz,
        ActionKind::ListQuizzes,
        ActionKind::SubmitQuiz,
        ActionKind::AskDocument,
    ];

    pub fn wire_name(&self) -> &'static str {
        match self {
            ActionKind::AddOrg => "add_org",
            ActionKind::ListOrgs => "list_orgs",
            ActionKind::RemoveOrg => "remove_org",
            ActionKind::AddStaff => "add_staff",
            ActionKind::ListStaff => "list_staff",
            ActionKind::RemoveStaff => "remove_staff",
            ActionKind::AddMember => "add_member",
            ActionKind::ListMembers => "list_members",
            ActionKind::GenerateQuiz => "generate_quiz",
            ActionKind::PublishQuiz => "publish_quiz",
            ActionKind::ListQuizzes => "list_quizzes",
            ActionKind::SubmitQuiz => "submit_quiz",
            ActionKind::AskDocument => "ask_document",
        }
    }

    pub fn parse(name: &str) -> Option<ActionKind> {
        ActionKind::ALL
            .into_iter()
            .find(|k| k.wire_name() == name)
    }

    /// The single role permitted to dispatch this action.
    pub fn role(&self) -> Role {
        match self {
            ActionKind::AddOrg | ActionKind::ListOrgs | ActionKind::RemoveOrg => Role::Tier1Admin,
            ActionKind::AddStaff | ActionKind::ListStaff | ActionKind::RemoveStaff => {
                Role::OrgAdmin
            }
            ActionKind::AddMember
            | ActionKind::ListMembers
            | ActionKind::GenerateQuiz
            | ActionKind::PublishQuiz => Role::Staff,
            ActionKind::ListQuizzes | ActionKind::SubmitQuiz | ActionKind::AskDocument => {
                Role::Member
            }
        }
    }
}

/// Actions permitted for one role, in menu order.
pub fn permitted_actions(role: Role) -> Vec<ActionKind> {
    ActionKind::ALL
        .into_iter()
        .filter(|k| k.role() == role)
        .collect()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Handler trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// What an action handler sees: who is acting, under which scope, and
/// the opaque payload the caller submitted for this turn.
pub struct ActionRequest<'a> {
    pub identity: &'a str,
    pub authz: &'a AuthzContext,
    pub payload: &'a Value,
}

/// One action's behavior. Returns the user-facing outcome message;
/// errors are caught at the Action node and surfaced generically.
#[async_trait::async_trait]
pub trait ActionHandler: Send + Sync {
    async fn run(&self, services: &Services, req: ActionRequest<'_>) -> Result<String>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Registry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The validated kind→handler table.
pub struct ActionRegistry {
    handlers: HashMap<ActionKind, Arc<dyn ActionHandler>>,
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ActionRegistry {
    pub fn builder() -> ActionRegistryBuilder {
        ActionRegistryBuilder {
            handlers: HashMap::new(),
            duplicates: Vec::new(),
        }
    }

    /// Resolve an action name for a role. Names owned by another role are
    /// rejected exactly like unknown ones — cross-role invocation is an
    /// authorization violation, not a routing curiosity.
    pub fn lookup(&self, role: Role, name: &str) -> Option<ActionKind> {
        let kind = ActionKind::parse(name)?;
        (kind.role() == role).then_some(kind)
    }

    pub fn handler(&self, kind: ActionKind) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(&kind).cloned()
    }

    /// The menu line for a role: its permitted actions plus `logout`.
    pub fn menu(&self, role: Role) -> String {
        let mut names: Vec<&str> = permitted_actions(role)
            .iter()
            .map(|k| k.wire_name())
            .collect();
        names.push("logout");
        format!(
            "{} MENU | actions: [{}]",
            role.as_str().to_ascii_uppercase(),
            names.join(", ")
        )
    }
}

pub struct ActionRegistryBuilder {
    handlers: HashMap<ActionKind, Arc<dyn ActionHandler>>,
    duplicates: Vec<ActionKind>,
}

impl ActionRegistryBuilder {
    pub fn register(mut self, kind: ActionKind, handler: Arc<dyn ActionHandler>) -> Self {
        if self.handlers.insert(kind, handler).is_some() {
            self.duplicates.push(kind);
        }
        self
    }

    /// Validate totality: every kind of every role has exactly one
    /// handler. Fails the build otherwise — wiring bugs surface at
    /// startup, not on a user's request.
    pub fn build(self) -> Result<ActionRegistry> {
        if !self.duplicates.is_empty() {
            let names: Vec<&str> = self.duplicates.iter().map(|k| k.wire_name()).collect();
            return Err(Error::Config(format!(
                "duplicate action handlers: {}",
                names.join(", ")
            )));
        }
        let missing: Vec<&str> = ActionKind::ALL
            .into_iter()
            .filter(|k| !self.handlers.contains_key(k))
            .map(|k| k.wire_name())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "actions without handlers: {}",
                missing.join(", ")
            )));
        }
        Ok(ActionRegistry {
            handlers: self.handlers,
        })
    }
}
