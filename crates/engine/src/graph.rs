//! The workflow graph: node kinds and the production wiring.
//!
//! Each node takes the session state by value and returns a new state
//! plus a single deterministic transition. Halting is an explicit
//! transition, not a missing edge.

use std::sync::Arc;

use cf_domain::principal::Role;
use cf_sessions::SessionState;

use crate::context::Services;
use crate::executor::{HaltPoint, TurnInput};
use crate::registry::{ActionKind, ActionRegistry, ActionRequest};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Nodes and transitions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Entry,
    Login,
    Menu(Role),
    Action(ActionKind),
    Exit,
}

/// What a node evaluation decided.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Continue the traversal at another node.
    Goto(Node),
    /// Stop and return control to the caller pending new input.
    Halt(HaltPoint),
    /// Terminal: the session ended (logout).
    End,
    /// The graph found itself somewhere no edge accounts for.
    Abort(String),
}

/// A directed graph the step executor can traverse.
///
/// The production graph is [`CampusGraph`]; tests drive the executor
/// against deliberately mis-wired implementations.
#[async_trait::async_trait]
pub trait WorkflowGraph: Send + Sync {
    /// Where a traversal starts for the given persisted state.
    fn resume_node(&self, state: &SessionState) -> Node;

    /// Evaluate one node, producing the next state and its transition.
    async fn evaluate(
        &self,
        node: Node,
        state: SessionState,
        input: &TurnInput,
    ) -> (SessionState, Transition);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Production graph
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct CampusGraph {
    services: Arc<Services>,
    registry: ActionRegistry,
}

impl CampusGraph {
    pub fn new(services: Arc<Services>, registry: ActionRegistry) -> Self {
        Self { services, registry }
    }

    fn eval_entry(&self, state: SessionState) -> (SessionState, Transition) {
        let next = if state.is_authenticated() {
            Node::Menu(state.role)
        } else {
            Node::Login
        };
        (state, Transition::Goto(next))
    }

    fn eval_login(&self, state: SessionState, input: &TurnInput) -> (SessionState, Transition) {
        let Some(creds) = &input.credentials else {
            let state = state.with_message("Please log in with your email and password.");
            return (state, Transition::Halt(HaltPoint::Login));
        };

        let Some(principal) = self.services.verifier.verify(&creds.identity, &creds.secret)
        else {
            tracing::info!(session_id = %state.session_id, "login failed");
            let state = state
                .logged_out()
                .with_message("Invalid credentials. Please try again.");
            return (state, Transition::Halt(HaltPoint::Login));
        };

        match self.services.resolver.resolve(&principal) {
            Ok((role, authz)) => {
                tracing::info!(
                    session_id = %state.session_id,
                    principal = %principal.id,
                    %role,
                    "login succeeded"
                );
                let state = state
                    .with_login(principal.id, role, authz)
                    .with_message(format!("Welcome, {}.", principal.name));
                (state, Transition::Goto(Node::Menu(role)))
            }
            Err(e) => {
                // Same generic message as a bad secret; the details go to
                // the log, not the caller.
                tracing::warn!(session_id = %state.session_id, error = %e, "context resolution failed");
                let state = state
                    .logged_out()
                    .with_message("Invalid credentials. Please try again.");
                (state, Transition::Halt(HaltPoint::Login))
            }
        }
    }

    fn eval_menu(&self, role: Role, state: SessionState) -> (SessionState, Transition) {
        if state.role != role {
            return (
                state,
                Transition::Abort(format!("menu for {role} reached with session role mismatch")),
            );
        }

        let Some(requested) = state.pending_action.clone() else {
            let menu = self.registry.menu(role);
            return (
                state.with_message(menu),
                Transition::Halt(HaltPoint::Menu(role)),
            );
        };

        if requested == "logout" {
            return (state.without_pending_action(), Transition::Goto(Node::Exit));
        }

        match self.registry.lookup(role, &requested) {
            Some(kind) => (
                state.without_pending_action(),
                Transition::Goto(Node::Action(kind)),
            ),
            None => {
                tracing::info!(
                    session_id = %state.session_id,
                    %role,
                    action = %requested,
                    "unauthorized or unknown action"
                );
                let message = format!(
                    "That action is not available. {}",
                    self.registry.menu(role)
                );
                (
                    state.without_pending_action().with_message(message),
                    Transition::Halt(HaltPoint::Menu(role)),
                )
            }
        }
    }

    async fn eval_action(
        &self,
        kind: ActionKind,
        state: SessionState,
    ) -> (SessionState, Transition) {
        let Some(handler) = self.registry.handler(kind) else {
            // Unreachable with a validated registry.
            return (
                state,
                Transition::Abort(format!("no handler for {}", kind.wire_name())),
            );
        };
        let Some(identity) = state.identity.clone() else {
            return (
                state,
                Transition::Abort(format!(
                    "action {} reached without an identity",
                    kind.wire_name()
                )),
            );
        };

        let request = ActionRequest {
            identity: &identity,
            authz: &state.authz,
            payload: &state.input_payload,
        };
        let message = match handler.run(&self.services, request).await {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(
                    session_id = %state.session_id,
                    action = kind.wire_name(),
                    error = %e,
                    "action handler failed"
                );
                "The action could not be completed. Please try again.".to_string()
            }
        };

        let mut state = state.with_message(message);
        state.input_payload = serde_json::Value::Null;
        let role = state.role;
        (state, Transition::Goto(Node::Menu(role)))
    }

    fn eval_exit(&self, state: SessionState) -> (SessionState, Transition) {
        tracing::info!(session_id = %state.session_id, "logout");
        let state = state.logged_out().with_message("You have been logged out.");
        (state, Transition::End)
    }
}

#[async_trait::async_trait]
impl WorkflowGraph for CampusGraph {
    fn resume_node(&self, state: &SessionState) -> Node {
        // An authenticated session never restarts from Entry: it resumes
        // at the menu its persisted role implies.
        if state.is_authenticated() {
            Node::Menu(state.role)
        } else {
            Node::Entry
        }
    }

    async fn evaluate(
        &self,
        node: Node,
        state: SessionState,
        input: &TurnInput,
    ) -> (SessionState, Transition) {
        match node {
            Node::Entry => self.eval_entry(state),
            Node::Login => self.eval_login(state, input),
            Node::Menu(role) => self.eval_menu(role, state),
            Node::Action(kind) => self.eval_action(kind, state).await,
            Node::Exit => self.eval_exit(state),
        }
    }
}
