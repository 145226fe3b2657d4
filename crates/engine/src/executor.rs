//! The step executor — drives one graph traversal per external input.

use std::sync::Arc;

use serde_json::Value;

use cf_sessions::SessionState;

use crate::graph::{Transition, WorkflowGraph};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Turn input
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A submitted identity+secret pair. Lives only for one turn — it is
/// never persisted with the session snapshot.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub identity: String,
    pub secret: String,
}

/// Everything one external invocation supplies.
#[derive(Debug, Clone, Default)]
pub struct TurnInput {
    pub credentials: Option<Credentials>,
    pub action: Option<String>,
    pub payload: Option<Value>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Outcome
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where a traversal stopped to await the next input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltPoint {
    /// Login needs (new) credentials.
    Login,
    /// A role's menu awaits an action.
    Menu(cf_domain::principal::Role),
}

impl HaltPoint {
    /// Wire form: `"login"` or `"<role>_menu"`.
    pub fn wire_name(&self) -> String {
        match self {
            HaltPoint::Login => "login".into(),
            HaltPoint::Menu(role) => format!("{}_menu", role.as_str()),
        }
    }
}

/// The tagged result of one traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraversalOutcome {
    /// Stopped at a halt point; resume from there on the next input.
    Halted(HaltPoint),
    /// Reached exit; the session is logged out.
    Terminated,
    /// Graph-integrity fault (step ceiling tripped, or a node failed in
    /// a way no edge accounts for). Fatal for the request.
    Aborted(String),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Executor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Drives the graph: one call to [`StepExecutor::run_turn`] per external
/// input, bounded by the configured step ceiling.
pub struct StepExecutor {
    graph: Arc<dyn WorkflowGraph>,
    max_steps: u32,
}

impl StepExecutor {
    pub fn new(graph: Arc<dyn WorkflowGraph>, max_steps: u32) -> Self {
        Self { graph, max_steps }
    }

    /// Run one traversal: merge the turn's input into the persisted
    /// state, resume at the node implied by that state, and follow
    /// single deterministic transitions until a halt point, exit, or
    /// the step ceiling.
    ///
    /// The returned state is what the caller should persist — also for
    /// `Aborted`, where it carries however far the traversal got.
    pub async fn run_turn(
        &self,
        state: SessionState,
        input: TurnInput,
    ) -> (SessionState, TraversalOutcome) {
        let mut state = state;
        state.pending_action = input
            .action
            .as_deref()
            .map(|a| a.trim().to_ascii_lowercase());
        state.input_payload = input.payload.clone().unwrap_or(Value::Null);
        // The ceiling bounds one traversal. A persisted count from an
        // aborted turn must not carry into this one.
        state.step_count = 0;

        let mut node = self.graph.resume_node(&state);
        tracing::debug!(
            session_id = %state.session_id,
            role = %state.role,
            ?node,
            "traversal started"
        );

        loop {
            state.step_count += 1;
            if state.step_count > self.max_steps {
                tracing::error!(
                    session_id = %state.session_id,
                    steps = state.step_count,
                    ceiling = self.max_steps,
                    ?node,
                    "step ceiling exceeded; graph is mis-wired"
                );
                return (
                    state,
                    TraversalOutcome::Aborted(format!(
                        "step ceiling of {} exceeded at node {node:?}",
                        self.max_steps
                    )),
                );
            }

            let (next_state, transition) = self.graph.evaluate(node, state, &input).await;
            state = next_state;

            match transition {
                Transition::Goto(next) => {
                    node = next;
                }
                Transition::Halt(at) => {
                    tracing::debug!(
                        session_id = %state.session_id,
                        halted_at = %at.wire_name(),
                        steps = state.step_count,
                        "traversal halted"
                    );
                    return (state.halted(), TraversalOutcome::Halted(at));
                }
                Transition::End => {
                    tracing::debug!(
                        session_id = %state.session_id,
                        steps = state.step_count,
                        "traversal terminated"
                    );
                    return (state.halted(), TraversalOutcome::Terminated);
                }
                Transition::Abort(reason) => {
                    tracing::error!(
                        session_id = %state.session_id,
                        %reason,
                        ?node,
                        "traversal aborted"
                    );
                    return (state, TraversalOutcome::Aborted(reason));
                }
            }
        }
    }
}
