//! End-to-end traversal tests: in-memory stores, mock provider, real
//! graph, real registry. Each `invoke` mimics one external invocation —
//! load the snapshot, run one traversal, persist the result.

use std::sync::Arc;

use serde_json::json;

use cf_directory::credentials::hash_password;
use cf_directory::Directory;
use cf_domain::principal::{Principal, Role};
use cf_engine::handlers::default_registry;
use cf_engine::{
    CampusGraph, Credentials, HaltPoint, Node, Services, StepExecutor, Transition,
    TraversalOutcome, TurnInput, WorkflowGraph,
};
use cf_llm::MockProvider;
use cf_sessions::{SessionState, SessionStore};

struct Harness {
    executor: StepExecutor,
    store: SessionStore,
    directory: Arc<Directory>,
    mock: Arc<MockProvider>,
}

impl Harness {
    fn new() -> Self {
        Self::with_ceiling(100)
    }

    fn with_ceiling(max_steps: u32) -> Self {
        let directory = Arc::new(Directory::in_memory());
        let mock = Arc::new(MockProvider::new());
        let services = Arc::new(Services::new(directory.clone(), mock.clone()));
        let graph = CampusGraph::new(services, default_registry().unwrap());
        Self {
            executor: StepExecutor::new(Arc::new(graph), max_steps),
            store: SessionStore::in_memory(),
            directory,
            mock,
        }
    }

    fn seed(
        &self,
        email: &str,
        secret: &str,
        role: Role,
        org: Option<&str>,
        group: Option<&str>,
    ) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.directory
            .insert_principal(Principal {
                id: id.clone(),
                name: email.split('@').next().unwrap().to_string(),
                email: email.into(),
                password_hash: hash_password(secret),
                role,
                active: true,
                org_id: org.map(Into::into),
                group_id: group.map(Into::into),
                created_at: chrono::Utc::now(),
            })
            .unwrap();
        id
    }

    async fn invoke(&self, session: &str, input: TurnInput) -> (SessionState, TraversalOutcome) {
        let state = self.store.load(session);
        let (state, outcome) = self.executor.run_turn(state, input).await;
        self.store.save(state.clone());
        (state, outcome)
    }

    async fn login(&self, session: &str, email: &str, secret: &str) -> (SessionState, TraversalOutcome) {
        self.invoke(
            session,
            TurnInput {
                credentials: Some(Credentials {
                    identity: email.into(),
                    secret: secret.into(),
                }),
                ..Default::default()
            },
        )
        .await
    }

    async fn act(
        &self,
        session: &str,
        action: &str,
        payload: serde_json::Value,
    ) -> (SessionState, TraversalOutcome) {
        self.invoke(
            session,
            TurnInput {
                credentials: None,
                action: Some(action.into()),
                payload: Some(payload),
            },
        )
        .await
    }
}

fn sample_quiz_json() -> String {
    json!({
        "mcqs": [{
            "question_text": "2+2?",
            "options": ["1", "2", "4", "8"],
            "correct_answer_index": 2
        }],
        "short_answers": [{
            "question_text": "Define entropy.",
            "ideal_answer": "A measure of disorder."
        }],
        "long_answers": []
    })
    .to_string()
}

/// Extract the trailing temp password from a provisioning reply.
fn temp_password(message: &str) -> String {
    message.rsplit(' ').next().unwrap().to_string()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Login / logout
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn login_halts_at_the_role_menu() {
    let h = Harness::new();
    h.seed("root@inst.edu", "rootpw", Role::Tier1Admin, None, None);

    let (state, outcome) = h.login("s1", "root@inst.edu", "rootpw").await;
    assert_eq!(outcome, TraversalOutcome::Halted(HaltPoint::Menu(Role::Tier1Admin)));
    assert_eq!(state.role, Role::Tier1Admin);
    assert!(state.identity.is_some());
    assert!(state.last_message.contains("add_org"));
    assert_eq!(state.step_count, 0, "step count resets on halt");
}

#[tokio::test]
async fn bad_secret_and_unknown_identity_are_indistinguishable() {
    let h = Harness::new();
    h.seed("root@inst.edu", "rootpw", Role::Tier1Admin, None, None);

    let (bad_secret, o1) = h.login("s1", "root@inst.edu", "wrong").await;
    let (unknown, o2) = h.login("s2", "ghost@inst.edu", "wrong").await;

    assert_eq!(o1, TraversalOutcome::Halted(HaltPoint::Login));
    assert_eq!(o2, TraversalOutcome::Halted(HaltPoint::Login));
    assert_eq!(bad_secret.last_message, unknown.last_message);
    assert_eq!(bad_secret.role, Role::Unauthenticated);
}

#[tokio::test]
async fn turn_without_credentials_prompts_for_login() {
    let h = Harness::new();
    let (state, outcome) = h.invoke("s1", TurnInput::default()).await;
    assert_eq!(outcome, TraversalOutcome::Halted(HaltPoint::Login));
    assert!(state.last_message.contains("log in"));
}

#[tokio::test]
async fn logout_terminates_and_clears_context() {
    let h = Harness::new();
    h.seed("root@inst.edu", "rootpw", Role::Tier1Admin, None, None);
    h.login("s1", "root@inst.edu", "rootpw").await;

    let (state, outcome) = h.act("s1", "logout", json!({})).await;
    assert_eq!(outcome, TraversalOutcome::Terminated);
    assert_eq!(state.role, Role::Unauthenticated);
    assert!(state.identity.is_none());
    assert!(state.authz.is_empty());

    // The next input for this session starts unauthenticated.
    let (_, outcome) = h.invoke("s1", TurnInput::default()).await;
    assert_eq!(outcome, TraversalOutcome::Halted(HaltPoint::Login));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Authorization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn cross_role_action_is_rejected_without_state_change() {
    let h = Harness::new();
    h.seed("root@inst.edu", "rootpw", Role::Tier1Admin, None, None);
    let (before, _) = h.login("s1", "root@inst.edu", "rootpw").await;

    // add_staff belongs to org admins, not tier1 admins.
    let (after, outcome) = h
        .act("s1", "add_staff", json!({"name": "X", "email": "x@o.co", "group": "g1"}))
        .await;

    assert_eq!(outcome, TraversalOutcome::Halted(HaltPoint::Menu(Role::Tier1Admin)));
    assert!(after.last_message.contains("not available"));
    assert_eq!(after.role, before.role);
    assert_eq!(after.authz, before.authz);
    assert!(after.pending_action.is_none());
    // The payload never reached a handler.
    assert!(h.directory.find_principal_by_email("x@o.co").is_none());
}

#[tokio::test]
async fn org_scoping_isolates_staff_listings() {
    let h = Harness::new();
    h.seed("admin1@o1.edu", "pw1", Role::OrgAdmin, Some("o1"), None);
    h.seed("admin2@o2.edu", "pw2", Role::OrgAdmin, Some("o2"), None);

    h.login("a1", "admin1@o1.edu", "pw1").await;
    let (state, _) = h
        .act("a1", "add_staff", json!({"name": "Sam", "email": "sam@o1.edu", "group": "g1"}))
        .await;
    assert!(state.last_message.contains("Temporary password"));

    let (listing, _) = h.act("a1", "list_staff", json!({})).await;
    assert!(listing.last_message.contains("sam@o1.edu"));

    // The other org's admin sees none of it.
    h.login("a2", "admin2@o2.edu", "pw2").await;
    let (listing, _) = h.act("a2", "list_staff", json!({})).await;
    assert!(!listing.last_message.contains("sam@o1.edu"));
    assert!(listing.last_message.contains("No staff"));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Dispatch semantics
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn same_action_twice_executes_the_handler_exactly_twice() {
    let h = Harness::new();
    h.seed("mia@o1.edu", "pw", Role::Member, Some("o1"), Some("g1"));
    h.login("m1", "mia@o1.edu", "pw").await;

    let payload = json!({"material_id": "doc-1", "query": "what is osmosis?"});
    h.act("m1", "ask_document", payload.clone()).await;
    h.act("m1", "ask_document", payload).await;

    // Once per invocation — no replay, no double execution.
    assert_eq!(h.mock.call_count(), 2);
}

#[tokio::test]
async fn handler_failure_routes_back_to_the_menu() {
    let h = Harness::new();
    h.seed("mia@o1.edu", "pw", Role::Member, Some("o1"), Some("g1"));
    h.login("m1", "mia@o1.edu", "pw").await;
    h.mock.push_failure("model overloaded");

    let (state, outcome) = h
        .act("m1", "ask_document", json!({"material_id": "d", "query": "q"}))
        .await;
    assert_eq!(outcome, TraversalOutcome::Halted(HaltPoint::Menu(Role::Member)));
    assert!(state.last_message.contains("could not be completed"));
    assert_eq!(state.role, Role::Member);

    // The session is still usable.
    let (state, _) = h
        .act("m1", "ask_document", json!({"material_id": "d", "query": "q"}))
        .await;
    assert_eq!(state.last_message, "mock response");
}

#[tokio::test]
async fn malformed_payload_is_a_handler_failure_not_an_abort() {
    let h = Harness::new();
    h.seed("root@inst.edu", "rootpw", Role::Tier1Admin, None, None);
    h.login("s1", "root@inst.edu", "rootpw").await;

    let (state, outcome) = h.act("s1", "add_org", json!({"name": "only a name"})).await;
    assert_eq!(outcome, TraversalOutcome::Halted(HaltPoint::Menu(Role::Tier1Admin)));
    assert!(state.last_message.contains("could not be completed"));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Provisioning flows
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn add_org_mints_a_working_admin_login() {
    let h = Harness::new();
    h.seed("root@inst.edu", "rootpw", Role::Tier1Admin, None, None);
    h.login("s1", "root@inst.edu", "rootpw").await;

    let (state, outcome) = h
        .act(
            "s1",
            "add_org",
            json!({"name": "North Campus", "contact": "dean@north.edu", "admin_name": "Dean"}),
        )
        .await;
    assert_eq!(outcome, TraversalOutcome::Halted(HaltPoint::Menu(Role::Tier1Admin)));
    assert_eq!(state.role, Role::Tier1Admin, "no role change from the action");
    assert!(state.last_message.contains("Temporary admin password:"));

    // The minted credential works, and resolves an org-scoped context.
    let password = temp_password(&state.last_message);
    let (admin, outcome) = h.login("s2", "dean@north.edu", &password).await;
    assert_eq!(outcome, TraversalOutcome::Halted(HaltPoint::Menu(Role::OrgAdmin)));
    assert!(admin.authz.org_id.is_some());
    assert!(admin.authz.group_id.is_none());
}

#[tokio::test]
async fn quiz_lifecycle_generate_publish_list_submit() {
    let h = Harness::new();
    h.seed("tess@o1.edu", "pw", Role::Staff, Some("o1"), Some("g1"));
    h.seed("mia@o1.edu", "pw", Role::Member, Some("o1"), Some("g1"));
    h.seed("omar@o1.edu", "pw", Role::Member, Some("o1"), Some("g2"));

    h.login("t1", "tess@o1.edu", "pw").await;
    h.mock.push_response(sample_quiz_json());
    let (state, _) = h
        .act(
            "t1",
            "generate_quiz",
            json!({
                "topic": "thermodynamics",
                "source_text": "heat flows from hot to cold",
                "num_mcq": 1, "num_short": 1, "num_long": 0
            }),
        )
        .await;
    assert!(state.last_message.contains("Quiz generated"));
    let quiz_id = state
        .last_message
        .split("(id ")
        .nth(1)
        .unwrap()
        .split(')')
        .next()
        .unwrap()
        .to_string();

    // Unpublished quizzes are invisible to members.
    h.login("m1", "mia@o1.edu", "pw").await;
    let (state, _) = h.act("m1", "list_quizzes", json!({})).await;
    assert!(state.last_message.contains("No quizzes"));

    h.act("t1", "publish_quiz", json!({"quiz_id": quiz_id})).await;

    let (state, _) = h.act("m1", "list_quizzes", json!({})).await;
    assert!(state.last_message.contains("thermodynamics"));

    // A member of another group still sees nothing.
    h.login("m2", "omar@o1.edu", "pw").await;
    let (state, _) = h.act("m2", "list_quizzes", json!({})).await;
    assert!(state.last_message.contains("No quizzes"));

    // Submission is graded through the model.
    h.mock.push_response("Total Score: 15 / 20\n\nOverall Feedback: good.");
    let (state, _) = h
        .act(
            "m1",
            "submit_quiz",
            json!({
                "quiz_id": quiz_id,
                "answers": [{"number": 1, "answer": "4"}, {"number": 2, "answer": "disorder"}]
            }),
        )
        .await;
    assert!(state.last_message.contains("Total Score: 15 / 20"));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Step ceiling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A graph whose only edge loops back on itself: no halt point anywhere.
struct CyclicGraph;

#[async_trait::async_trait]
impl WorkflowGraph for CyclicGraph {
    fn resume_node(&self, _state: &SessionState) -> Node {
        Node::Entry
    }

    async fn evaluate(
        &self,
        _node: Node,
        state: SessionState,
        _input: &TurnInput,
    ) -> (SessionState, Transition) {
        (state, Transition::Goto(Node::Entry))
    }
}

#[tokio::test]
async fn cyclic_graph_aborts_at_the_step_ceiling() {
    let executor = StepExecutor::new(Arc::new(CyclicGraph), 10);
    let (state, outcome) = executor
        .run_turn(SessionState::new("s1"), TurnInput::default())
        .await;

    match outcome {
        TraversalOutcome::Aborted(reason) => assert!(reason.contains("step ceiling")),
        other => panic!("expected abort, got {other:?}"),
    }
    // Never more than one evaluation past the ceiling.
    assert!(state.step_count <= 11);
}

#[tokio::test]
async fn session_recovers_after_an_aborted_turn() {
    // Abort a turn against the cyclic graph, persisting a snapshot whose
    // step count sits past the ceiling.
    let broken = StepExecutor::new(Arc::new(CyclicGraph), 10);
    let (poisoned, outcome) = broken
        .run_turn(SessionState::new("s1"), TurnInput::default())
        .await;
    assert!(matches!(outcome, TraversalOutcome::Aborted(_)));
    assert!(poisoned.step_count > 10);

    // The next input for the same snapshot runs a fresh traversal under
    // the same ceiling; the stale count must not abort it on arrival.
    let h = Harness::with_ceiling(10);
    h.seed("root@inst.edu", "rootpw", Role::Tier1Admin, None, None);
    h.store.save(poisoned);

    let (state, outcome) = h.login("s1", "root@inst.edu", "rootpw").await;
    assert_eq!(outcome, TraversalOutcome::Halted(HaltPoint::Menu(Role::Tier1Admin)));
    assert_eq!(state.role, Role::Tier1Admin);
}
