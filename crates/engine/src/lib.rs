//! The session-scoped workflow execution engine.
//!
//! A directed graph of nodes (entry, login, per-role menu, action, exit)
//! driven one traversal per external input by the [`StepExecutor`]. A
//! traversal runs until it reaches a halt point (a menu awaiting input,
//! or a failed login), terminates at exit, or trips the step ceiling —
//! which is a graph-integrity fault, never a user-facing retry.
//!
//! All collaborators (directory, credential verifier, authorization
//! resolver, language-model services) arrive through [`Services`],
//! constructed once at process start; nothing in here reaches for a
//! global.

pub mod context;
pub mod executor;
pub mod graph;
pub mod handlers;
pub mod registry;

pub use context::Services;
pub use executor::{Credentials, HaltPoint, StepExecutor, TraversalOutcome, TurnInput};
pub use graph::{CampusGraph, Node, Transition, WorkflowGraph};
pub use registry::{ActionHandler, ActionKind, ActionRegistry, ActionRequest};
