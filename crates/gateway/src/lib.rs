//! HTTP gateway and CLI for CampusFlow.
//!
//! The gateway owns process concerns only: config loading, tracing,
//! bearer-token auth, the per-session lock map, and store flushing.
//! All workflow semantics live in `cf-engine`.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod state;
