//! Session persistence and per-session concurrency for CampusFlow.
//!
//! One [`SessionState`] snapshot per logical conversation, keyed by a
//! caller-supplied session id; the [`SessionStore`] is the sole arbiter
//! of "current" state for a session, and [`SessionLocks`] serializes
//! traversals so at most one is in flight per session.

pub mod lock;
pub mod state;
pub mod store;

pub use lock::SessionLocks;
pub use state::SessionState;
pub use store::SessionStore;
