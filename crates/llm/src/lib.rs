//! Language-model integration for CampusFlow.
//!
//! The workflow engine consumes this crate through three narrow service
//! contracts — generate a quiz from text, grade a submission against its
//! key, answer a query against an indexed document — all treated as
//! opaque, possibly slow, possibly failing calls. Behind those contracts
//! sits a provider trait with an OpenAI-compatible HTTP adapter and a
//! scriptable mock for tests.

pub mod disabled;
pub mod mock;
pub mod openai_compat;
pub mod services;
pub mod traits;

pub use disabled::DisabledProvider;
pub use mock::MockProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use services::AiServices;
pub use traits::{ChatRequest, ChatResponse, LlmProvider};
