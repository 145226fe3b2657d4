//! Directory persistence for CampusFlow.
//!
//! JSON-file-backed collections (principals, orgs, quizzes, submissions),
//! the credential verifier, and the authorization-context resolver. Action
//! handlers consume this crate only through narrow, context-scoped calls;
//! the workflow engine never touches the files directly.

pub mod credentials;
pub mod entities;
pub mod resolver;
pub mod store;

pub use credentials::{hash_password, mint_temp_password, verify_password, CredentialVerifier};
pub use entities::{Org, Quiz, Submission};
pub use resolver::AuthzResolver;
pub use store::Directory;
