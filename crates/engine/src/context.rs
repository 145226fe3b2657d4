//! Explicit dependency wiring for the engine.
//!
//! Handlers and graph nodes receive every collaborator through this
//! struct; lifecycle (open/flush) is owned by the process entry point.

use std::sync::Arc;

use cf_directory::{AuthzResolver, CredentialVerifier, Directory};
use cf_llm::{AiServices, LlmProvider};

pub struct Services {
    pub directory: Arc<Directory>,
    pub verifier: CredentialVerifier,
    pub resolver: AuthzResolver,
    pub ai: AiServices,
}

impl Services {
    pub fn new(directory: Arc<Directory>, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            verifier: CredentialVerifier::new(directory.clone()),
            resolver: AuthzResolver::new(directory.clone()),
            ai: AiServices::new(provider),
            directory,
        }
    }
}
