//! Shared domain types for CampusFlow.
//!
//! Everything the other crates agree on lives here: the common error type,
//! the principal/role model, the authorization context, and the full
//! configuration tree.

pub mod config;
pub mod error;
pub mod principal;
pub mod quiz;

pub use config::Config;
pub use error::{Error, Result};
pub use principal::{AuthzContext, Principal, Role};
