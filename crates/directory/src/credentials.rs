//! Credential hashing and verification.
//!
//! Stored hashes are `"<salt_hex>$<digest_hex>"` where the digest is
//! SHA-256 over `salt || secret`. Comparison runs in constant time so a
//! mismatch leaks nothing about the stored value.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use cf_domain::principal::Principal;

use crate::store::Directory;

/// Hash a secret with a fresh random salt.
pub fn hash_password(secret: &str) -> String {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    let digest = salted_digest(&salt, secret);
    format!("{salt}${}", hex::encode(digest))
}

/// Check a secret against a stored `"<salt>$<digest>"` hash.
pub fn verify_password(secret: &str, stored: &str) -> bool {
    let Some((salt, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(expected) = hex::decode(digest_hex) else {
        return false;
    };
    let provided = salted_digest(salt, secret);
    bool::from(provided.as_slice().ct_eq(expected.as_slice()))
}

/// Mint a temporary password for a newly provisioned principal.
/// The caller relays it out-of-band; only the hash is stored.
pub fn mint_temp_password() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}

fn salted_digest(salt: &str, secret: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(secret.as_bytes());
    hasher.finalize().into()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Credential verifier
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Checks a submitted identity+secret pair against the directory.
///
/// Inactive principals verify as "not found" — indistinguishable from a
/// wrong secret, so there is no credential-enumeration signal.
pub struct CredentialVerifier {
    directory: Arc<Directory>,
}

impl CredentialVerifier {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }

    /// `Some(principal)` only for an active record with a matching secret.
    pub fn verify(&self, identity_claim: &str, secret: &str) -> Option<Principal> {
        let principal = self.directory.find_principal_by_email(identity_claim)?;
        if !principal.active {
            return None;
        }
        if !verify_password(secret, &principal.password_hash) {
            return None;
        }
        Some(principal)
    }
}
