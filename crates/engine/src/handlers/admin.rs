//! Tier1 admin actions: org provisioning and removal.

use chrono::Utc;
use serde::Deserialize;

use cf_directory::credentials::{hash_password, mint_temp_password};
use cf_directory::Org;
use cf_domain::error::Result;
use cf_domain::principal::{Principal, Role};

use crate::context::Services;
use crate::handlers::parse_payload;
use crate::registry::{ActionHandler, ActionRequest};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// add_org
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Deserialize)]
struct AddOrgPayload {
    name: String,
    contact: String,
    admin_name: String,
}

/// Create an org plus its org-admin login. The minted temporary password
/// is relayed in the reply; only its hash is stored.
pub struct AddOrg;

#[async_trait::async_trait]
impl ActionHandler for AddOrg {
    async fn run(&self, services: &Services, req: ActionRequest<'_>) -> Result<String> {
        let payload: AddOrgPayload = parse_payload(req.payload)?;
        let now = Utc::now();

        let org = Org {
            id: uuid::Uuid::new_v4().to_string(),
            name: payload.name.clone(),
            contact_email: payload.contact.trim().to_ascii_lowercase(),
            active: true,
            created_at: now,
        };
        services.directory.insert_org(org.clone())?;

        let temp_password = mint_temp_password();
        services.directory.insert_principal(Principal {
            id: uuid::Uuid::new_v4().to_string(),
            name: payload.admin_name,
            email: org.contact_email.clone(),
            password_hash: hash_password(&temp_password),
            role: Role::OrgAdmin,
            active: true,
            org_id: Some(org.id.clone()),
            group_id: None,
            created_at: now,
        })?;

        Ok(format!(
            "Org '{}' added (id {}). Temporary admin password: {temp_password}",
            org.name, org.id
        ))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// list_orgs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct ListOrgs;

#[async_trait::async_trait]
impl ActionHandler for ListOrgs {
    async fn run(&self, services: &Services, _req: ActionRequest<'_>) -> Result<String> {
        let orgs = services.directory.list_orgs();
        if orgs.is_empty() {
            return Ok("No active orgs.".into());
        }
        let lines: Vec<String> = orgs
            .iter()
            .map(|o| format!("- {} (id {})", o.name, o.id))
            .collect();
        Ok(format!("Active orgs:\n{}", lines.join("\n")))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// remove_org
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Deserialize)]
struct RemoveOrgPayload {
    org_id: String,
}

pub struct RemoveOrg;

#[async_trait::async_trait]
impl ActionHandler for RemoveOrg {
    async fn run(&self, services: &Services, req: ActionRequest<'_>) -> Result<String> {
        let payload: RemoveOrgPayload = parse_payload(req.payload)?;
        if services.directory.deactivate_org(&payload.org_id) {
            Ok(format!("Org '{}' has been deactivated.", payload.org_id))
        } else {
            Ok(format!("Org '{}' not found.", payload.org_id))
        }
    }
}
