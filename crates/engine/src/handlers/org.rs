//! Org-admin actions: staff provisioning, scoped to the caller's org.

use chrono::Utc;
use serde::Deserialize;

use cf_directory::credentials::{hash_password, mint_temp_password};
use cf_domain::error::Result;
use cf_domain::principal::{Principal, Role};

use crate::context::Services;
use crate::handlers::{parse_payload, require_org};
use crate::registry::{ActionHandler, ActionRequest};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// add_staff
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Deserialize)]
struct AddStaffPayload {
    name: String,
    email: String,
    /// Group the new staff member will teach.
    group: String,
}

pub struct AddStaff;

#[async_trait::async_trait]
impl ActionHandler for AddStaff {
    async fn run(&self, services: &Services, req: ActionRequest<'_>) -> Result<String> {
        let org_id = require_org(req.authz)?;
        let payload: AddStaffPayload = parse_payload(req.payload)?;

        let temp_password = mint_temp_password();
        let id = uuid::Uuid::new_v4().to_string();
        services.directory.insert_principal(Principal {
            id: id.clone(),
            name: payload.name.clone(),
            email: payload.email,
            password_hash: hash_password(&temp_password),
            role: Role::Staff,
            active: true,
            org_id: Some(org_id.to_string()),
            group_id: Some(payload.group),
            created_at: Utc::now(),
        })?;

        Ok(format!(
            "Staff '{}' added (id {id}). Temporary password: {temp_password}",
            payload.name
        ))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// list_staff
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct ListStaff;

#[async_trait::async_trait]
impl ActionHandler for ListStaff {
    async fn run(&self, services: &Services, req: ActionRequest<'_>) -> Result<String> {
        let org_id = require_org(req.authz)?;
        let staff = services.directory.staff_in_org(org_id);
        if staff.is_empty() {
            return Ok("No staff in your org.".into());
        }
        let lines: Vec<String> = staff
            .iter()
            .map(|p| {
                format!(
                    "- {} <{}> group {} (id {})",
                    p.name,
                    p.email,
                    p.group_id.as_deref().unwrap_or("-"),
                    p.id
                )
            })
            .collect();
        Ok(format!("Staff:\n{}", lines.join("\n")))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// remove_staff
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Deserialize)]
struct RemoveStaffPayload {
    staff_id: String,
}

pub struct RemoveStaff;

#[async_trait::async_trait]
impl ActionHandler for RemoveStaff {
    async fn run(&self, services: &Services, req: ActionRequest<'_>) -> Result<String> {
        let org_id = require_org(req.authz)?;
        let payload: RemoveStaffPayload = parse_payload(req.payload)?;

        // Staff of another org are indistinguishable from unknown ids.
        let in_scope = services
            .directory
            .get_principal(&payload.staff_id)
            .is_some_and(|p| {
                p.active && p.role == Role::Staff && p.org_id.as_deref() == Some(org_id)
            });

        if in_scope && services.directory.deactivate_principal(&payload.staff_id) {
            Ok(format!("Staff '{}' removed.", payload.staff_id))
        } else {
            Ok(format!("Staff '{}' not found.", payload.staff_id))
        }
    }
}
