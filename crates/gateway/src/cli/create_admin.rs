//! Seed the first tier1 admin login.
//!
//! Every other principal is provisioned through the workflow itself;
//! only the bootstrap admin needs an out-of-band path.

use chrono::Utc;

use cf_directory::credentials::{hash_password, mint_temp_password};
use cf_directory::Directory;
use cf_domain::config::Config;
use cf_domain::principal::{Principal, Role};

pub fn run(config: &Config, name: &str, email: &str) -> anyhow::Result<()> {
    let directory = Directory::open(&config.state.path)?;

    let temp_password = mint_temp_password();
    let id = uuid::Uuid::new_v4().to_string();
    directory.insert_principal(Principal {
        id: id.clone(),
        name: name.to_string(),
        email: email.to_string(),
        password_hash: hash_password(&temp_password),
        role: Role::Tier1Admin,
        active: true,
        org_id: None,
        group_id: None,
        created_at: Utc::now(),
    })?;
    directory.flush()?;

    println!("Tier1 admin '{name}' created (id {id}).");
    println!("Temporary password: {temp_password}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_exactly_one_admin_and_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.state.path = dir.path().to_path_buf();

        run(&config, "Root", "root@inst.edu").unwrap();
        assert!(run(&config, "Root Again", "root@inst.edu").is_err());

        let directory = Directory::open(&config.state.path).unwrap();
        let seeded = directory.find_principal_by_email("root@inst.edu").unwrap();
        assert_eq!(seeded.role, Role::Tier1Admin);
    }
}
