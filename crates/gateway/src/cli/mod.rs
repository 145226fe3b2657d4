pub mod config;
pub mod create_admin;

use clap::{Parser, Subcommand};

/// CampusFlow — role-scoped institution workflows over one endpoint.
#[derive(Debug, Parser)]
#[command(name = "campusflow", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the gateway server (default when no subcommand is given).
    Serve,
    /// Seed a tier1 admin login and print its temporary password.
    CreateAdmin {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Login email.
        #[arg(long)]
        email: String,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `CAMPUSFLOW_CONFIG`
/// (or `campusflow.toml` by default). Returns the parsed config and the
/// path that was used.
///
/// A missing file is not an error: every section has working defaults.
pub fn load_config() -> anyhow::Result<(cf_domain::config::Config, String)> {
    let config_path =
        std::env::var("CAMPUSFLOW_CONFIG").unwrap_or_else(|_| "campusflow.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        cf_domain::config::Config::default()
    };

    Ok((config, config_path))
}
