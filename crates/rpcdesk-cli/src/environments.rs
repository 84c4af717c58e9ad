//! Environment (variable set) commands.

use anyhow::{anyhow, bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;
use rpcdesk_storage::{DeskConfig, EnvironmentStore};

#[derive(Subcommand)]
pub enum EnvCommands {
    /// List environment names.
    List,
    /// Print the variables of one environment.
    Show { name: String },
    /// Set variables (`NAME=VALUE`) in an environment, creating it if needed.
    Set {
        name: String,
        #[arg(value_name = "NAME=VALUE")]
        variables: Vec<String>,
        /// Drop every variable not given here.
        #[arg(long)]
        replace: bool,
    },
}

pub fn cmd_env(config: &DeskConfig, command: EnvCommands) -> Result<()> {
    let mut store = EnvironmentStore::open(&config.environments_path);
    match command {
        EnvCommands::List => {
            let names = store.names();
            if names.is_empty() {
                println!("{}", "(no environments)".dimmed());
            }
            for name in names {
                let marker = if config.default_environment.as_deref() == Some(name.as_str()) {
                    " (default)"
                } else {
                    ""
                };
                println!("{name}{}", marker.dimmed());
            }
        }
        EnvCommands::Show { name } => {
            if !store.contains(&name) {
                bail!("unknown environment `{name}`");
            }
            for (key, value) in store.environment(&name) {
                println!("{}={value}", key.cyan());
            }
        }
        EnvCommands::Set {
            name,
            variables,
            replace,
        } => {
            if name.trim().is_empty() {
                bail!("environment name must not be empty");
            }
            let mut vars = if replace {
                Default::default()
            } else {
                store.environment(&name)
            };
            for pair in &variables {
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| anyhow!("expected NAME=VALUE, got `{pair}`"))?;
                vars.insert(key.trim().to_string(), value.to_string());
            }
            store
                .save_environment(&name, vars)
                .with_context(|| format!("failed to save environment `{name}`"))?;
            println!("  {} {}", "→".cyan(), store.path().display());
        }
    }
    Ok(())
}
