//! rpcdesk CLI
//!
//! Command-line front end for building and issuing gRPC calls from a
//! protoset:
//! - Inspecting a protoset (callable methods, request fields)
//! - Issuing calls through grpcurl with `{{variable}}` substitution
//! - Managing saved calls and environments

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rpcdesk_storage::{DeskConfig, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod calls;
mod environments;
mod inspect;

#[derive(Parser)]
#[command(name = "rpcdesk")]
#[command(author, version, about = "rpcdesk: build, issue and save gRPC calls from protosets")]
struct Cli {
    /// Workspace config file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// More logging (`-v` info, `-vv` debug); `RUST_LOG` wins when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the callable methods of a protoset.
    Methods {
        /// Protoset file (`protoc --descriptor_set_out`).
        protoset: PathBuf,
    },

    /// Show the request fields of a method (enum fields list their values).
    Fields {
        protoset: PathBuf,
        /// Fully-qualified method (`pkg.Service.Method`).
        method: String,
    },

    /// Issue a call through grpcurl.
    Call {
        #[command(flatten)]
        call: calls::CallArgs,
        /// Start from this saved call.
        #[arg(long)]
        saved: Option<usize>,
        /// Environment whose variables fill `{{name}}` tokens.
        #[arg(long)]
        env: Option<String>,
    },

    /// Saved call definitions.
    Saved {
        #[command(subcommand)]
        command: calls::SavedCommands,
    },

    /// Environments (named variable sets).
    Env {
        #[command(subcommand)]
        command: environments::EnvCommands,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = DeskConfig::load(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;

    match cli.command {
        Commands::Methods { protoset } => inspect::cmd_methods(&protoset),
        Commands::Fields { protoset, method } => inspect::cmd_fields(&protoset, &method),
        Commands::Call { call, saved, env } => {
            calls::cmd_call(&config, &call, saved, env.as_deref())
        }
        Commands::Saved { command } => calls::cmd_saved(&config, command),
        Commands::Env { command } => environments::cmd_env(&config, command),
    }
}
