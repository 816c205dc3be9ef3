/// iac-tool - IaC lifecycle front end for the kubeadm Kubernetes cluster
///
/// Dispatches lifecycle subcommands (SSH verification, provisioning, cluster
/// bring-up) to the shell scripts that perform the actual work.
mod commands;
mod config;
mod scripts;
mod utils;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ToolConfig, DEFAULT_CONFIG_FILE};
use crate::scripts::ShellScriptRunner;

#[derive(Parser)]
#[command(name = "iac-tool", version)]
#[command(about = "Manage the IaC lifecycle for the Kubernetes cluster")]
#[command(
    long_about = "Manage the IaC lifecycle for the Kubernetes cluster.\n\n\
                  Replaces the original entry.sh script: each subcommand runs a \
                  step implemented by the shell scripts under ./scripts."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (iac-tool.yaml is used when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage SSH related tasks like key generation and verification
    #[command(
        long_about = "Groups all SSH-related functionality, such as verifying SSH connectivity to the nodes."
    )]
    Ssh {
        #[command(subcommand)]
        command: Option<SshCommands>,
    },

    /// Run a configured lifecycle step
    Run {
        /// Step name, as listed by `iac-tool steps`
        step: String,
    },

    /// List configured lifecycle steps
    Steps,

    /// Generate example configuration file
    Init,
}

#[derive(Subcommand)]
enum SshCommands {
    /// Verify SSH connectivity to all VM nodes
    #[command(
        long_about = "Executes 'utils_ssh.sh' to perform strict SSH access verification against all hosts defined in the SSH config file."
    )]
    Verify,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse errors share the tool's single failure code; help and version still exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Initialize tracing; stdout belongs to the child scripts
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::builder()
                .parse_lossy(log_directives(rust_log.as_deref(), cli.verbose)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .init();

    if let Err(e) = dispatch(cli).await {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Filter directives: RUST_LOG first, then this crate's level so user-facing
/// messages are never filtered out
fn log_directives(rust_log: Option<&str>, verbose: bool) -> String {
    let log_level = if verbose { "debug" } else { "info" };
    match rust_log.map(str::trim).filter(|value| !value.is_empty()) {
        Some(env) => format!("{},iac_tool={}", env, log_level),
        None => format!("iac_tool={}", log_level),
    }
}

/// Route the parsed command line to its handler
async fn dispatch(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        return print_help(&[]);
    };

    match command {
        Commands::Ssh { command: None } => print_help(&["ssh"]),
        Commands::Ssh {
            command: Some(SshCommands::Verify),
        } => {
            let config = load_config(cli.config.as_deref())?;
            let runner = ShellScriptRunner::new(config.get_interpreter());
            commands::ssh::verify(&config, &runner).await
        }
        Commands::Run { step } => {
            let config = load_config(cli.config.as_deref())?;
            let runner = ShellScriptRunner::new(config.get_interpreter());
            commands::steps::run_step(&config, &runner, &step).await
        }
        Commands::Steps => {
            let config = load_config(cli.config.as_deref())?;
            commands::steps::list_steps(&config)
        }
        Commands::Init => {
            let path = cli
                .config
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            commands::init::init_config(&path).await
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ToolConfig> {
    ToolConfig::load(path).context("Failed to load configuration")
}

/// Print help for the command at `path` (empty for the root)
fn print_help(path: &[&str]) -> Result<()> {
    let mut command = Cli::command();
    command.build();

    let mut node = &mut command;
    for name in path {
        node = node
            .find_subcommand_mut(*name)
            .with_context(|| format!("Unknown command: {}", name))?;
    }
    node.print_long_help()?;
    Ok(())
}
