//! vaultpress CLI — publish a markdown vault into a static documentation site
//!
//! Commands: sync (default), scan, completions

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use vaultpress_core::{SyncConfig, SyncError};
use vaultpress_vault::VaultIndex;

#[derive(Parser)]
#[command(name = "vaultpress")]
#[command(version)]
#[command(about = "Publish a markdown vault into a static documentation site")]
struct Cli {
    /// Configuration file (default: ./vaultpress.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Vault subtree to publish
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Site document tree to write
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Fallback directory for unresolved attachments
    #[arg(long, global = true)]
    attachments: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Rebuild the site document tree from the vault (default)
    Sync {
        /// Print the run summary as JSON on stdout
        #[arg(long)]
        report: bool,
    },
    /// Print the output path of every vault entry without writing anything
    Scan,
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<SyncError>()
                .map_or(1, SyncError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(*shell, &mut Cli::command(), "vaultpress", &mut io::stdout());
            Ok(())
        }
        Some(Commands::Scan) => scan(&load_config(&cli)?),
        Some(Commands::Sync { report }) => sync(&load_config(&cli)?, *report),
        None => sync(&load_config(&cli)?, false),
    }
}

fn sync(config: &SyncConfig, report: bool) -> anyhow::Result<()> {
    let summary = vaultpress_sync::run(config)?;
    if report {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn scan(config: &SyncConfig) -> anyhow::Result<()> {
    let index = VaultIndex::scan(config)?;
    let mappings: Vec<_> = index.paths().iter().collect();
    println!("{}", serde_json::to_string_pretty(&mappings)?);
    Ok(())
}

/// Config file (explicit or discovered), then command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<SyncConfig> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let mut config = SyncConfig::discover(cli.config.as_deref(), &cwd)?;
    if let Some(source) = &cli.source {
        config.source_root.clone_from(source);
    }
    if let Some(output) = &cli.output {
        config.output_root.clone_from(output);
    }
    if let Some(attachments) = &cli.attachments {
        config.attachments_dir.clone_from(attachments);
    }
    Ok(config)
}
