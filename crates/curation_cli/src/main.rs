//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `curation_core` linkage.
//! - Lint one launch command against a content folder without a host UI.
//! - Keep output deterministic for quick local sanity checks.

use clap::{Parser, Subcommand};
use curation_core::service::validation::launch_command_warnings;
use curation_core::{
    activate, default_log_level, init_logging, ExtensionRegistry, StdFileSystem,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(about = "Smoke checks for the core-curation extension")]
struct Cli {
    /// Absolute directory for rolling log files.
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Print launch command warnings for a content folder.
    Lint {
        content_dir: PathBuf,
        /// Full launch command; pass it after `--` when it starts with `-`.
        launch_command: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        if let Err(err) = init_logging(default_log_level(), log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("curation_core ping={}", curation_core::ping());
    println!("curation_core version={}", curation_core::core_version());

    let registry = ExtensionRegistry::new();
    let context = match activate(&registry) {
        Ok(context) => context,
        Err(err) => {
            eprintln!("activation failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    for command_id in registry.command_ids() {
        println!("command={command_id}");
    }
    info!(
        "event=cli_start module=cli status=ok subscriptions={}",
        context.subscription_count()
    );

    match cli.command {
        None => ExitCode::SUCCESS,
        Some(CliCommand::Lint {
            content_dir,
            launch_command,
        }) => {
            let warnings = launch_command_warnings(&content_dir, &launch_command, &StdFileSystem);
            for code in &warnings {
                println!("warning={}", code.as_str());
            }
            if warnings.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
