pub mod commands;
pub mod logging;

use clap::{Parser, Subcommand};
use corpay_core::config::{AppConfig, LoadOptions};
use std::process::ExitCode;

use crate::commands::simulate::SimulateArgs;

#[derive(Debug, Parser)]
#[command(
    name = "corpay",
    about = "CorporatePay approvals operator CLI",
    long_about = "Manage the approval flow store and run approval scenarios against stored flows.",
    after_help = "Examples:\n  corpay seed\n  corpay flows\n  corpay simulate --flow AF-PURCHASES --amount 540000 --role Member"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Apply migrations and write the default approval flows into an empty store")]
    Seed,
    #[command(about = "List stored approval flows as JSON")]
    Flows,
    #[command(about = "Evaluate a scenario against a stored approval flow")]
    Simulate(SimulateArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Migrate => "migrate",
            Self::Seed => "seed",
            Self::Flows => "flows",
            Self::Simulate(_) => "simulate",
            Self::Config => "config",
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Config errors are reported by the command itself.
    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        if let Err(error) = logging::init(&config.logging) {
            eprintln!("{error}");
        }
    }

    let command_name = cli.command.name();
    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Flows => commands::flows::run(),
        Command::Simulate(args) => commands::simulate::run(args),
        Command::Config => commands::config::run(),
    };

    tracing::debug!(
        event_name = "cli.command.completed",
        command = command_name,
        exit_code = result.exit_code,
        "command finished"
    );
    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
