pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use callerctx_core::config::LoadOptions;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "callerctx",
    about = "Caller context lookup CLI",
    long_about = "Resolve inbound caller phone numbers against the CRM and render the prompt context block.",
    after_help = "Examples:\n  callerctx lookup \"(415) 555-1212\"\n  callerctx lookup +442079460958 --json\n  callerctx doctor --json"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a callerctx.toml config file")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Look up a caller by phone number and print the prompt context block")]
    Lookup {
        #[arg(help = "Phone number in any format; non-digits are ignored")]
        phone: String,
        #[arg(long, help = "Emit the lookup outcome and rendered prompt as JSON")]
        json: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and CRM credential readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions {
        require_file: cli.config.is_some(),
        config_path: cli.config,
        ..LoadOptions::default()
    };

    let result = match cli.command {
        Command::Lookup { phone, json } => commands::lookup::run(options, &phone, json),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(options) }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(options, json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
