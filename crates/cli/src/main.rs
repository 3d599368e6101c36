mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use serde_json::Value;

use autofill_core::config::{load_dotenv, Config};

use crate::cli::{CliArgs, Command};
use crate::commands::PlanArgs;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    match args.command {
        Command::Detect { input } => print_json(&commands::detect(&config, &input)?),
        Command::Plan {
            input,
            profile,
            answers,
            learned,
            rules_dir,
        } => print_json(&commands::plan(
            &config,
            PlanArgs {
                input: &input,
                profile: profile.as_deref(),
                answers: answers.as_deref(),
                learned: learned.as_deref(),
                rules_dir: rules_dir.as_deref(),
            },
        )?),
        Command::Rules { rules_dir, domain } => print_json(&commands::rules(
            &config,
            rules_dir.as_deref(),
            domain.as_deref(),
        )?),
        Command::Password { length } => {
            println!("{}", commands::password(&config, length));
            Ok(())
        }
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
