use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Form detection and autofill planning.
///
/// Reads page payloads as JSON (a path, or `-` for stdin) and prints JSON
/// results on stdout. Logs go to stderr; set `RUST_LOG` for more detail.
#[derive(Parser, Debug)]
#[command(name = "autofill", about = "Form detection and autofill planning")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify whether a page contains a fillable form
    Detect {
        /// Page snapshot JSON: {url, title?, content?, fields}
        #[arg(long, default_value = "-")]
        input: String,
    },

    /// Build a fill plan for a page's fields
    Plan {
        /// Plan request JSON: {url, fields}
        #[arg(long, default_value = "-")]
        input: String,

        /// Profile JSON object (key -> value)
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Answers JSON object (key -> value)
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Learned mappings JSON array for the request's domain
        #[arg(long)]
        learned: Option<PathBuf>,

        /// Rules directory (overrides RULES_DIR)
        #[arg(long)]
        rules_dir: Option<PathBuf>,
    },

    /// Load rule files and list them
    Rules {
        /// Rules directory (overrides RULES_DIR)
        #[arg(long)]
        rules_dir: Option<PathBuf>,

        /// Only enabled rules that apply to this domain
        #[arg(long)]
        domain: Option<String>,
    },

    /// Print a generated password
    Password {
        /// Length (defaults to PLAN_PASSWORD_LENGTH)
        #[arg(long)]
        length: Option<usize>,
    },
}
