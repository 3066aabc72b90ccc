// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! osubot - minifilter pipeline tool.
//!
//! Inspects and exercises the minifilter chains that shape osu! stat records
//! before they are rendered into cards.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// osubot - minifilter pipeline tool.
#[derive(Parser, Debug)]
#[command(name = "osubot", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered minifilters.
    Filters {
        /// Only show minifilters whose name, description, or hooks match.
        #[arg(long)]
        search: Option<String>,
    },
    /// Show the state and compiled order of a hook.
    Chain {
        /// Hook name, e.g. `user_card`.
        hook: String,
    },
    /// Run a hook over a JSON record and print the result.
    Apply {
        /// Hook name, e.g. `user_card`.
        hook: String,
        /// JSON file to read the record from; stdin if omitted.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Validate configuration and report the state of every hook.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => osubot_config::load_and_validate_path(path),
        None => osubot_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            osubot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.bot.log_level);

    let result = match cli.command {
        Some(Commands::Filters { search }) => commands::filters(&config, search.as_deref()),
        Some(Commands::Chain { hook }) => commands::chain(&config, &hook),
        Some(Commands::Apply { hook, input }) => {
            commands::apply(&config, &hook, input.as_deref()).await
        }
        Some(Commands::Check) => commands::check(&config),
        None => {
            println!("osubot: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("osubot: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so `apply` output stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("osubot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
