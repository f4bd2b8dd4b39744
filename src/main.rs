//! newsgate - adaptive content gate for news feeds
//!
//! CLI entry point.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use newsgate::cli::read_items;
use newsgate::config::Config;
use newsgate::error::exit_codes;

// =============================================================================
// CLI Definition
// =============================================================================

/// newsgate - adaptive content gate for news feeds
#[derive(Parser)]
#[command(name = "newsgate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the adaptive gate over a JSON array of items
    Gate {
        /// Items file, or `-` for stdin
        file: String,
        /// Keep relaxing until at least this many items pass
        #[arg(long)]
        min_keep: Option<usize>,
        /// Config file to use instead of the layered config
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Split items into event and signal pools
    Split {
        /// Items file, or `-` for stdin
        file: String,
        /// Config file to use instead of the layered config
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Rank items by frontier score
    Score {
        /// Items file, or `-` for stdin
        file: String,
        /// Maximum number of results
        #[arg(long, short)]
        limit: Option<usize>,
        /// Config file to use instead of the layered config
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Config file to use instead of the layered config
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("newsgate error: {}", e);
            ExitCode::from(exit_codes::FAILURE)
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Gate {
            file,
            min_keep,
            config,
            json,
            quiet,
        } => run_gate(&file, min_keep, config.as_deref(), json, quiet),
        Commands::Split {
            file,
            config,
            json,
            quiet,
        } => run_split(&file, config.as_deref(), json, quiet),
        Commands::Score {
            file,
            limit,
            config,
            json,
            quiet,
        } => run_score(&file, limit, config.as_deref(), json, quiet),
        Commands::Config { config, json } => run_config(config.as_deref(), json),
    }
}

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS)
    } else {
        ExitCode::from(exit_codes::FAILURE)
    }
}

/// Load an explicit config file, or the layered config.
fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Config::load_from_file(path)?),
        None => Ok(Config::load()),
    }
}

fn run_gate(
    file: &str,
    min_keep: Option<usize>,
    config: Option<&Path>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use newsgate::cli::gate::{GateCommand, GateOptions};

    let config = load_config(config)?;
    let items = read_items(file)?;

    let cmd = GateCommand::new(config);
    let options = GateOptions {
        json,
        quiet,
        min_keep,
    };

    let output = cmd.run(items, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_split(
    file: &str,
    config: Option<&Path>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use newsgate::cli::split::{SplitCommand, SplitOptions};

    let config = load_config(config)?;
    let items = read_items(file)?;

    let cmd = SplitCommand::new(config);
    let options = SplitOptions { json, quiet };

    let output = cmd.run(items, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_score(
    file: &str,
    limit: Option<usize>,
    config: Option<&Path>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use newsgate::cli::score::{ScoreCommand, ScoreOptions};

    let config = load_config(config)?;
    let items = read_items(file)?;

    let cmd = ScoreCommand::new(config);
    let options = ScoreOptions { json, quiet, limit };

    let output = cmd.run(&items, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_config(config: Option<&Path>, json: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use newsgate::cli::config_cmd::{ConfigCommand, ConfigOptions};

    let config = load_config(config)?;

    let cmd = ConfigCommand::new(config);
    let options = ConfigOptions { json, quiet: false };

    let output = cmd.run(&options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}
