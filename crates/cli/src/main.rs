mod commands;
mod config;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Configuration metadata diff and legacy-key migration toolkit.
#[derive(Parser)]
#[command(
    name = "keyshift",
    version,
    about = "Configuration metadata diff and legacy-key migration toolkit"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Configuration file (defaults to ./keyshift.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every group and property change between two metadata files
    Diff {
        /// Metadata JSON of the older version
        left: PathBuf,
        /// Metadata JSON of the newer version
        right: PathBuf,
        /// Version label of the older metadata (defaults to the file stem)
        #[arg(long)]
        left_version: Option<String>,
        /// Version label of the newer metadata (defaults to the file stem)
        #[arg(long)]
        right_version: Option<String>,
    },

    /// Audit deprecations and removals between two metadata files
    Deprecations {
        /// Metadata JSON of the older version
        #[arg(long)]
        previous: PathBuf,
        /// Metadata JSON of the newer version
        #[arg(long)]
        current: PathBuf,
    },

    /// Remap configured values off hard-deprecated keys
    Migrate {
        /// Metadata JSON of the version being upgraded to
        #[arg(long)]
        metadata: PathBuf,
        /// Value sources JSON
        sources: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            report_error(&e, cli.output, cli.quiet);
            process::exit(1);
        }
    };
    init_logging(&config.logging.filter, cli.quiet);

    match cli.command {
        Commands::Diff {
            left,
            right,
            left_version,
            right_version,
        } => {
            commands::diff::cmd_diff(
                &left,
                &right,
                left_version,
                right_version,
                config.diff.equality,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Deprecations { previous, current } => {
            commands::deprecations::cmd_deprecations(
                &previous,
                &current,
                &config.removals.excludes,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Migrate { metadata, sources } => {
            commands::migrate::cmd_migrate(&metadata, &sources, cli.output, cli.quiet);
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the configured filter.
fn init_logging(filter: &str, quiet: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) if quiet => EnvFilter::new("error"),
        Err(_) => EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
