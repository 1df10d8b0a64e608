mod cmd;
mod output;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "shiftcrew",
    about = "Crew shift registration and material tracking against a shared row sheet",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file path
    #[arg(
        long,
        global = true,
        env = "SHIFTCREW_CONFIG",
        default_value = "shiftcrew.yaml"
    )]
    config: PathBuf,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default config and an empty sheet
    Init,

    /// Register a crew member by external identifier
    Register {
        identifier: String,

        /// Last name (required unless --interactive)
        #[arg(long)]
        last: Option<String>,

        /// First name (required unless --interactive)
        #[arg(long)]
        first: Option<String>,

        /// Middle name (optional)
        #[arg(long)]
        middle: Option<String>,

        /// Collect the name step by step from stdin
        #[arg(long, short = 'i')]
        interactive: bool,
    },

    /// Show a crew member's row, name, and status
    Lookup { identifier: String },

    /// Archive a crew member's row (frees the name, keeps the row)
    Archive { identifier: String },

    /// Restore an archived row to active
    Restore { identifier: String },

    /// Upload shift material files and record the reference on the row
    Upload {
        identifier: String,

        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Shift date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Validate the configuration
    Check,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Init => cmd::init::run(&cli.config),
        Commands::Register {
            identifier,
            last,
            first,
            middle,
            interactive,
        } => cmd::register::run(
            &cli.config,
            &identifier,
            last.as_deref(),
            first.as_deref(),
            middle.as_deref(),
            interactive,
            cli.json,
        ),
        Commands::Lookup { identifier } => cmd::lookup::run(&cli.config, &identifier, cli.json),
        Commands::Archive { identifier } => {
            cmd::status::run(&cli.config, &identifier, shiftcrew_core::types::RowStatus::Archived)
        }
        Commands::Restore { identifier } => {
            cmd::status::run(&cli.config, &identifier, shiftcrew_core::types::RowStatus::Active)
        }
        Commands::Upload {
            identifier,
            files,
            date,
        } => cmd::upload::run(&cli.config, &identifier, &files, date, cli.json),
        Commands::Check => cmd::check::run(&cli.config),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
