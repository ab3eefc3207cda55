use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;

#[derive(Debug, Parser)]
#[command(name = "circ", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/circ/circ.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Create the catalog database and apply schema migrations
    ///
    /// Creates the database file (and its parent directory) if missing and
    /// brings the schema up to date. Running it against an existing catalog
    /// is harmless: already-applied migrations are skipped.
    ///
    /// The schema covers members, authors, publishers, the category tree,
    /// books and their author links, physical copies, loans, reservations,
    /// fines, staff, and the audit log, with the referential rules
    /// (restrict/cascade/set-null) enforced by SQLite.
    Init,
    /// Load the illustrative demo catalog
    ///
    /// Inserts a small internally consistent data set touching every table
    /// and every declared status value. Fails on a database that already
    /// holds the demo rows; seeding is not an upsert.
    Seed,
    /// Show row counts and circulation highlights
    Status,
    /// Inspect or bootstrap the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the current effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Create the config file with commented defaults
    Init,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let db_path = match cli.db {
        Some(path) => path,
        None => config::Config::load()?.database_path,
    };

    match cli.command {
        Commands::Init => commands::run_init(&db_path)?,
        Commands::Seed => commands::run_seed(&db_path)?,
        Commands::Status => commands::show_status(&db_path)?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::show_config()?,
            ConfigAction::Path => commands::show_config_path()?,
            ConfigAction::Init => commands::init_config()?,
        },
    }

    Ok(())
}
