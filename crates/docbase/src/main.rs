//! # Docbase CLI (`docs`)
//!
//! ```bash
//! docs --config ./config/docs.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docs init` | Create the SQLite database and run schema migrations |
//! | `docs sections` | List sections in display order |
//! | `docs show <id-or-slug>` | Print a rendered section (`--html` for HTML) |
//! | `docs search "<query>"` | Search section titles and content |
//! | `docs import <file.json>` | Create or replace sections from a JSON file |
//! | `docs export` | Dump all sections as JSON |
//! | `docs delete <id-or-slug>` | Delete a section after confirmation |
//! | `docs serve` | Start the HTTP API |
//! | `docs completions <shell>` | Print shell completions |

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use docbase::{auth, config, delete, export, import, logging, migrate, search, sections, server};

/// Docbase CLI: structured documentation with instant search.
#[derive(Parser)]
#[command(
    name = "docs",
    about = "Docbase: structured documentation with instant search and an admin editor",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/docs.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Safe to run repeatedly.
    Init,

    /// List all sections in display order.
    Sections,

    /// Print one section, rendered.
    Show {
        /// Section id or slug.
        id: String,

        /// Print HTML instead of plain text.
        #[arg(long)]
        html: bool,
    },

    /// Search section titles and content (case-insensitive substring).
    Search {
        /// The search query string.
        query: String,
    },

    /// Create or replace sections from a JSON file.
    ///
    /// Sections are matched by slug; existing ones are replaced in full.
    Import {
        /// Path to a `{ "sections": [...] }` JSON file.
        file: PathBuf,
    },

    /// Export every section (with code examples) as JSON.
    Export {
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Delete a section and its examples and feedback. Cannot be undone.
    Delete {
        /// Section id or slug.
        id: String,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Start the HTTP API on `[server].bind`.
    Serve,

    /// Print shell completions.
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "docs", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;
    logging::init(&cfg.logging);

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Sections => {
            sections::run_sections(&cfg).await?;
        }
        Commands::Show { id, html } => {
            sections::run_show(&cfg, &id, html).await?;
        }
        Commands::Search { query } => {
            search::run_search(&cfg, &query).await?;
        }
        Commands::Import { file } => {
            import::run_import(&cfg, &file, &auth::local_actor()).await?;
        }
        Commands::Export { output } => {
            export::run_export(&cfg, output.as_deref()).await?;
        }
        Commands::Delete { id, yes } => {
            delete::run_delete(&cfg, &id, yes, &auth::local_actor()).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
