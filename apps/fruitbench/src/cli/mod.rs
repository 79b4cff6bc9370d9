//! # Fruitbench CLI Module
//!
//! This module implements the CLI interface for Fruitbench.
//!
//! ## Available Commands
//!
//! - `status` - Show bench status
//! - `catalog` - Browse the fruit catalog
//! - `tags` - List tag categories with fruit counts
//! - `add` / `remove` / `selected` - Manage the bench selection
//! - `rate` / `unrate` - Manage ratings
//! - `table` - Show the tiered results table
//! - `sort` - Persist the sort configuration
//! - `export` / `import` - Session files
//! - `share` / `open` - Share links
//! - `clear` - Wipe the persisted session

mod commands;

use clap::{Parser, Subcommand};
use fruitbench_core::FruitbenchError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Fruitbench - Fruit Rating Bench
///
/// Select fruits by category, score them across four criteria, and view
/// the results in a sortable, tiered table.
#[derive(Parser, Debug)]
#[command(name = "fruitbench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the bench database
    #[arg(short = 'D', long, global = true, default_value = "fruitbench.db")]
    pub database: PathBuf,

    /// Storage backend: "redb" (persistent) or "memory" (volatile)
    #[arg(short = 'B', long, global = true, default_value = "redb")]
    pub backend: String,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show bench status
    Status,

    /// Browse the fruit catalog
    Catalog {
        /// Filter by tags (comma-separated, OR semantics)
        #[arg(short, long)]
        tags: Option<String>,

        /// Case-insensitive search over names and alternate terms
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List tag categories with fruit counts
    Tags,

    /// Add a fruit to the bench selection
    Add {
        /// Catalog id of the fruit (e.g. "banana", "apple-red")
        fruit_id: String,
    },

    /// Remove a fruit from the selection (also deletes its rating)
    Remove {
        /// Catalog id of the fruit
        fruit_id: String,
    },

    /// List the current selection with rating progress
    Selected,

    /// Rate a fruit, one or more criteria at a time (scores 0-10)
    Rate {
        /// Catalog id of the fruit
        fruit_id: String,

        #[arg(long)]
        flavor: Option<u8>,

        #[arg(long)]
        nourishment: Option<u8>,

        #[arg(long)]
        reliability: Option<u8>,

        #[arg(long)]
        practicality: Option<u8>,
    },

    /// Delete a fruit's rating
    Unrate {
        /// Catalog id of the fruit
        fruit_id: String,
    },

    /// Show the tiered results table
    Table,

    /// Persist the sort configuration
    Sort {
        /// Sort column (name, flavor, nourishment, reliability, practicality, total)
        #[arg(short, long)]
        column: String,

        /// Sort direction (asc, desc)
        #[arg(short, long, default_value = "desc")]
        direction: String,
    },

    /// Export the session to a JSON file
    Export {
        /// Output file path (default: fruitbench-<timestamp>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a previously exported session file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print a shareable link for the current session
    Share {
        /// Base URL for the link
        #[arg(long, default_value = "https://fruitbench.app/")]
        base: String,
    },

    /// Consume a share link, replacing ratings and selection
    Open {
        /// The shared URL
        url: String,
    },

    /// Wipe the persisted session
    Clear {
        /// Confirm the wipe
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), FruitbenchError> {
    let backend = cli.backend.as_str();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Catalog { tags, search }) => cmd_catalog(
            &cli.database,
            backend,
            json_mode,
            tags.as_deref(),
            search.as_deref(),
        ),
        Some(Commands::Tags) => cmd_tags(json_mode),
        Some(Commands::Add { fruit_id }) => cmd_add(&cli.database, backend, json_mode, &fruit_id),
        Some(Commands::Remove { fruit_id }) => {
            cmd_remove(&cli.database, backend, json_mode, &fruit_id)
        }
        Some(Commands::Selected) => cmd_selected(&cli.database, backend, json_mode),
        Some(Commands::Rate {
            fruit_id,
            flavor,
            nourishment,
            reliability,
            practicality,
        }) => cmd_rate(
            &cli.database,
            backend,
            json_mode,
            &fruit_id,
            flavor,
            nourishment,
            reliability,
            practicality,
        ),
        Some(Commands::Unrate { fruit_id }) => {
            cmd_unrate(&cli.database, backend, json_mode, &fruit_id)
        }
        Some(Commands::Table) => cmd_table(&cli.database, backend, json_mode),
        Some(Commands::Sort { column, direction }) => {
            cmd_sort(&cli.database, backend, json_mode, &column, &direction)
        }
        Some(Commands::Export { output }) => {
            cmd_export(&cli.database, backend, json_mode, output.as_deref())
        }
        Some(Commands::Import { input }) => cmd_import(&cli.database, backend, json_mode, &input),
        Some(Commands::Share { base }) => cmd_share(&cli.database, backend, json_mode, &base),
        Some(Commands::Open { url }) => cmd_open(&cli.database, backend, json_mode, &url),
        Some(Commands::Clear { force }) => cmd_clear(&cli.database, backend, json_mode, force),
        // No subcommand - show status by default
        Some(Commands::Status) | None => cmd_status(&cli.database, backend, json_mode),
    }
}
