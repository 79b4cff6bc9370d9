//! # Fruitbench - Fruit Rating Bench
//!
//! The main binary for the Fruitbench rating engine.
//!
//! This application provides:
//! - Catalog browsing and bench selection management
//! - Rating entry across four criteria
//! - A sortable, tiered results table
//! - Session export/import and share links
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              apps/fruitbench (THE BINARY)           │
//! │                                                     │
//! │   ┌─────────────┐          ┌────────────────────┐   │
//! │   │   CLI       │          │  File I/O + clock  │   │
//! │   │  (clap)     │          │  (export, import)  │   │
//! │   └──────┬──────┘          └─────────┬──────────┘   │
//! │          │                           │              │
//! │          └──────────────┬────────────┘              │
//! │                         ▼                           │
//! │               ┌──────────────────┐                  │
//! │               │ fruitbench-core  │                  │
//! │               │   (THE LOGIC)    │                  │
//! │               └──────────────────┘                  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Select and rate fruits
//! fruitbench add banana
//! fruitbench rate banana --flavor 9 --nourishment 8 --reliability 10 --practicality 10
//!
//! # View the tiered table
//! fruitbench table
//!
//! # Share the session
//! fruitbench share
//! ```

use clap::Parser;
use fruitbench::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Initialize tracing — FRUITBENCH_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("FRUITBENCH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fruitbench=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Fruitbench startup banner.
fn print_banner() {
    println!(
        r#"
  ███████╗██████╗ ██╗   ██╗██╗████████╗██████╗ ███████╗███╗   ██╗ ██████╗██╗  ██╗
  ██╔════╝██╔══██╗██║   ██║██║╚══██╔══╝██╔══██╗██╔════╝████╗  ██║██╔════╝██║  ██║
  █████╗  ██████╔╝██║   ██║██║   ██║   ██████╔╝█████╗  ██╔██╗ ██║██║     ███████║
  ██╔══╝  ██╔══██╗██║   ██║██║   ██║   ██╔══██╗██╔══╝  ██║╚██╗██║██║     ██╔══██║
  ██║     ██║  ██║╚██████╔╝██║   ██║   ██████╔╝███████╗██║ ╚████║╚██████╗██║  ██║
  ╚═╝     ╚═╝  ╚═╝ ╚═════╝ ╚═╝   ╚═╝   ╚═════╝ ╚══════╝╚═╝  ╚═══╝ ╚═════╝╚═╝  ╚═╝

  Fruit Rating Bench v{}

  Rate • Rank • Share
"#,
        env!("CARGO_PKG_VERSION")
    );
}
