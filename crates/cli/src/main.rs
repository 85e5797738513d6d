//! Vitrina CLI - Catalog maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Check a catalog file
//! vitrina catalog validate data/products.json
//!
//! # Add a product
//! vitrina catalog add data/products.json --title "Taza" --price 25 --currency PEN
//!
//! # Show vendors, collections and the highest price
//! vitrina catalog stats data/products.json
//! ```
//!
//! # Commands
//!
//! - `catalog validate` - Load a catalog the way the storefront does
//! - `catalog add` - Append a single-variant product
//! - `catalog stats` - Print catalog aggregates

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::catalog::{self, NewProduct};

const DEFAULT_CATALOG: &str = "data/products.json";

#[derive(Parser)]
#[command(name = "vitrina")]
#[command(author, version, about = "Vitrina CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit catalog files
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Check that a catalog file loads
    Validate {
        /// Catalog file
        #[arg(default_value = DEFAULT_CATALOG)]
        path: PathBuf,
    },
    /// Append a product with one variant
    Add {
        /// Catalog file (created if missing)
        path: PathBuf,

        #[command(flatten)]
        product: NewProduct,
    },
    /// Print vendors, collections and the highest price
    Stats {
        /// Catalog file
        #[arg(default_value = DEFAULT_CATALOG)]
        path: PathBuf,
    },
}

fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Validate { path } => {
                let summary = catalog::validate(&path)?;
                catalog::print_summary(&path, &summary);
            }
            CatalogAction::Add { path, product } => {
                let record = catalog::add(&path, product, &mut rand::rng())?;
                catalog::print_added(&record);
            }
            CatalogAction::Stats { path } => {
                let stats = catalog::stats(&path)?;
                catalog::print_stats(&stats);
            }
        },
    }
    Ok(())
}
