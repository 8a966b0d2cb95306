//! ssz-static-gen: generator CLI for SSZ static conformance vectors
//!
//! ## Commands
//!
//! - **generate**: write every case of the settings table to an output directory
//! - **list-types**: list the record types of a fork's catalog
//! - **case**: produce one case and print its value, bytes and root
//!
//! ## Example Usage
//!
//! ```bash
//! # Full run into ./vectors
//! ssz-static-gen generate --output ./vectors
//!
//! # Only the minimal preset of altair, overwriting existing cases
//! ssz-static-gen generate -o ./vectors --fork altair --preset minimal --force
//!
//! # Inspect one case
//! ssz-static-gen case --fork phase0 --type Checkpoint --mode max
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod gen_cli;

use gen_cli::{case::CaseCmd, generate::GenerateCmd, list_types::ListTypesCmd};

#[derive(Parser)]
#[command(
    name = "ssz-static-gen",
    author,
    version,
    about = "SSZ static conformance vector generator",
    long_about = "Generates deterministic ssz_static test vectors (value, serialized bytes \
                  and hash_tree_root) for every consensus record type of each fork."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and write test vectors
    Generate(GenerateCmd),

    /// List the record types of a fork
    ListTypes(ListTypesCmd),

    /// Produce a single case and print it
    Case(CaseCmd),
}

fn main() -> Result<()> {
    let Cli {
        command,
        json,
        verbose,
    } = Cli::parse();

    match command {
        Commands::Generate(cmd) => cmd.execute(json, verbose),
        Commands::ListTypes(cmd) => cmd.execute(json),
        Commands::Case(cmd) => cmd.execute(json, verbose),
    }
}
