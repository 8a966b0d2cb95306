//! List-types command - show the record types of a fork's catalog

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use ssz_static_core::{Fork, TypeCatalog};
use ssz_static_types::{ConfigContext, MINIMAL};

#[derive(Parser, Debug)]
pub struct ListTypesCmd {
    /// Fork whose catalog to list
    #[arg(long, default_value = "phase0")]
    pub fork: Fork,

    /// Preset used to size the types
    #[arg(long, default_value = MINIMAL)]
    pub preset: String,

    /// Directory with `<preset>.json` override files
    #[arg(long)]
    pub configs_path: Option<PathBuf>,
}

#[derive(Serialize)]
struct TypeEntry {
    index: usize,
    name: String,
    fixed_size: Option<usize>,
}

impl ListTypesCmd {
    pub fn execute(&self, json_output: bool) -> Result<()> {
        let ctx = ConfigContext::load(&self.preset, self.configs_path.as_deref())?;
        let catalog = TypeCatalog::for_fork(self.fork, &ctx)?;

        let entries: Vec<TypeEntry> = catalog
            .iter()
            .enumerate()
            .map(|(index, (name, ty))| TypeEntry {
                index,
                name: name.to_string(),
                fixed_size: ty.fixed_size(),
            })
            .collect();

        if json_output {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        println!(
            "\x1b[1m{} types\x1b[0m ({} preset, {} records)",
            self.fork,
            self.preset,
            entries.len()
        );
        for entry in &entries {
            match entry.fixed_size {
                Some(size) => println!("  {:>3}  {:<28} {} bytes", entry.index, entry.name, size),
                None => println!("  {:>3}  {:<28} variable", entry.index, entry.name),
            }
        }
        Ok(())
    }
}
