//! Generate command - write every case of the settings table to disk

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ssz_static_core::{Fork, GenerationLimits, RunConfig, RunCoordinator};
use ssz_static_gen::CaseWriter;
use ssz_static_types::env_utils::env_bool;

use super::output::{print_report, write_report};

#[derive(Parser, Debug)]
pub struct GenerateCmd {
    /// Output root; cases land under <output>/<preset>/<fork>/ssz_static/
    #[arg(long, short)]
    pub output: PathBuf,

    /// Forks to generate (default: all)
    #[arg(long = "fork", value_delimiter = ',')]
    pub forks: Vec<Fork>,

    /// Only run settings for these presets (default: all)
    #[arg(long = "preset", value_delimiter = ',')]
    pub presets: Vec<String>,

    /// Directory with `<preset>.json` files overriding preset constants
    #[arg(long)]
    pub configs_path: Option<PathBuf>,

    /// Cap on generated byte-list lengths [env: SSZ_STATIC_MAX_BYTES_LENGTH]
    #[arg(long)]
    pub max_bytes_length: Option<u64>,

    /// Cap on generated list and bitlist lengths [env: SSZ_STATIC_MAX_LIST_LENGTH]
    #[arg(long)]
    pub max_list_length: Option<u64>,

    /// Override the cases-per-type of changing and chaos settings
    #[arg(long)]
    pub count: Option<u64>,

    /// Overwrite existing cases [env: SSZ_STATIC_FORCE]
    #[arg(long)]
    pub force: bool,

    /// Write cases one at a time instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Decode every serialized case and check its root before writing
    #[arg(long)]
    pub verify: bool,

    /// Also write the run report as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl GenerateCmd {
    pub fn execute(&self, json_output: bool, verbose: bool) -> Result<()> {
        let coordinator = RunCoordinator::new(self.run_config());
        let writer = CaseWriter::new(&self.output)
            .with_force(self.force || env_bool("SSZ_STATIC_FORCE"))
            .with_parallel(!self.sequential)
            .with_roundtrip_check(self.verify);

        if verbose && !json_output {
            for provider in coordinator.providers() {
                eprintln!("queued {} (seed {})", provider.id(), provider.setting.seed);
            }
        }

        let report = writer
            .run(&coordinator)
            .with_context(|| format!("Generation into {} failed", self.output.display()))?;

        if let Some(path) = &self.report {
            write_report(path, &report)?;
        }
        print_report(&report, json_output, verbose)
    }

    pub fn limits(&self) -> GenerationLimits {
        let mut limits = GenerationLimits::from_env();
        if let Some(max) = self.max_bytes_length {
            limits.max_bytes_length = max;
        }
        if let Some(max) = self.max_list_length {
            limits.max_list_length = max;
        }
        limits
    }

    fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::default().with_limits(self.limits());
        if !self.forks.is_empty() {
            config = config.with_forks(self.forks.clone());
        }
        if !self.presets.is_empty() {
            config = config.with_presets(self.presets.clone());
        }
        if let Some(path) = &self.configs_path {
            config = config.with_configs_path(path);
        }
        if let Some(count) = self.count {
            for setting in &mut config.settings {
                setting.count_if_variable = count;
            }
        }
        config
    }
}
