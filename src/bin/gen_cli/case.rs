//! Case command - produce one case and print it

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use serde_json::json;

use ssz_static_core::{
    CaseProducer, Encoder, Fork, GenerationLimits, RandomizationMode, SeedStream, Ssz,
    TypeCatalog, ValueGenerator,
};
use ssz_static_types::encoding::to_hex_prefixed;
use ssz_static_types::{ConfigContext, MINIMAL};

#[derive(Parser, Debug)]
pub struct CaseCmd {
    #[arg(long, default_value = "phase0")]
    pub fork: Fork,

    #[arg(long, default_value = MINIMAL)]
    pub preset: String,

    /// Record type name, e.g. `Checkpoint`
    #[arg(long = "type")]
    pub type_name: String,

    #[arg(long, default_value = "random")]
    pub mode: RandomizationMode,

    #[arg(long)]
    pub chaos: bool,

    /// Setting seed the type stream is derived from
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Case index within the type
    #[arg(long, default_value_t = 0)]
    pub index: u64,

    #[arg(long)]
    pub configs_path: Option<PathBuf>,
}

impl CaseCmd {
    pub fn execute(&self, json_output: bool, verbose: bool) -> Result<()> {
        let ctx = ConfigContext::load(&self.preset, self.configs_path.as_deref())?;
        let catalog = TypeCatalog::for_fork(self.fork, &ctx)?;
        let (descriptor, type_index) = catalog
            .get(&self.type_name)
            .zip(catalog.index_of(&self.type_name))
            .ok_or_else(|| {
                anyhow!(
                    "Type '{}' is not in the {} catalog (see `list-types --fork {}`)",
                    self.type_name,
                    self.fork,
                    self.fork
                )
            })?;

        let producer = CaseProducer::new(
            descriptor.clone(),
            SeedStream::for_type(self.seed, type_index),
            self.index,
            self.mode,
            self.chaos,
            ValueGenerator::new(GenerationLimits::from_env()),
        );
        let encoded = producer.produce(&Encoder::new(Ssz).with_roundtrip_check(true))?;

        if json_output {
            let view = json!({
                "type": self.type_name,
                "suite": self.mode.suite_name(self.chaos),
                "case": format!("case_{}", self.index),
                "value": encoded.value,
                "serialized": to_hex_prefixed(&encoded.serialized),
                "root": encoded.root_hex(),
            });
            println!("{}", serde_json::to_string_pretty(&view)?);
            return Ok(());
        }

        println!(
            "\x1b[1m{}\x1b[0m {}/case_{}",
            self.type_name,
            self.mode.suite_name(self.chaos),
            self.index
        );
        println!("Root:       {}", encoded.root_hex());
        println!("Serialized: {} bytes", encoded.serialized.len());
        if verbose {
            println!("  {}", to_hex_prefixed(&encoded.serialized));
        }
        println!("Value:\n{}", serde_json::to_string_pretty(&encoded.value)?);
        Ok(())
    }
}
