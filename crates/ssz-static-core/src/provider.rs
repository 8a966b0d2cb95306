//! Settings, providers and the run coordinator.
//!
//! A [`TestProvider`] is one `(fork, setting)` pair: it resolves the preset
//! into a [`ConfigContext`], builds the fork's catalog from it and enumerates
//! cases. The [`RunCoordinator`] expands a [`RunConfig`] into providers and
//! concatenates their cases.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use ssz_static_types::{ConfigContext, MAINNET, MINIMAL};
use tracing::{debug, info};

use crate::cases::{CaseEnumerator, TestCase};
use crate::catalog::{Fork, TypeCatalog};
use crate::random::{GenerationLimits, RandomizationMode, ValueGenerator};

/// Cases per type for changing modes and chaos in the default table.
pub const DEFAULT_CASES_IF_RANDOM: u64 = 30;
/// Cases per type for the mainnet random entry in the default table.
pub const DEFAULT_MAINNET_CASES: u64 = 5;

/// One row of the settings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSetting {
    pub seed: u64,
    pub preset: String,
    pub mode: RandomizationMode,
    pub chaos: bool,
    /// Cases per type when the mode is changing or chaos is on.
    pub count_if_variable: u64,
}

impl GenerationSetting {
    pub fn new(
        seed: u64,
        preset: impl Into<String>,
        mode: RandomizationMode,
        chaos: bool,
        count_if_variable: u64,
    ) -> Self {
        Self {
            seed,
            preset: preset.into(),
            mode,
            chaos,
            count_if_variable,
        }
    }

    /// Cases emitted per type: 1 for fixed modes without chaos.
    pub fn case_count(&self) -> u64 {
        if self.chaos || self.mode.is_changing() {
            self.count_if_variable
        } else {
            1
        }
    }

    pub fn suite_name(&self) -> String {
        self.mode.suite_name(self.chaos)
    }
}

/// The standard settings table.
///
/// Seeds start at 1 and increase by one per row: every mode on `minimal`,
/// then random+chaos on `minimal`, then random on `mainnet`.
pub fn default_settings() -> Vec<GenerationSetting> {
    let mut settings = Vec::new();
    let mut seed = 1;
    for mode in RandomizationMode::ALL {
        settings.push(GenerationSetting::new(
            seed,
            MINIMAL,
            mode,
            false,
            DEFAULT_CASES_IF_RANDOM,
        ));
        seed += 1;
    }
    settings.push(GenerationSetting::new(
        seed,
        MINIMAL,
        RandomizationMode::Random,
        true,
        DEFAULT_CASES_IF_RANDOM,
    ));
    seed += 1;
    settings.push(GenerationSetting::new(
        seed,
        MAINNET,
        RandomizationMode::Random,
        false,
        DEFAULT_MAINNET_CASES,
    ));
    settings
}

/// What to generate.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub forks: Vec<Fork>,
    pub settings: Vec<GenerationSetting>,
    /// Only run settings whose preset is listed; `None` runs all.
    pub preset_filter: Option<Vec<String>>,
    /// Directory holding `<preset>.json` override files.
    pub configs_path: Option<PathBuf>,
    pub limits: GenerationLimits,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            forks: Fork::ALL.to_vec(),
            settings: default_settings(),
            preset_filter: None,
            configs_path: None,
            limits: GenerationLimits::default(),
        }
    }
}

impl RunConfig {
    pub fn with_forks(mut self, forks: Vec<Fork>) -> Self {
        self.forks = forks;
        self
    }

    pub fn with_settings(mut self, settings: Vec<GenerationSetting>) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_presets(mut self, presets: Vec<String>) -> Self {
        self.preset_filter = Some(presets);
        self
    }

    pub fn with_configs_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.configs_path = Some(path.into());
        self
    }

    pub fn with_limits(mut self, limits: GenerationLimits) -> Self {
        self.limits = limits;
        self
    }

    fn includes_preset(&self, preset: &str) -> bool {
        self.preset_filter
            .as_ref()
            .map_or(true, |presets| presets.iter().any(|p| p == preset))
    }
}

/// Cases of one `(fork, setting)` pair.
#[derive(Debug, Clone)]
pub struct TestProvider {
    pub fork: Fork,
    pub setting: GenerationSetting,
    configs_path: Option<PathBuf>,
    generator: ValueGenerator,
}

impl TestProvider {
    pub fn new(
        fork: Fork,
        setting: GenerationSetting,
        configs_path: Option<PathBuf>,
        limits: GenerationLimits,
    ) -> Self {
        Self {
            fork,
            setting,
            configs_path,
            generator: ValueGenerator::new(limits),
        }
    }

    /// `<preset>/<fork>/<suite>`
    pub fn id(&self) -> String {
        format!(
            "{}/{}/{}",
            self.setting.preset,
            self.fork,
            self.setting.suite_name()
        )
    }

    /// Resolve the preset (with overrides) into a configuration context.
    pub fn prepare(&self) -> Result<ConfigContext> {
        ConfigContext::load(&self.setting.preset, self.configs_path.as_deref())
            .with_context(|| format!("Failed to prepare provider {}", self.id()))
    }

    pub fn catalog(&self, ctx: &ConfigContext) -> Result<TypeCatalog> {
        TypeCatalog::for_fork(self.fork, ctx)
            .with_context(|| format!("Failed to build {} catalog for {}", self.fork, ctx.preset_name))
    }

    /// Prepare and return the lazy case sequence.
    pub fn cases(&self) -> Result<CaseEnumerator> {
        let ctx = self.prepare()?;
        let catalog = self.catalog(&ctx)?;
        debug!(
            provider = %self.id(),
            types = catalog.len(),
            cases_per_type = self.setting.case_count(),
            "prepared provider"
        );
        Ok(CaseEnumerator::new(&catalog, &self.setting, self.generator))
    }
}

/// Expands a [`RunConfig`] into providers.
#[derive(Debug, Clone)]
pub struct RunCoordinator {
    config: RunConfig,
}

impl RunCoordinator {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Providers in run order: forks outer, settings inner.
    pub fn providers(&self) -> Vec<TestProvider> {
        self.config
            .forks
            .iter()
            .flat_map(|fork| {
                self.config
                    .settings
                    .iter()
                    .filter(|setting| self.config.includes_preset(&setting.preset))
                    .map(move |setting| {
                        TestProvider::new(
                            *fork,
                            setting.clone(),
                            self.config.configs_path.clone(),
                            self.config.limits,
                        )
                    })
            })
            .collect()
    }

    /// Ids of providers excluded by the fork or preset filter.
    pub fn skipped_providers(&self) -> Vec<String> {
        let mut skipped = Vec::new();
        for fork in Fork::ALL {
            let fork_selected = self.config.forks.contains(&fork);
            for setting in &self.config.settings {
                let reason = if !fork_selected {
                    "fork not selected"
                } else if !self.config.includes_preset(&setting.preset) {
                    "preset not selected"
                } else {
                    continue;
                };
                let id = format!("{}/{}/{}", setting.preset, fork, setting.suite_name());
                info!(provider = %id, reason, "skipping provider");
                skipped.push(id);
            }
        }
        skipped
    }

    /// All cases of all providers, concatenated in run order.
    ///
    /// Every provider is prepared up front so a bad preset fails before any
    /// case is produced.
    pub fn cases(&self) -> Result<impl Iterator<Item = TestCase>> {
        let enumerators = self
            .providers()
            .iter()
            .map(TestProvider::cases)
            .collect::<Result<Vec<_>>>()?;
        Ok(enumerators.into_iter().flatten())
    }
}
