//! Size presets and the configuration context built from them.
//!
//! A preset fixes the declared bounds (vector lengths, list limits) that the
//! type catalog bakes into its descriptors. Presets are resolved by name and
//! may be adjusted by a JSON override file; the result is an immutable
//! [`ConfigContext`] handed explicitly to catalog construction.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::descriptor::DescriptorError;

pub const MINIMAL: &str = "minimal";
pub const MAINNET: &str = "mainnet";

/// Names of the built-in presets.
pub const PRESET_NAMES: [&str; 2] = [MINIMAL, MAINNET];

/// Largest value any preset constant may take (`VALIDATOR_REGISTRY_LIMIT` on mainnet).
pub const MAX_PRESET_VALUE: u64 = 1 << 40;

/// Size constants referenced by the phase0 and altair record definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct Preset {
    // Phase 0
    pub max_validators_per_committee: u64,
    pub slots_per_epoch: u64,
    pub epochs_per_eth1_voting_period: u64,
    pub slots_per_historical_root: u64,
    pub epochs_per_historical_vector: u64,
    pub epochs_per_slashings_vector: u64,
    pub historical_roots_limit: u64,
    pub validator_registry_limit: u64,
    pub max_proposer_slashings: u64,
    pub max_attester_slashings: u64,
    pub max_attestations: u64,
    pub max_deposits: u64,
    pub max_voluntary_exits: u64,
    pub deposit_contract_tree_depth: u64,
    pub justification_bits_length: u64,
    // Altair
    pub sync_committee_size: u64,
    pub sync_committee_subnet_count: u64,
}

impl Preset {
    pub fn mainnet() -> Self {
        Self {
            max_validators_per_committee: 2048,
            slots_per_epoch: 32,
            epochs_per_eth1_voting_period: 64,
            slots_per_historical_root: 8192,
            epochs_per_historical_vector: 65536,
            epochs_per_slashings_vector: 8192,
            historical_roots_limit: 1 << 24,
            validator_registry_limit: 1 << 40,
            max_proposer_slashings: 16,
            max_attester_slashings: 2,
            max_attestations: 128,
            max_deposits: 16,
            max_voluntary_exits: 16,
            deposit_contract_tree_depth: 32,
            justification_bits_length: 4,
            sync_committee_size: 512,
            sync_committee_subnet_count: 4,
        }
    }

    pub fn minimal() -> Self {
        Self {
            slots_per_epoch: 8,
            epochs_per_eth1_voting_period: 4,
            slots_per_historical_root: 64,
            epochs_per_historical_vector: 64,
            epochs_per_slashings_vector: 64,
            sync_committee_size: 32,
            ..Self::mainnet()
        }
    }

    /// Resolve a built-in preset by name.
    pub fn by_name(name: &str) -> Result<Self> {
        match name {
            MINIMAL => Ok(Self::minimal()),
            MAINNET => Ok(Self::mainnet()),
            other => Err(anyhow!(
                "Unknown preset '{}' (expected one of: {})",
                other,
                PRESET_NAMES.join(", ")
            )),
        }
    }

    /// Apply a partial override object (`{"SLOTS_PER_EPOCH": 4, ...}`).
    ///
    /// Unknown keys are rejected so a typo cannot silently fall back to the
    /// built-in value.
    pub fn with_overrides(&self, overrides: &serde_json::Value) -> Result<Self> {
        let overrides = overrides
            .as_object()
            .ok_or_else(|| anyhow!("Preset overrides must be a JSON object"))?;
        let mut merged = serde_json::to_value(self)?;
        let fields = merged
            .as_object_mut()
            .ok_or_else(|| anyhow!("Preset did not serialize to an object"))?;
        for (key, value) in overrides {
            if !fields.contains_key(key) {
                return Err(anyhow!("Unknown preset constant '{}'", key));
            }
            fields.insert(key.clone(), value.clone());
        }
        let preset: Preset =
            serde_json::from_value(merged).map_err(|e| anyhow!("Invalid preset override: {}", e))?;
        preset.check_bounds()?;
        Ok(preset)
    }

    /// Check every constant is in `1..=MAX_PRESET_VALUE`.
    pub fn check_bounds(&self) -> Result<(), DescriptorError> {
        let fields = match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(fields)) => fields,
            _ => return Ok(()),
        };
        for (key, value) in fields {
            let in_range = value
                .as_u64()
                .is_some_and(|n| (1..=MAX_PRESET_VALUE).contains(&n));
            if !in_range {
                return Err(DescriptorError {
                    path: format!("preset.{}", key),
                    reason: format!("{} is outside 1..={}", value, MAX_PRESET_VALUE),
                });
            }
        }
        Ok(())
    }
}

/// Immutable configuration a catalog is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigContext {
    pub preset_name: String,
    pub preset: Preset,
}

impl ConfigContext {
    pub fn new(preset_name: impl Into<String>, preset: Preset) -> Self {
        Self {
            preset_name: preset_name.into(),
            preset,
        }
    }

    /// Resolve a built-in preset without overrides.
    pub fn builtin(preset_name: &str) -> Result<Self> {
        Ok(Self::new(preset_name, Preset::by_name(preset_name)?))
    }

    /// Resolve `preset_name`, applying `<configs_path>/<preset_name>.json` if present.
    pub fn load(preset_name: &str, configs_path: Option<&Path>) -> Result<Self> {
        let mut preset = Preset::by_name(preset_name)?;
        if let Some(dir) = configs_path {
            let file = dir.join(format!("{}.json", preset_name));
            if file.exists() {
                let text = std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read preset file {}", file.display()))?;
                let overrides: serde_json::Value = serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse preset file {}", file.display()))?;
                preset = preset
                    .with_overrides(&overrides)
                    .with_context(|| format!("In preset file {}", file.display()))?;
            }
        }
        Ok(Self::new(preset_name, preset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_minimal_differs_from_mainnet() {
        let minimal = Preset::minimal();
        let mainnet = Preset::mainnet();
        assert_eq!(minimal.slots_per_epoch, 8);
        assert_eq!(mainnet.slots_per_epoch, 32);
        assert_eq!(minimal.validator_registry_limit, mainnet.validator_registry_limit);
    }

    #[test]
    fn test_unknown_preset() {
        let err = Preset::by_name("testnet").unwrap_err();
        assert!(err.to_string().contains("Unknown preset 'testnet'"));
    }

    #[test]
    fn test_overrides_apply() {
        let preset = Preset::minimal()
            .with_overrides(&serde_json::json!({ "SLOTS_PER_EPOCH": 4 }))
            .unwrap();
        assert_eq!(preset.slots_per_epoch, 4);
        assert_eq!(preset.max_deposits, 16);
    }

    #[test]
    fn test_overrides_reject_unknown_keys() {
        let err = Preset::minimal()
            .with_overrides(&serde_json::json!({ "SLOTS_PER_EPOH": 4 }))
            .unwrap_err();
        assert!(err.to_string().contains("SLOTS_PER_EPOH"));
    }

    #[test]
    fn test_builtin_presets_in_bounds() {
        assert!(Preset::minimal().check_bounds().is_ok());
        assert!(Preset::mainnet().check_bounds().is_ok());
    }

    #[test]
    fn test_load_rejects_out_of_range_override() -> Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(
            dir.path().join("minimal.json"),
            r#"{"DEPOSIT_CONTRACT_TREE_DEPTH": 18446744073709551615}"#,
        )?;

        let err = ConfigContext::load(MINIMAL, Some(dir.path())).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("minimal.json"), "{}", message);
        assert!(message.contains("preset.DEPOSIT_CONTRACT_TREE_DEPTH"), "{}", message);

        let zero = Preset::minimal().with_overrides(&serde_json::json!({ "MAX_DEPOSITS": 0 }));
        assert!(zero.is_err());
        Ok(())
    }

    #[test]
    fn test_load_from_configs_path() -> Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(
            dir.path().join("minimal.json"),
            r#"{"SYNC_COMMITTEE_SIZE": 16}"#,
        )?;

        let ctx = ConfigContext::load(MINIMAL, Some(dir.path()))?;
        assert_eq!(ctx.preset.sync_committee_size, 16);

        // No file for mainnet: built-in values.
        let ctx = ConfigContext::load(MAINNET, Some(dir.path()))?;
        assert_eq!(ctx.preset, Preset::mainnet());
        Ok(())
    }
}
