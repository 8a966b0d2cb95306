//! Per-fork type catalogs.
//!
//! Each fork module lists its named definitions (records and aliases of basic
//! types, as a fork's type module would declare them) against a preset. A
//! [`TypeCatalog`] keeps only the record definitions, ordered alphabetically
//! by name. That order fixes each type's seed, so changing it changes every
//! generated vector.

pub mod altair;
pub mod phase0;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ssz_static_types::{ConfigContext, Preset, TypeDescriptor};

use crate::error::GenerationError;

/// A named type definition: a record or an alias of another type.
pub type Definition = (&'static str, TypeDescriptor);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fork {
    Phase0,
    Altair,
}

impl Fork {
    pub const ALL: [Fork; 2] = [Fork::Phase0, Fork::Altair];

    pub fn name(self) -> &'static str {
        match self {
            Fork::Phase0 => "phase0",
            Fork::Altair => "altair",
        }
    }

    /// Every named definition of this fork under `preset`.
    pub fn definitions(self, preset: &Preset) -> Vec<Definition> {
        match self {
            Fork::Phase0 => phase0::definitions(preset),
            Fork::Altair => altair::definitions(preset),
        }
    }
}

impl fmt::Display for Fork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Fork {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fork::ALL
            .into_iter()
            .find(|fork| fork.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| GenerationError::UnknownFork(s.to_string()))
    }
}

/// Record types of one fork, keyed and ordered by name.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    fork: Fork,
    preset_name: String,
    entries: BTreeMap<String, Arc<TypeDescriptor>>,
}

impl TypeCatalog {
    /// Build the catalog of `fork` from an explicit configuration context.
    pub fn for_fork(fork: Fork, ctx: &ConfigContext) -> Result<Self, GenerationError> {
        ctx.preset
            .check_bounds()
            .map_err(GenerationError::InvalidDescriptor)?;
        Self::from_definitions(fork, &ctx.preset_name, fork.definitions(&ctx.preset))
    }

    /// Select the record definitions out of `definitions`.
    ///
    /// Aliases are dropped. A record registered under a name other than its
    /// own, or two definitions sharing a name, is a [`GenerationError::CatalogConflict`].
    pub fn from_definitions<I, S>(
        fork: Fork,
        preset_name: &str,
        definitions: I,
    ) -> Result<Self, GenerationError>
    where
        I: IntoIterator<Item = (S, TypeDescriptor)>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let mut entries = BTreeMap::new();
        for (name, descriptor) in definitions {
            let name: String = name.into();
            if !seen.insert(name.clone()) {
                return Err(GenerationError::CatalogConflict(format!(
                    "'{}' is defined twice in {}",
                    name, fork
                )));
            }
            let Some(record_name) = descriptor.record_name() else {
                continue;
            };
            if record_name != name {
                return Err(GenerationError::CatalogConflict(format!(
                    "record {} is registered as '{}'",
                    record_name, name
                )));
            }
            descriptor.validate()?;
            entries.insert(name, Arc::new(descriptor));
        }
        Ok(Self {
            fork,
            preset_name: preset_name.to_string(),
            entries,
        })
    }

    pub fn fork(&self) -> Fork {
        self.fork
    }

    pub fn preset_name(&self) -> &str {
        &self.preset_name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.entries.get(name)
    }

    /// Position of `name` in catalog order (its type index for seeding).
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.keys().position(|key| key == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<TypeDescriptor>)> {
        self.entries.iter().map(|(name, ty)| (name.as_str(), ty))
    }
}

// ---- Basic aliases shared by the fork modules ----

pub(crate) fn uint64() -> TypeDescriptor {
    TypeDescriptor::uint(64)
}

pub(crate) fn bytes32() -> TypeDescriptor {
    TypeDescriptor::bytes(32)
}

pub(crate) fn root() -> TypeDescriptor {
    bytes32()
}

pub(crate) fn version() -> TypeDescriptor {
    TypeDescriptor::bytes(4)
}

pub(crate) fn domain() -> TypeDescriptor {
    bytes32()
}

pub(crate) fn bls_pubkey() -> TypeDescriptor {
    TypeDescriptor::bytes(48)
}

pub(crate) fn bls_signature() -> TypeDescriptor {
    TypeDescriptor::bytes(96)
}
