//! SSZ Static Core
//!
//! Deterministic generation of `ssz_static` conformance vectors.
//!
//! For every record type of a fork, and every randomization mode, this crate
//! generates values, serializes them and computes their `hash_tree_root`.
//! The same `(seed, type, mode, chaos, case index)` always produces the same
//! bytes.
//!
//! # Core Modules
//!
//! - [`catalog`]: per-fork [`TypeCatalog`] built from a preset
//! - [`random`]: [`SeedStream`], [`RandomizationMode`] and the [`ValueGenerator`]
//! - [`codec`]: the [`SszBackend`] seam and the built-in [`Ssz`] codec
//! - [`encode`]: [`Encoder`] projecting a value into its three case parts
//! - [`cases`]: [`TestCase`] and the lazy [`CaseEnumerator`]
//! - [`provider`]: settings table, [`TestProvider`] and [`RunCoordinator`]
//!
//! # Example
//!
//! ```ignore
//! use ssz_static_core::{RunConfig, RunCoordinator};
//!
//! let coordinator = RunCoordinator::new(RunConfig::default());
//! for case in coordinator.cases()? {
//!     let encoded = case.produce()?;
//!     println!("{} {}", case.id(), encoded.root_hex());
//! }
//! ```

#![allow(clippy::too_many_arguments)]

pub mod cases;
pub mod catalog;
pub mod codec;
pub mod encode;
pub mod error;
pub mod provider;
pub mod random;
pub mod report;

pub use cases::{CaseEnumerator, CaseProducer, TestCase, RUNNER_NAME};
pub use catalog::{Fork, TypeCatalog};
pub use codec::{Ssz, SszBackend};
pub use encode::{CasePart, EncodedCase, Encoder, PartData};
pub use error::GenerationError;
pub use provider::{default_settings, GenerationSetting, RunConfig, RunCoordinator, TestProvider};
pub use random::{GenerationLimits, RandomizationMode, SeedStream, ValueGenerator};
pub use report::{GenerationReport, ProviderSummary};
