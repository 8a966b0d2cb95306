//! Seeded, type-directed value generation.
//!
//! - [`seed`]: [`SeedStream`] and its per-type / per-case derivation
//! - [`mode`]: [`RandomizationMode`] and the policy table behind it
//! - [`value_gen`]: the recursive [`ValueGenerator`]

pub mod mode;
pub mod seed;
pub mod value_gen;

pub use mode::{Fill, LengthRule, ModePolicy, RandomizationMode};
pub use seed::{SeedStream, TYPE_SEED_STRIDE};
pub use value_gen::{
    GenerationLimits, ValueGenerator, DEFAULT_MAX_BYTES_LENGTH, DEFAULT_MAX_LIST_LENGTH,
};
