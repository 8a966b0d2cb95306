//! Type-directed value synthesis.
//!
//! The generator walks a [`TypeDescriptor`] and builds a [`Value`] of exactly
//! that shape. Content and lengths follow the [`ModePolicy`] of the active
//! mode; collection lengths are capped at `min(declared, external)` where the
//! external caps come from [`GenerationLimits`].

use std::sync::Arc;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use ssz_static_types::env_utils::env_var_or;
use ssz_static_types::{GeneratedValue, TypeDescriptor, Uint, Value};
use tracing::trace;

use super::mode::{Fill, RandomizationMode};
use super::seed::SeedStream;
use crate::error::GenerationError;

pub const DEFAULT_MAX_BYTES_LENGTH: u64 = 1000;
pub const DEFAULT_MAX_LIST_LENGTH: u64 = 10;

/// External caps on generated collection lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationLimits {
    /// Cap for `ByteList` lengths.
    pub max_bytes_length: u64,
    /// Cap for `List` and `Bitlist` lengths.
    pub max_list_length: u64,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            max_bytes_length: DEFAULT_MAX_BYTES_LENGTH,
            max_list_length: DEFAULT_MAX_LIST_LENGTH,
        }
    }
}

impl GenerationLimits {
    /// Defaults, overridden by `SSZ_STATIC_MAX_BYTES_LENGTH` and
    /// `SSZ_STATIC_MAX_LIST_LENGTH` when set.
    pub fn from_env() -> Self {
        Self {
            max_bytes_length: env_var_or("SSZ_STATIC_MAX_BYTES_LENGTH", DEFAULT_MAX_BYTES_LENGTH),
            max_list_length: env_var_or("SSZ_STATIC_MAX_LIST_LENGTH", DEFAULT_MAX_LIST_LENGTH),
        }
    }
}

/// Recursive value generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueGenerator {
    limits: GenerationLimits,
}

impl ValueGenerator {
    pub fn new(limits: GenerationLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> GenerationLimits {
        self.limits
    }

    /// Generate a value for `descriptor`, drawing randomness from `stream`.
    ///
    /// With `chaos` set, every recursive step draws its own mode uniformly
    /// from [`RandomizationMode::ALL`] before applying that mode's policy.
    pub fn generate(
        &self,
        stream: &mut SeedStream,
        descriptor: Arc<TypeDescriptor>,
        mode: RandomizationMode,
        chaos: bool,
    ) -> Result<GeneratedValue, GenerationError> {
        descriptor.validate()?;
        let value = self.gen_value(stream, &descriptor, mode, chaos);
        Ok(GeneratedValue::new(descriptor, value))
    }

    fn gen_value(
        &self,
        rng: &mut SeedStream,
        ty: &TypeDescriptor,
        mode: RandomizationMode,
        chaos: bool,
    ) -> Value {
        let mode = step_mode(rng, mode, chaos);
        let policy = mode.policy();
        match ty {
            TypeDescriptor::UnsignedInteger { bits } => {
                Value::Uint(gen_uint(rng, *bits, policy.fill))
            }
            TypeDescriptor::Boolean => Value::Bool(gen_bool(rng, policy.fill)),
            TypeDescriptor::ByteVector { length } => {
                Value::Bytes(gen_bytes(rng, *length as usize, policy.fill))
            }
            TypeDescriptor::ByteList { limit } => {
                let bound = (*limit).min(self.limits.max_bytes_length);
                let len = policy
                    .byte_list_length
                    .resolve(bound, |b| rng.gen_range(0..=b));
                Value::Bytes(gen_bytes(rng, len as usize, policy.fill))
            }
            TypeDescriptor::Vector { element, length } => Value::Sequence(
                (0..*length)
                    .map(|_| self.gen_value(rng, element, mode, chaos))
                    .collect(),
            ),
            TypeDescriptor::List { element, limit } => {
                let len = self.list_length(rng, *limit, mode);
                Value::Sequence(
                    (0..len)
                        .map(|_| self.gen_value(rng, element, mode, chaos))
                        .collect(),
                )
            }
            TypeDescriptor::BitVector { length } => {
                Value::Bits((0..*length).map(|_| gen_bit(rng, mode, chaos)).collect())
            }
            TypeDescriptor::BitList { limit } => {
                let len = self.list_length(rng, *limit, mode);
                Value::Bits((0..len).map(|_| gen_bit(rng, mode, chaos)).collect())
            }
            TypeDescriptor::Record(record) => Value::Record(
                record
                    .fields
                    .iter()
                    .map(|(_, field)| self.gen_value(rng, field, mode, chaos))
                    .collect(),
            ),
        }
    }

    fn list_length(&self, rng: &mut SeedStream, limit: u64, mode: RandomizationMode) -> u64 {
        let bound = limit.min(self.limits.max_list_length);
        mode.policy()
            .list_length
            .resolve(bound, |b| rng.gen_range(0..=b))
    }
}

/// The mode for one recursive step: a fresh uniform draw under chaos.
fn step_mode(rng: &mut SeedStream, mode: RandomizationMode, chaos: bool) -> RandomizationMode {
    if !chaos {
        return mode;
    }
    let drawn = RandomizationMode::ALL[rng.gen_range(0..RandomizationMode::ALL.len())];
    trace!(mode = %drawn, "chaos mode draw");
    drawn
}

/// A bit is generated as a `Boolean` element, with its own chaos draw.
fn gen_bit(rng: &mut SeedStream, mode: RandomizationMode, chaos: bool) -> bool {
    let mode = step_mode(rng, mode, chaos);
    gen_bool(rng, mode.policy().fill)
}

fn gen_bool(rng: &mut SeedStream, fill: Fill) -> bool {
    match fill {
        Fill::Zero => false,
        Fill::One | Fill::Max => true,
        Fill::Uniform => rng.gen_bool(0.5),
    }
}

fn gen_uint(rng: &mut SeedStream, bits: u16, fill: Fill) -> Uint {
    match fill {
        Fill::Zero => Uint::zero(bits),
        Fill::One => Uint::from_u64(bits, 1),
        Fill::Max => Uint::max(bits),
        Fill::Uniform => {
            let mut limbs = [0u64; 4];
            for limb in limbs.iter_mut().take((bits as usize).div_ceil(64)) {
                *limb = rng.next_u64();
            }
            Uint::from_limbs(bits, limbs)
        }
    }
}

fn gen_bytes(rng: &mut SeedStream, len: usize, fill: Fill) -> Vec<u8> {
    match fill {
        Fill::Zero => vec![0x00; len],
        Fill::One => vec![0x01; len],
        Fill::Max => vec![0xff; len],
        Fill::Uniform => {
            let mut bytes = vec![0u8; len];
            rng.fill_bytes(&mut bytes);
            bytes
        }
    }
}
