//! SSZ codec.
//!
//! The encoder reaches serialization and hashing only through [`SszBackend`],
//! so another implementation can be dropped in to cross-check outputs.
//! [`Ssz`] is the built-in one.

pub mod deserialize;
pub mod merkle;
pub mod serialize;

use ssz_static_types::{TypeDescriptor, Value};

use crate::error::GenerationError;

pub use merkle::{hash_tree_root, merkleize, mix_in_length, Chunk};

/// Serialization and hashing operations the encoder relies on.
pub trait SszBackend: Send + Sync {
    fn serialize(&self, ty: &TypeDescriptor, value: &Value) -> Result<Vec<u8>, GenerationError>;

    fn deserialize(&self, ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, GenerationError>;

    fn hash_tree_root(&self, ty: &TypeDescriptor, value: &Value) -> Result<Chunk, GenerationError>;
}

/// Reference SSZ implementation (little-endian, 4-byte offsets, SHA-256).
#[derive(Debug, Clone, Copy, Default)]
pub struct Ssz;

impl SszBackend for Ssz {
    fn serialize(&self, ty: &TypeDescriptor, value: &Value) -> Result<Vec<u8>, GenerationError> {
        serialize::serialize(ty, value)
    }

    fn deserialize(&self, ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, GenerationError> {
        deserialize::deserialize(ty, bytes)
    }

    fn hash_tree_root(&self, ty: &TypeDescriptor, value: &Value) -> Result<Chunk, GenerationError> {
        merkle::hash_tree_root(ty, value)
    }
}
