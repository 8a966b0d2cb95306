//! `hash_tree_root` via SHA-256 merkleization.
//!
//! Lists are padded to `next_pow2(limit)` chunks using precomputed zero
//! subtree hashes, so a list declared with a limit of 2^40 costs only
//! `O(len + depth)` hashes.

use std::sync::OnceLock;

use sha2::{Digest, Sha256};
use ssz_static_types::{TypeDescriptor, Value};

use super::serialize::{pack_bits, serialize};
use crate::error::GenerationError;

pub const BYTES_PER_CHUNK: usize = 32;
const BITS_PER_CHUNK: u64 = 256;
const MAX_DEPTH: usize = 64;

pub type Chunk = [u8; BYTES_PER_CHUNK];

pub fn sha256_32(bytes: &[u8]) -> Chunk {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..]);
    out
}

fn hash_pair(left: &Chunk, right: &Chunk) -> Chunk {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..]);
    out
}

/// `zero_hashes()[d]` is the root of a depth-`d` tree of zero chunks.
fn zero_hashes() -> &'static [Chunk] {
    static ZERO_HASHES: OnceLock<Vec<Chunk>> = OnceLock::new();
    ZERO_HASHES.get_or_init(|| {
        let mut hashes = vec![[0u8; 32]];
        for d in 0..MAX_DEPTH {
            hashes.push(hash_pair(&hashes[d], &hashes[d]));
        }
        hashes
    })
}

/// Depth of a tree with `next_pow2(max(leaves, 1))` leaves.
fn depth_for(leaves: u64) -> usize {
    if leaves <= 1 {
        0
    } else {
        (64 - (leaves - 1).leading_zeros()) as usize
    }
}

/// Merkle root of `chunks`, padded with zero chunks to `next_pow2(limit)`.
///
/// Without a limit the tree is padded to `next_pow2(chunks.len())`.
pub fn merkleize(chunks: Vec<Chunk>, limit: Option<u64>) -> Result<Chunk, GenerationError> {
    let count = chunks.len() as u64;
    let limit = limit.unwrap_or(count);
    if count > limit {
        return Err(GenerationError::mismatch(
            format!("at most {} chunks", limit),
            format!("{} chunks", count),
        ));
    }
    let depth = depth_for(limit);
    let zeros = zero_hashes();
    if chunks.is_empty() {
        return Ok(zeros[depth]);
    }

    let mut layer = chunks;
    for zero in zeros.iter().take(depth) {
        if layer.len() % 2 == 1 {
            layer.push(*zero);
        }
        layer = layer
            .chunks_exact(2)
            .map(|pair| hash_pair(&pair[0], &pair[1]))
            .collect();
    }
    Ok(layer[0])
}

pub fn mix_in_length(root: &Chunk, length: usize) -> Chunk {
    let mut len_chunk = [0u8; 32];
    len_chunk[..8].copy_from_slice(&(length as u64).to_le_bytes());
    hash_pair(root, &len_chunk)
}

/// Right-pad `bytes` with zeros and split into 32-byte chunks.
pub fn pack(bytes: &[u8]) -> Vec<Chunk> {
    bytes
        .chunks(BYTES_PER_CHUNK)
        .map(|piece| {
            let mut chunk = [0u8; 32];
            chunk[..piece.len()].copy_from_slice(piece);
            chunk
        })
        .collect()
}

/// Compute the `hash_tree_root` of `value` as an instance of `ty`.
pub fn hash_tree_root(ty: &TypeDescriptor, value: &Value) -> Result<Chunk, GenerationError> {
    match (ty, value) {
        (TypeDescriptor::UnsignedInteger { .. } | TypeDescriptor::Boolean, _) => {
            merkleize(pack(&serialize(ty, value)?), None)
        }
        (TypeDescriptor::ByteVector { .. }, _) => merkleize(pack(&serialize(ty, value)?), None),
        (TypeDescriptor::ByteList { limit }, Value::Bytes(bytes)) => {
            let root = merkleize(pack(&serialize(ty, value)?), Some(limit.div_ceil(32)))?;
            Ok(mix_in_length(&root, bytes.len()))
        }
        (TypeDescriptor::BitVector { length }, Value::Bits(bits)) => {
            serialize(ty, value)?;
            merkleize(pack(&pack_bits(bits)), Some(length.div_ceil(BITS_PER_CHUNK)))
        }
        (TypeDescriptor::BitList { limit }, Value::Bits(bits)) => {
            serialize(ty, value)?;
            let root = merkleize(pack(&pack_bits(bits)), Some(limit.div_ceil(BITS_PER_CHUNK)))?;
            Ok(mix_in_length(&root, bits.len()))
        }
        (TypeDescriptor::Vector { element, .. }, Value::Sequence(items)) => {
            if element.is_basic() {
                merkleize(pack(&serialize(ty, value)?), None)
            } else {
                serialize(ty, value)?;
                merkleize(element_roots(element, items)?, None)
            }
        }
        (TypeDescriptor::List { element, limit }, Value::Sequence(items)) => {
            let root = if element.is_basic() {
                let chunk_limit = basic_chunk_limit(element, *limit);
                merkleize(pack(&serialize(ty, value)?), Some(chunk_limit))?
            } else {
                serialize(ty, value)?;
                merkleize(element_roots(element, items)?, Some(*limit))?
            };
            Ok(mix_in_length(&root, items.len()))
        }
        (TypeDescriptor::Record(record), Value::Record(fields)) => {
            if record.fields.len() != fields.len() {
                return Err(GenerationError::mismatch(
                    ty,
                    format!("record with {} fields", fields.len()),
                ));
            }
            let roots = record
                .fields
                .iter()
                .zip(fields)
                .map(|((_, field_ty), field)| hash_tree_root(field_ty, field))
                .collect::<Result<Vec<_>, _>>()?;
            merkleize(roots, None)
        }
        (ty, value) => Err(GenerationError::mismatch(ty, value.kind())),
    }
}

fn element_roots(element: &TypeDescriptor, items: &[Value]) -> Result<Vec<Chunk>, GenerationError> {
    items
        .iter()
        .map(|item| hash_tree_root(element, item))
        .collect()
}

fn basic_chunk_limit(element: &TypeDescriptor, limit: u64) -> u64 {
    let size = element.fixed_size().unwrap_or(1) as u64;
    limit.saturating_mul(size).div_ceil(BYTES_PER_CHUNK as u64)
}
