//! Deterministic seed streams.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Spacing between the seeds of consecutive types in a catalog.
pub const TYPE_SEED_STRIDE: u64 = 1000;

/// A PRNG stream that remembers the seed it was created from.
///
/// [`SeedStream::fork`] derives child streams from that origin seed, not from
/// the consumed state, so a child is the same no matter how much of the
/// parent has been drawn.
#[derive(Debug, Clone)]
pub struct SeedStream {
    origin: u64,
    rng: StdRng,
}

impl SeedStream {
    pub fn new(seed: u64) -> Self {
        Self {
            origin: seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Stream for the `type_index`-th catalog entry of a settings entry.
    pub fn for_type(base_seed: u64, type_index: usize) -> Self {
        Self::new(
            base_seed
                .wrapping_mul(TYPE_SEED_STRIDE)
                .wrapping_add(type_index as u64),
        )
    }

    pub fn origin(&self) -> u64 {
        self.origin
    }

    /// Child stream keyed by `offset` (a case index).
    pub fn fork(&self, offset: u64) -> Self {
        Self::new(splitmix64(self.origin ^ splitmix64(offset)))
    }
}

impl RngCore for SeedStream {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
