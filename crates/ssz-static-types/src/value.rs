//! In-memory SSZ values.
//!
//! A [`Value`] carries data only; its shape lives in the matching
//! [`TypeDescriptor`]. The two always travel together as a
//! [`GeneratedValue`] once generation is done.

use std::fmt;
use std::sync::Arc;

use crate::descriptor::TypeDescriptor;

/// Unsigned integer of up to 256 bits, stored as little-endian 64-bit limbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uint {
    bits: u16,
    limbs: [u64; 4],
}

impl Uint {
    pub fn zero(bits: u16) -> Self {
        Self {
            bits,
            limbs: [0; 4],
        }
    }

    /// `value` is truncated to `bits` when the width is below 64.
    pub fn from_u64(bits: u16, value: u64) -> Self {
        let mut out = Self::zero(bits);
        out.limbs[0] = if bits < 64 {
            value & ((1u64 << bits) - 1)
        } else {
            value
        };
        out
    }

    /// Largest value of the given width (`2^bits - 1`).
    pub fn max(bits: u16) -> Self {
        Self::from_limbs(bits, [u64::MAX; 4])
    }

    /// Build from little-endian limbs, clearing every bit at or above `bits`.
    pub fn from_limbs(bits: u16, mut limbs: [u64; 4]) -> Self {
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb &= match bits.saturating_sub(i as u16 * 64) {
                0 => 0,
                n if n >= 64 => u64::MAX,
                n => (1u64 << n) - 1,
            };
        }
        Self { bits, limbs }
    }

    /// Decode from exactly `bits / 8` little-endian bytes.
    pub fn from_le_bytes(bits: u16, bytes: &[u8]) -> Option<Self> {
        if bits == 0 || bits > 256 || bits % 8 != 0 || bytes.len() != bits as usize / 8 {
            return None;
        }
        let mut limbs = [0u64; 4];
        for (i, byte) in bytes.iter().enumerate() {
            limbs[i / 8] |= (*byte as u64) << ((i % 8) * 8);
        }
        Some(Self { bits, limbs })
    }

    pub fn bits(&self) -> u16 {
        self.bits
    }

    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.limbs
            .iter()
            .flat_map(|limb| limb.to_le_bytes())
            .take(self.bits as usize / 8)
            .collect()
    }

    /// The value as `u64`, if it fits.
    pub fn as_u64(&self) -> Option<u64> {
        if self.limbs[1..].iter().all(|limb| *limb == 0) {
            Some(self.limbs[0])
        } else {
            None
        }
    }

    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|limb| *limb == 0)
    }

    /// Base-10 rendering, used for integers too wide for JSON numbers.
    pub fn to_decimal_string(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let mut limbs = self.limbs;
        let mut digits = Vec::new();
        while limbs.iter().any(|limb| *limb != 0) {
            let mut remainder: u128 = 0;
            for limb in limbs.iter_mut().rev() {
                let acc = (remainder << 64) | *limb as u128;
                *limb = (acc / 10) as u64;
                remainder = acc % 10;
            }
            digits.push(b'0' + remainder as u8);
        }
        digits.reverse();
        String::from_utf8(digits).unwrap_or_default()
    }
}

impl fmt::Display for Uint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

/// Data of an SSZ value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Uint(Uint),
    Bool(bool),
    /// Content of a `ByteVector` or `ByteList`.
    Bytes(Vec<u8>),
    /// Content of a `Bitvector` or `Bitlist` (without the length delimiter).
    Bits(Vec<bool>),
    /// Elements of a `Vector` or `List`.
    Sequence(Vec<Value>),
    /// Field values of a record, in declaration order.
    Record(Vec<Value>),
}

impl Value {
    /// Short variant name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Uint(_) => "uint",
            Value::Bool(_) => "bool",
            Value::Bytes(_) => "bytes",
            Value::Bits(_) => "bits",
            Value::Sequence(_) => "sequence",
            Value::Record(_) => "record",
        }
    }

    /// Element count of a collection value; `None` for scalars and records.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Bytes(bytes) => Some(bytes.len()),
            Value::Bits(bits) => Some(bits.len()),
            Value::Sequence(items) => Some(items.len()),
            Value::Uint(_) | Value::Bool(_) | Value::Record(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

/// A generated value paired with the descriptor it was generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedValue {
    pub descriptor: Arc<TypeDescriptor>,
    pub value: Value,
}

impl GeneratedValue {
    pub fn new(descriptor: Arc<TypeDescriptor>, value: Value) -> Self {
        Self { descriptor, value }
    }
}
