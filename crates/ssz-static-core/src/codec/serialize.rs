//! SSZ serialization.
//!
//! Fixed-size parts are written inline; variable-size parts are replaced by a
//! 4-byte little-endian offset in the fixed section and appended afterwards.

use ssz_static_types::{TypeDescriptor, Value, BYTES_PER_LENGTH_OFFSET};

use crate::error::GenerationError;

/// Serialize `value` as an instance of `ty`.
pub fn serialize(ty: &TypeDescriptor, value: &Value) -> Result<Vec<u8>, GenerationError> {
    let mut out = Vec::new();
    write_value(ty, value, &mut out)?;
    Ok(out)
}

fn write_value(ty: &TypeDescriptor, value: &Value, out: &mut Vec<u8>) -> Result<(), GenerationError> {
    match (ty, value) {
        (TypeDescriptor::UnsignedInteger { bits }, Value::Uint(uint)) => {
            if uint.bits() != *bits {
                return Err(GenerationError::mismatch(ty, format!("uint{}", uint.bits())));
            }
            out.extend(uint.to_le_bytes());
        }
        (TypeDescriptor::Boolean, Value::Bool(b)) => out.push(*b as u8),
        (TypeDescriptor::ByteVector { length }, Value::Bytes(bytes)) => {
            check_exact(ty, *length, bytes.len())?;
            out.extend_from_slice(bytes);
        }
        (TypeDescriptor::ByteList { limit }, Value::Bytes(bytes)) => {
            check_limit(ty, *limit, bytes.len())?;
            out.extend_from_slice(bytes);
        }
        (TypeDescriptor::BitVector { length }, Value::Bits(bits)) => {
            check_exact(ty, *length, bits.len())?;
            out.extend(pack_bits(bits));
        }
        (TypeDescriptor::BitList { limit }, Value::Bits(bits)) => {
            check_limit(ty, *limit, bits.len())?;
            out.extend(pack_bitlist(bits));
        }
        (TypeDescriptor::Vector { element, length }, Value::Sequence(items)) => {
            check_exact(ty, *length, items.len())?;
            write_sequence(element, items, out)?;
        }
        (TypeDescriptor::List { element, limit }, Value::Sequence(items)) => {
            check_limit(ty, *limit, items.len())?;
            write_sequence(element, items, out)?;
        }
        (TypeDescriptor::Record(record), Value::Record(fields)) => {
            if record.fields.len() != fields.len() {
                return Err(GenerationError::mismatch(
                    ty,
                    format!("record with {} fields", fields.len()),
                ));
            }
            let parts: Vec<_> = record.fields.iter().map(|(_, t)| t).zip(fields).collect();
            write_composite(&parts, out)?;
        }
        (ty, value) => return Err(GenerationError::mismatch(ty, value.kind())),
    }
    Ok(())
}

fn write_sequence(
    element: &TypeDescriptor,
    items: &[Value],
    out: &mut Vec<u8>,
) -> Result<(), GenerationError> {
    if element.is_fixed_size() {
        for item in items {
            write_value(element, item, out)?;
        }
        return Ok(());
    }
    let parts: Vec<_> = items.iter().map(|item| (element, item)).collect();
    write_composite(&parts, out)
}

/// Write a heterogeneous sequence of parts (record fields or variable-size elements).
fn write_composite(
    parts: &[(&TypeDescriptor, &Value)],
    out: &mut Vec<u8>,
) -> Result<(), GenerationError> {
    let fixed_len: usize = parts
        .iter()
        .map(|(ty, _)| ty.fixed_size().unwrap_or(BYTES_PER_LENGTH_OFFSET))
        .sum();
    let mut fixed = Vec::with_capacity(fixed_len);
    let mut variable = Vec::new();

    for (ty, value) in parts {
        if ty.is_fixed_size() {
            write_value(ty, value, &mut fixed)?;
        } else {
            let offset = u32::try_from(fixed_len + variable.len()).map_err(|_| {
                GenerationError::mismatch(ty, "value larger than the 4-byte offset range")
            })?;
            fixed.extend(offset.to_le_bytes());
            write_value(ty, value, &mut variable)?;
        }
    }

    out.extend(fixed);
    out.extend(variable);
    Ok(())
}

fn check_exact(ty: &TypeDescriptor, length: u64, actual: usize) -> Result<(), GenerationError> {
    if actual as u64 != length {
        return Err(GenerationError::mismatch(ty, format!("{} elements", actual)));
    }
    Ok(())
}

fn check_limit(ty: &TypeDescriptor, limit: u64, actual: usize) -> Result<(), GenerationError> {
    if actual as u64 > limit {
        return Err(GenerationError::mismatch(ty, format!("{} elements", actual)));
    }
    Ok(())
}

/// Pack bits little-endian within each byte, without a delimiter.
pub(crate) fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; bits.len().div_ceil(8)];
    for (i, bit) in bits.iter().enumerate() {
        if *bit {
            bytes[i / 8] |= 1 << (i % 8);
        }
    }
    bytes
}

/// Pack bits followed by the length delimiter bit.
pub(crate) fn pack_bitlist(bits: &[bool]) -> Vec<u8> {
    let len = bits.len();
    let mut bytes = pack_bits(bits);
    bytes.resize(len / 8 + 1, 0);
    bytes[len / 8] |= 1 << (len % 8);
    bytes
}
