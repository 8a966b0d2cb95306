//! SSZ deserialization.
//!
//! Used to check that serialized output round-trips; every structural rule
//! (offset ordering, bitlist delimiter, exact lengths) is enforced so a
//! malformed encoding is reported rather than silently accepted.

use ssz_static_types::{TypeDescriptor, Uint, Value, BYTES_PER_LENGTH_OFFSET};

use crate::error::GenerationError;

/// Decode `bytes` as one complete instance of `ty`.
pub fn deserialize(ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, GenerationError> {
    read_value(ty, bytes)
}

fn read_value(ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value, GenerationError> {
    match ty {
        TypeDescriptor::UnsignedInteger { bits } => Uint::from_le_bytes(*bits, bytes)
            .map(Value::Uint)
            .ok_or_else(|| GenerationError::decode(ty, format!("got {} bytes", bytes.len()))),
        TypeDescriptor::Boolean => match bytes {
            [0] => Ok(Value::Bool(false)),
            [1] => Ok(Value::Bool(true)),
            _ => Err(GenerationError::decode(ty, "expected a single 0x00 or 0x01 byte")),
        },
        TypeDescriptor::ByteVector { length } => {
            expect_len(ty, bytes, *length as usize)?;
            Ok(Value::Bytes(bytes.to_vec()))
        }
        TypeDescriptor::ByteList { limit } => {
            expect_within(ty, bytes.len(), *limit)?;
            Ok(Value::Bytes(bytes.to_vec()))
        }
        TypeDescriptor::BitVector { length } => {
            let length = *length as usize;
            expect_len(ty, bytes, length.div_ceil(8))?;
            let bits = unpack_bits(bytes, length);
            if bits_beyond(bytes, length) {
                return Err(GenerationError::decode(ty, "non-zero padding bits"));
            }
            Ok(Value::Bits(bits))
        }
        TypeDescriptor::BitList { limit } => {
            let last = *bytes
                .last()
                .ok_or_else(|| GenerationError::decode(ty, "missing length delimiter"))?;
            if last == 0 {
                return Err(GenerationError::decode(ty, "last byte has no delimiter bit"));
            }
            let delimiter = 7 - last.leading_zeros() as usize;
            let len = (bytes.len() - 1) * 8 + delimiter;
            expect_within(ty, len, *limit)?;
            Ok(Value::Bits(unpack_bits(bytes, len)))
        }
        TypeDescriptor::Vector { element, length } => {
            let items = read_sequence(ty, element, bytes)?;
            if items.len() as u64 != *length {
                return Err(GenerationError::decode(
                    ty,
                    format!("expected {} elements, got {}", length, items.len()),
                ));
            }
            Ok(Value::Sequence(items))
        }
        TypeDescriptor::List { element, limit } => {
            let items = read_sequence(ty, element, bytes)?;
            expect_within(ty, items.len(), *limit)?;
            Ok(Value::Sequence(items))
        }
        TypeDescriptor::Record(record) => {
            let field_types: Vec<&TypeDescriptor> = record.fields.iter().map(|(_, t)| t).collect();
            read_composite(ty, &field_types, bytes).map(Value::Record)
        }
    }
}

fn read_sequence(
    ty: &TypeDescriptor,
    element: &TypeDescriptor,
    bytes: &[u8],
) -> Result<Vec<Value>, GenerationError> {
    if let Some(size) = element.fixed_size() {
        if bytes.len() % size != 0 {
            return Err(GenerationError::decode(
                ty,
                format!("{} bytes is not a multiple of element size {}", bytes.len(), size),
            ));
        }
        return bytes
            .chunks(size)
            .map(|chunk| read_value(element, chunk))
            .collect();
    }
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let first = read_offset(ty, bytes, 0)?;
    if first == 0 || first % BYTES_PER_LENGTH_OFFSET != 0 {
        return Err(GenerationError::decode(ty, format!("bad first offset {}", first)));
    }
    let count = first / BYTES_PER_LENGTH_OFFSET;
    let types = vec![element; count];
    read_composite(ty, &types, bytes)
}

/// Decode parts laid out as a fixed section (inline values and offsets)
/// followed by the variable-size section.
fn read_composite(
    ty: &TypeDescriptor,
    parts: &[&TypeDescriptor],
    bytes: &[u8],
) -> Result<Vec<Value>, GenerationError> {
    let fixed_len: usize = parts
        .iter()
        .map(|t| t.fixed_size().unwrap_or(BYTES_PER_LENGTH_OFFSET))
        .sum();
    if bytes.len() < fixed_len {
        return Err(GenerationError::decode(
            ty,
            format!("{} bytes is shorter than fixed part {}", bytes.len(), fixed_len),
        ));
    }

    // First pass: inline values and offsets.
    let mut cursor = 0;
    let mut inline: Vec<Option<Value>> = Vec::with_capacity(parts.len());
    let mut offsets: Vec<(usize, usize)> = Vec::new();
    for (index, part) in parts.iter().enumerate() {
        match part.fixed_size() {
            Some(size) => {
                inline.push(Some(read_value(part, &bytes[cursor..cursor + size])?));
                cursor += size;
            }
            None => {
                offsets.push((index, read_offset(ty, bytes, cursor)?));
                inline.push(None);
                cursor += BYTES_PER_LENGTH_OFFSET;
            }
        }
    }

    if offsets.is_empty() && bytes.len() != fixed_len {
        return Err(GenerationError::decode(
            ty,
            format!("{} trailing bytes", bytes.len() - fixed_len),
        ));
    }
    if let Some((_, first)) = offsets.first() {
        if *first != fixed_len {
            return Err(GenerationError::decode(
                ty,
                format!("first offset {} does not follow fixed part {}", first, fixed_len),
            ));
        }
    }

    // Second pass: variable-size values between consecutive offsets.
    for (i, (index, start)) in offsets.iter().enumerate() {
        let end = offsets.get(i + 1).map(|(_, o)| *o).unwrap_or(bytes.len());
        if *start > end || end > bytes.len() {
            return Err(GenerationError::decode(
                ty,
                format!("offsets out of order ({} > {})", start, end),
            ));
        }
        inline[*index] = Some(read_value(parts[*index], &bytes[*start..end])?);
    }

    Ok(inline.into_iter().flatten().collect())
}

fn read_offset(ty: &TypeDescriptor, bytes: &[u8], at: usize) -> Result<usize, GenerationError> {
    let raw: [u8; BYTES_PER_LENGTH_OFFSET] = bytes
        .get(at..at + BYTES_PER_LENGTH_OFFSET)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| GenerationError::decode(ty, format!("truncated offset at {}", at)))?;
    Ok(u32::from_le_bytes(raw) as usize)
}

fn expect_len(ty: &TypeDescriptor, bytes: &[u8], len: usize) -> Result<(), GenerationError> {
    if bytes.len() != len {
        return Err(GenerationError::decode(
            ty,
            format!("expected {} bytes, got {}", len, bytes.len()),
        ));
    }
    Ok(())
}

fn expect_within(ty: &TypeDescriptor, len: usize, limit: u64) -> Result<(), GenerationError> {
    if len as u64 > limit {
        return Err(GenerationError::decode(
            ty,
            format!("length {} exceeds limit {}", len, limit),
        ));
    }
    Ok(())
}

fn unpack_bits(bytes: &[u8], len: usize) -> Vec<bool> {
    (0..len).map(|i| bytes[i / 8] & (1 << (i % 8)) != 0).collect()
}

fn bits_beyond(bytes: &[u8], len: usize) -> bool {
    (len..bytes.len() * 8).any(|i| bytes[i / 8] & (1 << (i % 8)) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::serialize::serialize;

    #[test]
    fn test_bitlist_roundtrip_via_delimiter() {
        let ty = TypeDescriptor::bitlist(16);
        assert_eq!(deserialize(&ty, &[0x01]).unwrap(), Value::Bits(vec![]));
        let bits = vec![true, false, true, false, false, false, false, false, true];
        let bytes = serialize(&ty, &Value::Bits(bits.clone())).unwrap();
        assert_eq!(deserialize(&ty, &bytes).unwrap(), Value::Bits(bits));
    }

    #[test]
    fn test_bitlist_without_delimiter_rejected() {
        let ty = TypeDescriptor::bitlist(16);
        assert!(deserialize(&ty, &[]).is_err());
        assert!(deserialize(&ty, &[0x05, 0x00]).is_err());
    }

    #[test]
    fn test_bitvector_padding_rejected() {
        let ty = TypeDescriptor::bitvector(4);
        assert!(deserialize(&ty, &[0x0f]).is_ok());
        assert!(deserialize(&ty, &[0x1f]).is_err());
    }

    #[test]
    fn test_record_with_offsets() {
        let ty = TypeDescriptor::record(
            "Mixed",
            [
                ("a", TypeDescriptor::uint(8)),
                ("b", TypeDescriptor::list(TypeDescriptor::uint(8), 4)),
                ("c", TypeDescriptor::uint(8)),
            ],
        );
        let value = deserialize(&ty, &[1, 6, 0, 0, 0, 2, 7, 8]).unwrap();
        assert_eq!(serialize(&ty, &value).unwrap(), vec![1, 6, 0, 0, 0, 2, 7, 8]);
    }

    #[test]
    fn test_bad_first_offset_rejected() {
        let ty = TypeDescriptor::record(
            "Mixed",
            [
                ("a", TypeDescriptor::uint(8)),
                ("b", TypeDescriptor::byte_list(4)),
            ],
        );
        let err = deserialize(&ty, &[1, 9, 0, 0, 0, 2]).unwrap_err();
        assert!(err.to_string().contains("first offset 9"));
    }

    #[test]
    fn test_list_limit_enforced() {
        let ty = TypeDescriptor::list(TypeDescriptor::uint(16), 2);
        assert!(deserialize(&ty, &[1, 0, 2, 0]).is_ok());
        assert!(deserialize(&ty, &[1, 0, 2, 0, 3, 0]).is_err());
        assert!(deserialize(&ty, &[1, 0, 2]).is_err());
    }

    #[test]
    fn test_boolean_strict() {
        assert!(deserialize(&TypeDescriptor::boolean(), &[2]).is_err());
    }
}
