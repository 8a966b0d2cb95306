//! Shape descriptors for SSZ types.
//!
//! A [`TypeDescriptor`] describes the shape of an SSZ type (never a value).
//! Descriptors are built once per preset by the type catalog and shared
//! read-only by the generator, the codec and the encoder.

use std::collections::HashSet;
use std::fmt;

/// Size in bytes of a variable-size offset in the serialized form.
pub const BYTES_PER_LENGTH_OFFSET: usize = 4;

/// Unsigned integer widths the encoding defines.
pub const UINT_BIT_WIDTHS: [u16; 6] = [8, 16, 32, 64, 128, 256];

/// Shape of an SSZ type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// `uintN` for N in [`UINT_BIT_WIDTHS`].
    UnsignedInteger { bits: u16 },
    Boolean,
    /// `ByteVector[N]`
    ByteVector { length: u64 },
    /// `ByteList[N]`
    ByteList { limit: u64 },
    /// `Vector[T, N]`
    Vector {
        element: Box<TypeDescriptor>,
        length: u64,
    },
    /// `List[T, N]`
    List {
        element: Box<TypeDescriptor>,
        limit: u64,
    },
    /// `Bitvector[N]`
    BitVector { length: u64 },
    /// `Bitlist[N]`
    BitList { limit: u64 },
    /// A named container with ordered fields.
    Record(RecordDescriptor),
}

/// Named container shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    pub name: String,
    pub fields: Vec<(String, TypeDescriptor)>,
}

/// A descriptor whose declared bounds are inconsistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorError {
    /// Dotted path from the root descriptor to the offending node.
    pub path: String,
    pub reason: String,
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid descriptor at '{}': {}", self.path, self.reason)
    }
}

impl std::error::Error for DescriptorError {}

impl TypeDescriptor {
    // ---- Constructors ----

    pub fn uint(bits: u16) -> Self {
        TypeDescriptor::UnsignedInteger { bits }
    }

    pub fn boolean() -> Self {
        TypeDescriptor::Boolean
    }

    pub fn bytes(length: u64) -> Self {
        TypeDescriptor::ByteVector { length }
    }

    pub fn byte_list(limit: u64) -> Self {
        TypeDescriptor::ByteList { limit }
    }

    pub fn vector(element: TypeDescriptor, length: u64) -> Self {
        TypeDescriptor::Vector {
            element: Box::new(element),
            length,
        }
    }

    pub fn list(element: TypeDescriptor, limit: u64) -> Self {
        TypeDescriptor::List {
            element: Box::new(element),
            limit,
        }
    }

    pub fn bitvector(length: u64) -> Self {
        TypeDescriptor::BitVector { length }
    }

    pub fn bitlist(limit: u64) -> Self {
        TypeDescriptor::BitList { limit }
    }

    /// Build a record from `(field name, field type)` pairs in declaration order.
    pub fn record<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, TypeDescriptor)>,
        S: Into<String>,
    {
        TypeDescriptor::Record(RecordDescriptor {
            name: name.into(),
            fields: fields.into_iter().map(|(n, t)| (n.into(), t)).collect(),
        })
    }

    // ---- Shape queries ----

    /// Record name, if this is a record.
    pub fn record_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Record(record) => Some(&record.name),
            _ => None,
        }
    }

    /// Basic types are packed into chunks rather than hashed individually.
    pub fn is_basic(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::UnsignedInteger { .. } | TypeDescriptor::Boolean
        )
    }

    pub fn is_fixed_size(&self) -> bool {
        self.fixed_size().is_some()
    }

    /// Serialized size in bytes, or `None` for variable-size types.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            TypeDescriptor::UnsignedInteger { bits } => Some(*bits as usize / 8),
            TypeDescriptor::Boolean => Some(1),
            TypeDescriptor::ByteVector { length } => Some(*length as usize),
            TypeDescriptor::BitVector { length } => Some((*length as usize).div_ceil(8)),
            TypeDescriptor::Vector { element, length } => element
                .fixed_size()
                .and_then(|size| size.checked_mul(usize::try_from(*length).ok()?)),
            TypeDescriptor::Record(record) => record
                .fields
                .iter()
                .try_fold(0usize, |total, (_, ty)| total.checked_add(ty.fixed_size()?)),
            TypeDescriptor::ByteList { .. }
            | TypeDescriptor::List { .. }
            | TypeDescriptor::BitList { .. } => None,
        }
    }

    /// Check that every declared bound in this descriptor is consistent.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        let root = self.record_name().unwrap_or("<root>").to_string();
        self.validate_at(&root)
    }

    fn validate_at(&self, path: &str) -> Result<(), DescriptorError> {
        let fail = |reason: String| {
            Err(DescriptorError {
                path: path.to_string(),
                reason,
            })
        };
        match self {
            TypeDescriptor::UnsignedInteger { bits } => {
                if !UINT_BIT_WIDTHS.contains(bits) {
                    return fail(format!("unsupported integer width {}", bits));
                }
            }
            TypeDescriptor::Boolean
            | TypeDescriptor::ByteList { .. }
            | TypeDescriptor::BitList { .. } => {}
            TypeDescriptor::ByteVector { length } | TypeDescriptor::BitVector { length } => {
                if *length == 0 {
                    return fail(format!("{} must have a non-zero length", self));
                }
            }
            TypeDescriptor::Vector { element, length } => {
                if *length == 0 {
                    return fail("Vector must have a non-zero length".to_string());
                }
                element.validate_at(&format!("{}[]", path))?;
                if element.is_fixed_size() && self.fixed_size().is_none() {
                    return fail(format!("serialized size of {} overflows", self));
                }
            }
            TypeDescriptor::List { element, .. } => {
                element.validate_at(&format!("{}[]", path))?;
            }
            TypeDescriptor::Record(record) => {
                if record.name.is_empty() {
                    return fail("record has no name".to_string());
                }
                if record.fields.is_empty() {
                    return fail(format!("record {} has no fields", record.name));
                }
                let mut seen = HashSet::new();
                for (field, ty) in &record.fields {
                    if !seen.insert(field.as_str()) {
                        return fail(format!("duplicate field '{}'", field));
                    }
                    ty.validate_at(&format!("{}.{}", path, field))?;
                }
                let all_fixed = record.fields.iter().all(|(_, ty)| ty.is_fixed_size());
                if all_fixed && self.fixed_size().is_none() {
                    return fail(format!("serialized size of {} overflows", record.name));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::UnsignedInteger { bits } => write!(f, "uint{}", bits),
            TypeDescriptor::Boolean => write!(f, "boolean"),
            TypeDescriptor::ByteVector { length } => write!(f, "ByteVector[{}]", length),
            TypeDescriptor::ByteList { limit } => write!(f, "ByteList[{}]", limit),
            TypeDescriptor::Vector { element, length } => {
                write!(f, "Vector[{}, {}]", element, length)
            }
            TypeDescriptor::List { element, limit } => write!(f, "List[{}, {}]", element, limit),
            TypeDescriptor::BitVector { length } => write!(f, "Bitvector[{}]", length),
            TypeDescriptor::BitList { limit } => write!(f, "Bitlist[{}]", limit),
            TypeDescriptor::Record(record) => write!(f, "{}", record.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkpoint() -> TypeDescriptor {
        TypeDescriptor::record(
            "Checkpoint",
            [
                ("epoch", TypeDescriptor::uint(64)),
                ("root", TypeDescriptor::bytes(32)),
            ],
        )
    }

    #[test]
    fn test_fixed_size_of_record() {
        assert_eq!(checkpoint().fixed_size(), Some(40));
    }

    #[test]
    fn test_variable_size_propagates() {
        let ty = TypeDescriptor::record(
            "Holder",
            [
                ("checkpoint", checkpoint()),
                ("bits", TypeDescriptor::bitlist(16)),
            ],
        );
        assert!(!ty.is_fixed_size());
        assert!(TypeDescriptor::vector(checkpoint(), 3).is_fixed_size());
        assert!(!TypeDescriptor::vector(TypeDescriptor::byte_list(4), 3).is_fixed_size());
    }

    #[test]
    fn test_bitvector_size_rounds_up() {
        assert_eq!(TypeDescriptor::bitvector(4).fixed_size(), Some(1));
        assert_eq!(TypeDescriptor::bitvector(9).fixed_size(), Some(2));
    }

    #[test]
    fn test_validate_rejects_bad_width() {
        let ty = TypeDescriptor::record("Bad", [("x", TypeDescriptor::uint(0))]);
        let err = ty.validate().unwrap_err();
        assert_eq!(err.path, "Bad.x");
        assert!(err.reason.contains("width 0"));
    }

    #[test]
    fn test_validate_rejects_empty_vector() {
        let ty = TypeDescriptor::list(TypeDescriptor::vector(TypeDescriptor::boolean(), 0), 4);
        let err = ty.validate().unwrap_err();
        assert_eq!(err.path, "<root>[]");
    }

    #[test]
    fn test_validate_rejects_overflowing_size() {
        let ty = TypeDescriptor::record(
            "Huge",
            [("roots", TypeDescriptor::vector(TypeDescriptor::bytes(32), u64::MAX))],
        );
        assert_eq!(ty.fixed_size(), None);
        let err = ty.validate().unwrap_err();
        assert_eq!(err.path, "Huge.roots");
        assert!(err.reason.contains("overflows"));
    }

    #[test]
    fn test_validate_rejects_duplicate_fields() {
        let ty = TypeDescriptor::record(
            "Dup",
            [("a", TypeDescriptor::boolean()), ("a", TypeDescriptor::boolean())],
        );
        assert!(ty.validate().unwrap_err().reason.contains("duplicate"));
    }

    #[test]
    fn test_validate_accepts_catalog_shapes() {
        let ty = TypeDescriptor::record(
            "Holder",
            [
                ("checkpoints", TypeDescriptor::list(checkpoint(), 1 << 40)),
                ("bits", TypeDescriptor::bitvector(4)),
                ("empty_ok", TypeDescriptor::byte_list(0)),
            ],
        );
        assert!(ty.validate().is_ok());
    }

    #[test]
    fn test_display() {
        let ty = TypeDescriptor::list(TypeDescriptor::uint(64), 10);
        assert_eq!(ty.to_string(), "List[uint64, 10]");
        assert_eq!(checkpoint().to_string(), "Checkpoint");
    }
}
