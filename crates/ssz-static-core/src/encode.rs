//! Projection of a generated value into the three case parts.
//!
//! | part         | kind   | content                               |
//! |--------------|--------|---------------------------------------|
//! | `value`      | `data` | canonical JSON view of the value      |
//! | `serialized` | `ssz`  | exact serialized bytes                |
//! | `roots`      | `data` | `{"root": "0x<hash_tree_root>"}`      |

use serde_json::{json, Map, Value as Json};
use ssz_static_types::encoding::to_hex_prefixed;
use ssz_static_types::{GeneratedValue, TypeDescriptor, Value};

use crate::codec::{Chunk, Ssz, SszBackend};
use crate::error::GenerationError;

/// Payload of one case part.
#[derive(Debug, Clone, PartialEq)]
pub enum PartData {
    /// Structured data, emitted as `<name>.json`.
    Data(Json),
    /// Raw serialized bytes, emitted as `<name>.ssz`.
    Ssz(Vec<u8>),
}

impl PartData {
    pub fn kind(&self) -> &'static str {
        match self {
            PartData::Data(_) => "data",
            PartData::Ssz(_) => "ssz",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            PartData::Data(_) => "json",
            PartData::Ssz(_) => "ssz",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CasePart {
    pub name: &'static str,
    pub data: PartData,
}

/// Encoded output of one test case.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedCase {
    pub value: Json,
    pub serialized: Vec<u8>,
    pub root: Chunk,
}

impl EncodedCase {
    pub fn root_hex(&self) -> String {
        to_hex_prefixed(&self.root)
    }

    pub fn roots(&self) -> Json {
        json!({ "root": self.root_hex() })
    }

    /// The parts in emission order.
    pub fn parts(&self) -> Vec<CasePart> {
        vec![
            CasePart {
                name: "value",
                data: PartData::Data(self.value.clone()),
            },
            CasePart {
                name: "serialized",
                data: PartData::Ssz(self.serialized.clone()),
            },
            CasePart {
                name: "roots",
                data: PartData::Data(self.roots()),
            },
        ]
    }
}

/// Encodes generated values through an [`SszBackend`].
#[derive(Debug, Clone, Default)]
pub struct Encoder<B = Ssz> {
    backend: B,
    verify_roundtrip: bool,
}

impl<B: SszBackend> Encoder<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            verify_roundtrip: false,
        }
    }

    /// Also decode the serialized bytes and check the root is unchanged.
    pub fn with_roundtrip_check(mut self, verify: bool) -> Self {
        self.verify_roundtrip = verify;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn encode(&self, generated: &GeneratedValue) -> Result<EncodedCase, GenerationError> {
        let ty = &*generated.descriptor;
        let serialized = self.backend.serialize(ty, &generated.value)?;
        let root = self.backend.hash_tree_root(ty, &generated.value)?;
        if self.verify_roundtrip {
            let decoded = self.backend.deserialize(ty, &serialized)?;
            let decoded_root = self.backend.hash_tree_root(ty, &decoded)?;
            if decoded_root != root {
                return Err(GenerationError::decode(
                    ty,
                    format!(
                        "round-trip root {} differs from {}",
                        to_hex_prefixed(&decoded_root),
                        to_hex_prefixed(&root)
                    ),
                ));
            }
        }
        Ok(EncodedCase {
            value: self.value_view(ty, &generated.value)?,
            serialized,
            root,
        })
    }

    /// Canonical JSON view of `value`.
    pub fn value_view(&self, ty: &TypeDescriptor, value: &Value) -> Result<Json, GenerationError> {
        Ok(match (ty, value) {
            (TypeDescriptor::UnsignedInteger { .. }, Value::Uint(uint)) => {
                match uint.as_u64().filter(|_| uint.bits() <= 64) {
                    Some(n) => Json::from(n),
                    None => Json::String(uint.to_decimal_string()),
                }
            }
            (TypeDescriptor::Boolean, Value::Bool(b)) => Json::Bool(*b),
            (TypeDescriptor::ByteVector { .. } | TypeDescriptor::ByteList { .. }, Value::Bytes(bytes)) => {
                Json::String(to_hex_prefixed(bytes))
            }
            (TypeDescriptor::BitVector { .. } | TypeDescriptor::BitList { .. }, Value::Bits(_)) => {
                Json::String(to_hex_prefixed(&self.backend.serialize(ty, value)?))
            }
            (
                TypeDescriptor::Vector { element, .. } | TypeDescriptor::List { element, .. },
                Value::Sequence(items),
            ) => Json::Array(
                items
                    .iter()
                    .map(|item| self.value_view(element, item))
                    .collect::<Result<_, _>>()?,
            ),
            (TypeDescriptor::Record(record), Value::Record(fields)) => {
                if record.fields.len() != fields.len() {
                    return Err(GenerationError::mismatch(
                        ty,
                        format!("record with {} fields", fields.len()),
                    ));
                }
                let mut object = Map::new();
                for ((name, field_ty), field) in record.fields.iter().zip(fields) {
                    object.insert(name.clone(), self.value_view(field_ty, field)?);
                }
                Json::Object(object)
            }
            (ty, value) => return Err(GenerationError::mismatch(ty, value.kind())),
        })
    }
}
