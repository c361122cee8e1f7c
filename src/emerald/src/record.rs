//! Record decoding
//!
//! Unpacks raw bytes into named values according to a `RecordLayout`.
//! Integers are little-endian; text fields go through the character map.

use crate::charmap;
use crate::layout::{Encoding, RecordLayout};
use byteorder::{ByteOrder, LE};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{layout} expects {expected} bytes, got {actual}")]
    SizeMismatch {
        layout: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{layout} has no field {field}")]
    MissingField {
        layout: &'static str,
        field: String,
    },

    #[error("{layout}.{field} is not a {expected} field")]
    TypeMismatch {
        layout: &'static str,
        field: String,
        expected: &'static str,
    },
}

/// A decoded field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    I8(i8),
    Bytes(Vec<u8>),
    Text(String),
}

impl Value {
    fn decode(encoding: Encoding, bytes: &[u8]) -> Self {
        match encoding {
            Encoding::U8 => Value::U8(bytes[0]),
            Encoding::U16 => Value::U16(LE::read_u16(bytes)),
            Encoding::U32 => Value::U32(LE::read_u32(bytes)),
            Encoding::I8 => Value::I8(bytes[0] as i8),
            Encoding::Bytes(_) => Value::Bytes(bytes.to_vec()),
            Encoding::Text(_) => Value::Text(charmap::decode(bytes)),
        }
    }
}

/// A record decoded field by field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    layout: &'static RecordLayout,
    values: Vec<Value>,
}

impl Record {
    /// Decode a buffer of exactly `layout.size` bytes
    pub fn decode(layout: &'static RecordLayout, bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != layout.size {
            return Err(DecodeError::SizeMismatch {
                layout: layout.name,
                expected: layout.size,
                actual: bytes.len(),
            });
        }

        let values = layout
            .offsets()
            .map(|(offset, field)| {
                let end = offset + field.encoding.width();
                Value::decode(field.encoding, &bytes[offset..end])
            })
            .collect();

        Ok(Self { layout, values })
    }

    pub fn layout(&self) -> &'static RecordLayout {
        self.layout
    }

    /// Look up a value by field name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.layout
            .fields
            .iter()
            .position(|f| f.name == name)
            .map(|i| &self.values[i])
    }

    /// Iterate over `(name, value)` pairs in layout order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.layout
            .fields
            .iter()
            .map(|f| f.name)
            .zip(self.values.iter())
    }

    fn require(&self, name: &str) -> Result<&Value, DecodeError> {
        self.get(name).ok_or_else(|| DecodeError::MissingField {
            layout: self.layout.name,
            field: name.to_string(),
        })
    }

    fn mismatch(&self, name: &str, expected: &'static str) -> DecodeError {
        DecodeError::TypeMismatch {
            layout: self.layout.name,
            field: name.to_string(),
            expected,
        }
    }

    pub fn u8(&self, name: &str) -> Result<u8, DecodeError> {
        match self.require(name)? {
            Value::U8(v) => Ok(*v),
            _ => Err(self.mismatch(name, "u8")),
        }
    }

    pub fn u16(&self, name: &str) -> Result<u16, DecodeError> {
        match self.require(name)? {
            Value::U16(v) => Ok(*v),
            _ => Err(self.mismatch(name, "u16")),
        }
    }

    pub fn u32(&self, name: &str) -> Result<u32, DecodeError> {
        match self.require(name)? {
            Value::U32(v) => Ok(*v),
            _ => Err(self.mismatch(name, "u32")),
        }
    }

    pub fn i8(&self, name: &str) -> Result<i8, DecodeError> {
        match self.require(name)? {
            Value::I8(v) => Ok(*v),
            _ => Err(self.mismatch(name, "i8")),
        }
    }

    pub fn bytes(&self, name: &str) -> Result<&[u8], DecodeError> {
        match self.require(name)? {
            Value::Bytes(v) => Ok(v),
            _ => Err(self.mismatch(name, "bytes")),
        }
    }

    pub fn text(&self, name: &str) -> Result<&str, DecodeError> {
        match self.require(name)? {
            Value::Text(v) => Ok(v),
            _ => Err(self.mismatch(name, "text")),
        }
    }

    /// Decode a nested record stored in a bytes field
    pub fn nested(&self, name: &str, layout: &'static RecordLayout) -> Result<Record, DecodeError> {
        Record::decode(layout, self.bytes(name)?)
    }
}

/// Decode up to `count` consecutive fixed-width entries from a byte run
///
/// `count` comes from the data itself (e.g. a party count byte) and is never
/// trusted past the number of whole entries that fit in `bytes`.
pub fn decode_array<T, E>(
    bytes: &[u8],
    stride: usize,
    count: usize,
    mut decode: impl FnMut(&[u8]) -> Result<T, E>,
) -> Result<Vec<T>, E> {
    if stride == 0 {
        return Ok(Vec::new());
    }
    let count = count.min(bytes.len() / stride);
    bytes
        .chunks_exact(stride)
        .take(count)
        .map(&mut decode)
        .collect()
}
