//! Typed property values and their wire encoding.
//!
//! A value travels with a type tag string. The tag is normalized through
//! [`TYPE_SYNONYMS`] into a closed [`ValueKind`], and the kind alone decides
//! the byte layout:
//!
//! ```text
//! Integer : i32 LE                      (4 bytes, no prefix)
//! Bytes   : u32 LE length + raw bytes
//! Text    : u32 LE length + UTF-8 bytes (no terminator)
//! ```

use std::fmt;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use super::stream::{IStream, OStream};
use crate::util::{Error, Result};

/// Closed set of value kinds the container can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Integer,
    Bytes,
    Text,
}

/// Type tag names accepted on read and the kind each one decodes as.
pub const TYPE_SYNONYMS: &[(&str, ValueKind)] = &[
    ("Int", ValueKind::Integer),
    ("Integer", ValueKind::Integer),
    ("Blob", ValueKind::Bytes),
    ("String", ValueKind::Text),
    ("KString", ValueKind::Text),
    ("Url", ValueKind::Text),
];

impl ValueKind {
    /// Normalize a type tag. Unknown tags are an error.
    pub fn from_tag(tag: &str) -> Result<Self> {
        TYPE_SYNONYMS
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| Error::UnknownType(tag.to_string()))
    }

    /// Tag written for values that originate from this kind.
    pub fn canonical_tag(self) -> &'static str {
        match self {
            ValueKind::Integer => "Int",
            ValueKind::Bytes => "Blob",
            ValueKind::Text => "String",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_tag())
    }
}

/// A single property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypedValue {
    Integer(i32),
    Bytes(Vec<u8>),
    Text(String),
}

impl TypedValue {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            TypedValue::Integer(_) => ValueKind::Integer,
            TypedValue::Bytes(_) => ValueKind::Bytes,
            TypedValue::Text(_) => ValueKind::Text,
        }
    }

    /// Value a freshly created property of `kind` holds.
    pub fn zero(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Integer => TypedValue::Integer(0),
            ValueKind::Bytes => TypedValue::Bytes(Vec::new()),
            ValueKind::Text => TypedValue::Text(String::new()),
        }
    }

    /// Payload size in bytes, excluding any length prefix.
    pub fn payload_len(&self) -> usize {
        match self {
            TypedValue::Integer(_) => 4,
            TypedValue::Bytes(b) => b.len(),
            TypedValue::Text(s) => s.len(),
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            TypedValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            TypedValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TypedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Write the value's wire form.
    pub fn encode<W: Write>(&self, out: &mut OStream<W>) -> Result<()> {
        match self {
            TypedValue::Integer(v) => out.write_i32(*v),
            TypedValue::Bytes(b) => out.write_prefixed(b, "blob value"),
            TypedValue::Text(s) => out.write_prefixed(s.as_bytes(), "string value"),
        }
    }

    /// Read a value of the given kind.
    pub fn decode<R: Read>(input: &mut IStream<R>, kind: ValueKind) -> Result<Self> {
        Ok(match kind {
            ValueKind::Integer => TypedValue::Integer(input.read_i32("integer value")?),
            ValueKind::Bytes => TypedValue::Bytes(input.read_prefixed("blob value")?),
            ValueKind::Text => TypedValue::Text(input.read_string("string value")?),
        })
    }

    /// Encode into a standalone buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = OStream::new(Vec::with_capacity(4 + self.payload_len()));
        self.encode(&mut out)?;
        out.into_inner()
    }

    /// Decode a standalone buffer against a type tag.
    ///
    /// The buffer must hold exactly one value.
    pub fn from_bytes(bytes: &[u8], type_tag: &str) -> Result<Self> {
        let kind = ValueKind::from_tag(type_tag)?;
        let mut input = IStream::new(bytes);
        let value = Self::decode(&mut input, kind)?;
        if input.pos() != bytes.len() as u64 {
            return Err(Error::invalid(format!(
                "{} trailing bytes after {} value",
                bytes.len() as u64 - input.pos(),
                kind
            )));
        }
        Ok(value)
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Integer(v) => write!(f, "{}", v),
            TypedValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            TypedValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Check that a declared tag is known and matches the value it labels.
pub fn check_tag(type_tag: &str, value: &TypedValue) -> Result<ValueKind> {
    let kind = ValueKind::from_tag(type_tag)?;
    if kind != value.kind() {
        return Err(Error::TypeMismatch {
            expected: kind.to_string(),
            actual: value.kind().to_string(),
        });
    }
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms() {
        assert_eq!(ValueKind::from_tag("Int").unwrap(), ValueKind::Integer);
        assert_eq!(ValueKind::from_tag("Integer").unwrap(), ValueKind::Integer);
        assert_eq!(ValueKind::from_tag("Blob").unwrap(), ValueKind::Bytes);
        assert_eq!(ValueKind::from_tag("KString").unwrap(), ValueKind::Text);
        assert_eq!(ValueKind::from_tag("String").unwrap(), ValueKind::Text);
    }

    #[test]
    fn test_unknown_tag() {
        let err = ValueKind::from_tag("Float").unwrap_err();
        assert!(matches!(err, Error::UnknownType(ref t) if t == "Float"));
        // Tags are case sensitive.
        assert!(ValueKind::from_tag("int").is_err());
    }

    #[test]
    fn test_integer_layout() -> Result<()> {
        let bytes = TypedValue::Integer(7).to_bytes()?;
        assert_eq!(bytes, [7, 0, 0, 0]);
        assert_eq!(TypedValue::from_bytes(&bytes, "Int")?, TypedValue::Integer(7));
        Ok(())
    }

    #[test]
    fn test_zero_length_values() -> Result<()> {
        let blob = TypedValue::Bytes(Vec::new()).to_bytes()?;
        assert_eq!(blob, [0, 0, 0, 0]);
        assert_eq!(TypedValue::from_bytes(&blob, "Blob")?, TypedValue::Bytes(Vec::new()));
        assert_eq!(TypedValue::from_bytes(&blob, "KString")?, TypedValue::Text(String::new()));
        Ok(())
    }

    #[test]
    fn test_text_and_blob() -> Result<()> {
        let text = TypedValue::Text("setA".into());
        assert_eq!(TypedValue::from_bytes(&text.to_bytes()?, "String")?, text);

        let blob = TypedValue::Bytes(vec![0, 255, 1, 0]);
        assert_eq!(TypedValue::from_bytes(&blob.to_bytes()?, "Blob")?, blob);
        Ok(())
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let err = TypedValue::from_bytes(&[1, 0, 0, 0, 9], "Int").unwrap_err();
        assert!(matches!(err, Error::InvalidStructure(_)));
    }

    #[test]
    fn test_invalid_utf8_text() {
        let err = TypedValue::from_bytes(&[2, 0, 0, 0, 0xC3, 0x28], "String").unwrap_err();
        assert!(matches!(err, Error::Utf8(_)));
    }

    #[test]
    fn test_check_tag() {
        assert_eq!(check_tag("KString", &TypedValue::Text("x".into())).unwrap(), ValueKind::Text);
        let err = check_tag("Int", &TypedValue::Text("x".into())).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }
}
