//! Container record markers and record types.

use serde::Serialize;

use super::codec::TypedValue;

/// Marker byte for a document property record.
pub const MARKER_DOCUMENT_PROPERTY: u8 = b'G';

/// Marker byte for a geometry (mesh) property record.
pub const MARKER_GEOMETRY_PROPERTY: u8 = b'M';

/// Marker byte for an auxiliary integer array record.
pub const MARKER_AUXILIARY_ARRAY: u8 = b'I';

/// Owner name written on document property records.
pub const DOCUMENT_OWNER: &str = "document";

/// Which of the three record shapes follows a marker byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordMarker {
    DocumentProperty,
    GeometryProperty,
    AuxiliaryArray,
}

impl RecordMarker {
    #[inline]
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            MARKER_DOCUMENT_PROPERTY => Some(Self::DocumentProperty),
            MARKER_GEOMETRY_PROPERTY => Some(Self::GeometryProperty),
            MARKER_AUXILIARY_ARRAY => Some(Self::AuxiliaryArray),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::DocumentProperty => MARKER_DOCUMENT_PROPERTY,
            Self::GeometryProperty => MARKER_GEOMETRY_PROPERTY,
            Self::AuxiliaryArray => MARKER_AUXILIARY_ARRAY,
        }
    }

    #[inline]
    pub const fn as_char(self) -> char {
        self.as_u8() as char
    }
}

/// A named, typed property belonging to an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyRecord {
    pub owner: String,
    pub name: String,
    /// Type tag as written by the extractor, before synonym normalization.
    pub type_tag: String,
    pub value: TypedValue,
}

/// A named integer sequence belonging to an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrayRecord {
    pub owner: String,
    pub name: String,
    pub elements: Vec<i32>,
}

/// One record of a container stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Record {
    DocumentProperty(PropertyRecord),
    GeometryProperty(PropertyRecord),
    AuxiliaryArray(ArrayRecord),
}

impl Record {
    pub fn marker(&self) -> RecordMarker {
        match self {
            Record::DocumentProperty(_) => RecordMarker::DocumentProperty,
            Record::GeometryProperty(_) => RecordMarker::GeometryProperty,
            Record::AuxiliaryArray(_) => RecordMarker::AuxiliaryArray,
        }
    }

    pub fn owner(&self) -> &str {
        match self {
            Record::DocumentProperty(p) | Record::GeometryProperty(p) => &p.owner,
            Record::AuxiliaryArray(a) => &a.owner,
        }
    }

    /// Property or array name.
    pub fn name(&self) -> &str {
        match self {
            Record::DocumentProperty(p) | Record::GeometryProperty(p) => &p.name,
            Record::AuxiliaryArray(a) => &a.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers() {
        for marker in [
            RecordMarker::DocumentProperty,
            RecordMarker::GeometryProperty,
            RecordMarker::AuxiliaryArray,
        ] {
            assert_eq!(RecordMarker::from_u8(marker.as_u8()), Some(marker));
        }
        assert_eq!(RecordMarker::GeometryProperty.as_char(), 'M');
        assert_eq!(RecordMarker::from_u8(b'X'), None);
        assert_eq!(RecordMarker::from_u8(0), None);
    }
}
