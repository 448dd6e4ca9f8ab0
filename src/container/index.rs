//! In-memory index built from a container stream.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use super::codec::TypedValue;
use super::format::{ArrayRecord, PropertyRecord, Record};

/// A property value together with the tag it was recorded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProperty {
    pub type_tag: String,
    pub value: TypedValue,
}

/// Insertion-ordered property map with overwrite on duplicate names.
///
/// Overwriting keeps the original position of the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: SmallVec<[(String, StoredProperty); 4]>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the replaced entry, if any.
    pub fn insert(&mut self, name: impl Into<String>, prop: StoredProperty) -> Option<StoredProperty> {
        let name = name.into();
        for (k, v) in &mut self.entries {
            if *k == name {
                return Some(std::mem::replace(v, prop));
            }
        }
        self.entries.push((name, prop));
        None
    }

    pub fn get(&self, name: &str) -> Option<&StoredProperty> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StoredProperty)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Named integer sequence recorded for one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliaryArray {
    pub name: String,
    pub elements: Vec<i32>,
}

/// Everything recorded for one mesh owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryRecord {
    pub properties: PropertyMap,
    /// `Some` with an empty vector means an empty array was recorded.
    pub auxiliary: Option<AuxiliaryArray>,
}

impl GeometryRecord {
    #[inline]
    pub fn has_auxiliary(&self) -> bool {
        self.auxiliary.is_some()
    }
}

/// Document and per-owner geometry indices loaded from one container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedContainer {
    pub document: PropertyMap,
    pub geometry: BTreeMap<String, GeometryRecord>,
    records: usize,
}

impl LoadedContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one record. Later records win over earlier ones with the same key.
    pub fn apply(&mut self, record: Record) {
        self.records += 1;
        match record {
            Record::DocumentProperty(PropertyRecord { name, type_tag, value, .. }) => {
                self.document.insert(name, StoredProperty { type_tag, value });
            }
            Record::GeometryProperty(PropertyRecord { owner, name, type_tag, value }) => {
                self.geometry
                    .entry(owner)
                    .or_default()
                    .properties
                    .insert(name, StoredProperty { type_tag, value });
            }
            Record::AuxiliaryArray(ArrayRecord { owner, name, elements }) => {
                self.geometry.entry(owner).or_default().auxiliary =
                    Some(AuxiliaryArray { name, elements });
            }
        }
    }

    /// Number of records merged, duplicates included.
    pub fn record_count(&self) -> usize {
        self.records
    }

    pub fn geometry(&self, owner: &str) -> Option<&GeometryRecord> {
        self.geometry.get(owner)
    }

    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.geometry.keys().map(String::as_str)
    }
}
