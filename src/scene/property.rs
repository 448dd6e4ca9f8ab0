//! Hierarchical custom properties attached to a scene object.
//!
//! Properties live in an arena owned by their object. A [`PropertyHandle`]
//! either points at an arena slot or is `Invalid`; operations on an invalid
//! handle are no-ops that yield another invalid handle, so a chain of
//! creations can be written without checking each step.

use serde::{Deserialize, Serialize};

use crate::container::{TypedValue, ValueKind};

/// Arena index of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(usize);

/// Result of a lookup or creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyHandle {
    Valid(PropertyId),
    Invalid,
}

impl PropertyHandle {
    #[inline]
    pub fn is_valid(self) -> bool {
        matches!(self, PropertyHandle::Valid(_))
    }

    #[inline]
    pub fn id(self) -> Option<PropertyId> {
        match self {
            PropertyHandle::Valid(id) => Some(id),
            PropertyHandle::Invalid => None,
        }
    }
}

/// One named, typed property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub kind: ValueKind,
    /// `None` until a value is set.
    #[serde(default)]
    pub value: Option<TypedValue>,
    #[serde(default)]
    pub parent: Option<PropertyId>,
}

/// Arena of properties for one object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyTree {
    properties: Vec<Property>,
}

impl PropertyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, handle: PropertyHandle) -> Option<&Property> {
        handle.id().and_then(|id| self.properties.get(id.0))
    }

    /// Stored value, if the property exists and was set.
    pub fn value(&self, handle: PropertyHandle) -> Option<&TypedValue> {
        self.get(handle).and_then(|p| p.value.as_ref())
    }

    /// Find a top-level property by name.
    pub fn find(&self, name: &str) -> PropertyHandle {
        self.find_under(None, name)
    }

    /// Find a direct child of `parent` by name.
    pub fn find_child(&self, parent: PropertyHandle, name: &str) -> PropertyHandle {
        match parent.id() {
            Some(id) if id.0 < self.properties.len() => self.find_under(Some(id), name),
            _ => PropertyHandle::Invalid,
        }
    }

    /// Create a top-level property. See [`PropertyTree::create_child`].
    pub fn create_root(&mut self, name: &str, kind: ValueKind) -> PropertyHandle {
        self.create_under(None, name, kind)
    }

    /// Create a child property.
    ///
    /// Returns `Invalid` when the parent is invalid, the name is empty, or a
    /// sibling with the same name but another kind exists. A same-kind
    /// sibling is returned as is.
    pub fn create_child(&mut self, parent: PropertyHandle, name: &str, kind: ValueKind) -> PropertyHandle {
        match parent.id() {
            Some(id) if id.0 < self.properties.len() => self.create_under(Some(id), name, kind),
            _ => PropertyHandle::Invalid,
        }
    }

    /// Set a value. Fails on invalid handles and kind mismatches.
    pub fn set(&mut self, handle: PropertyHandle, value: TypedValue) -> bool {
        let Some(prop) = handle.id().and_then(|id| self.properties.get_mut(id.0)) else {
            return false;
        };
        if prop.kind != value.kind() {
            return false;
        }
        prop.value = Some(value);
        true
    }

    /// Direct children of `parent`, in creation order.
    pub fn children(&self, parent: PropertyHandle) -> Vec<PropertyHandle> {
        let Some(parent) = parent.id() else {
            return Vec::new();
        };
        self.properties
            .iter()
            .enumerate()
            .filter(|(_, p)| p.parent == Some(parent))
            .map(|(i, _)| PropertyHandle::Valid(PropertyId(i)))
            .collect()
    }

    /// Slash-separated name path from the top level, e.g. `RizomUV/UVSets`.
    pub fn path(&self, handle: PropertyHandle) -> Option<String> {
        let mut names = Vec::new();
        let mut current = handle.id();
        while let Some(id) = current {
            let prop = self.properties.get(id.0)?;
            names.push(prop.name.as_str());
            current = prop.parent;
            if names.len() > self.properties.len() {
                // Cyclic parent links in a hand-edited scene file.
                return None;
            }
        }
        if names.is_empty() {
            return None;
        }
        names.reverse();
        Some(names.join("/"))
    }

    /// Iterate over all properties in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (PropertyHandle, &Property)> {
        self.properties
            .iter()
            .enumerate()
            .map(|(i, p)| (PropertyHandle::Valid(PropertyId(i)), p))
    }

    fn find_under(&self, parent: Option<PropertyId>, name: &str) -> PropertyHandle {
        self.properties
            .iter()
            .position(|p| p.parent == parent && p.name == name)
            .map_or(PropertyHandle::Invalid, |i| PropertyHandle::Valid(PropertyId(i)))
    }

    fn create_under(&mut self, parent: Option<PropertyId>, name: &str, kind: ValueKind) -> PropertyHandle {
        if name.is_empty() {
            return PropertyHandle::Invalid;
        }
        let existing = self.find_under(parent, name);
        if let Some(prop) = self.get(existing) {
            return if prop.kind == kind { existing } else { PropertyHandle::Invalid };
        }
        self.properties.push(Property { name: name.to_string(), kind, value: None, parent });
        PropertyHandle::Valid(PropertyId(self.properties.len() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_find() {
        let mut tree = PropertyTree::new();
        let root = tree.create_root("RizomUV", ValueKind::Integer);
        let sets = tree.create_child(root, "UVSets", ValueKind::Text);
        let map = tree.create_child(sets, "UVMap", ValueKind::Text);

        assert!(map.is_valid());
        assert_eq!(tree.find("RizomUV"), root);
        assert_eq!(tree.find_child(root, "UVSets"), sets);
        // Children are not top-level.
        assert_eq!(tree.find("UVSets"), PropertyHandle::Invalid);
        assert_eq!(tree.path(map).as_deref(), Some("RizomUV/UVSets/UVMap"));
        assert_eq!(tree.children(root), vec![sets]);
    }

    #[test]
    fn test_invalid_parent_propagates() {
        let mut tree = PropertyTree::new();
        let child = tree.create_child(PropertyHandle::Invalid, "Scene", ValueKind::Bytes);
        assert_eq!(child, PropertyHandle::Invalid);
        let grandchild = tree.create_child(child, "RootGroup", ValueKind::Bytes);
        assert_eq!(grandchild, PropertyHandle::Invalid);
        assert!(tree.is_empty());
        assert!(!tree.set(grandchild, TypedValue::Bytes(vec![])));
    }

    #[test]
    fn test_create_reuses_same_kind() {
        let mut tree = PropertyTree::new();
        let a = tree.create_root("RizomUV", ValueKind::Integer);
        let b = tree.create_root("RizomUV", ValueKind::Integer);
        assert_eq!(a, b);
        assert_eq!(tree.len(), 1);

        let c = tree.create_root("RizomUV", ValueKind::Text);
        assert_eq!(c, PropertyHandle::Invalid);
        assert_eq!(tree.create_root("", ValueKind::Text), PropertyHandle::Invalid);
    }

    #[test]
    fn test_set_checks_kind() {
        let mut tree = PropertyTree::new();
        let h = tree.create_root("RizomUV", ValueKind::Integer);
        assert_eq!(tree.value(h), None);
        assert!(!tree.set(h, TypedValue::Text("7".into())));
        assert!(tree.set(h, TypedValue::Integer(7)));
        assert_eq!(tree.value(h), Some(&TypedValue::Integer(7)));
    }
}
