//! Meshes, layers and per-element user data.

use serde::{Deserialize, Serialize};

use super::property::PropertyTree;

/// How layer element values map onto mesh components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingMode {
    #[default]
    ByPolygon,
    ByPolygonVertex,
    ByControlPoint,
    AllSame,
}

/// Whether values are stored directly or through an index array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceMode {
    #[default]
    Direct,
    IndexToDirect,
}

/// One named integer column of a user-data element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDataColumn {
    pub name: String,
    #[serde(default)]
    pub values: Vec<i32>,
}

/// Named per-element data attached to a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDataElement {
    pub name: String,
    #[serde(default)]
    pub mapping: MappingMode,
    #[serde(default)]
    pub reference: ReferenceMode,
    #[serde(default)]
    pub columns: Vec<UserDataColumn>,
}

impl UserDataElement {
    /// Element with a single, empty integer column.
    pub fn with_column(name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mapping: MappingMode::ByPolygon,
            reference: ReferenceMode::Direct,
            columns: vec![UserDataColumn { name: column.into(), values: Vec::new() }],
        }
    }

    /// Resize every column, zero-filling new slots.
    pub fn resize_all(&mut self, len: usize) {
        for column in &mut self.columns {
            column.values.resize(len, 0);
        }
    }

    pub fn column(&self, index: usize) -> Option<&UserDataColumn> {
        self.columns.get(index)
    }

    pub fn column_mut(&mut self, index: usize) -> Option<&mut UserDataColumn> {
        self.columns.get_mut(index)
    }
}

/// A mesh layer. Only the user-data slot is modelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    #[serde(default)]
    pub user_data: Option<UserDataElement>,
}

/// Mesh attribute of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mesh {
    pub name: String,
    #[serde(default)]
    pub polygon_count: usize,
    #[serde(default)]
    pub properties: PropertyTree,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, polygon_count: usize) -> Self {
        Self { name: name.into(), polygon_count, ..Self::default() }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    /// Append an empty layer and return its index.
    pub fn create_layer(&mut self) -> usize {
        self.layers.push(Layer::default());
        self.layers.len() - 1
    }

    /// Layer at `index`, creating empty layers up to it when missing.
    pub fn layer_or_create(&mut self, index: usize) -> &mut Layer {
        while self.layers.len() <= index {
            self.create_layer();
        }
        &mut self.layers[index]
    }

    /// User-data elements of all layers, in layer order.
    pub fn user_data(&self) -> impl Iterator<Item = &UserDataElement> {
        self.layers.iter().filter_map(|l| l.user_data.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_or_create() {
        let mut mesh = Mesh::new("Island_01Shape", 4);
        assert_eq!(mesh.layer_count(), 0);
        mesh.layer_or_create(0).user_data = Some(UserDataElement::with_column("Ids", "IslandGroupID"));
        assert_eq!(mesh.layer_count(), 1);
        mesh.layer_or_create(0);
        assert_eq!(mesh.layer_count(), 1);
        assert_eq!(mesh.user_data().count(), 1);
    }

    #[test]
    fn test_resize_all() {
        let mut element = UserDataElement::with_column("Ids", "IslandGroupID");
        element.resize_all(3);
        assert_eq!(element.column(0).unwrap().values, vec![0, 0, 0]);
        element.column_mut(0).unwrap().values[1] = 5;
        element.resize_all(2);
        assert_eq!(element.column(0).unwrap().values, vec![0, 5]);
        assert_eq!(element.mapping, MappingMode::ByPolygon);
    }
}
