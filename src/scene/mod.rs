//! In-memory scene graph.
//!
//! A deliberately small model of the parts of a scene the bridge touches:
//! the root document with its property tree, and nodes that may carry a
//! mesh with properties and user-data layers. Scene files are read and
//! written by [`io`].

pub mod io;
mod mesh;
mod property;

pub use mesh::*;
pub use property::*;

use serde::{Deserialize, Serialize};

/// Root document of a scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub properties: PropertyTree,
}

/// A scene node. Only mesh-bearing nodes matter to the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(default)]
    pub mesh: Option<Mesh>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), mesh: None }
    }

    pub fn with_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self { name: name.into(), mesh: Some(mesh) }
    }
}

/// A whole scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub document: Document,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Scene {
    pub fn new(document_name: impl Into<String>) -> Self {
        Self {
            document: Document { name: document_name.into(), properties: PropertyTree::new() },
            nodes: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: Node) -> &mut Node {
        self.nodes.push(node);
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    /// Add a node carrying a mesh and return the mesh.
    pub fn add_mesh_node(&mut self, node_name: impl Into<String>, mesh: Mesh) -> &mut Mesh {
        let node = self.add_node(Node::with_mesh(node_name, mesh));
        node.mesh.get_or_insert_with(Mesh::default)
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Mesh of the first node named `node_name`.
    pub fn mesh(&self, node_name: &str) -> Option<&Mesh> {
        self.node(node_name).and_then(|n| n.mesh.as_ref())
    }

    /// Nodes with a mesh attribute, in scene order.
    pub fn mesh_nodes(&self) -> impl Iterator<Item = (&str, &Mesh)> {
        self.nodes
            .iter()
            .filter_map(|n| n.mesh.as_ref().map(|m| (n.name.as_str(), m)))
    }

    /// Mutable variant of [`Scene::mesh_nodes`].
    pub fn mesh_nodes_mut(&mut self) -> impl Iterator<Item = (&str, &mut Mesh)> {
        self.nodes.iter_mut().filter_map(|node| {
            let Node { name, mesh } = node;
            let name: &str = name;
            mesh.as_mut().map(|m| (name, m))
        })
    }
}
