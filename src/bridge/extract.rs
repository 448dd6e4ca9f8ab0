//! Extraction: scene → container.

use std::io::Write;
use std::path::Path;

use crate::container::{ContainerWriter, TypedValue};
use crate::report::{Event, Reporter};
use crate::scene::{io::read_scene, Mesh, Property, PropertyHandle, PropertyTree, Scene};
use crate::settings::Settings;
use crate::util::Result;

use super::chain::DOCUMENT_CHAIN;

/// Counts of what an extraction pass wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub document_properties: usize,
    pub meshes: usize,
    pub geometry_properties: usize,
    pub auxiliary_arrays: usize,
    /// Meshes with neither a node name nor a mesh name.
    pub skipped: usize,
}

/// Write the document chain, then every mesh's properties and island layers.
pub fn extract_scene<W: Write>(
    scene: &Scene,
    writer: &mut ContainerWriter<W>,
    settings: &Settings,
    reporter: &mut dyn Reporter,
) -> Result<ExtractSummary> {
    let mut summary = ExtractSummary {
        document_properties: extract_document(&scene.document.properties, writer, reporter)?,
        ..ExtractSummary::default()
    };

    for (node_name, mesh) in scene.mesh_nodes() {
        reporter.record(Event::NodeVisited { node: node_name.to_string(), mesh: mesh.name.clone() });
        // Unnamed nodes are keyed by mesh name, which injection also matches on.
        let owner = if node_name.is_empty() { mesh.name.as_str() } else { node_name };
        if owner.is_empty() {
            reporter.record(Event::UnnamedMeshSkipped);
            summary.skipped += 1;
            continue;
        }
        let (props, arrays) = extract_mesh(owner, mesh, writer, settings, reporter)?;
        summary.meshes += 1;
        summary.geometry_properties += props;
        summary.auxiliary_arrays += arrays;
    }
    Ok(summary)
}

/// Extract a scene file into a container file.
pub fn extract_file(
    input: &Path,
    output: &Path,
    settings: &Settings,
    reporter: &mut dyn Reporter,
) -> Result<ExtractSummary> {
    let scene = read_scene(input)?;
    let result = ContainerWriter::create(output).and_then(|mut writer| {
        let summary = extract_scene(&scene, &mut writer, settings, reporter)?;
        writer.finish()?;
        Ok(summary)
    });
    if result.is_err() {
        // A cut-short container would still load cleanly, so none is left behind.
        let _ = std::fs::remove_file(output);
    }
    result
}

/// Write the document chain links present on the source, parents first.
fn extract_document<W: Write>(
    tree: &PropertyTree,
    writer: &mut ContainerWriter<W>,
    reporter: &mut dyn Reporter,
) -> Result<usize> {
    let mut handles = [PropertyHandle::Invalid; DOCUMENT_CHAIN.len()];
    let mut written = 0;

    for (i, link) in DOCUMENT_CHAIN.iter().enumerate() {
        handles[i] = match link.parent {
            None => tree.find(link.name),
            Some(parent) => tree.find_child(handles[parent], link.name),
        };
        let Some(prop) = tree.get(handles[i]) else {
            continue;
        };
        let value = stored_value(prop);
        writer.append_document_property(&prop.name, prop.kind.canonical_tag(), &value)?;
        reporter.record(Event::PropertyExtracted {
            owner: crate::container::DOCUMENT_OWNER.to_string(),
            name: prop.name.clone(),
            type_tag: prop.kind.canonical_tag().to_string(),
            bytes: value.payload_len(),
        });
        written += 1;
    }
    Ok(written)
}

/// Returns (properties written, arrays written).
fn extract_mesh<W: Write>(
    owner: &str,
    mesh: &Mesh,
    writer: &mut ContainerWriter<W>,
    settings: &Settings,
    reporter: &mut dyn Reporter,
) -> Result<(usize, usize)> {
    let mut props = 0;
    for name in &settings.geometry_properties {
        let Some(prop) = mesh.properties.get(mesh.properties.find(name)) else {
            continue;
        };
        let value = stored_value(prop);
        writer.append_geometry_property(owner, &prop.name, prop.kind.canonical_tag(), &value)?;
        reporter.record(Event::PropertyExtracted {
            owner: owner.to_string(),
            name: prop.name.clone(),
            type_tag: prop.kind.canonical_tag().to_string(),
            bytes: value.payload_len(),
        });
        props += 1;
    }

    let mut arrays = 0;
    for element in mesh.user_data() {
        if !settings.matches_user_data(&element.name) {
            reporter.record(Event::UserDataIgnored { owner: owner.to_string(), name: element.name.clone() });
            continue;
        }
        let elements = element.column(0).map(|c| c.values.as_slice()).unwrap_or(&[]);
        writer.append_auxiliary_array(owner, &element.name, elements)?;
        reporter.record(Event::ArrayExtracted {
            owner: owner.to_string(),
            name: element.name.clone(),
            count: elements.len(),
        });
        arrays += 1;
    }
    Ok((props, arrays))
}

/// A property's value, or its kind's zero value when never set.
fn stored_value(prop: &Property) -> TypedValue {
    prop.value.clone().unwrap_or_else(|| TypedValue::zero(prop.kind))
}
