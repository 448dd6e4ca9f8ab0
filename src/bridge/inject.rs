//! Injection: container → scene.

use std::collections::BTreeMap;
use std::path::Path;

use crate::container::{load_file, GeometryRecord, LoadedContainer, PropertyMap, DOCUMENT_OWNER};
use crate::report::{Event, Reporter};
use crate::scene::io::{read_scene, write_scene, SceneEncoding, WriterRegistry, ASCII_WRITER, BINARY_WRITER};
use crate::scene::{Document, Mesh, PropertyHandle, Scene, UserDataElement};
use crate::settings::Settings;
use crate::util::{Error, Result};

use super::chain::{ChainOutcome, ChainPolicy, LinkState, DOCUMENT_CHAIN};
use super::matcher::resolve;

/// Counts of what an injection pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectSummary {
    pub chain: ChainOutcome,
    pub matched: usize,
    pub skipped: usize,
    pub properties: usize,
    pub layers: usize,
}

/// Rebuild the document chain on `document`.
///
/// Each link is created under the handle its parent link produced, valid or
/// not. A link's value is set only when the index holds one for its name.
pub fn inject_document(
    document: &mut Document,
    index: &PropertyMap,
    settings: &Settings,
    reporter: &mut dyn Reporter,
) -> ChainOutcome {
    document.name.clone_from(&settings.document_name);

    let tree = &mut document.properties;
    let mut handles = [PropertyHandle::Invalid; DOCUMENT_CHAIN.len()];
    let mut outcome = ChainOutcome::default();

    for (i, link) in DOCUMENT_CHAIN.iter().enumerate() {
        let stored = index.get(link.name);
        if stored.is_none() {
            reporter.record(Event::ChainLinkMissing { name: link.name.to_string() });
            if settings.chain_policy == ChainPolicy::SkipMissing {
                outcome.states[i] = LinkState::Skipped;
                continue;
            }
        }

        // The recorded kind wins so a retyped property keeps its data.
        let kind = stored.map_or(link.kind, |s| s.value.kind());
        handles[i] = match link.parent {
            None => tree.create_root(link.name, kind),
            Some(parent) => tree.create_child(handles[parent], link.name, kind),
        };

        if !handles[i].is_valid() {
            outcome.states[i] = LinkState::Invalid;
            if stored.is_some() {
                reporter.record(Event::PropertyCreationFailed {
                    owner: DOCUMENT_OWNER.to_string(),
                    name: link.name.to_string(),
                });
            }
            continue;
        }

        let value_set = match stored {
            Some(s) => tree.set(handles[i], s.value.clone()),
            None => false,
        };
        if let (true, Some(s)) = (value_set, stored) {
            reporter.record(Event::PropertyCreated {
                owner: DOCUMENT_OWNER.to_string(),
                path: tree.path(handles[i]).unwrap_or_else(|| link.name.to_string()),
                type_tag: s.type_tag.clone(),
                bytes: s.value.payload_len(),
            });
        }
        outcome.states[i] = LinkState::Valid { value_set };
    }
    outcome
}

/// Geometry part of an injection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometrySummary {
    pub matched: usize,
    pub skipped: usize,
    pub properties: usize,
    pub layers: usize,
}

/// Attach recorded properties and island layers to matching mesh nodes.
pub fn inject_geometry(
    scene: &mut Scene,
    geometry: &BTreeMap<String, GeometryRecord>,
    settings: &Settings,
    reporter: &mut dyn Reporter,
) -> GeometrySummary {
    let mut summary = GeometrySummary::default();

    for (node_name, mesh) in scene.mesh_nodes_mut() {
        reporter.record(Event::NodeVisited { node: node_name.to_string(), mesh: mesh.name.clone() });

        let Some(found) = resolve(geometry, node_name, &mesh.name) else {
            reporter.record(Event::OwnerSkipped { node: node_name.to_string(), mesh: mesh.name.clone() });
            summary.skipped += 1;
            continue;
        };
        reporter.record(Event::OwnerMatched {
            node: node_name.to_string(),
            key: found.key.to_string(),
            by: found.by,
        });
        summary.matched += 1;

        summary.properties += inject_mesh_properties(mesh, found.key, &found.record.properties, reporter);
        if inject_island_layer(mesh, found.key, found.record, settings, reporter) {
            summary.layers += 1;
        }
    }
    summary
}

/// Run both injection stages on an in-memory scene.
pub fn inject_scene(
    scene: &mut Scene,
    loaded: &LoadedContainer,
    settings: &Settings,
    reporter: &mut dyn Reporter,
) -> InjectSummary {
    let chain = inject_document(&mut scene.document, &loaded.document, settings, reporter);
    let geometry = inject_geometry(scene, &loaded.geometry, settings, reporter);
    InjectSummary {
        chain,
        matched: geometry.matched,
        skipped: geometry.skipped,
        properties: geometry.properties,
        layers: geometry.layers,
    }
}

/// Inject a container into a scene file and write the result.
///
/// The container is loaded completely before the scene is touched; a
/// container that fails to load aborts with nothing written.
pub fn inject_file(
    target: &Path,
    container: &Path,
    output: &Path,
    settings: &Settings,
    registry: &WriterRegistry,
    reporter: &mut dyn Reporter,
) -> Result<InjectSummary> {
    let mut scene = read_scene(target)?;
    let loaded = load_file(container, reporter)?;
    let summary = inject_scene(&mut scene, &loaded, settings, reporter);

    let encoding = select_writer(registry, settings, reporter)?;
    write_scene(output, &scene, encoding)?;
    Ok(summary)
}

/// Pick the binary writer when preferred and available, else ascii.
pub fn select_writer(
    registry: &WriterRegistry,
    settings: &Settings,
    reporter: &mut dyn Reporter,
) -> Result<SceneEncoding> {
    if settings.prefer_binary_output {
        if let Some(id) = registry.find_writer_by_description(BINARY_WRITER) {
            if let Some(encoding) = registry.encoding(id) {
                return Ok(encoding);
            }
        }
    }
    let id = registry
        .find_writer_by_description(ASCII_WRITER)
        .ok_or_else(|| Error::NoSceneWriter(format!("{}, {}", BINARY_WRITER, ASCII_WRITER)))?;
    if settings.prefer_binary_output {
        reporter.record(Event::SceneWriterFallback {
            requested: BINARY_WRITER.to_string(),
            used: ASCII_WRITER.to_string(),
        });
    }
    registry
        .encoding(id)
        .ok_or_else(|| Error::NoSceneWriter(ASCII_WRITER.to_string()))
}

/// Create every indexed property on the mesh. Returns how many were set.
fn inject_mesh_properties(
    mesh: &mut Mesh,
    owner: &str,
    properties: &PropertyMap,
    reporter: &mut dyn Reporter,
) -> usize {
    let mut created = 0;
    for (name, stored) in properties.iter() {
        let handle = mesh.properties.create_root(name, stored.value.kind());
        if !mesh.properties.set(handle, stored.value.clone()) {
            reporter.record(Event::PropertyCreationFailed { owner: owner.to_string(), name: name.to_string() });
            continue;
        }
        reporter.record(Event::PropertyCreated {
            owner: owner.to_string(),
            path: name.to_string(),
            type_tag: stored.type_tag.clone(),
            bytes: stored.value.payload_len(),
        });
        created += 1;
    }
    created
}

/// Build the per-polygon island layer. Returns true when a layer was made.
fn inject_island_layer(
    mesh: &mut Mesh,
    owner: &str,
    record: &GeometryRecord,
    settings: &Settings,
    reporter: &mut dyn Reporter,
) -> bool {
    let Some(aux) = &record.auxiliary else {
        return false;
    };
    if aux.elements.is_empty() {
        reporter.record(Event::EmptyArraySkipped { owner: owner.to_string(), name: aux.name.clone() });
        return false;
    }

    let name = if aux.name.is_empty() { &settings.default_layer_name } else { &aux.name };
    let mut element = UserDataElement::with_column(name.as_str(), settings.layer_element_name.as_str());
    element.resize_all(aux.elements.len());
    if let Some(column) = element.column_mut(0) {
        column.values.copy_from_slice(&aux.elements);
    }

    if mesh.polygon_count != aux.elements.len() {
        reporter.record(Event::ElementCountMismatch {
            owner: owner.to_string(),
            polygons: mesh.polygon_count,
            elements: aux.elements.len(),
        });
    }

    mesh.layer_or_create(0).user_data = Some(element);
    reporter.record(Event::LayerCreated {
        owner: owner.to_string(),
        name: name.clone(),
        count: aux.elements.len(),
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{load_all, AuxiliaryArray, ContainerWriter, StoredProperty, TypedValue, ValueKind};
    use crate::report::{CollectingReporter, NullReporter};
    use crate::scene::MappingMode;

    fn stored(value: TypedValue) -> StoredProperty {
        StoredProperty { type_tag: value.kind().canonical_tag().to_string(), value }
    }

    fn target() -> Scene {
        let mut scene = Scene::new("Imported");
        scene.add_mesh_node("Island_01", Mesh::new("Island_01Shape", 4));
        scene.add_mesh_node("Renamed", Mesh::new("Island_02Shape", 2));
        scene.add_mesh_node("Stranger", Mesh::new("StrangerShape", 3));
        scene
    }

    #[test]
    fn test_document_chain_always_build() {
        let mut document = target().document;
        let mut index = PropertyMap::new();
        index.insert("RizomUV", stored(TypedValue::Integer(7)));
        index.insert("UVMap", stored(TypedValue::Text("map1".into())));

        let mut reporter = CollectingReporter::new();
        let outcome = inject_document(&mut document, &index, &Settings::default(), &mut reporter);
        assert_eq!(document.name, "Scene");
        assert_eq!(outcome.state("RizomUV"), Some(LinkState::Valid { value_set: true }));
        assert_eq!(outcome.state("Scene"), Some(LinkState::Valid { value_set: false }));
        assert_eq!(outcome.state("UVSets"), Some(LinkState::Valid { value_set: false }));
        assert_eq!(outcome.state("UVMap"), Some(LinkState::Valid { value_set: true }));
        assert_eq!(outcome.state("RootGroup"), Some(LinkState::Valid { value_set: false }));
        assert_eq!(outcome.values_set(), 2);
        assert_eq!(reporter.count(|e| matches!(e, Event::ChainLinkMissing { .. })), 3);

        let tree = &document.properties;
        let sets = tree.find_child(tree.find("RizomUV"), "UVSets");
        let map = tree.find_child(sets, "UVMap");
        assert_eq!(tree.value(map), Some(&TypedValue::Text("map1".into())));
        assert_eq!(tree.path(map).as_deref(), Some("RizomUV/UVSets/UVMap"));
    }

    #[test]
    fn test_document_chain_skip_missing() {
        let mut document = target().document;
        let mut index = PropertyMap::new();
        index.insert("RizomUV", stored(TypedValue::Integer(7)));
        index.insert("UVMap", stored(TypedValue::Text("map1".into())));

        let settings = Settings { chain_policy: ChainPolicy::SkipMissing, ..Settings::default() };
        let outcome = inject_document(&mut document, &index, &settings, &mut NullReporter);
        assert_eq!(outcome.state("UVSets"), Some(LinkState::Skipped));
        // UVMap's parent was never created, so it cannot be either.
        assert_eq!(outcome.state("UVMap"), Some(LinkState::Invalid));
        assert_eq!(outcome.state("RootGroup"), Some(LinkState::Skipped));
        assert_eq!(document.properties.len(), 1);
    }

    #[test]
    fn test_invalid_root_propagates() {
        let mut document = target().document;
        // A same-named root of another kind blocks creation of the chain root.
        document.properties.create_root("RizomUV", ValueKind::Text);
        let mut index = PropertyMap::new();
        index.insert("RizomUV", stored(TypedValue::Integer(7)));
        index.insert("Scene", stored(TypedValue::Bytes(vec![1, 2])));

        let mut reporter = CollectingReporter::new();
        let outcome = inject_document(&mut document, &index, &Settings::default(), &mut reporter);
        assert!(outcome.states.iter().all(|s| *s == LinkState::Invalid));
        assert_eq!(reporter.count(|e| matches!(e, Event::PropertyCreationFailed { .. })), 2);
    }

    #[test]
    fn test_geometry_matching_and_layers() {
        let mut scene = target();
        let mut geometry = BTreeMap::new();
        let mut island = GeometryRecord::default();
        island.properties.insert("RizomUVUVSets", stored(TypedValue::Text("setA".into())));
        island.auxiliary = Some(AuxiliaryArray { name: "RizomUVUVMapIslandGroupIDs".into(), elements: vec![3, 3, 3, 7] });
        geometry.insert("Island_01".to_string(), island);
        geometry.insert(
            "Island_02Shape".to_string(),
            GeometryRecord {
                auxiliary: Some(AuxiliaryArray { name: String::new(), elements: vec![1, 2, 5] }),
                ..GeometryRecord::default()
            },
        );

        let mut reporter = CollectingReporter::new();
        let summary = inject_geometry(&mut scene, &geometry, &Settings::default(), &mut reporter);
        assert_eq!(summary, GeometrySummary { matched: 2, skipped: 1, properties: 1, layers: 2 });
        assert_eq!(reporter.count(|e| matches!(e, Event::OwnerSkipped { .. })), 1);
        // Renamed has 2 polygons but 3 recorded elements.
        assert_eq!(reporter.count(|e| matches!(e, Event::ElementCountMismatch { .. })), 1);

        let mesh = scene.mesh("Island_01").unwrap();
        let h = mesh.properties.find("RizomUVUVSets");
        assert_eq!(mesh.properties.value(h), Some(&TypedValue::Text("setA".into())));
        let element = mesh.layer(0).unwrap().user_data.as_ref().unwrap();
        assert_eq!(element.name, "RizomUVUVMapIslandGroupIDs");
        assert_eq!(element.mapping, MappingMode::ByPolygon);
        assert_eq!(element.column(0).unwrap().name, "IslandGroupID");
        assert_eq!(element.column(0).unwrap().values, vec![3, 3, 3, 7]);

        let renamed = scene.mesh("Renamed").unwrap();
        let element = renamed.layer(0).unwrap().user_data.as_ref().unwrap();
        assert_eq!(element.name, "RizomUVUVMapIslandGroupIDs");
        assert_eq!(element.column(0).unwrap().values, vec![1, 2, 5]);

        assert_eq!(scene.mesh("Stranger").unwrap().layer_count(), 0);
    }

    #[test]
    fn test_empty_array_makes_no_layer() {
        let mut scene = target();
        let mut geometry = BTreeMap::new();
        geometry.insert(
            "Island_01".to_string(),
            GeometryRecord {
                auxiliary: Some(AuxiliaryArray { name: "Ids".into(), elements: vec![] }),
                ..GeometryRecord::default()
            },
        );
        let mut reporter = CollectingReporter::new();
        let summary = inject_geometry(&mut scene, &geometry, &Settings::default(), &mut reporter);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.layers, 0);
        assert_eq!(reporter.count(|e| matches!(e, Event::EmptyArraySkipped { .. })), 1);
        assert_eq!(scene.mesh("Island_01").unwrap().layer_count(), 0);
    }

    #[test]
    fn test_inject_scene_from_container_bytes() {
        let mut writer = ContainerWriter::new(Vec::new());
        writer.append_document_property("RizomUV", "Int", &TypedValue::Integer(7)).unwrap();
        writer
            .append_geometry_property("Island_01", "RizomUVUVSets", "String", &TypedValue::Text("setA".into()))
            .unwrap();
        writer.append_auxiliary_array("Island_01", "RizomUVUVMapIslandGroupIDs", &[3, 3, 3, 7]).unwrap();
        let loaded = load_all(&writer.finish().unwrap()[..]).unwrap();

        let mut scene = target();
        let summary = inject_scene(&mut scene, &loaded, &Settings::default(), &mut NullReporter);
        assert_eq!(summary.chain.values_set(), 1);
        assert_eq!((summary.matched, summary.skipped, summary.layers), (1, 2, 1));
        let tree = &scene.document.properties;
        assert_eq!(tree.value(tree.find("RizomUV")), Some(&TypedValue::Integer(7)));
    }

    #[test]
    fn test_writer_selection() {
        let mut reporter = CollectingReporter::new();
        let settings = Settings::default();
        let registry = WriterRegistry::default();
        assert_eq!(select_writer(&registry, &settings, &mut reporter).unwrap(), SceneEncoding::Binary);

        let ascii = WriterRegistry::ascii_only();
        assert_eq!(select_writer(&ascii, &settings, &mut reporter).unwrap(), SceneEncoding::Ascii);
        assert_eq!(reporter.count(|e| matches!(e, Event::SceneWriterFallback { .. })), 1);

        let text = Settings { prefer_binary_output: false, ..Settings::default() };
        assert_eq!(select_writer(&registry, &text, &mut reporter).unwrap(), SceneEncoding::Ascii);

        let err = select_writer(&WriterRegistry::empty(), &settings, &mut reporter).unwrap_err();
        assert!(matches!(err, Error::NoSceneWriter(_)));
    }
}
