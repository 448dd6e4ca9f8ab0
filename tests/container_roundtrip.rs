//! Integration tests for writing containers to disk and reading them back.

use rizom_bridge::container::{load_file, ContainerReader, ContainerWriter, Record, TypedValue};
use rizom_bridge::report::{CollectingReporter, Event, NullReporter};
use rizom_bridge::Error;

use std::io::Write;
use tempfile::NamedTempFile;

fn write_sample(path: &std::path::Path) {
    let mut writer = ContainerWriter::create(path).expect("Failed to create container");
    writer.append_document_property("RizomUV", "Int", &TypedValue::Integer(-12)).unwrap();
    writer.append_document_property("Scene", "Blob", &TypedValue::Bytes(vec![])).unwrap();
    writer.append_document_property("UVSets", "KString", &TypedValue::Text(String::new())).unwrap();
    writer
        .append_geometry_property("Island_01", "RizomUVUVSets", "String", &TypedValue::Text("setA".into()))
        .unwrap();
    writer.append_auxiliary_array("Island_01", "RizomUVUVMapIslandGroupIDs", &[]).unwrap();
    writer.append_auxiliary_array("Island_02", "RizomUVUVMapIslandGroupIDs", &[0, i32::MAX, i32::MIN]).unwrap();
    writer.finish().expect("Failed to finish container");
}

#[test]
fn test_roundtrip_all_kinds() {
    let temp = NamedTempFile::new().expect("Failed to create temp file");
    write_sample(temp.path());

    let loaded = load_file(temp.path(), &mut NullReporter).expect("Failed to load container");
    assert_eq!(loaded.record_count(), 6);
    assert_eq!(loaded.document.get("RizomUV").unwrap().value, TypedValue::Integer(-12));
    assert_eq!(loaded.document.get("Scene").unwrap().value, TypedValue::Bytes(vec![]));
    // Synonym tags are kept as written, values decode to the canonical kind.
    let sets = loaded.document.get("UVSets").unwrap();
    assert_eq!(sets.type_tag, "KString");
    assert_eq!(sets.value, TypedValue::Text(String::new()));

    // Present-but-empty is distinct from absent.
    let island_01 = loaded.geometry("Island_01").unwrap();
    assert!(island_01.has_auxiliary());
    assert!(island_01.auxiliary.as_ref().unwrap().elements.is_empty());
    assert_eq!(
        loaded.geometry("Island_02").unwrap().auxiliary.as_ref().unwrap().elements,
        vec![0, i32::MAX, i32::MIN]
    );
    assert!(loaded.geometry("Island_03").is_none());
}

#[test]
fn test_reader_preserves_file_order() {
    let temp = NamedTempFile::new().unwrap();
    write_sample(temp.path());

    let reader = ContainerReader::open(temp.path()).unwrap();
    let owners: Vec<String> = reader.map(|r| r.unwrap().owner().to_string()).collect();
    assert_eq!(owners, ["document", "document", "document", "Island_01", "Island_01", "Island_02"]);
}

#[test]
fn test_last_write_wins_on_disk() {
    let temp = NamedTempFile::new().unwrap();
    {
        let mut writer = ContainerWriter::create(temp.path()).unwrap();
        writer.append_geometry_property("m", "RizomUV", "Int", &TypedValue::Integer(1)).unwrap();
        writer.append_geometry_property("m", "Other", "Int", &TypedValue::Integer(5)).unwrap();
        writer.append_geometry_property("m", "RizomUV", "Integer", &TypedValue::Integer(2)).unwrap();
        writer.finish().unwrap();
    }

    let mut reporter = CollectingReporter::new();
    let loaded = load_file(temp.path(), &mut reporter).unwrap();
    let props = &loaded.geometry("m").unwrap().properties;
    assert_eq!(props.len(), 2);
    assert_eq!(props.get("RizomUV").unwrap().value, TypedValue::Integer(2));
    assert_eq!(reporter.count(|e| matches!(e, Event::RecordLoaded { .. })), 3);
}

#[test]
fn test_truncated_file_fails() {
    let full = NamedTempFile::new().unwrap();
    write_sample(full.path());
    let bytes = std::fs::read(full.path()).unwrap();

    let mut cut = NamedTempFile::new().unwrap();
    cut.write_all(&bytes[..bytes.len() - 3]).unwrap();
    cut.flush().unwrap();

    let err = load_file(cut.path(), &mut NullReporter).unwrap_err();
    assert!(err.is_truncation(), "expected truncation, got {err}");
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_file(dir.path().join("absent.dat"), &mut NullReporter).unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));
}

#[test]
fn test_record_shapes() {
    let temp = NamedTempFile::new().unwrap();
    write_sample(temp.path());
    let records: Vec<Record> = ContainerReader::open(temp.path()).unwrap().map(Result::unwrap).collect();
    assert!(matches!(records[0], Record::DocumentProperty(_)));
    assert!(matches!(records[3], Record::GeometryProperty(_)));
    assert!(matches!(records[5], Record::AuxiliaryArray(_)));
}
