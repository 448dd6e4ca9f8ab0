//! Resolve target scene nodes to container owners.

use std::collections::BTreeMap;

use crate::container::GeometryRecord;

/// Which label of the target object matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedBy {
    NodeName,
    MeshName,
}

/// A resolved owner.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    pub key: &'a str,
    pub by: MatchedBy,
    pub record: &'a GeometryRecord,
}

/// Look up a node's data: node name first, then mesh name.
///
/// `None` means the object has no recorded data and should be left alone.
pub fn resolve<'a>(
    geometry: &'a BTreeMap<String, GeometryRecord>,
    node_name: &str,
    mesh_name: &str,
) -> Option<Match<'a>> {
    let candidates = [(node_name, MatchedBy::NodeName), (mesh_name, MatchedBy::MeshName)];
    candidates.into_iter().find_map(|(name, by)| {
        geometry
            .get_key_value(name)
            .map(|(key, record)| Match { key: key.as_str(), by, record })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::AuxiliaryArray;

    fn index(owners: &[&str]) -> BTreeMap<String, GeometryRecord> {
        owners
            .iter()
            .enumerate()
            .map(|(i, o)| {
                let record = GeometryRecord {
                    auxiliary: Some(AuxiliaryArray { name: "Ids".into(), elements: vec![i as i32] }),
                    ..GeometryRecord::default()
                };
                (o.to_string(), record)
            })
            .collect()
    }

    #[test]
    fn test_node_name_wins_over_mesh_name() {
        let geometry = index(&["Island_01", "Island_01Shape"]);
        let m = resolve(&geometry, "Island_01", "Island_01Shape").unwrap();
        assert_eq!(m.by, MatchedBy::NodeName);
        assert_eq!(m.key, "Island_01");
        assert_eq!(m.record.auxiliary.as_ref().unwrap().elements, vec![0]);
    }

    #[test]
    fn test_mesh_name_fallback() {
        let geometry = index(&["Island_01Shape"]);
        let m = resolve(&geometry, "Renamed", "Island_01Shape").unwrap();
        assert_eq!(m.by, MatchedBy::MeshName);
        assert_eq!(m.key, "Island_01Shape");
    }

    #[test]
    fn test_no_match() {
        let geometry = index(&["Island_01"]);
        assert!(resolve(&geometry, "Island_02", "Island_02Shape").is_none());
        // Matching is exact.
        assert!(resolve(&geometry, "island_01", "").is_none());
    }
}
