//! Persistent bridge settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bridge::ChainPolicy;
use crate::util::Result;

/// Environment variable naming an alternate settings file.
pub const SETTINGS_ENV: &str = "RIZOM_BRIDGE_CONFIG";

/// Bridge settings that persist between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Cache directory override (None = platform cache dir)
    pub cache_dir: Option<PathBuf>,

    // Name given to the target document on injection
    pub document_name: String,

    // Mesh properties copied per geometry
    pub geometry_properties: Vec<String>,

    // Substrings that select user-data layers for extraction
    pub user_data_filters: Vec<String>,

    // Layer naming on injection
    pub default_layer_name: String,
    pub layer_element_name: String,

    pub chain_policy: ChainPolicy,

    // Fall back to ascii when false or when no binary writer exists
    pub prefer_binary_output: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: None,
            document_name: "Scene".to_string(),
            geometry_properties: vec!["RizomUV".to_string(), "RizomUVUVSets".to_string()],
            user_data_filters: vec!["Island".to_string(), "RizomUV".to_string(), "GroupID".to_string()],
            default_layer_name: "RizomUVUVMapIslandGroupIDs".to_string(),
            layer_element_name: "IslandGroupID".to_string(),
            chain_policy: ChainPolicy::AlwaysBuild,
            prefer_binary_output: true,
        }
    }
}

impl Settings {
    /// Settings file path: `$RIZOM_BRIDGE_CONFIG`, else the platform config dir.
    pub fn path() -> Option<PathBuf> {
        if let Some(p) = std::env::var_os(SETTINGS_ENV) {
            return Some(PathBuf::from(p));
        }
        dirs::config_dir().map(|mut p| {
            p.push("rizom-bridge");
            p.push("settings.json");
            p
        })
    }

    /// Load settings, falling back to defaults when missing or unreadable.
    pub fn load() -> Self {
        Self::path().map(|p| Self::load_from(&p)).unwrap_or_default()
    }

    /// Load from a specific file, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save settings to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// True when a user-data element name matches any extraction filter.
    pub fn matches_user_data(&self, name: &str) -> bool {
        self.user_data_filters.iter().any(|f| name.contains(f.as_str()))
    }
}
