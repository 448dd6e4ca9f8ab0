//! Container cache directory.
//!
//! Extraction without an explicit output lands in a per-user cache, one
//! `<stem>.dat` file per source scene. Injection can then pick a cached
//! container by name.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::settings::Settings;
use crate::util::{Error, Result};

/// File extension of cached containers.
pub const CACHE_EXTENSION: &str = "dat";

/// Extension given to the scene a cache entry came from.
pub const SCENE_EXTENSION: &str = "scn";

/// One cached container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheEntry {
    pub filename: String,
    /// Name of the scene the container was extracted from.
    pub scene_name: String,
    pub path: PathBuf,
    pub size_kb: f64,
}

/// Manages the `.dat` files in a cache directory.
#[derive(Debug, Clone)]
pub struct CacheManager {
    dir: PathBuf,
}

impl CacheManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache from settings: the override when set, else the platform cache dir.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        if let Some(dir) = &settings.cache_dir {
            return Ok(Self::new(dir));
        }
        Self::default_dir()
            .map(Self::new)
            .ok_or_else(|| Error::other("no platform cache directory"))
    }

    /// `<platform cache dir>/rizom-bridge`
    pub fn default_dir() -> Option<PathBuf> {
        dirs::cache_dir().map(|p| p.join("rizom-bridge"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Container path for a scene file. Does not touch the filesystem.
    pub fn cache_path(&self, scene: impl AsRef<Path>) -> PathBuf {
        let stem = scene
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.dir.join(format!("{}.{}", stem, CACHE_EXTENSION))
    }

    /// Create the cache directory if needed.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Cached containers sorted by file name. A missing directory is empty.
    pub fn list(&self) -> Result<Vec<CacheEntry>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            let path = entry.path();
            if !is_cache_file(&path) {
                continue;
            }
            let meta = entry.metadata()?;
            if !meta.is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().into_owned();
            let scene_name = Path::new(&filename)
                .with_extension(SCENE_EXTENSION)
                .to_string_lossy()
                .into_owned();
            entries.push(CacheEntry {
                filename,
                scene_name,
                path,
                size_kb: meta.len() as f64 / 1024.0,
            });
        }
        entries.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(entries)
    }

    /// Delete one cached container. Returns false when it did not exist.
    ///
    /// Only bare file names inside the cache are accepted.
    pub fn delete(&self, filename: &str) -> Result<bool> {
        let name = Path::new(filename);
        if name.components().count() != 1 || name.file_name().is_none() {
            return Err(Error::invalid(format!("not a cache file name: {}", filename)));
        }
        let path = self.dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "deleted cache file");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove every `.dat` file. Other files are left alone.
    pub fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in self.list()? {
            fs::remove_file(&entry.path)?;
            removed += 1;
        }
        tracing::debug!(dir = %self.dir.display(), removed, "cleared cache");
        Ok(removed)
    }
}

fn is_cache_file(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == CACHE_EXTENSION)
}
