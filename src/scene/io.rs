//! Scene file reading and writing.
//!
//! Scenes are stored as JSON in one of two encodings:
//!
//! ```text
//! binary : "RZSCN\x01" + zlib(compact JSON)
//! ascii  : pretty-printed JSON
//! ```
//!
//! Readers detect the encoding from the magic bytes. Writers are looked up
//! by description through a [`WriterRegistry`], so callers can prefer one
//! encoding and fall back to another when it is not registered.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::Scene;
use crate::util::{Error, Result};

/// Magic bytes at the start of a binary scene file.
pub const SCENE_BINARY_MAGIC: &[u8; 6] = b"RZSCN\x01";

/// Description of the binary scene writer.
pub const BINARY_WRITER: &str = "Scene binary (*.scn)";

/// Description of the ascii scene writer.
pub const ASCII_WRITER: &str = "Scene ascii (*.scn)";

/// On-disk encoding of a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEncoding {
    Binary,
    Ascii,
}

/// Handle returned by a writer lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterId(usize);

/// Available scene writers, looked up by description.
#[derive(Debug, Clone)]
pub struct WriterRegistry {
    writers: Vec<(String, SceneEncoding)>,
}

impl Default for WriterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(BINARY_WRITER, SceneEncoding::Binary);
        registry.register(ASCII_WRITER, SceneEncoding::Ascii);
        registry
    }
}

impl WriterRegistry {
    /// Registry with no writers.
    pub fn empty() -> Self {
        Self { writers: Vec::new() }
    }

    /// Registry without the binary writer.
    pub fn ascii_only() -> Self {
        let mut registry = Self::empty();
        registry.register(ASCII_WRITER, SceneEncoding::Ascii);
        registry
    }

    pub fn register(&mut self, description: impl Into<String>, encoding: SceneEncoding) -> WriterId {
        self.writers.push((description.into(), encoding));
        WriterId(self.writers.len() - 1)
    }

    pub fn find_writer_by_description(&self, description: &str) -> Option<WriterId> {
        self.writers
            .iter()
            .position(|(d, _)| d == description)
            .map(WriterId)
    }

    pub fn encoding(&self, id: WriterId) -> Option<SceneEncoding> {
        self.writers.get(id.0).map(|(_, e)| *e)
    }

    pub fn description(&self, id: WriterId) -> Option<&str> {
        self.writers.get(id.0).map(|(d, _)| d.as_str())
    }
}

/// Serialize a scene.
pub fn encode_scene(scene: &Scene, encoding: SceneEncoding) -> Result<Vec<u8>> {
    match encoding {
        SceneEncoding::Ascii => {
            let mut out = serde_json::to_vec_pretty(scene)?;
            out.push(b'\n');
            Ok(out)
        }
        SceneEncoding::Binary => {
            let json = serde_json::to_vec(scene)?;
            let mut out = SCENE_BINARY_MAGIC.to_vec();
            let mut encoder = ZlibEncoder::new(&mut out, Compression::default());
            encoder.write_all(&json)?;
            encoder.finish()?;
            Ok(out)
        }
    }
}

/// Deserialize a scene, detecting its encoding.
pub fn decode_scene(bytes: &[u8]) -> Result<Scene> {
    match detect_encoding(bytes) {
        SceneEncoding::Binary => {
            let mut json = Vec::new();
            ZlibDecoder::new(&bytes[SCENE_BINARY_MAGIC.len()..])
                .read_to_end(&mut json)
                .map_err(|e| Error::invalid(format!("corrupt binary scene: {}", e)))?;
            Ok(serde_json::from_slice(&json)?)
        }
        SceneEncoding::Ascii => Ok(serde_json::from_slice(bytes)?),
    }
}

pub fn detect_encoding(bytes: &[u8]) -> SceneEncoding {
    if bytes.starts_with(SCENE_BINARY_MAGIC) {
        SceneEncoding::Binary
    } else {
        SceneEncoding::Ascii
    }
}

/// Read a scene file.
pub fn read_scene(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;
    decode_scene(&bytes)
}

/// Write a scene file.
pub fn write_scene(path: impl AsRef<Path>, scene: &Scene, encoding: SceneEncoding) -> Result<()> {
    let bytes = encode_scene(scene, encoding)?;
    fs::write(path, bytes)?;
    Ok(())
}
