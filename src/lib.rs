//! # rizom-bridge
//!
//! Carries RizomUV custom properties and island group IDs across a scene
//! re-export that would otherwise drop them.
//!
//! Extraction reads a source scene and writes a flat binary container of
//! typed records. Injection loads that container and re-attaches the data to
//! a freshly exported target scene, matching geometry by node name and then
//! by mesh name.
//!
//! ## Modules
//!
//! - [`util`] - Errors and logging setup
//! - [`container`] - Binary container format (codec, writer, reader, index)
//! - [`scene`] - In-memory scene graph and scene files
//! - [`bridge`] - Extraction, matching and re-attachment
//! - [`report`] - Diagnostic events and reporters
//! - [`settings`] - Persistent settings
//! - [`cache`] - Per-user container cache
//!
//! ## Example
//!
//! ```ignore
//! use rizom_bridge::prelude::*;
//!
//! let settings = Settings::load();
//! let mut reporter = TracingReporter;
//! extract_file("source.scn".as_ref(), "island.dat".as_ref(), &settings, &mut reporter)?;
//! inject_file(
//!     "export.scn".as_ref(),
//!     "island.dat".as_ref(),
//!     "final.scn".as_ref(),
//!     &settings,
//!     &WriterRegistry::default(),
//!     &mut reporter,
//! )?;
//! ```

pub mod util;
pub mod container;
pub mod scene;
pub mod bridge;
pub mod report;
pub mod settings;
pub mod cache;

// Re-export commonly used types
pub use util::{Error, Result};
pub use container::{ContainerReader, ContainerWriter, LoadedContainer, TypedValue, ValueKind};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::container::{
        load_all, load_file, ContainerReader, ContainerWriter, LoadedContainer, Record, TypedValue, ValueKind,
    };
    pub use crate::scene::io::{read_scene, write_scene, SceneEncoding, WriterRegistry};
    pub use crate::scene::{Mesh, Scene, UserDataElement};
    pub use crate::bridge::{extract_file, extract_scene, inject_file, inject_scene, ChainPolicy};
    pub use crate::report::{CollectingReporter, Event, NullReporter, Reporter, TracingReporter};
    pub use crate::settings::Settings;
    pub use crate::cache::CacheManager;
}
