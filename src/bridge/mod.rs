//! Moving RizomUV data between scenes and containers.
//!
//! [`extract_scene`] walks a source scene and appends records to a
//! [`ContainerWriter`](crate::container::ContainerWriter). [`inject_scene`]
//! takes a fully loaded container and re-attaches its data to a target
//! scene, matching geometry owners by node name and then by mesh name.

mod chain;
mod extract;
mod inject;
mod matcher;

pub use chain::*;
pub use extract::*;
pub use inject::*;
pub use matcher::*;
