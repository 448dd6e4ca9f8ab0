//! Binary record container.
//!
//! A container is a flat sequence of records with no header, no version and
//! no trailer. The stream ends where the last record ends.
//!
//! ## Record Layout
//!
//! ```text
//! +--------+------------------+-------------------+----------------+-------------+
//! | 'G'/'M'| owner (u32+utf8) | property (u32+utf8)| tag (u32+utf8) | typed value |
//! +--------+------------------+-------------------+----------------+-------------+
//!
//! +--------+------------------+-------------------+-------------+----------------+
//! | 'I'    | owner (u32+utf8) | array (u32+utf8)  | count (u32) | count x i32 LE |
//! +--------+------------------+-------------------+-------------+----------------+
//! ```
//!
//! Records appear in extraction order; a child property always follows its
//! parent. When the same `(owner, name)` appears twice, the later record wins.

mod codec;
mod format;
mod index;
mod reader;
mod stream;
mod writer;

pub use codec::*;
pub use format::*;
pub use index::*;
pub use reader::*;
pub use stream::{IStream, OStream};
pub use writer::*;
