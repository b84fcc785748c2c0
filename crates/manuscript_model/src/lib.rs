//! Manuscript Model - TEI document tree and structural queries
//!
//! This crate provides the document model for the manuscript workbench: an
//! addressable, mutable tree of pages, divisions, stanzas and lines with a
//! structural revision counter, page-marker enumeration, and TEI
//! parse/serialize support. It owns no UI.

mod document;
mod error;
pub mod markers;
mod node;
mod node_id;
pub mod parse;
mod selection;
pub mod serialize;
mod tree;

pub use document::*;
pub use error::*;
pub use markers::{MarkerSource, PageMarker};
pub use node::*;
pub use node_id::*;
pub use selection::*;
pub use tree::*;
