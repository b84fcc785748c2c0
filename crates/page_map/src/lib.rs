//! Page Map - Page-to-position correlation across the three panes
//!
//! This crate turns the document's page markers plus the geometry each
//! pane reports into a per-page position map, cached against the
//! document revision.

mod builder;
mod cache;
mod map;
mod mapping;
mod view;

pub use builder::*;
pub use cache::*;
pub use map::*;
pub use mapping::*;
pub use view::*;
