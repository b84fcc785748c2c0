//! Structural Edit - Named structural operations over a manuscript tree
//!
//! This crate implements the structural editing operations (merging and
//! splitting stanzas, retagging lines as headings, content-matched
//! deletion) together with the selection-to-node resolution they rely on.

mod convert;
mod delete;
mod error;
mod executor;
mod matching;
mod merge;
mod operation;
mod renumber;
mod resolve;
mod split;

pub use convert::*;
pub use delete::*;
pub use error::*;
pub use executor::*;
pub use matching::*;
pub use merge::*;
pub use operation::*;
pub use renumber::*;
pub use resolve::*;
pub use split::*;
