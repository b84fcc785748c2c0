//! Scroll Sync - Keeping the facsimile, transcription, and source panes
//! on the same manuscript page
//!
//! The controller is a tick-driven state machine over the page map: page
//! changes animate every pane except the initiating one, and debounced
//! scroll detection turns a user scroll in any pane into a page change
//! for the others.

mod animation;
mod config;
mod controller;

pub use animation::*;
pub use config::*;
pub use controller::*;
