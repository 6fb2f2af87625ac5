//! Messages forming the host-facing control surface.
//!
//! The host's action menu (and tests) talk to playback instances through
//! buffered messages rather than reaching into components directly.
//!
//! Submodules:
//! - [`screen`] – player commands targeted at one screen instance

pub mod screen;
