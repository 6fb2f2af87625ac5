//! ECS components for device entities.
//!
//! Submodules overview:
//! - [`device`] – in-world identity of a screen-hosting device: kind,
//!   position, orientation, owning faction
//! - [`power`] – power supply state and the wattage output the playback
//!   engine reports back to the host's power net
//! - [`screen`] – per-instance playback state machine, cursors, and caches

pub mod device;
pub mod power;
pub mod screen;
