//! Telescreen playback core.
//!
//! This crate implements the runtime behind animated "screen" overlays on
//! simulated in-world devices: a registry of shows (ordered image playlists
//! with per-frame timing), a filesystem loader that turns a directory of
//! images into a show, and a per-device playback component that advances
//! frames and shows once per simulation tick.
//!
//! The host drives everything through a [`bevy_ecs`] world: devices are
//! entities carrying [`components::device::Device`],
//! [`components::power::PowerTrader`], and [`components::screen::Screen`];
//! shared state lives in resources; the systems in [`systems`] run once per
//! host tick. Rendering itself stays on the host side: it reads the
//! resolved frame cache and power output off the components.

pub mod components;
pub mod events;
pub mod geometry;
pub mod library;
pub mod resources;
pub mod systems;
