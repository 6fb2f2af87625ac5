//! ECS resources made available to systems.
//!
//! This module groups the long-lived shared state injected into the ECS
//! world: the show registry, the texture table, settings, timing, and the
//! freshness clock consumed by per-instance caches.
//!
//! Overview
//! - `clock` – monotonic generation counters for registry and geometry staleness
//! - `devicecatalog` – the closed set of device archetypes and their base data
//! - `devmode` – presence enables developer-only controls
//! - `settings` – persisted player settings document
//! - `showstore` – append-only registry of show definitions with tombstones
//! - `simtime` – simulation tick counter and pause flag
//! - `texturestore` – shared image resource table keyed by normalized path

pub mod clock;
pub mod devicecatalog;
pub mod devmode;
pub mod settings;
pub mod showstore;
pub mod simtime;
pub mod texturestore;
