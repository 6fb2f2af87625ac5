//! Show definition registry.
//!
//! Append-only: once a show is registered its record stays for the lifetime
//! of the world, because playback instances and UI surfaces may still hold
//! its id this tick. Removal is a `deleted` tombstone; every enumeration
//! helper filters tombstones out.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::resources::devicecatalog::DeviceKind;

/// One frame of a show: a reference into the
/// [`TextureStore`](crate::resources::texturestore::TextureStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub tex_key: String,
}

/// A named, ordered playlist of image frames with per-frame timing, playable
/// on compatible device kinds.
///
/// Frame order is display order, not sort order. An empty frame list is
/// legal; such a show simply never renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowDef {
    /// Stable identity. Cursor persistence and disabled-set membership use
    /// this, never an index.
    pub def_name: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub seconds_between_frames: f32,
    pub frames: Vec<Frame>,
    pub device_kinds: Vec<DeviceKind>,
    /// Label used by sorted configuration views, prefixed by content source.
    #[serde(default)]
    pub sort_name: String,
    /// Player-toggled, persisted through the settings disabled-id set.
    #[serde(default)]
    pub disabled: bool,
    /// Tombstone. Deleted shows stay in the registry but never appear in
    /// filtered views.
    #[serde(default)]
    pub deleted: bool,
    /// True for shows created by the player at runtime, false for packaged
    /// content.
    #[serde(default)]
    pub user_defined: bool,
    /// Directory the frames were scanned from. Only set for user shows;
    /// drives reference-counted texture eviction.
    #[serde(default)]
    pub source_path: Option<String>,
}

impl ShowDef {
    pub fn has_frames(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn supports(&self, kind: DeviceKind) -> bool {
        self.device_kinds.contains(&kind)
    }
}

/// Append-only registry of all known shows, packaged and user-defined.
#[derive(Resource, Default, Debug)]
pub struct ShowStore {
    shows: Vec<ShowDef>,
}

impl ShowStore {
    /// Register a show. A show whose `def_name` is already present is never
    /// re-added; returns whether the show was inserted.
    pub fn add(&mut self, show: ShowDef) -> bool {
        if self.contains(&show.def_name) {
            return false;
        }
        self.shows.push(show);
        true
    }

    /// Insert or replace in place, keeping registry order stable for
    /// existing ids. Used by the loader when re-scanning a show.
    pub fn upsert(&mut self, show: ShowDef) {
        match self.shows.iter_mut().find(|s| s.def_name == show.def_name) {
            Some(slot) => *slot = show,
            None => self.shows.push(show),
        }
    }

    pub fn contains(&self, def_name: &str) -> bool {
        self.shows.iter().any(|s| s.def_name == def_name)
    }

    pub fn get(&self, def_name: &str) -> Option<&ShowDef> {
        self.shows.iter().find(|s| s.def_name == def_name)
    }

    pub fn get_mut(&mut self, def_name: &str) -> Option<&mut ShowDef> {
        self.shows.iter_mut().find(|s| s.def_name == def_name)
    }

    /// All records including tombstones, in registry order.
    pub fn all(&self) -> impl Iterator<Item = &ShowDef> {
        self.shows.iter()
    }

    /// All non-deleted records, in registry order.
    pub fn active(&self) -> impl Iterator<Item = &ShowDef> {
        self.shows.iter().filter(|s| !s.deleted)
    }

    /// Registry indices of shows playable on `kind`: non-deleted,
    /// non-disabled, compatible, in stable registry order.
    pub fn filtered(&self, kind: DeviceKind) -> Vec<usize> {
        self.shows
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.deleted && !s.disabled && s.supports(kind))
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of playable shows for one device kind.
    pub fn count_for(&self, kind: DeviceKind) -> usize {
        self.filtered(kind).len()
    }

    pub fn by_index(&self, index: usize) -> Option<&ShowDef> {
        self.shows.get(index)
    }

    pub fn len(&self) -> usize {
        self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }

    /// Mark a show deleted. Returns false if the id is unknown.
    pub fn mark_deleted(&mut self, def_name: &str) -> bool {
        match self.get_mut(def_name) {
            Some(show) => {
                show.deleted = true;
                true
            }
            None => false,
        }
    }

    /// Re-apply the persisted disabled-id set to every record.
    pub fn resolve_disabled(&mut self, disabled: &FxHashSet<String>) {
        for show in self.shows.iter_mut() {
            show.disabled = disabled.contains(&show.def_name);
        }
    }
}
