//! Shared image resource table.
//!
//! Frames reference image resources by a normalized path key; entries are
//! shared between shows that scan the same directory. Registration is
//! idempotent and removal is driven by the reference counting in
//! [`crate::library::remove_user_show`].

use std::path::{Path, PathBuf};

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use rustc_hash::FxHashMap;

/// One registered image resource.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureEntry {
    /// Source file on disk.
    pub path: PathBuf,
    /// Native pixel width.
    pub width: u32,
    /// Native pixel height.
    pub height: u32,
}

/// Image resources keyed by normalized source path.
#[derive(Resource, Default, Debug)]
pub struct TextureStore {
    map: FxHashMap<String, TextureEntry>,
}

impl TextureStore {
    /// Normalize a filesystem path into a platform-independent key. Keys keep
    /// the file extension so `show.jpg` and `show.png` in one directory stay
    /// distinct.
    pub fn normalize_key(path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&TextureEntry> {
        self.map.get(key)
    }

    /// Register an entry under `key`. Re-registering an existing key keeps
    /// the already-loaded entry.
    pub fn insert(&mut self, key: String, entry: TextureEntry) {
        self.map.entry(key).or_insert(entry);
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.map.remove(key).is_some()
    }

    /// Native pixel dimensions of a registered image.
    pub fn size_of(&self, key: &str) -> Option<Vec2> {
        self.map
            .get(key)
            .map(|e| Vec2::new(e.width as f32, e.height as f32))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
