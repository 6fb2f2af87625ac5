//! Registry freshness clock.
//!
//! Cached views (a screen's filtered show list, its resolved frame) are
//! invalidated by comparing a last-seen generation against these monotonic
//! counters instead of re-deriving on every access. Mutators bump the
//! matching counter; consumers refresh when their value is behind.

use bevy_ecs::prelude::Resource;

/// Monotonic generation counters for registry and geometry staleness.
#[derive(Resource, Debug, Clone, Copy)]
pub struct RegistryClock {
    show_generation: u64,
    screen_generation: u64,
}

impl Default for RegistryClock {
    fn default() -> Self {
        // Start at 1 so that consumers initialized with a last-seen value of
        // 0 refresh on first access.
        RegistryClock {
            show_generation: 1,
            screen_generation: 1,
        }
    }
}

impl RegistryClock {
    /// Generation of the available-show set. Newer than a consumer's
    /// last-seen value whenever shows were added, removed, enabled, or
    /// disabled since.
    pub fn shows(&self) -> u64 {
        self.show_generation
    }

    /// Generation of the screen geometry settings (draw mode, per-kind scale
    /// and offset).
    pub fn screen(&self) -> u64 {
        self.screen_generation
    }

    /// Record a change to the available-show set.
    pub fn bump_shows(&mut self) {
        self.show_generation += 1;
    }

    /// Record a change to screen geometry settings.
    pub fn bump_screen(&mut self) {
        self.screen_generation += 1;
    }
}
