//! Simulation time resource.
//!
//! The host simulation runs at a fixed tick rate; durations configured in
//! seconds are converted to whole ticks with [`seconds_to_ticks`].

use bevy_ecs::prelude::Resource;

/// Fixed simulation tick rate of the host.
pub const TICKS_PER_SECOND: u32 = 60;

/// Current simulation time and pause state.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct SimTime {
    /// Ticks elapsed since world creation. Does not advance while paused.
    pub ticks: u64,
    /// True while the host simulation is paused.
    pub paused: bool,
}

/// Convert a duration in seconds to whole simulation ticks, rounding to the
/// nearest tick.
pub fn seconds_to_ticks(seconds: f32) -> u32 {
    (seconds * TICKS_PER_SECOND as f32).round().max(0.0) as u32
}
