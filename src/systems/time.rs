//! Simulation time system.

use bevy_ecs::prelude::*;

use crate::resources::simtime::SimTime;

/// Advance the tick counter by one. Paused worlds hold still.
pub fn advance_sim_time(mut time: ResMut<SimTime>) {
    if !time.paused {
        time.ticks += 1;
    }
}
