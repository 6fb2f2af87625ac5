//! Screen playback systems.
//!
//! - [`screen_tick`] drives the per-instance state machine: refresh the
//!   filtered show list, evaluate the play-state guards, advance cursors
//!   while playing, and report the power output for this tick.
//! - [`resolve_frames`] recomputes the drawable frame for playing screens so
//!   the host render path can read it off the component.
//! - [`sleep_timer_decay`] counts the watch timers down while the simulation
//!   is unpaused.
//!
//! # Ordering
//!
//! Power output is assigned after guard evaluation within [`screen_tick`];
//! [`sleep_timer_decay`] runs after [`screen_tick`] so a watch tick keeps a
//! screen awake through the tick it was set on.

use bevy_ecs::prelude::*;

use crate::components::device::Device;
use crate::components::power::PowerTrader;
use crate::components::screen::Screen;
use crate::resources::clock::RegistryClock;
use crate::resources::devicecatalog::DeviceCatalog;
use crate::resources::settings::ScreenSettings;
use crate::resources::showstore::ShowStore;
use crate::resources::simtime::SimTime;
use crate::resources::texturestore::TextureStore;

/// Advance every screen by one simulation tick.
///
/// Contract
/// - Reads [`ShowStore`], [`ScreenSettings`], and [`RegistryClock`].
/// - Mutates [`Screen`] cursor state and [`PowerTrader::power_output`].
/// - Power output is written every tick, playing or not.
pub fn screen_tick(
    mut query: Query<(&Device, &mut PowerTrader, &mut Screen)>,
    store: Res<ShowStore>,
    settings: Res<ScreenSettings>,
    clock: Res<RegistryClock>,
    time: Res<SimTime>,
) {
    if time.paused {
        return;
    }
    for (device, mut power, mut screen) in query.iter_mut() {
        screen.refresh_shows(device.kind, &store, &clock);
        if screen.is_playing(device, &power, &store, &settings) {
            screen.run_show(&store, &settings);
            power.power_output = screen.power_output_on();
        } else {
            power.power_output = screen.power_output_off();
        }
    }
}

/// Recompute the drawable frame for screens that are playing. Idle screens
/// keep (or drop) their cache untouched; the host does not draw them.
pub fn resolve_frames(
    mut query: Query<(&Device, &PowerTrader, &mut Screen)>,
    store: Res<ShowStore>,
    settings: Res<ScreenSettings>,
    catalog: Res<DeviceCatalog>,
    textures: Res<TextureStore>,
    clock: Res<RegistryClock>,
) {
    for (device, power, mut screen) in query.iter_mut() {
        if screen.is_playing(device, power, &store, &settings) {
            screen.resolve_frame(device, &catalog, &settings, &store, &textures, &clock);
        }
    }
}

/// Count watch timers down toward zero, one per tick, while unpaused.
pub fn sleep_timer_decay(time: Res<SimTime>, mut query: Query<&mut Screen>) {
    if time.paused {
        return;
    }
    for mut screen in query.iter_mut() {
        screen.sleep_timer = screen.sleep_timer.saturating_sub(1);
    }
}
