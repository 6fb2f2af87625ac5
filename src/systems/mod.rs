//! Playback systems.
//!
//! These run once per host simulation tick, in schedule order:
//!
//! 1. [`time::advance_sim_time`] – advance the tick counter while unpaused
//! 2. [`playback::screen_tick`] – refresh caches, evaluate play state,
//!    advance cursors, report power output
//! 3. [`playback::resolve_frames`] – recompute dirty frame geometry
//! 4. [`playback::sleep_timer_decay`] – count watch timers down
//! 5. [`commands::apply_screen_commands`] – apply queued player commands
//! 6. [`commands::update_screen_messages`] – advance the command queue
//!    buffers so consumed messages get dropped

pub mod commands;
pub mod playback;
pub mod time;
