//! Screen playback component.
//!
//! One `Screen` per device instance. It owns the playback cursors (show and
//! frame), the elapsed-tick counters, the sleep timer set by watching
//! agents, and two lazily refreshed caches: the filtered show list and the
//! resolved current frame. Both caches are invalidated by comparing a
//! last-seen generation against the world's
//! [`RegistryClock`](crate::resources::clock::RegistryClock).
//!
//! # Playback flow
//!
//! 1. [`refresh_shows`](Screen::refresh_shows) re-derives the filtered show
//!    list when the show generation moved, re-locating the cursor by the
//!    persisted show id
//! 2. [`is_playing`](Screen::is_playing) evaluates the play-state guards
//! 3. [`run_show`](Screen::run_show) advances the cursors while playing
//! 4. [`resolve_frame`](Screen::resolve_frame) recomputes the drawable
//!    frame geometry when dirty; the host reads it via
//!    [`current_frame`](Screen::current_frame)

use bevy_ecs::prelude::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::device::{Device, Facing};
use crate::components::power::PowerTrader;
use crate::geometry;
use crate::resources::clock::RegistryClock;
use crate::resources::devicecatalog::{DeviceCatalog, DeviceKind};
use crate::resources::settings::ScreenSettings;
use crate::resources::showstore::{ShowDef, ShowStore};
use crate::resources::simtime::seconds_to_ticks;
use crate::resources::texturestore::TextureStore;

/// Number of ticks a watching agent keeps a screen awake. The watch job
/// re-arms the timer every tick, so it only runs out once the agent leaves.
pub const WATCH_TICKS: u32 = 10;

/// The drawable state of a screen: which texture to draw, at what size,
/// centered where. Consumed by the host's render path.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFrame {
    pub tex_key: String,
    pub size: Vec2,
    pub origin: Vec2,
}

/// Persisted subset of a screen's playback state. Fields absent in older
/// save data take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenState {
    /// Identity of the show being played. An index would not survive
    /// registry changes between save and load.
    pub show_def_name: Option<String>,
    pub frame_index: usize,
    pub show_ticks: u32,
    pub frame_ticks: u32,
    pub allow_viewer: bool,
}

impl Default for ScreenState {
    fn default() -> Self {
        ScreenState {
            show_def_name: None,
            frame_index: 0,
            show_ticks: 0,
            frame_ticks: 0,
            allow_viewer: true,
        }
    }
}

/// Per-device playback state machine.
#[derive(Component, Debug, Clone)]
pub struct Screen {
    show_def_name: Option<String>,
    show_index: usize,
    show_ticks: u32,
    frame_index: usize,
    frame_ticks: u32,
    /// Ticks remaining during which an agent counts as watching.
    pub sleep_timer: u32,
    /// Player toggle: whether the watching agent may auto-advance shows.
    pub allow_viewer: bool,

    frame_dirty: bool,
    frame: Option<ResolvedFrame>,
    /// Registry indices of shows playable on this device, in stable order.
    shows: Vec<usize>,
    show_update_seen: u64,
    screen_update_seen: u64,

    output_on: f32,
    output_off: f32,
}

impl Screen {
    /// Create a screen for a device with the given base power consumption.
    /// The on/off wattages are fixed here from the current settings,
    /// sign-inverted because the host models consumption as negative output.
    pub fn new(base_consumption: f32, settings: &ScreenSettings) -> Self {
        Screen {
            show_def_name: None,
            show_index: 0,
            show_ticks: 0,
            frame_index: 0,
            frame_ticks: 0,
            sleep_timer: 0,
            allow_viewer: true,
            frame_dirty: true,
            frame: None,
            shows: Vec::new(),
            show_update_seen: 0,
            screen_update_seen: 0,
            output_on: -1.0 * base_consumption * settings.power_consumption_on / 100.0,
            output_off: -1.0 * base_consumption * settings.power_consumption_off / 100.0,
        }
    }

    /// Wattage reported while playing.
    pub fn power_output_on(&self) -> f32 {
        self.output_on
    }

    /// Wattage reported while idle.
    pub fn power_output_off(&self) -> f32 {
        self.output_off
    }

    /// Snapshot the persisted playback state.
    pub fn save_state(&self) -> ScreenState {
        ScreenState {
            show_def_name: self.show_def_name.clone(),
            frame_index: self.frame_index,
            show_ticks: self.show_ticks,
            frame_ticks: self.frame_ticks,
            allow_viewer: self.allow_viewer,
        }
    }

    /// Restore persisted playback state. The show cursor itself is
    /// re-located by id on the next [`refresh_shows`](Screen::refresh_shows).
    pub fn restore_state(&mut self, state: ScreenState) {
        self.show_def_name = state.show_def_name;
        self.frame_index = state.frame_index;
        self.show_ticks = state.show_ticks;
        self.frame_ticks = state.frame_ticks;
        self.allow_viewer = state.allow_viewer;
        self.show_update_seen = 0;
        self.frame_dirty = true;
    }

    /// Called by the host's watch job every tick an agent is watching.
    pub fn watch(&mut self) {
        self.sleep_timer = WATCH_TICKS;
    }

    /// Number of shows currently playable on this device.
    pub fn show_count(&self) -> usize {
        self.shows.len()
    }

    /// Re-derive the filtered show list if the available-show set changed
    /// since the last look. Re-resolves the cursor by show id, since an
    /// index recorded against the old list would be meaningless, and falls
    /// back to the first show when the id is gone.
    pub fn refresh_shows(&mut self, kind: DeviceKind, store: &ShowStore, clock: &RegistryClock) {
        if self.show_update_seen >= clock.shows() {
            return;
        }
        self.shows = store.filtered(kind);
        self.show_update_seen = clock.shows();
        self.frame_dirty = true;
        if let Some(name) = &self.show_def_name {
            self.show_index = self
                .shows
                .iter()
                .position(|&i| store.by_index(i).is_some_and(|s| s.def_name == *name))
                .unwrap_or(0);
        }
    }

    /// The show under the cursor, or `None` when nothing is playable.
    /// Records the show's id for persistence and cursor restoration.
    pub fn current_show<'a>(&mut self, store: &'a ShowStore) -> Option<&'a ShowDef> {
        if self.shows.is_empty() {
            return None;
        }
        let index = self.shows[self.show_index % self.shows.len()];
        let show = store.by_index(index)?;
        self.show_def_name = Some(show.def_name.clone());
        Some(show)
    }

    /// Play-state guards, evaluated in precedence order. The screen plays
    /// iff all of them hold.
    pub fn is_playing(
        &mut self,
        device: &Device,
        power: &PowerTrader,
        store: &ShowStore,
        settings: &ScreenSettings,
    ) -> bool {
        // Not in the canonical forward orientation
        if device.facing != Facing::South {
            return false;
        }
        // Nobody watching, and the global always-play setting is off
        if self.sleep_timer == 0 && !settings.play_always {
            return false;
        }
        // No shows available, or the show has no frames
        match self.current_show(store) {
            Some(show) if show.has_frames() => {}
            _ => return false,
        }
        // Not powered
        power.powered_on
    }

    /// Advance the playback cursors for one tick. Only called while playing.
    ///
    /// A show advance (the watching agent flipping channels) takes
    /// precedence over a frame advance; at most one of the two happens per
    /// tick.
    pub fn run_show(&mut self, store: &ShowStore, settings: &ScreenSettings) {
        let show_count = self.shows.len();
        if show_count == 0 {
            return;
        }
        // The show-elapsed counter only runs while an agent is watching and
        // allowed to flip.
        let watched = self.sleep_timer > 0 && self.allow_viewer;
        if watched {
            self.show_ticks += 1;
        }
        if watched && self.show_ticks > seconds_to_ticks(settings.seconds_between_shows) {
            self.show_index = (self.show_index + 1) % show_count;
            self.frame_index = 0;
            self.show_ticks = 0;
            self.frame_ticks = 0;
            self.frame_dirty = true;
            return;
        }
        let (frame_count, frame_seconds) = match self.current_show(store) {
            Some(show) if show.has_frames() => (show.frames.len(), show.seconds_between_frames),
            _ => return,
        };
        self.frame_ticks += 1;
        if self.frame_ticks > seconds_to_ticks(frame_seconds) {
            self.frame_index = (self.frame_index + 1) % frame_count;
            self.frame_ticks = 0;
            self.frame_dirty = true;
        }
    }

    /// Jump to the show at `index` in the filtered list. Out-of-range
    /// indices are a no-op.
    pub fn change_show(&mut self, index: usize) {
        if index >= self.shows.len() {
            return;
        }
        self.show_index = index;
        self.frame_index = 0;
        self.show_ticks = 0;
        self.frame_ticks = 0;
        self.frame_dirty = true;
    }

    /// Jump to the named show, resolved by identity in the filtered list.
    pub fn change_show_named(&mut self, def_name: &str, store: &ShowStore) {
        if let Some(index) = self
            .shows
            .iter()
            .position(|&i| store.by_index(i).is_some_and(|s| s.def_name == def_name))
        {
            self.change_show(index);
        }
    }

    /// Skip to the next show in the filtered list.
    pub fn next_show(&mut self) {
        if !self.shows.is_empty() {
            self.change_show((self.show_index + 1) % self.shows.len());
        }
    }

    /// Recompute the drawable frame when the frame cursor moved or the
    /// screen geometry settings changed; otherwise reuse the cached value.
    pub fn resolve_frame(
        &mut self,
        device: &Device,
        catalog: &DeviceCatalog,
        settings: &ScreenSettings,
        store: &ShowStore,
        textures: &TextureStore,
        clock: &RegistryClock,
    ) -> Option<&ResolvedFrame> {
        let tex_key = match self.current_show(store) {
            Some(show) if show.has_frames() => {
                show.frames[self.frame_index % show.frames.len()].tex_key.clone()
            }
            _ => {
                self.frame = None;
                return None;
            }
        };
        if self.frame_dirty || self.screen_update_seen < clock.screen() {
            let spec = catalog.get(device.kind);
            let box_size = geometry::screen_box(spec.draw_size, settings.scale(device.kind));
            // An image whose dimensions never resolved degrades to filling
            // the box, as if stretched.
            let frame_px = textures.size_of(&tex_key).unwrap_or(box_size);
            self.frame = Some(ResolvedFrame {
                tex_key,
                size: geometry::screen_size(box_size, frame_px, settings.draw_mode),
                origin: geometry::draw_origin(device.pos, settings.offset(device.kind)),
            });
            self.screen_update_seen = clock.screen();
            self.frame_dirty = false;
        }
        self.frame.as_ref()
    }

    /// The cached drawable frame, if any. Read by the host's render path.
    pub fn current_frame(&self) -> Option<&ResolvedFrame> {
        self.frame.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::showstore::Frame;

    fn show(def_name: &str, frame_count: usize) -> ShowDef {
        ShowDef {
            def_name: def_name.to_string(),
            label: def_name.to_string(),
            description: String::new(),
            seconds_between_frames: 2.0,
            frames: (0..frame_count)
                .map(|i| Frame {
                    tex_key: format!("{def_name}/{i}.png"),
                })
                .collect(),
            device_kinds: vec![DeviceKind::Tube],
            sort_name: String::new(),
            disabled: false,
            deleted: false,
            user_defined: true,
            source_path: None,
        }
    }

    fn store_with(shows: Vec<ShowDef>) -> ShowStore {
        let mut store = ShowStore::default();
        for s in shows {
            store.add(s);
        }
        store
    }

    fn fresh_screen(store: &ShowStore) -> (Screen, ScreenSettings, RegistryClock) {
        let settings = ScreenSettings::default();
        let clock = RegistryClock::default();
        let mut screen = Screen::new(200.0, &settings);
        screen.refresh_shows(DeviceKind::Tube, store, &clock);
        (screen, settings, clock)
    }

    #[test]
    fn power_outputs_are_negative_fractions_of_base() {
        let mut settings = ScreenSettings::default();
        settings.power_consumption_on = 150.0;
        settings.power_consumption_off = 50.0;
        let screen = Screen::new(200.0, &settings);
        assert_eq!(screen.power_output_on(), -300.0);
        assert_eq!(screen.power_output_off(), -100.0);
    }

    #[test]
    fn guards_idle_without_watcher_or_play_always() {
        let store = store_with(vec![show("a", 3)]);
        let (mut screen, mut settings, _clock) = fresh_screen(&store);
        settings.play_always = false;
        let device = Device::new(DeviceKind::Tube, Vec2::ZERO);
        let mut power = PowerTrader::new(200.0);
        power.powered_on = true;

        // Sleep timer 0 and always-play off: idle regardless of power.
        assert!(!screen.is_playing(&device, &power, &store, &settings));

        screen.sleep_timer = 5;
        assert!(screen.is_playing(&device, &power, &store, &settings));
    }

    #[test]
    fn guards_idle_when_rotated_powerless_or_frameless() {
        let store = store_with(vec![show("a", 3)]);
        let (mut screen, settings, _clock) = fresh_screen(&store);
        let mut device = Device::new(DeviceKind::Tube, Vec2::ZERO);
        let mut power = PowerTrader::new(200.0);
        power.powered_on = true;
        assert!(screen.is_playing(&device, &power, &store, &settings));

        device.facing = Facing::North;
        assert!(!screen.is_playing(&device, &power, &store, &settings));
        device.facing = Facing::South;

        power.powered_on = false;
        assert!(!screen.is_playing(&device, &power, &store, &settings));
        power.powered_on = true;

        let empty = store_with(vec![show("a", 0)]);
        screen.show_update_seen = 0;
        screen.refresh_shows(DeviceKind::Tube, &empty, &RegistryClock::default());
        assert!(!screen.is_playing(&device, &power, &empty, &settings));
    }

    #[test]
    fn frame_advances_once_the_counter_exceeds_the_duration() {
        let store = store_with(vec![show("a", 3)]);
        let (mut screen, settings, _clock) = fresh_screen(&store);
        // 2 seconds per frame at 60 ticks per second: the advance lands on
        // the 121st accumulated tick.
        for _ in 0..120 {
            screen.run_show(&store, &settings);
        }
        assert_eq!(screen.save_state().frame_index, 0);
        screen.run_show(&store, &settings);
        let state = screen.save_state();
        assert_eq!(state.frame_index, 1);
        assert_eq!(state.frame_ticks, 0);
    }

    #[test]
    fn frame_cursor_wraps_modulo_frame_count() {
        let store = store_with(vec![show("a", 2)]);
        let (mut screen, settings, _clock) = fresh_screen(&store);
        for _ in 0..121 {
            screen.run_show(&store, &settings);
        }
        assert_eq!(screen.save_state().frame_index, 1);
        for _ in 0..121 {
            screen.run_show(&store, &settings);
        }
        assert_eq!(screen.save_state().frame_index, 0);
    }

    #[test]
    fn show_advance_takes_precedence_and_resets_counters() {
        let store = store_with(vec![show("a", 3), show("b", 3)]);
        let (mut screen, mut settings, _clock) = fresh_screen(&store);
        settings.seconds_between_shows = 1.0;
        screen.sleep_timer = u32::MAX;

        for _ in 0..60 {
            screen.run_show(&store, &settings);
        }
        assert_eq!(screen.current_show(&store).unwrap().def_name, "a");
        screen.run_show(&store, &settings);
        let state = screen.save_state();
        assert_eq!(screen.current_show(&store).unwrap().def_name, "b");
        assert_eq!(state.frame_index, 0);
        assert_eq!(state.show_ticks, 0);
        assert_eq!(state.frame_ticks, 0);
    }

    #[test]
    fn unwatched_screens_never_auto_advance_shows() {
        let store = store_with(vec![show("a", 3), show("b", 3)]);
        let (mut screen, mut settings, _clock) = fresh_screen(&store);
        settings.seconds_between_shows = 1.0;
        screen.sleep_timer = 0; // play_always keeps it playing, nobody flips

        for _ in 0..600 {
            screen.run_show(&store, &settings);
        }
        assert_eq!(screen.current_show(&store).unwrap().def_name, "a");
    }

    #[test]
    fn allow_viewer_off_pins_the_show() {
        let store = store_with(vec![show("a", 3), show("b", 3)]);
        let (mut screen, mut settings, _clock) = fresh_screen(&store);
        settings.seconds_between_shows = 1.0;
        screen.sleep_timer = u32::MAX;
        screen.allow_viewer = false;

        for _ in 0..600 {
            screen.run_show(&store, &settings);
        }
        assert_eq!(screen.current_show(&store).unwrap().def_name, "a");
    }

    #[test]
    fn change_show_out_of_range_is_a_noop() {
        let store = store_with(vec![show("a", 3), show("b", 3)]);
        let (mut screen, settings, _clock) = fresh_screen(&store);
        for _ in 0..50 {
            screen.run_show(&store, &settings);
        }
        let before = screen.save_state();
        screen.change_show(2);
        assert_eq!(screen.save_state(), before);

        screen.change_show(1);
        assert_eq!(screen.current_show(&store).unwrap().def_name, "b");
        assert_eq!(screen.save_state().frame_ticks, 0);
    }

    #[test]
    fn cursor_restores_by_id_across_registry_changes() {
        let store = store_with(vec![show("a", 3), show("b", 3), show("c", 3)]);
        let (mut screen, _settings, mut clock) = fresh_screen(&store);
        screen.change_show(2);
        assert_eq!(screen.current_show(&store).unwrap().def_name, "c");
        let state = screen.save_state();

        // New world: "b" got tombstoned, so "c" sits at a different index.
        let mut store2 = store_with(vec![show("a", 3), show("b", 3), show("c", 3)]);
        store2.mark_deleted("b");
        let settings = ScreenSettings::default();
        let mut restored = Screen::new(200.0, &settings);
        restored.restore_state(state);
        clock.bump_shows();
        restored.refresh_shows(DeviceKind::Tube, &store2, &clock);
        assert_eq!(restored.current_show(&store2).unwrap().def_name, "c");
    }

    #[test]
    fn cursor_falls_back_to_first_show_when_the_id_is_gone() {
        let store = store_with(vec![show("a", 3), show("b", 3)]);
        let (mut screen, _settings, mut clock) = fresh_screen(&store);
        screen.change_show(1);
        assert_eq!(screen.current_show(&store).unwrap().def_name, "b");

        let mut shrunk = store_with(vec![show("a", 3), show("b", 3)]);
        shrunk.mark_deleted("b");
        clock.bump_shows();
        screen.refresh_shows(DeviceKind::Tube, &shrunk, &clock);
        assert_eq!(screen.current_show(&shrunk).unwrap().def_name, "a");
    }

    #[test]
    fn old_save_data_defaults_apply() {
        let state: ScreenState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, ScreenState::default());
        assert!(state.allow_viewer);
    }

    #[test]
    fn resolved_frame_is_cached_until_dirty_or_settings_change() {
        let store = store_with(vec![show("a", 2)]);
        let (mut screen, mut settings, mut clock) = fresh_screen(&store);
        let device = Device::new(DeviceKind::Tube, Vec2::new(4.0, 4.0));
        let catalog = DeviceCatalog::default();
        let mut textures = TextureStore::default();
        textures.insert(
            "a/0.png".to_string(),
            crate::resources::texturestore::TextureEntry {
                path: "a/0.png".into(),
                width: 800,
                height: 400,
            },
        );

        let first = screen
            .resolve_frame(&device, &catalog, &settings, &store, &textures, &clock)
            .cloned()
            .unwrap();
        assert_eq!(first.tex_key, "a/0.png");

        // Settings mutate but the generation has not moved: cache holds.
        settings.draw_mode = crate::geometry::DrawMode::Fit;
        let held = screen
            .resolve_frame(&device, &catalog, &settings, &store, &textures, &clock)
            .cloned()
            .unwrap();
        assert_eq!(held, first);

        // Bumping the screen generation picks the new draw mode up.
        clock.bump_screen();
        let refreshed = screen
            .resolve_frame(&device, &catalog, &settings, &store, &textures, &clock)
            .cloned()
            .unwrap();
        assert_ne!(refreshed.size, first.size);
    }
}
