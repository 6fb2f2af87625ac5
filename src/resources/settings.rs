//! Persisted player settings.
//!
//! A versioned JSON document owned by the host's settings directory. Missing
//! keys take safe defaults so documents written by older builds keep
//! loading. Screen geometry (per-kind scale and offset) is persisted as
//! twelve flattened scalar fields; the legacy vector-pair fields are still
//! read, and written back out, so older and newer builds can exchange the
//! same document.
//!
//! Geometry mutations go through setters; callers are expected to bump
//! [`RegistryClock::bump_screen`](crate::resources::clock::RegistryClock::bump_screen)
//! so playback instances refresh their cached frame geometry.

use std::fs;
use std::path::PathBuf;

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use log::info;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::geometry::DrawMode;
use crate::resources::devicecatalog::DeviceKind;

/// Document version written by this build.
pub const SETTINGS_VERSION: u32 = 2;

const DEFAULT_SETTINGS_PATH: &str = "./telescreen_settings.json";

/// Default screen scale per device kind, indexed by [`DeviceKind::index`].
pub const SCALE_DEFAULTS: [Vec2; DeviceKind::COUNT] = [
    Vec2::new(0.5162, 0.4200),
    Vec2::new(0.8700, 0.7179),
    Vec2::new(0.9414, 0.8017),
];

/// Default screen offset per device kind, indexed by [`DeviceKind::index`].
pub const OFFSET_DEFAULTS: [Vec2; DeviceKind::COUNT] = [
    Vec2::new(-0.0897, 0.1172),
    Vec2::new(0.0, -0.0346),
    Vec2::new(0.0, -0.0207),
];

/// Persisted record of a player-created show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserShow {
    pub def_name: String,
    /// Directory scanned for frames.
    pub path: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub seconds_between_frames: f32,
    pub device_kinds: Vec<DeviceKind>,
}

/// Player settings resource.
///
/// On startup the host constructs this with [`ScreenSettings::with_path`] and
/// calls [`load_from_file`](ScreenSettings::load_from_file); a missing or
/// unreadable document leaves the defaults in place.
#[derive(Resource, Debug, Clone)]
pub struct ScreenSettings {
    /// Play even when no agent is watching.
    pub play_always: bool,
    /// Power draw while playing, percent of the device's base consumption.
    pub power_consumption_on: f32,
    /// Power draw while idle, percent of the device's base consumption.
    pub power_consumption_off: f32,
    /// Seconds a watching agent stays on one show before auto-advancing.
    pub seconds_between_shows: f32,
    pub draw_mode: DrawMode,
    /// Last directory browsed in the add-show surface.
    pub last_path: String,
    /// Ids of shows the player has switched off.
    pub disabled_shows: FxHashSet<String>,
    /// Player-created shows, reloaded into the registry at startup.
    pub user_shows: Vec<UserShow>,
    scales: [Vec2; DeviceKind::COUNT],
    offsets: [Vec2; DeviceKind::COUNT],
    /// Path of the settings document.
    pub settings_path: PathBuf,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        ScreenSettings {
            play_always: true,
            power_consumption_on: 100.0,
            power_consumption_off: 100.0,
            seconds_between_shows: 60.0,
            draw_mode: DrawMode::default(),
            last_path: String::new(),
            disabled_shows: FxHashSet::default(),
            user_shows: Vec::new(),
            scales: SCALE_DEFAULTS,
            offsets: OFFSET_DEFAULTS,
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
        }
    }
}

impl ScreenSettings {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        ScreenSettings {
            settings_path: path.into(),
            ..Self::default()
        }
    }

    pub fn scale(&self, kind: DeviceKind) -> Vec2 {
        self.scales[kind.index()]
    }

    pub fn offset(&self, kind: DeviceKind) -> Vec2 {
        self.offsets[kind.index()]
    }

    pub fn set_scale(&mut self, kind: DeviceKind, scale: Vec2) {
        self.scales[kind.index()] = scale;
    }

    pub fn set_offset(&mut self, kind: DeviceKind, offset: Vec2) {
        self.offsets[kind.index()] = offset;
    }

    /// Restore the default geometry for every device kind.
    pub fn reset_geometry(&mut self) {
        self.scales = SCALE_DEFAULTS;
        self.offsets = OFFSET_DEFAULTS;
    }

    /// Load the settings document. Missing values retain their current
    /// (default) values. Returns an error if the file cannot be read or
    /// parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let contents = fs::read_to_string(&self.settings_path)
            .map_err(|e| format!("Failed to read settings file: {}", e))?;
        let file: SettingsFile = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse settings file: {}", e))?;
        self.apply(file);
        info!(
            "Loaded settings: {} user shows, {} disabled, draw mode {:?}",
            self.user_shows.len(),
            self.disabled_shows.len(),
            self.draw_mode
        );
        Ok(())
    }

    /// Save the settings document, creating the file if absent.
    pub fn save_to_file(&self) -> Result<(), String> {
        let file = self.to_file();
        let contents = serde_json::to_string_pretty(&file)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        fs::write(&self.settings_path, contents)
            .map_err(|e| format!("Failed to write settings file: {}", e))?;
        info!("Saved settings to {:?}", self.settings_path);
        Ok(())
    }

    fn apply(&mut self, file: SettingsFile) {
        if let Some(v) = file.play_always {
            self.play_always = v;
        }
        if let Some(v) = file.power_consumption_on {
            self.power_consumption_on = v;
        }
        if let Some(v) = file.power_consumption_off {
            self.power_consumption_off = v;
        }
        if let Some(v) = file.seconds_between_shows {
            self.seconds_between_shows = v;
        }
        if let Some(v) = file.draw_mode {
            self.draw_mode = v;
        }
        if let Some(v) = file.last_path {
            self.last_path = v;
        }
        if let Some(v) = file.disabled_shows {
            self.disabled_shows = v.into_iter().collect();
        }
        if let Some(v) = file.user_shows {
            self.user_shows = v;
        }

        // Scalar fields win; the vector-pair form only applies where the
        // scalars are absent (documents written before the flattening).
        self.scales = [
            resolve_pair(
                file.tube_scale_x,
                file.tube_scale_y,
                file.tube_scale,
                SCALE_DEFAULTS[DeviceKind::Tube.index()],
            ),
            resolve_pair(
                file.flat_scale_x,
                file.flat_scale_y,
                file.flat_scale,
                SCALE_DEFAULTS[DeviceKind::Flatscreen.index()],
            ),
            resolve_pair(
                file.mega_scale_x,
                file.mega_scale_y,
                file.mega_scale,
                SCALE_DEFAULTS[DeviceKind::Megascreen.index()],
            ),
        ];
        self.offsets = [
            resolve_pair(
                file.tube_offset_x,
                file.tube_offset_y,
                file.tube_offset,
                OFFSET_DEFAULTS[DeviceKind::Tube.index()],
            ),
            resolve_pair(
                file.flat_offset_x,
                file.flat_offset_y,
                file.flat_offset,
                OFFSET_DEFAULTS[DeviceKind::Flatscreen.index()],
            ),
            resolve_pair(
                file.mega_offset_x,
                file.mega_offset_y,
                file.mega_offset,
                OFFSET_DEFAULTS[DeviceKind::Megascreen.index()],
            ),
        ];
    }

    fn to_file(&self) -> SettingsFile {
        let s = |k: DeviceKind| self.scales[k.index()];
        let o = |k: DeviceKind| self.offsets[k.index()];
        SettingsFile {
            version: SETTINGS_VERSION,
            play_always: Some(self.play_always),
            power_consumption_on: Some(self.power_consumption_on),
            power_consumption_off: Some(self.power_consumption_off),
            seconds_between_shows: Some(self.seconds_between_shows),
            draw_mode: Some(self.draw_mode),
            last_path: Some(self.last_path.clone()),
            disabled_shows: Some(self.disabled_shows.iter().cloned().collect()),
            user_shows: Some(self.user_shows.clone()),
            tube_scale_x: Some(s(DeviceKind::Tube).x),
            tube_scale_y: Some(s(DeviceKind::Tube).y),
            flat_scale_x: Some(s(DeviceKind::Flatscreen).x),
            flat_scale_y: Some(s(DeviceKind::Flatscreen).y),
            mega_scale_x: Some(s(DeviceKind::Megascreen).x),
            mega_scale_y: Some(s(DeviceKind::Megascreen).y),
            tube_offset_x: Some(o(DeviceKind::Tube).x),
            tube_offset_y: Some(o(DeviceKind::Tube).y),
            flat_offset_x: Some(o(DeviceKind::Flatscreen).x),
            flat_offset_y: Some(o(DeviceKind::Flatscreen).y),
            mega_offset_x: Some(o(DeviceKind::Megascreen).x),
            mega_offset_y: Some(o(DeviceKind::Megascreen).y),
            tube_scale: Some(s(DeviceKind::Tube).to_array()),
            flat_scale: Some(s(DeviceKind::Flatscreen).to_array()),
            mega_scale: Some(s(DeviceKind::Megascreen).to_array()),
            tube_offset: Some(o(DeviceKind::Tube).to_array()),
            flat_offset: Some(o(DeviceKind::Flatscreen).to_array()),
            mega_offset: Some(o(DeviceKind::Megascreen).to_array()),
        }
    }
}

fn resolve_pair(x: Option<f32>, y: Option<f32>, legacy: Option<[f32; 2]>, default: Vec2) -> Vec2 {
    let fallback = legacy.map(Vec2::from_array).unwrap_or(default);
    Vec2::new(x.unwrap_or(fallback.x), y.unwrap_or(fallback.y))
}

/// On-disk shape of the settings document. Every field is optional so older
/// documents keep loading.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct SettingsFile {
    version: u32,
    play_always: Option<bool>,
    power_consumption_on: Option<f32>,
    power_consumption_off: Option<f32>,
    seconds_between_shows: Option<f32>,
    draw_mode: Option<DrawMode>,
    last_path: Option<String>,
    disabled_shows: Option<Vec<String>>,
    user_shows: Option<Vec<UserShow>>,

    // Flattened scalar representation of per-kind geometry.
    tube_scale_x: Option<f32>,
    tube_scale_y: Option<f32>,
    flat_scale_x: Option<f32>,
    flat_scale_y: Option<f32>,
    mega_scale_x: Option<f32>,
    mega_scale_y: Option<f32>,
    tube_offset_x: Option<f32>,
    tube_offset_y: Option<f32>,
    flat_offset_x: Option<f32>,
    flat_offset_y: Option<f32>,
    mega_offset_x: Option<f32>,
    mega_offset_y: Option<f32>,

    // Legacy vector-pair representation, still read and written.
    tube_scale: Option<[f32; 2]>,
    flat_scale: Option<[f32; 2]>,
    mega_scale: Option<[f32; 2]>,
    tube_offset: Option<[f32; 2]>,
    flat_offset: Option<[f32; 2]>,
    mega_offset: Option<[f32; 2]>,
}
