//! Device archetype catalog.
//!
//! The set of device archetypes that can host a screen overlay is closed and
//! known at startup. Rather than looking archetypes up by name in a host
//! catalog per call, the kinds are a plain enum and their base data lives in
//! an array indexed by it.

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Archetype of an in-world device that can host a screen overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    Tube,
    Flatscreen,
    Megascreen,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 3] =
        [DeviceKind::Tube, DeviceKind::Flatscreen, DeviceKind::Megascreen];
    pub const COUNT: usize = Self::ALL.len();

    /// Index into per-kind arrays ([`DeviceCatalog`], settings scale/offset).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            DeviceKind::Tube => "Tube television",
            DeviceKind::Flatscreen => "Flatscreen television",
            DeviceKind::Megascreen => "Megascreen television",
        }
    }
}

/// Base data for one device archetype, resolved once at startup.
#[derive(Debug, Clone)]
pub struct DeviceSpec {
    pub kind: DeviceKind,
    /// Texture key of the device's own base graphic, used by preview
    /// surfaces on the host side.
    pub base_tex_key: String,
    /// Draw size of the device in world units.
    pub draw_size: Vec2,
    /// Base power consumption in watts.
    pub base_power: f32,
}

/// Catalog of all device archetypes, indexed by [`DeviceKind`].
#[derive(Resource, Debug, Clone)]
pub struct DeviceCatalog {
    specs: [DeviceSpec; DeviceKind::COUNT],
}

impl Default for DeviceCatalog {
    fn default() -> Self {
        DeviceCatalog {
            specs: [
                DeviceSpec {
                    kind: DeviceKind::Tube,
                    base_tex_key: "devices/tube_television".to_string(),
                    draw_size: Vec2::new(2.0, 2.0),
                    base_power: 200.0,
                },
                DeviceSpec {
                    kind: DeviceKind::Flatscreen,
                    base_tex_key: "devices/flatscreen_television".to_string(),
                    draw_size: Vec2::new(3.5, 2.0),
                    base_power: 330.0,
                },
                DeviceSpec {
                    kind: DeviceKind::Megascreen,
                    base_tex_key: "devices/megascreen_television".to_string(),
                    draw_size: Vec2::new(4.0, 3.0),
                    base_power: 400.0,
                },
            ],
        }
    }
}

impl DeviceCatalog {
    pub fn get(&self, kind: DeviceKind) -> &DeviceSpec {
        &self.specs[kind.index()]
    }
}
