//! Device instance component.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::resources::devicecatalog::DeviceKind;

/// Cardinal orientation of a device. A screen only renders while the device
/// faces [`Facing::South`], its canonical forward orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    North,
    East,
    #[default]
    South,
    West,
}

/// Faction owning a device instance. Screen controls are only offered for
/// player-owned devices (or in developer mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Faction {
    #[default]
    Player,
    Other,
}

/// An in-world device instance that can host a screen overlay.
#[derive(Component, Debug, Clone)]
pub struct Device {
    pub kind: DeviceKind,
    /// Draw position of the device center in world units.
    pub pos: Vec2,
    pub facing: Facing,
    pub faction: Faction,
}

impl Device {
    pub fn new(kind: DeviceKind, pos: Vec2) -> Self {
        Device {
            kind,
            pos,
            facing: Facing::default(),
            faction: Faction::default(),
        }
    }
}
