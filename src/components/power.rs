//! Power supply component.
//!
//! Stands in for the host's per-device power capability: the playback engine
//! reads `powered_on` as a play-state guard and writes `power_output` every
//! tick. The host models consumption as negative output.

use bevy_ecs::prelude::Component;

#[derive(Component, Debug, Clone)]
pub struct PowerTrader {
    /// Base consumption of the device in watts, from the device catalog.
    pub base_consumption: f32,
    /// Whether the power net currently supplies this device.
    pub powered_on: bool,
    /// Output reported to the power net; negative while consuming.
    pub power_output: f32,
}

impl PowerTrader {
    pub fn new(base_consumption: f32) -> Self {
        PowerTrader {
            base_consumption,
            powered_on: false,
            power_output: 0.0,
        }
    }
}
