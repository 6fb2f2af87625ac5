//! Developer mode marker resource.
//!
//! Presence of [`DevMode`] in the world unlocks controls normally restricted
//! to the owning faction, mirroring the host's developer-mode preference.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct DevMode;
