//! Player commands for screen instances.
//!
//! These correspond to the three controls the device contributes to its
//! in-world action menu: the auto-advance toggle, the show picker, and the
//! skip-to-next-show action. They are applied by
//! [`apply_screen_commands`](crate::systems::commands::apply_screen_commands).

use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;

/// A command targeted at one screen-hosting entity.
#[derive(Message, Debug, Clone)]
pub struct ScreenCommand {
    pub target: Entity,
    pub action: ScreenAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenAction {
    /// Flip the allow-auto-advance toggle.
    ToggleAutoAdvance,
    /// Skip to the next show in the filtered list.
    NextShow,
    /// Jump to a show picked by identity.
    SelectShow(String),
}
