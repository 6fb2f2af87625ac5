//! Player command handling.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::device::{Device, Faction};
use crate::components::screen::Screen;
use crate::events::screen::{ScreenAction, ScreenCommand};
use crate::resources::devmode::DevMode;
use crate::resources::showstore::ShowStore;

/// Whether a device offers its screen controls. Controls show up when shows
/// are available and the device belongs to the player, or unconditionally
/// while the [`DevMode`] resource is present. Call sites fetch it with
/// `Option<Res<DevMode>>` and pass `.as_deref()`.
pub fn controls_visible(screen: &Screen, device: &Device, dev_mode: Option<&DevMode>) -> bool {
    (screen.show_count() > 0 && device.faction == Faction::Player) || dev_mode.is_some()
}

/// Apply queued [`ScreenCommand`]s to their target screens.
///
/// Commands aimed at entities without a screen are dropped with a debug log;
/// the menu that produced them may be a tick stale.
pub fn apply_screen_commands(
    mut commands: MessageReader<ScreenCommand>,
    mut query: Query<&mut Screen, With<Device>>,
    store: Res<ShowStore>,
) {
    for command in commands.read() {
        let Ok(mut screen) = query.get_mut(command.target) else {
            debug!("Dropping screen command for {:?}: no screen", command.target);
            continue;
        };
        match &command.action {
            ScreenAction::ToggleAutoAdvance => {
                screen.allow_viewer = !screen.allow_viewer;
            }
            ScreenAction::NextShow => {
                screen.next_show();
            }
            ScreenAction::SelectShow(def_name) => {
                screen.change_show_named(def_name, &store);
            }
        }
    }
}

/// Advance the double-buffered command queue. `Messages` keeps a message for
/// two updates; this must run once per tick or the buffer grows without
/// bound.
pub fn update_screen_messages(mut messages: ResMut<Messages<ScreenCommand>>) {
    messages.update();
}
