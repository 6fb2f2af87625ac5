//! Screen overlay geometry.
//!
//! Pure math shared by the playback component and the configuration
//! surfaces: given the device's draw size, the per-kind screen scale, and a
//! frame's native pixel dimensions, compute the overlay rectangle for the
//! active [`DrawMode`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How a frame is mapped onto the screen box of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawMode {
    /// Fill the screen box exactly, ignoring the frame's aspect ratio.
    #[default]
    Stretch,
    /// Largest size that fits entirely inside the box, preserving aspect.
    Fit,
    /// Smallest size that covers the box, preserving aspect. May exceed the
    /// box bounds.
    Fill,
}

impl DrawMode {
    pub const ALL: [DrawMode; 3] = [DrawMode::Stretch, DrawMode::Fit, DrawMode::Fill];

    pub fn label(self) -> &'static str {
        match self {
            DrawMode::Stretch => "Stretch",
            DrawMode::Fit => "Fit",
            DrawMode::Fill => "Fill",
        }
    }
}

/// The screen box of a device: its draw size scaled by the per-kind screen
/// scale fraction.
pub fn screen_box(device_draw_size: Vec2, kind_scale: Vec2) -> Vec2 {
    device_draw_size * kind_scale
}

/// Resolve the overlay size for one frame.
///
/// `box_size` is the screen box from [`screen_box`], `frame_size` the frame's
/// native pixel dimensions. The wide/narrow branch is chosen by comparing the
/// frame's aspect against the box's.
///
/// Note: the `Fill` branches are intentionally the mirror of `Fit` rather
/// than a derived cover formula; the narrow `Fill` branch scales height off
/// the box width. Kept as-is to match established on-screen behavior.
pub fn screen_size(box_size: Vec2, frame_size: Vec2, mode: DrawMode) -> Vec2 {
    let is_wide = frame_size.x / box_size.x > frame_size.y / box_size.y;
    match mode {
        DrawMode::Stretch => box_size,
        DrawMode::Fit => {
            if is_wide {
                Vec2::new(box_size.x, box_size.x * frame_size.y / frame_size.x)
            } else {
                Vec2::new(box_size.y * frame_size.x / frame_size.y, box_size.y)
            }
        }
        DrawMode::Fill => {
            if is_wide {
                Vec2::new(box_size.y * frame_size.x / frame_size.y, box_size.y)
            } else {
                Vec2::new(box_size.x, frame_size.y / frame_size.x * box_size.x)
            }
        }
    }
}

/// Center of the overlay: the device draw position displaced by the per-kind
/// offset. Offsets are edited in screen space (y grows downward), so y is
/// negated into world space.
pub fn draw_origin(device_pos: Vec2, kind_offset: Vec2) -> Vec2 {
    device_pos + Vec2::new(kind_offset.x, -kind_offset.y)
}
