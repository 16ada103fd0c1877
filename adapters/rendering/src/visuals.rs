//! Palette and pure presentation helpers shared by scene builders.

use dungeon_runner_core::{Rgb, VIEWPORT_WIDTH};
use glam::Vec2;

use crate::Color;

/// Frame clear color.
pub const BACKGROUND: Color = Color::from_rgb_u8(20, 20, 40);
/// Text and default player color.
pub const WHITE: Color = Color::from_rgb_u8(255, 255, 255);
/// Outline color.
pub const BLACK: Color = Color::from_rgb_u8(0, 0, 0);
/// Filled hearts and the game-over title.
pub const RED: Color = Color::from_rgb_u8(255, 50, 50);
/// Platform fill and empty hearts.
pub const GRAY: Color = Color::from_rgb_u8(80, 80, 80);
/// Platform outline and roof fill.
pub const DARK_GRAY: Color = Color::from_rgb_u8(50, 50, 50);
/// Edge line drawn along the roof.
pub const ROOF_EDGE: Color = Color::from_rgb_u8(100, 100, 100);
/// Pickup fill.
pub const PINK: Color = Color::from_rgb_u8(255, 105, 180);
/// Enemy fill.
pub const YELLOW: Color = Color::from_rgb_u8(255, 220, 0);
/// Enemy fill while a dash was just triggered.
pub const DASH_YELLOW: Color = Color::from_rgb_u8(255, 255, 100);
/// Player fill during the invincibility flicker.
pub const FLICKER: Color = Color::from_rgb_u8(200, 200, 200);
/// Web strand.
pub const WEB: Color = Color::from_rgb_u8(180, 180, 180);

/// Radius of a HUD heart.
pub const HEART_RADIUS: f32 = 12.0;
/// Horizontal cull margin for platforms.
pub const PLATFORM_MARGIN: f32 = 200.0;
/// Horizontal cull margin for everything else.
pub const ENTITY_MARGIN: f32 = 100.0;

const FLICKER_PERIOD: u32 = 5;

/// Whether a screen x coordinate lies strictly inside the viewport widened by
/// `margin` on both sides.
#[must_use]
pub fn is_on_screen(screen_x: f32, margin: f32) -> bool {
    -margin < screen_x && screen_x < VIEWPORT_WIDTH + margin
}

/// Whether a horizontal span overlaps the viewport widened by `margin`.
#[must_use]
pub fn span_on_screen(left: f32, right: f32, margin: f32) -> bool {
    right > -margin && left < VIEWPORT_WIDTH + margin
}

/// Whether the player is in the dim half of the invincibility flicker.
#[must_use]
pub const fn player_flickers(invincible: u32) -> bool {
    invincible > 0 && (invincible / FLICKER_PERIOD) % 2 == 0
}

/// Fill used for an enemy depending on whether it is telegraphing a dash.
#[must_use]
pub const fn enemy_color(telegraphing: bool) -> Color {
    if telegraphing {
        DASH_YELLOW
    } else {
        YELLOW
    }
}

/// Tint applied to an enemy sprite.
#[must_use]
pub fn enemy_tint(telegraphing: bool) -> Color {
    if telegraphing {
        DASH_YELLOW.with_alpha(0.5)
    } else {
        WHITE
    }
}

/// Tint applied to the player sprite.
#[must_use]
pub fn player_tint(invincible: u32) -> Color {
    if player_flickers(invincible) {
        WHITE.with_alpha(0.5)
    } else {
        WHITE
    }
}

/// Size change of a pickup for its pulse phase, truncated to whole pixels.
#[must_use]
pub fn pulse_offset(pulse: f32) -> f32 {
    (2.0 * pulse.sin()).trunc()
}

/// Top-left corner and edge length of a pulsing pickup of base `size`.
#[must_use]
pub fn pulsed_square(position: Vec2, size: f32, pulse: f32) -> (Vec2, f32) {
    let offset = pulse_offset(pulse);
    let shift = (offset / 2.0).floor();
    (position - Vec2::splat(shift), size + offset)
}

/// Particle color at the given opacity.
#[must_use]
pub fn particle_color(color: Rgb, alpha: f32) -> Color {
    Color::from(color).with_alpha(alpha)
}

/// Centre of the HUD heart in `slot`, counting from the right edge.
#[must_use]
pub fn heart_center(slot: u8) -> Vec2 {
    Vec2::new(VIEWPORT_WIDTH - 40.0 - f32::from(slot) * 35.0, 20.0)
}
