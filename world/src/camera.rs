//! Horizontal camera smoothing and the retention window derived from it.

use dungeon_runner_core::VIEWPORT_WIDTH;

const LEAD: f32 = VIEWPORT_WIDTH / 3.0;
const SMOOTHING: f32 = 0.1;
const RETENTION_MARGIN: f32 = 300.0;

/// Scalar horizontal camera eased towards a point ahead of the player.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    x: f32,
}

impl Camera {
    /// Creates a camera looking at the world origin.
    #[must_use]
    pub const fn new() -> Self {
        Self { x: 0.0 }
    }

    /// Moves a fixed fraction of the way towards `player_x − VIEWPORT_WIDTH / 3`.
    pub fn follow(&mut self, player_x: f32) {
        let target = player_x - LEAD;
        self.x += (target - self.x) * SMOOTHING;
    }

    /// Left edge of the view in world space.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Entities whose rightmost extent lies left of this edge are evicted.
    #[must_use]
    pub fn retention_edge(&self) -> f32 {
        self.x - RETENTION_MARGIN
    }

    /// Converts a world-space x coordinate to screen space.
    #[must_use]
    pub fn to_screen(&self, world_x: f32) -> f32 {
        world_x - self.x
    }
}
