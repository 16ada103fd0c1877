//! Pulsing score pickups.

use dungeon_runner_core::{CollectibleSpawn, Rect};

use crate::Player;

const SIZE: f32 = 14.0;
const PULSE_STEP: f32 = 0.15;

/// Score awarded for each pickup.
pub const COLLECT_SCORE: u32 = 10;

/// Pickup floating above a platform.
#[derive(Clone, Debug, PartialEq)]
pub struct Collectible {
    x: f32,
    y: f32,
    pulse: f32,
    collected: bool,
}

impl Collectible {
    /// Places a pickup at the generator's position.
    #[must_use]
    pub fn new(spawn: CollectibleSpawn) -> Self {
        Self {
            x: spawn.x,
            y: spawn.y,
            pulse: 0.0,
            collected: false,
        }
    }

    /// Advances the pulse animation phase.
    pub fn update(&mut self) {
        self.pulse += PULSE_STEP;
    }

    /// Marks the pickup as collected when the player overlaps it.
    ///
    /// Returns `true` exactly once, on the frame the pickup is consumed.
    pub fn check_collect(&mut self, player: &Player) -> bool {
        if self.collected || !self.bounds().touches(&player.bounds()) {
            return false;
        }
        self.collected = true;
        true
    }

    /// World-space bounds, ignoring the pulse animation.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, SIZE, SIZE)
    }

    /// Animation phase in radians.
    #[must_use]
    pub const fn pulse(&self) -> f32 {
        self.pulse
    }

    /// Whether the pickup was already consumed.
    #[must_use]
    pub const fn collected(&self) -> bool {
        self.collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pickup_at(x: f32, y: f32) -> Collectible {
        Collectible::new(CollectibleSpawn { x, y })
    }

    #[test]
    fn collects_once_on_overlap() {
        let mut pickup = pickup_at(110.0, 410.0);
        let player = Player::at(100.0, 400.0);

        assert!(pickup.check_collect(&player));
        assert!(pickup.collected());
        assert!(!pickup.check_collect(&player));
    }

    #[test]
    fn distant_player_leaves_pickup_alone() {
        let mut pickup = pickup_at(200.0, 400.0);
        assert!(!pickup.check_collect(&Player::at(100.0, 400.0)));
        assert!(!pickup.collected());
    }

    #[test]
    fn pulse_advances_every_update() {
        let mut pickup = pickup_at(0.0, 0.0);
        for _ in 0..4 {
            pickup.update();
        }
        assert!((pickup.pulse() - 0.6).abs() < 1e-5);
    }
}
