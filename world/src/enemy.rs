//! Patrol and dash-attack behaviour of dungeon enemies.

use dungeon_runner_core::{EnemySpawn, Facing, Rect};

use crate::Player;

const SIZE: f32 = 28.0;
const PATROL_SPEED: f32 = 2.0;
const DASH_SPEED: f32 = 11.0;
const DASH_RANGE_X: f32 = 250.0;
const DASH_RANGE_Y: f32 = 100.0;

/// Frames an enemy waits between dashes.
pub const DASH_COOLDOWN: u32 = 110;
/// Cooldown values above this threshold mark the freshly dashed window.
pub const DASH_TELEGRAPH: u32 = 80;

/// Outcome of a single enemy update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnemyStep {
    /// Direction of a dash that started this frame.
    pub dashed: Option<Facing>,
    /// Whether the enemy overlaps the player after moving.
    pub contact: bool,
}

/// Autonomous agent patrolling a platform and dashing at a nearby player.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    x: f32,
    y: f32,
    vx: f32,
    min_x: f32,
    max_x: f32,
    patrol: Facing,
    dash_cooldown: u32,
}

impl Enemy {
    /// Creates an enemy from a generator placement.
    ///
    /// Panics when the patrol span cannot hold the enemy.
    #[must_use]
    pub fn new(spawn: EnemySpawn) -> Self {
        assert!(
            spawn.max_x - spawn.min_x >= SIZE,
            "patrol span {}..{} is narrower than an enemy",
            spawn.min_x,
            spawn.max_x
        );
        Self {
            x: spawn.x,
            y: spawn.y,
            vx: 0.0,
            min_x: spawn.min_x,
            max_x: spawn.max_x,
            patrol: spawn.patrol,
            dash_cooldown: 0,
        }
    }

    /// Advances the state machine by one frame.
    ///
    /// Velocity is reassigned every frame: dash speed on the frame the dash
    /// triggers, patrol speed otherwise. There is no lingering dash state.
    pub fn update(&mut self, player: &Player) -> EnemyStep {
        let mut step = EnemyStep::default();
        self.dash_cooldown = self.dash_cooldown.saturating_sub(1);

        let in_range = (player.x() - self.x).abs() < DASH_RANGE_X
            && (player.y() - self.y).abs() < DASH_RANGE_Y;
        if in_range && self.dash_cooldown == 0 {
            let direction = Facing::towards(self.x, player.x());
            self.vx = direction.sign() * DASH_SPEED;
            self.dash_cooldown = DASH_COOLDOWN;
            step.dashed = Some(direction);
        } else {
            self.vx = self.patrol.sign() * PATROL_SPEED;
        }

        self.x += self.vx;

        if self.x <= self.min_x {
            self.x = self.min_x;
            self.bounce(Facing::Right);
        } else if self.x >= self.max_x - SIZE {
            self.x = self.max_x - SIZE;
            self.bounce(Facing::Left);
        }

        step.contact = self.bounds().touches(&player.bounds());
        step
    }

    fn bounce(&mut self, towards: Facing) {
        self.patrol = towards;
        self.vx = towards.sign() * PATROL_SPEED;
    }

    /// World-space bounds of the enemy.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, SIZE, SIZE)
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Horizontal velocity applied during the last update.
    #[must_use]
    pub const fn vx(&self) -> f32 {
        self.vx
    }

    /// Current patrol direction.
    #[must_use]
    pub const fn patrol(&self) -> Facing {
        self.patrol
    }

    /// Frames until the next dash is allowed.
    #[must_use]
    pub const fn dash_cooldown(&self) -> u32 {
        self.dash_cooldown
    }

    /// Whether the enemy dashed within the last few frames.
    #[must_use]
    pub const fn is_telegraphing(&self) -> bool {
        self.dash_cooldown > DASH_TELEGRAPH
    }
}
