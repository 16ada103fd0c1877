//! Player movement integrator, web-swing physics and collision resolution.

use dungeon_runner_core::{Facing, Platform, Rect, RoofSegment, ScreenPoint};

const START_X: f32 = 200.0;
const START_Y: f32 = 400.0;
const SIZE: f32 = 30.0;

/// Health a fresh player starts with.
pub const MAX_HEALTH: u8 = 3;
/// Frames of damage immunity granted after each hit.
pub const INVINCIBILITY_FRAMES: u32 = 90;

const JUMP_VELOCITY: f32 = -16.0;
const WEB_RELEASE_VELOCITY: f32 = -12.0;
const RUN_SPEED: f32 = 5.0;
const RUN_GRAVITY: f32 = 0.7;
const TERMINAL_VELOCITY: f32 = 18.0;
const WEB_GRAVITY: f32 = 0.4;
const WEB_PULL: f32 = 0.015;
const WEB_DAMPING: f32 = 0.985;
const WEB_SLACK: f32 = 5.0;
const LANDING_TOLERANCE: f32 = 20.0;
const CEILING_CLEARANCE: f32 = 10.0;
const KNOCKBACK_X: f32 = 12.0;
const KNOCKBACK_Y: f32 = -8.0;

/// Point on the ceiling the web is latched to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WebAnchor {
    /// Horizontal world position.
    pub x: f32,
    /// Vertical world position, always the height of the hosting segment.
    pub y: f32,
}

/// The controlled runner.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    on_ground: bool,
    facing: Facing,
    web: Option<WebAnchor>,
    health: u8,
    invincible: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self::at(START_X, START_Y)
    }
}

impl Player {
    /// Creates a player at rest at the provided world position, facing right.
    #[must_use]
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            on_ground: false,
            facing: Facing::Right,
            web: None,
            health: MAX_HEALTH,
            invincible: 0,
        }
    }

    /// Jumps when standing on a platform without a web attached.
    ///
    /// Returns `true` when the jump took effect.
    pub fn jump(&mut self) -> bool {
        if !self.on_ground || self.web.is_some() {
            return false;
        }
        self.vy = JUMP_VELOCITY;
        self.on_ground = false;
        true
    }

    /// Shoots the web straight up from the pointer onto the ceiling.
    ///
    /// The pointer is converted to world space with `camera_x`. Segments are
    /// scanned in slice order, which the world keeps sorted by ascending `x1`,
    /// so the leftmost segment containing the pointer wins where spans touch.
    /// Returns the anchor when the web latched.
    pub fn attach_web(
        &mut self,
        pointer: ScreenPoint,
        camera_x: f32,
        roof_segments: &[RoofSegment],
    ) -> Option<WebAnchor> {
        if self.web.is_some() {
            return None;
        }

        let world_x = pointer.x + camera_x;
        let segment = roof_segments
            .iter()
            .find(|segment| segment.contains_x(world_x))?;
        let anchor = WebAnchor {
            x: world_x,
            y: segment.y(),
        };
        self.web = Some(anchor);
        Some(anchor)
    }

    /// Lets go of the web with an upward kick.
    ///
    /// Returns `true` when a web was attached.
    pub fn detach_web(&mut self) -> bool {
        if self.web.take().is_none() {
            return false;
        }
        self.vy = WEB_RELEASE_VELOCITY;
        true
    }

    /// Reverses the running direction instantly.
    pub fn flip_direction(&mut self) -> Facing {
        self.facing = self.facing.flipped();
        self.facing
    }

    /// Integrates one frame of movement and resolves collisions.
    pub fn update(&mut self, platforms: &[Platform], roof_segments: &[RoofSegment]) {
        self.invincible = self.invincible.saturating_sub(1);

        match self.web {
            Some(anchor) => self.swing(anchor),
            None => self.run(),
        }

        self.x += self.vx;
        self.y += self.vy;

        self.land(platforms);
        self.bump_ceiling(roof_segments);
    }

    /// Applies one hit unless the invincibility window is active.
    ///
    /// Returns `true` when health was reduced.
    pub fn take_damage(&mut self) -> bool {
        if self.invincible > 0 {
            return false;
        }
        self.health = self.health.saturating_sub(1);
        self.invincible = INVINCIBILITY_FRAMES;
        true
    }

    /// Pushes the player away from a hit.
    pub fn knock_back(&mut self, away: Facing) {
        self.vx = away.sign() * KNOCKBACK_X;
        self.vy = KNOCKBACK_Y;
    }

    /// Drops health to zero after falling out of the dungeon.
    pub fn fall_out(&mut self) {
        self.health = 0;
    }

    fn swing(&mut self, anchor: WebAnchor) {
        let bounds = self.bounds();
        let dx = anchor.x - bounds.center_x();
        let dy = anchor.y - bounds.center_y();
        let distance = (dx * dx + dy * dy).sqrt();

        if distance > WEB_SLACK {
            self.vx += dx * WEB_PULL;
            self.vy += dy * WEB_PULL;
        }

        self.vy += WEB_GRAVITY;

        self.vx *= WEB_DAMPING;
        self.vy *= WEB_DAMPING;
    }

    fn run(&mut self) {
        self.vx = self.facing.sign() * RUN_SPEED;
        self.vy = (self.vy + RUN_GRAVITY).min(TERMINAL_VELOCITY);
    }

    fn land(&mut self, platforms: &[Platform]) {
        self.on_ground = false;
        if self.vy < 0.0 {
            return;
        }

        let bottom = self.y + SIZE;
        let landing = platforms.iter().find(|platform| {
            platform.bounds().overlaps_span(self.x, self.x + SIZE)
                && bottom >= platform.y()
                && bottom <= platform.y() + platform.height() + LANDING_TOLERANCE
        });

        if let Some(platform) = landing {
            self.y = platform.y() - SIZE;
            self.vy = 0.0;
            self.on_ground = true;
        }
    }

    fn bump_ceiling(&mut self, roof_segments: &[RoofSegment]) {
        let ceiling = roof_segments.iter().find(|segment| {
            self.x + SIZE > segment.x1()
                && self.x < segment.x2()
                && self.y <= segment.y() + CEILING_CLEARANCE
        });

        if let Some(segment) = ceiling {
            self.y = segment.y() + CEILING_CLEARANCE;
            if self.vy < 0.0 {
                self.vy = 0.0;
            }
        }
    }

    /// World-space bounds of the player.
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

    /// Horizontal velocity.
    #[must_use]
    pub const fn vx(&self) -> f32 {
        self.vx
    }

    /// Vertical velocity; positive values point down.
    #[must_use]
    pub const fn vy(&self) -> f32 {
        self.vy
    }

    /// Whether the player rested on a platform after the last update.
    #[must_use]
    pub const fn on_ground(&self) -> bool {
        self.on_ground
    }

    /// Running direction.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Current web anchor, if attached.
    #[must_use]
    pub const fn web(&self) -> Option<WebAnchor> {
        self.web
    }

    /// Whether the web is attached.
    #[must_use]
    pub const fn web_attached(&self) -> bool {
        self.web.is_some()
    }

    /// Remaining health in `0..=MAX_HEALTH`.
    #[must_use]
    pub const fn health(&self) -> u8 {
        self.health
    }

    /// Remaining frames of damage immunity.
    #[must_use]
    pub const fn invincible(&self) -> u32 {
        self.invincible
    }
}
