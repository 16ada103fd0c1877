#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Dungeon Runner.

mod camera;
mod collectible;
mod enemy;
mod particle;
mod player;

use dungeon_runner_core::{
    Command, DeathCause, DungeonSection, Event, Facing, Platform, RoofSegment, ScreenPoint,
    VIEWPORT_HEIGHT,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use camera::Camera;
pub use collectible::{Collectible, COLLECT_SCORE};
pub use enemy::{Enemy, EnemyStep, DASH_COOLDOWN, DASH_TELEGRAPH};
pub use particle::{Particle, DAMAGE_COLOR, PICKUP_COLOR};
pub use player::{Player, WebAnchor, INVINCIBILITY_FRAMES, MAX_HEALTH};

const START_PLATFORM: (f32, f32, f32, f32) = (100.0, 500.0, 150.0, 20.0);
const FALL_THRESHOLD: f32 = VIEWPORT_HEIGHT + 100.0;
const PICKUP_BURST: usize = 25;
const DAMAGE_BURST: usize = 20;

/// Rightmost generated content, used to decide when to generate more.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Frontier {
    dungeon_x: f32,
    last_y: f32,
    roof_x: f32,
}

/// Represents the authoritative Dungeon Runner world state.
#[derive(Debug)]
pub struct World {
    rng: ChaCha8Rng,
    player: Player,
    platforms: Vec<Platform>,
    roof_segments: Vec<RoofSegment>,
    collectibles: Vec<Collectible>,
    enemies: Vec<Enemy>,
    particles: Vec<Particle>,
    camera: Camera,
    frontier: Frontier,
    score: u32,
    frame: u64,
    game_over: Option<DeathCause>,
}

impl World {
    /// Creates a fresh world holding the player and the starting platform.
    ///
    /// The seed drives decorative randomness only; level content arrives
    /// through [`Command::ExtendDungeon`] and [`Command::ExtendRoof`].
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let (x, y, width, height) = START_PLATFORM;
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            player: Player::default(),
            platforms: vec![Platform::new(x, y, width, height)],
            roof_segments: Vec::new(),
            collectibles: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            camera: Camera::new(),
            frontier: Frontier {
                dungeon_x: x,
                last_y: y,
                roof_x: 0.0,
            },
            score: 0,
            frame: 0,
            game_over: None,
        }
    }

    fn toggle_web_or_jump(&mut self, out_events: &mut Vec<Event>) {
        if self.player.detach_web() {
            out_events.push(Event::WebReleased);
        } else if self.player.jump() {
            out_events.push(Event::Jumped);
        }
    }

    fn toggle_web_attach(&mut self, pointer: ScreenPoint, out_events: &mut Vec<Event>) {
        if self.player.detach_web() {
            out_events.push(Event::WebReleased);
            return;
        }

        if let Some(anchor) = self
            .player
            .attach_web(pointer, self.camera.x(), &self.roof_segments)
        {
            out_events.push(Event::WebAttached {
                anchor_x: anchor.x,
                anchor_y: anchor.y,
            });
        }
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.frame = self.frame.saturating_add(1);
        out_events.push(Event::TimeAdvanced { frame: self.frame });

        self.player.update(&self.platforms, &self.roof_segments);

        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(Particle::is_alive);

        for collectible in &mut self.collectibles {
            collectible.update();
            if collectible.check_collect(&self.player) {
                self.score = self.score.saturating_add(COLLECT_SCORE);
                let center = collectible.bounds();
                Particle::burst(
                    &mut self.particles,
                    center.center_x(),
                    center.center_y(),
                    PICKUP_COLOR,
                    PICKUP_BURST,
                    &mut self.rng,
                );
                out_events.push(Event::CollectiblePicked { score: self.score });
            }
        }

        for enemy in &mut self.enemies {
            let step = enemy.update(&self.player);
            if let Some(facing) = step.dashed {
                out_events.push(Event::EnemyDashed { facing });
            }
            if step.contact && self.player.take_damage() {
                self.player.knock_back(Facing::towards(enemy.x(), self.player.x()));
                let bounds = self.player.bounds();
                Particle::burst(
                    &mut self.particles,
                    bounds.center_x(),
                    bounds.center_y(),
                    DAMAGE_COLOR,
                    DAMAGE_BURST,
                    &mut self.rng,
                );
                out_events.push(Event::PlayerDamaged {
                    health: self.player.health(),
                });
            }
        }

        let cause = if self.player.health() == 0 {
            Some(DeathCause::Defeated)
        } else if self.player.y() > FALL_THRESHOLD {
            self.player.fall_out();
            Some(DeathCause::Fell)
        } else {
            None
        };

        if let Some(cause) = cause {
            log::info!(
                "player died ({cause:?}) at frame {} with score {}",
                self.frame,
                self.score
            );
            self.game_over = Some(cause);
            out_events.push(Event::PlayerDied {
                cause,
                score: self.score,
            });
            return;
        }

        self.camera.follow(self.player.x());
    }

    fn extend_dungeon(&mut self, section: DungeonSection, out_events: &mut Vec<Event>) {
        let Some(frontier_x) = section.frontier_x() else {
            return;
        };

        self.platforms.extend(section.platforms);
        self.collectibles
            .extend(section.collectibles.into_iter().map(Collectible::new));
        self.enemies.extend(section.enemies.into_iter().map(Enemy::new));
        self.frontier.dungeon_x = frontier_x;
        self.frontier.last_y = section.last_y;

        log::debug!(
            "dungeon extended to x={frontier_x} (last platform y={})",
            section.last_y
        );
        out_events.push(Event::DungeonExtended {
            frontier_x,
            last_y: section.last_y,
        });
    }

    fn extend_roof(&mut self, segments: Vec<RoofSegment>, out_events: &mut Vec<Event>) {
        let Some(last) = segments.last().copied() else {
            return;
        };
        debug_assert!(
            segments.windows(2).all(|pair| pair[0].x1() <= pair[1].x1()),
            "roof segments must be ordered by ascending x1"
        );

        self.roof_segments.extend(segments);
        self.frontier.roof_x = last.x2();

        log::debug!("roof extended to x={}", last.x2());
        out_events.push(Event::RoofExtended {
            frontier_x: last.x2(),
        });
    }

    fn evict_behind_camera(&mut self, out_events: &mut Vec<Event>) {
        let edge = self.camera.retention_edge();
        let before = self.entity_count();

        self.platforms.retain(|platform| platform.right() >= edge);
        self.collectibles
            .retain(|collectible| collectible.bounds().right() >= edge);
        self.enemies.retain(|enemy| enemy.bounds().right() >= edge);
        self.roof_segments.retain(|segment| segment.x2() >= edge);

        let count = before - self.entity_count();
        if count > 0 {
            log::debug!("evicted {count} entities behind x={edge}");
            out_events.push(Event::EntitiesEvicted { count });
        }
    }

    fn entity_count(&self) -> usize {
        self.platforms.len()
            + self.collectibles.len()
            + self.enemies.len()
            + self.roof_segments.len()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the player died every command is ignored until a new world is created.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.game_over.is_some() {
        return;
    }

    match command {
        Command::Jump => {
            if world.player.jump() {
                out_events.push(Event::Jumped);
            }
        }
        Command::ToggleWebOrJump => world.toggle_web_or_jump(out_events),
        Command::FlipDirection => {
            let facing = world.player.flip_direction();
            out_events.push(Event::DirectionChanged { facing });
        }
        Command::ToggleWebAttach { pointer } => world.toggle_web_attach(pointer, out_events),
        Command::Tick => world.tick(out_events),
        Command::ExtendRoof { segments } => world.extend_roof(segments, out_events),
        Command::ExtendDungeon { section } => world.extend_dungeon(section, out_events),
        Command::EvictBehindCamera => world.evict_behind_camera(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use dungeon_runner_core::{DeathCause, Facing, FrontierSnapshot, Platform, RoofSegment};

    use super::{Camera, Collectible, Enemy, Particle, Player, World};

    /// Provides read-only access to the player.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Live platforms ordered by ascending x.
    #[must_use]
    pub fn platforms(world: &World) -> &[Platform] {
        &world.platforms
    }

    /// Live ceiling segments ordered by ascending `x1`.
    #[must_use]
    pub fn roof_segments(world: &World) -> &[RoofSegment] {
        &world.roof_segments
    }

    /// Live pickups, including collected ones awaiting eviction.
    #[must_use]
    pub fn collectibles(world: &World) -> &[Collectible] {
        &world.collectibles
    }

    /// Live enemies.
    #[must_use]
    pub fn enemies(world: &World) -> &[Enemy] {
        &world.enemies
    }

    /// Live particles.
    #[must_use]
    pub fn particles(world: &World) -> &[Particle] {
        &world.particles
    }

    /// Provides read-only access to the camera.
    #[must_use]
    pub fn camera(world: &World) -> &Camera {
        &world.camera
    }

    /// Score accumulated during the session.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Number of simulated frames.
    #[must_use]
    pub fn frame(world: &World) -> u64 {
        world.frame
    }

    /// Reason the run ended, if it did.
    #[must_use]
    pub fn game_over(world: &World) -> Option<DeathCause> {
        world.game_over
    }

    /// Captures how far content has been generated relative to the player.
    #[must_use]
    pub fn frontier(world: &World) -> FrontierSnapshot {
        FrontierSnapshot {
            player_x: world.player.x(),
            dungeon_x: world.frontier.dungeon_x,
            last_platform_y: world.frontier.last_y,
            roof_x: world.frontier.roof_x,
        }
    }

    /// Captures the values shown by the heads-up display.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        HudSnapshot {
            score: world.score,
            facing: world.player.facing(),
            health: world.player.health(),
        }
    }

    /// Read-only values presented by the heads-up display.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct HudSnapshot {
        /// Score accumulated during the session.
        pub score: u32,
        /// Player running direction.
        pub facing: Facing,
        /// Remaining player health.
        pub health: u8,
    }
}
