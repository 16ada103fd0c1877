#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural level generation system extending the dungeon ahead of the player.
//!
//! Two independent procedures grow the world: [`generate_roof_segments`]
//! produces a piecewise-constant ceiling and [`generate_dungeon_section`]
//! produces a batch of platforms with pickups and enemies. Both are pure
//! functions of their anchor and the supplied random generator.
//! [`LevelGeneration`] owns the generator and turns frontier snapshots into
//! extension commands.

use dungeon_runner_core::{
    CollectibleSpawn, Command, DungeonSection, EnemySpawn, Facing, FrontierSnapshot, Platform,
    RoofSegment,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of ceiling segments produced per batch.
pub const ROOF_BATCH: usize = 20;

const ROOF_START_Y: f32 = 80.0;
const ROOF_MIN_Y: f32 = 50.0;
const ROOF_MAX_Y: f32 = 150.0;

const PLATFORM_HEIGHT: f32 = 20.0;
const PLATFORM_MIN_Y: f32 = 300.0;
const PLATFORM_MAX_Y: f32 = 600.0;
const COLLECTIBLE_CHANCE: f64 = 0.7;
const COLLECTIBLE_LIFT: f32 = 35.0;
const ENEMY_CHANCE: f64 = 0.5;
const ENEMY_MIN_PLATFORM_WIDTH: i32 = 120;
const ENEMY_INSET: f32 = 20.0;
const ENEMY_LIFT: f32 = 33.0;

const FIRST_SECTION_X: f32 = 250.0;
const FIRST_SECTION_Y: f32 = 500.0;
const SECTION_OFFSET: f32 = 200.0;
const DUNGEON_LOOKAHEAD: f32 = 1_000.0;
const ROOF_LOOKAHEAD: f32 = 1_500.0;

/// Generates `count` contiguous ceiling segments starting at `start_x`.
///
/// Every batch starts at height 80. Each segment keeps the height drawn before
/// it; the perturbed height only applies to the following segment.
///
/// Panics when `count` is zero or `start_x` is not finite.
pub fn generate_roof_segments<R: Rng>(
    rng: &mut R,
    start_x: f32,
    count: usize,
) -> Vec<RoofSegment> {
    assert!(count > 0, "roof batches must contain at least one segment");
    assert!(start_x.is_finite(), "roof start must be finite (received {start_x})");

    let mut segments = Vec::with_capacity(count);
    let mut x = start_x;
    let mut y = ROOF_START_Y;

    for _ in 0..count {
        let width = rng.gen_range(150..=300_i32) as f32;
        let change = rng.gen_range(-30..=30_i32) as f32;
        segments.push(RoofSegment::new(x, x + width, y));

        x += width;
        y = (y + change).clamp(ROOF_MIN_Y, ROOF_MAX_Y);
    }

    segments
}

/// Generates a batch of 6 to 10 platforms continuing from `start_x` and `last_y`.
///
/// Gaps are measured between left edges. Platform heights are clamped into
/// `[300, 600]`; the returned section carries the last platform height so the
/// next batch continues smoothly.
///
/// Panics when either anchor coordinate is not finite.
pub fn generate_dungeon_section<R: Rng>(
    rng: &mut R,
    start_x: f32,
    last_y: f32,
) -> DungeonSection {
    assert!(
        start_x.is_finite() && last_y.is_finite(),
        "section anchor must be finite (received {start_x}, {last_y})"
    );

    let count = rng.gen_range(6..=10);
    let mut section = DungeonSection {
        platforms: Vec::with_capacity(count),
        last_y,
        ..DungeonSection::default()
    };
    let mut x = start_x;
    let mut y = last_y;

    for _ in 0..count {
        let width = rng.gen_range(100..=200);
        let gap = rng.gen_range(150..=280_i32) as f32;
        let change = rng.gen_range(-80..=80_i32) as f32;

        let plat_x = x + gap;
        let plat_y = (y + change).clamp(PLATFORM_MIN_Y, PLATFORM_MAX_Y);
        section
            .platforms
            .push(Platform::new(plat_x, plat_y, width as f32, PLATFORM_HEIGHT));

        if rng.gen_bool(COLLECTIBLE_CHANCE) {
            let offset = rng.gen_range(20..=width - 30) as f32;
            section.collectibles.push(CollectibleSpawn {
                x: plat_x + offset,
                y: plat_y - COLLECTIBLE_LIFT,
            });
        }

        let wants_enemy = rng.gen_bool(ENEMY_CHANCE);
        if wants_enemy && width > ENEMY_MIN_PLATFORM_WIDTH {
            let patrol = if rng.gen_bool(0.5) {
                Facing::Right
            } else {
                Facing::Left
            };
            section.enemies.push(EnemySpawn {
                x: plat_x + ENEMY_INSET,
                y: plat_y - ENEMY_LIFT,
                min_x: plat_x,
                max_x: plat_x + width as f32,
                patrol,
            });
        }

        x = plat_x;
        y = plat_y;
    }

    section.last_y = y;
    section
}

/// Pure system that keeps generated content ahead of the player.
#[derive(Debug)]
pub struct LevelGeneration {
    rng: ChaCha8Rng,
}

impl LevelGeneration {
    /// Creates a new generation system seeded deterministically.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Emits the content of a fresh session: a roof from the origin and the
    /// first dungeon section after the starting platform.
    pub fn prime(&mut self, out: &mut Vec<Command>) {
        out.push(Command::ExtendRoof {
            segments: generate_roof_segments(&mut self.rng, 0.0, ROOF_BATCH),
        });
        out.push(Command::ExtendDungeon {
            section: generate_dungeon_section(&mut self.rng, FIRST_SECTION_X, FIRST_SECTION_Y),
        });
    }

    /// Emits extension commands until both frontiers lead the player by their
    /// lookahead margins.
    pub fn handle(&mut self, frontier: FrontierSnapshot, out: &mut Vec<Command>) {
        let player_x = frontier.player_x;

        let mut dungeon_x = frontier.dungeon_x;
        let mut last_y = frontier.last_platform_y;
        while player_x > dungeon_x - DUNGEON_LOOKAHEAD {
            let section =
                generate_dungeon_section(&mut self.rng, dungeon_x + SECTION_OFFSET, last_y);
            let Some(next_x) = section.frontier_x() else {
                break;
            };
            dungeon_x = next_x;
            last_y = section.last_y;
            out.push(Command::ExtendDungeon { section });
        }

        let mut roof_x = frontier.roof_x;
        while player_x > roof_x - ROOF_LOOKAHEAD {
            let segments = generate_roof_segments(&mut self.rng, roof_x, ROOF_BATCH);
            let Some(last) = segments.last() else {
                break;
            };
            roof_x = last.x2();
            out.push(Command::ExtendRoof { segments });
        }

        log::trace!("frontiers at dungeon x={dungeon_x}, roof x={roof_x} for player x={player_x}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roof_batch_keeps_pre_perturbation_height() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let segments = generate_roof_segments(&mut rng, 0.0, 3);
        assert_eq!(segments[0].y(), ROOF_START_Y);
        assert_eq!(segments[0].x1(), 0.0);
    }

    #[test]
    #[should_panic(expected = "at least one segment")]
    fn empty_roof_batch_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let _ = generate_roof_segments(&mut rng, 0.0, 0);
    }

    #[test]
    fn handle_is_quiet_while_frontiers_lead() {
        let mut generation = LevelGeneration::new(9);
        let mut commands = Vec::new();
        generation.handle(
            FrontierSnapshot {
                player_x: 200.0,
                dungeon_x: 1_500.0,
                last_platform_y: 450.0,
                roof_x: 2_000.0,
            },
            &mut commands,
        );
        assert!(commands.is_empty());
    }
}
