use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use dungeon_runner_core::{Command, DungeonSection, FrontierSnapshot, RoofSegment};
use dungeon_runner_system_level_generation::{
    generate_dungeon_section, generate_roof_segments, LevelGeneration, ROOF_BATCH,
};
use dungeon_runner_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn dungeon_sections_respect_layout_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);

    let mut start_x = 250.0;
    let mut last_y = 500.0;
    for _ in 0..200 {
        let section = generate_dungeon_section(&mut rng, start_x, last_y);
        assert!((6..=10).contains(&section.platforms.len()));

        let mut previous_x = start_x;
        for platform in &section.platforms {
            let gap = platform.x() - previous_x;
            assert!((150.0..=280.0).contains(&gap), "gap {gap} out of range");
            assert!((100.0..=200.0).contains(&platform.width()));
            assert_eq!(platform.height(), 20.0);
            assert!((300.0..=600.0).contains(&platform.y()));
            previous_x = platform.x();
        }

        let last = section.platforms.last().copied().expect("non-empty section");
        assert_eq!(section.last_y, last.y());

        start_x = last.x() + 200.0;
        last_y = section.last_y;
    }
}

#[test]
fn pickups_and_enemies_sit_on_their_platforms() {
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let mut saw_enemy = false;
    let mut saw_pickup = false;

    for _ in 0..100 {
        let section = generate_dungeon_section(&mut rng, 0.0, 450.0);

        for pickup in &section.collectibles {
            saw_pickup = true;
            let hosted = section.platforms.iter().any(|platform| {
                pickup.y == platform.y() - 35.0
                    && pickup.x >= platform.x() + 20.0
                    && pickup.x <= platform.x() + platform.width() - 30.0
            });
            assert!(hosted, "pickup {pickup:?} floats above no platform");
        }

        for enemy in &section.enemies {
            saw_enemy = true;
            let host = section
                .platforms
                .iter()
                .find(|platform| platform.x() == enemy.min_x)
                .expect("enemy patrols a platform");
            assert!(host.width() > 120.0);
            assert_eq!(enemy.max_x, host.x() + host.width());
            assert_eq!(enemy.x, host.x() + 20.0);
            assert_eq!(enemy.y, host.y() - 33.0);
        }
    }

    assert!(saw_pickup && saw_enemy);
}

#[test]
fn roof_batches_are_contiguous_and_bounded() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut start_x = 0.0;

    for _ in 0..50 {
        let segments = generate_roof_segments(&mut rng, start_x, ROOF_BATCH);
        assert_eq!(segments.len(), ROOF_BATCH);
        assert_eq!(segments[0].x1(), start_x);
        assert_eq!(segments[0].y(), 80.0);

        for pair in segments.windows(2) {
            assert_eq!(pair[0].x2(), pair[1].x1());
            assert!((pair[1].y() - pair[0].y()).abs() <= 30.0);
        }
        for segment in &segments {
            assert!((150.0..=300.0).contains(&segment.width()));
            assert!((50.0..=150.0).contains(&segment.y()));
        }

        start_x = segments.last().map(RoofSegment::x2).expect("non-empty batch");
    }
}

#[test]
fn identical_seeds_reproduce_the_level() {
    let first = generate_level(0xfeed_beef);
    let second = generate_level(0xfeed_beef);
    let other = generate_level(0xfeed_bef0);

    assert_eq!(fingerprint(&first), fingerprint(&second));
    assert_eq!(first, second);
    assert_ne!(fingerprint(&first), fingerprint(&other));
}

#[test]
fn handle_catches_up_with_a_distant_player() {
    let mut generation = LevelGeneration::new(11);
    let mut commands = Vec::new();
    let player_x = 10_000.0;

    generation.handle(
        FrontierSnapshot {
            player_x,
            dungeon_x: 100.0,
            last_platform_y: 500.0,
            roof_x: 0.0,
        },
        &mut commands,
    );

    let dungeon_x = commands
        .iter()
        .filter_map(|command| match command {
            Command::ExtendDungeon { section } => section.frontier_x(),
            _ => None,
        })
        .last()
        .expect("dungeon was extended");
    let roof_x = commands
        .iter()
        .filter_map(|command| match command {
            Command::ExtendRoof { segments } => segments.last().map(RoofSegment::x2),
            _ => None,
        })
        .last()
        .expect("roof was extended");

    assert!(player_x <= dungeon_x - 1_000.0);
    assert!(player_x <= roof_x - 1_500.0);
}

#[test]
fn primed_world_matches_the_opening_layout() {
    let mut world = World::new(5);
    let mut generation = LevelGeneration::new(5);
    let mut commands = Vec::new();
    generation.prime(&mut commands);

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let roof = query::roof_segments(&world);
    assert_eq!(roof.len(), ROOF_BATCH);
    assert_eq!(roof[0].x1(), 0.0);

    let platforms = query::platforms(&world);
    assert_eq!(platforms[0].x(), 100.0);
    let first_generated = platforms[1].x();
    assert!((400.0..=530.0).contains(&first_generated));

    let frontier = query::frontier(&world);
    assert_eq!(frontier.roof_x, roof[ROOF_BATCH - 1].x2());
    assert_eq!(frontier.dungeon_x, platforms[platforms.len() - 1].x());
}

#[derive(Debug, PartialEq)]
struct GeneratedLevel {
    sections: Vec<DungeonSection>,
    roof: Vec<RoofSegment>,
}

fn generate_level(seed: u64) -> GeneratedLevel {
    let mut generation = LevelGeneration::new(seed);
    let mut commands = Vec::new();
    generation.prime(&mut commands);
    generation.handle(
        FrontierSnapshot {
            player_x: 6_000.0,
            dungeon_x: 2_000.0,
            last_platform_y: 400.0,
            roof_x: 3_000.0,
        },
        &mut commands,
    );

    let mut level = GeneratedLevel {
        sections: Vec::new(),
        roof: Vec::new(),
    };
    for command in commands {
        match command {
            Command::ExtendDungeon { section } => level.sections.push(section),
            Command::ExtendRoof { segments } => level.roof.extend(segments),
            other => panic!("unexpected command emitted: {other:?}"),
        }
    }
    level
}

fn fingerprint(level: &GeneratedLevel) -> u64 {
    let mut hasher = DefaultHasher::new();
    for section in &level.sections {
        for platform in &section.platforms {
            platform.x().to_bits().hash(&mut hasher);
            platform.y().to_bits().hash(&mut hasher);
            platform.width().to_bits().hash(&mut hasher);
        }
        section.collectibles.len().hash(&mut hasher);
        for enemy in &section.enemies {
            enemy.x.to_bits().hash(&mut hasher);
            enemy.patrol.hash(&mut hasher);
        }
    }
    for segment in &level.roof {
        segment.x2().to_bits().hash(&mut hasher);
        segment.y().to_bits().hash(&mut hasher);
    }
    hasher.finish()
}
