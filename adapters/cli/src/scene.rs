//! Translates world queries into backend-agnostic draw commands.

use dungeon_runner_core::Event;
use dungeon_runner_rendering::{
    visuals, AudioHooks, Color, DrawCommand, GameOverScreen, Hud, Scene, SoundEffect, SpriteKey,
};
use dungeon_runner_system_session::Phase;
use dungeon_runner_world::{query, Camera, World, MAX_HEALTH};
use glam::Vec2;

const WEB_THICKNESS: f32 = 2.0;
const ANCHOR_RADIUS: f32 = 4.0;
const ROOF_EDGE_THICKNESS: f32 = 3.0;

/// Queues the sounds triggered by `events`.
pub(crate) fn queue_sounds(scene: &mut Scene, events: &[Event], hooks: AudioHooks) {
    scene.sounds.extend(
        events
            .iter()
            .filter_map(|event| SoundEffect::for_event(event, hooks)),
    );
}

/// Appends the frame for `world` in the given session phase.
pub(crate) fn populate(scene: &mut Scene, world: &World, phase: Phase) {
    scene.background = visuals::BACKGROUND;
    if let Phase::GameOver { score, .. } = phase {
        GameOverScreen { score }.draw(scene);
        return;
    }

    let camera = query::camera(world);
    push_roof(scene, world, camera);
    push_platforms(scene, world, camera);
    push_particles(scene, world, camera);
    push_collectibles(scene, world, camera);
    push_enemies(scene, world, camera);
    push_player(scene, world, camera);

    let hud = query::hud(world);
    Hud {
        score: hud.score,
        facing: hud.facing,
        health: hud.health,
        max_health: MAX_HEALTH,
    }
    .draw(scene);
}

fn screen_x(camera: &Camera, world_x: f32) -> f32 {
    camera.to_screen(world_x).trunc()
}

fn sprite(key: SpriteKey, position: Vec2, size: Vec2, tint: Color, fallback: Color) -> DrawCommand {
    DrawCommand::Sprite {
        key,
        position,
        size,
        tint,
        fallback,
        outline: visuals::BLACK,
    }
}

fn push_roof(scene: &mut Scene, world: &World, camera: &Camera) {
    for segment in query::roof_segments(world) {
        let left = screen_x(camera, segment.x1());
        let right = screen_x(camera, segment.x2());
        if !visuals::span_on_screen(left, right, visuals::ENTITY_MARGIN) {
            continue;
        }
        let y = segment.y().trunc();
        scene.push(DrawCommand::Rect {
            position: Vec2::new(left, 0.0),
            size: Vec2::new(right - left, y),
            color: visuals::DARK_GRAY,
        });
        scene.push(DrawCommand::Line {
            from: Vec2::new(left, y),
            to: Vec2::new(right, y),
            thickness: ROOF_EDGE_THICKNESS,
            color: visuals::ROOF_EDGE,
        });
    }
}

fn push_platforms(scene: &mut Scene, world: &World, camera: &Camera) {
    for platform in query::platforms(world) {
        let x = screen_x(camera, platform.x());
        if !visuals::is_on_screen(x, visuals::PLATFORM_MARGIN) {
            continue;
        }
        scene.push(DrawCommand::Sprite {
            key: SpriteKey::Platform,
            position: Vec2::new(x, platform.y().trunc()),
            size: Vec2::new(platform.width(), platform.height()),
            tint: visuals::WHITE,
            fallback: visuals::GRAY,
            outline: visuals::DARK_GRAY,
        });
    }
}

fn push_particles(scene: &mut Scene, world: &World, camera: &Camera) {
    for particle in query::particles(world) {
        if !particle.is_alive() {
            continue;
        }
        scene.push(DrawCommand::Circle {
            center: Vec2::new(screen_x(camera, particle.x()), particle.y().trunc()),
            radius: particle.size() as f32,
            color: visuals::particle_color(particle.color(), particle.alpha()),
        });
    }
}

fn push_collectibles(scene: &mut Scene, world: &World, camera: &Camera) {
    for collectible in query::collectibles(world) {
        if collectible.collected() {
            continue;
        }
        let bounds = collectible.bounds();
        let x = screen_x(camera, bounds.x);
        if !visuals::is_on_screen(x, visuals::ENTITY_MARGIN) {
            continue;
        }
        let (corner, edge) =
            visuals::pulsed_square(Vec2::new(x, bounds.y), bounds.width, collectible.pulse());
        scene.push(sprite(
            SpriteKey::Collectible,
            Vec2::new(corner.x, corner.y.trunc()),
            Vec2::splat(edge),
            visuals::WHITE,
            visuals::PINK,
        ));
    }
}

fn push_enemies(scene: &mut Scene, world: &World, camera: &Camera) {
    for enemy in query::enemies(world) {
        let bounds = enemy.bounds();
        let x = screen_x(camera, bounds.x);
        if !visuals::is_on_screen(x, visuals::ENTITY_MARGIN) {
            continue;
        }
        let telegraphing = enemy.is_telegraphing();
        scene.push(sprite(
            SpriteKey::Enemy,
            Vec2::new(x, bounds.y.trunc()),
            Vec2::new(bounds.width, bounds.height),
            visuals::enemy_tint(telegraphing),
            visuals::enemy_color(telegraphing),
        ));
    }
}

fn push_player(scene: &mut Scene, world: &World, camera: &Camera) {
    let player = query::player(world);
    let bounds = player.bounds();
    let x = screen_x(camera, bounds.x);
    let y = bounds.y.trunc();
    let fallback = if visuals::player_flickers(player.invincible()) {
        visuals::FLICKER
    } else {
        visuals::WHITE
    };
    scene.push(sprite(
        SpriteKey::Player,
        Vec2::new(x, y),
        Vec2::new(bounds.width, bounds.height),
        visuals::player_tint(player.invincible()),
        fallback,
    ));

    if let Some(anchor) = player.web() {
        let anchor_point = Vec2::new(screen_x(camera, anchor.x), anchor.y.trunc());
        let center = Vec2::new(
            x + (bounds.width / 2.0).floor(),
            (bounds.y + (bounds.height / 2.0).floor()).trunc(),
        );
        scene.push(DrawCommand::Line {
            from: center,
            to: anchor_point,
            thickness: WEB_THICKNESS,
            color: visuals::WEB,
        });
        scene.push(DrawCommand::Circle {
            center: anchor_point,
            radius: ANCHOR_RADIUS,
            color: visuals::WHITE,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_runner_core::{DeathCause, Facing};
    use dungeon_runner_system_session::Session;

    fn texts(scene: &Scene) -> Vec<&str> {
        scene
            .commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn sprites(scene: &Scene, wanted: SpriteKey) -> usize {
        scene
            .commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Sprite { key, .. } if *key == wanted))
            .count()
    }

    #[test]
    fn running_frame_draws_world_then_hud() {
        let session = Session::new(42);
        let mut scene = Scene::new(visuals::BACKGROUND);
        populate(&mut scene, session.world(), session.phase());

        assert_eq!(sprites(&scene, SpriteKey::Player), 1);
        assert!(sprites(&scene, SpriteKey::Platform) >= 2);
        assert_eq!(texts(&scene), ["Score: 0", "Dir: →"]);
        assert!(matches!(
            scene.commands.first(),
            Some(DrawCommand::Rect { .. })
        ));
        assert!(matches!(
            scene.commands.last(),
            Some(DrawCommand::CircleOutline { .. })
        ));
    }

    #[test]
    fn starting_platform_is_drawn_at_its_world_position() {
        let session = Session::new(7);
        let mut scene = Scene::new(visuals::BACKGROUND);
        populate(&mut scene, session.world(), session.phase());

        let start = scene.commands.iter().find_map(|command| match command {
            DrawCommand::Sprite {
                key: SpriteKey::Platform,
                position,
                size,
                ..
            } => Some((*position, *size)),
            _ => None,
        });
        assert_eq!(
            start,
            Some((Vec2::new(100.0, 500.0), Vec2::new(150.0, 20.0)))
        );
    }

    #[test]
    fn game_over_frame_shows_only_the_overlay() {
        let session = Session::new(3);
        let mut scene = Scene::new(visuals::BACKGROUND);
        populate(
            &mut scene,
            session.world(),
            Phase::GameOver {
                cause: DeathCause::Defeated,
                score: 40,
            },
        );
        assert_eq!(
            texts(&scene),
            ["GAME OVER!", "Final Score: 40", "Press R to Restart"]
        );
        assert_eq!(scene.commands.len(), 3);
    }

    #[test]
    fn sounds_follow_events() {
        let mut scene = Scene::new(visuals::BACKGROUND);
        let events = [
            Event::TimeAdvanced { frame: 3 },
            Event::Jumped,
            Event::EnemyDashed {
                facing: Facing::Right,
            },
            Event::CollectiblePicked { score: 10 },
        ];
        queue_sounds(&mut scene, &events, AudioHooks::default());
        assert_eq!(scene.sounds, [SoundEffect::Jump, SoundEffect::Collect]);

        scene.clear();
        queue_sounds(
            &mut scene,
            &events,
            AudioHooks {
                web: false,
                dash: true,
            },
        );
        assert_eq!(
            scene.sounds,
            [SoundEffect::Jump, SoundEffect::Dash, SoundEffect::Collect]
        );
    }
}
