#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad window for Dungeon Runner.
//!
//! [`MacroquadBackend`] opens the window, polls the keyboard and mouse into
//! [`FrameInput`]s, and executes each [`Scene`] the game hands back. Sprites
//! come from the TOML [`AssetManifest`]; any sprite that fails to load is
//! drawn as its fallback rectangle.
//!
//! The default build is silent: jump, collect and death sounds (and the
//! optional web and dash hooks) are only played when the crate is built with
//! `--features audio`, which links macroquad's audio backend.

mod assets;
mod audio;

pub use self::assets::{AssetManifest, ManifestError, SpriteAtlas};

use std::{
    borrow::Cow,
    collections::VecDeque,
    path::PathBuf,
    time::Duration,
};

use anyhow::Result;
use dungeon_runner_core::{InputEvent, ScreenPoint};
use dungeon_runner_rendering::{
    AudioSink, DrawCommand, FrameControl, FrameInput, Presentation, RenderingBackend, Scene,
};
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};

use self::audio::SoundBank;

const TEXT_BASELINE: f32 = 0.75;
const FALLBACK_OUTLINE: f32 = 2.0;

/// Keyboard and mouse state sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct InputSnapshot {
    /// `Space` toggles the web or jumps.
    toggle_web_or_jump: bool,
    /// `W` or `Up` jumps.
    jump: bool,
    /// Left click reverses the running direction.
    flip_direction: bool,
    /// Right click toggles the web towards the cursor.
    web_attach: Option<(f32, f32)>,
    /// `R` restarts after a game over.
    restart: bool,
    /// `Q` or `Escape` leaves the game.
    quit: bool,
}

impl InputSnapshot {
    fn poll() -> Self {
        let web_attach = is_mouse_button_pressed(MouseButton::Right).then(mouse_position);

        Self {
            toggle_web_or_jump: is_key_pressed(KeyCode::Space),
            jump: is_key_pressed(KeyCode::W) || is_key_pressed(KeyCode::Up),
            flip_direction: is_mouse_button_pressed(MouseButton::Left),
            web_attach,
            restart: is_key_pressed(KeyCode::R),
            quit: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
        }
    }

    fn into_frame_input(self) -> FrameInput {
        let mut inputs = Vec::new();
        if self.toggle_web_or_jump {
            inputs.push(InputEvent::ToggleWebOrJump);
        }
        if self.jump {
            inputs.push(InputEvent::Jump);
        }
        if self.flip_direction {
            inputs.push(InputEvent::FlipDirection);
        }
        if let Some((x, y)) = self.web_attach {
            inputs.push(InputEvent::ToggleWebAttach {
                pointer: ScreenPoint::new(x, y),
            });
        }
        if self.restart {
            inputs.push(InputEvent::Restart);
        }
        if self.quit {
            inputs.push(InputEvent::Quit);
        }
        FrameInput { inputs }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    manifest_path: PathBuf,
    load_assets: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            manifest_path: AssetManifest::default_path(),
            load_assets: true,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Overrides where the asset manifest is read from.
    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }

    /// Configures whether sprites and sounds are loaded at all.
    #[must_use]
    pub fn with_asset_loading(mut self, enabled: bool) -> Self {
        self.load_assets = enabled;
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameControl + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            manifest_path,
            load_assets,
        } = self;

        let Presentation {
            window_title,
            window_size,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_size.x as i32,
            window_height: window_size.y as i32,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let manifest = if load_assets {
                AssetManifest::load_or_default(&manifest_path)
            } else {
                log::info!("asset loading disabled, drawing fallback shapes");
                AssetManifest::default()
            };
            let atlas = SpriteAtlas::from_manifest(&manifest);
            let mut sounds = SoundBank::load(&manifest).await;
            let mut fps_counter = FpsCounter::default();

            loop {
                let frame_input = InputSnapshot::poll().into_frame_input();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                if update_scene(frame_dt, frame_input, &mut scene) == FrameControl::Exit {
                    break;
                }

                macroquad::window::clear_background(to_macroquad_color(scene.background));
                for command in &scene.commands {
                    draw_command(command, &atlas);
                }
                for effect in scene.sounds.drain(..) {
                    sounds.play(effect);
                }

                let fps_metrics = fps_counter.record_frame(frame_dt);
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                    }) = fps_metrics
                    {
                        log::info!("FPS: {per_second:.2} (10s avg: {trailing_ten_seconds:.2})");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_command(command: &DrawCommand, atlas: &SpriteAtlas) {
    match command {
        DrawCommand::Rect {
            position,
            size,
            color,
        } => macroquad::shapes::draw_rectangle(
            position.x,
            position.y,
            size.x,
            size.y,
            to_macroquad_color(*color),
        ),
        DrawCommand::RectOutline {
            position,
            size,
            thickness,
            color,
        } => macroquad::shapes::draw_rectangle_lines(
            position.x,
            position.y,
            size.x,
            size.y,
            *thickness,
            to_macroquad_color(*color),
        ),
        DrawCommand::Sprite {
            key,
            position,
            size,
            tint,
            fallback,
            outline,
        } => {
            if !atlas.draw(*key, *position, *size, *tint) {
                macroquad::shapes::draw_rectangle(
                    position.x,
                    position.y,
                    size.x,
                    size.y,
                    to_macroquad_color(*fallback),
                );
                macroquad::shapes::draw_rectangle_lines(
                    position.x,
                    position.y,
                    size.x,
                    size.y,
                    FALLBACK_OUTLINE,
                    to_macroquad_color(*outline),
                );
            }
        }
        DrawCommand::Line {
            from,
            to,
            thickness,
            color,
        } => macroquad::shapes::draw_line(
            from.x,
            from.y,
            to.x,
            to.y,
            *thickness,
            to_macroquad_color(*color),
        ),
        DrawCommand::Circle {
            center,
            radius,
            color,
        } => macroquad::shapes::draw_circle(
            center.x,
            center.y,
            *radius,
            to_macroquad_color(*color),
        ),
        DrawCommand::CircleOutline {
            center,
            radius,
            thickness,
            color,
        } => macroquad::shapes::draw_circle_lines(
            center.x,
            center.y,
            *radius,
            *thickness,
            to_macroquad_color(*color),
        ),
        DrawCommand::Text {
            text,
            position,
            size,
            color,
        } => {
            let _ = macroquad::text::draw_text(
                &printable(text),
                position.x,
                position.y + size * TEXT_BASELINE,
                *size,
                to_macroquad_color(*color),
            );
        }
    }
}

/// Replaces glyphs missing from macroquad's built-in font.
fn printable(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace('→', "->").replace('←', "<-"))
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
        })
    }
}

fn to_macroquad_color(color: dungeon_runner_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_runner_rendering::visuals;

    #[test]
    fn snapshot_maps_controls_to_inputs_in_order() {
        let snapshot = InputSnapshot {
            toggle_web_or_jump: true,
            flip_direction: true,
            web_attach: Some((640.0, 120.0)),
            quit: true,
            ..InputSnapshot::default()
        };

        assert_eq!(
            snapshot.into_frame_input().inputs,
            vec![
                InputEvent::ToggleWebOrJump,
                InputEvent::FlipDirection,
                InputEvent::ToggleWebAttach {
                    pointer: ScreenPoint::new(640.0, 120.0),
                },
                InputEvent::Quit,
            ]
        );
    }

    #[test]
    fn idle_frames_produce_no_input() {
        assert!(InputSnapshot::default()
            .into_frame_input()
            .inputs
            .is_empty());
    }

    #[test]
    fn jump_and_restart_keys_map_directly() {
        let snapshot = InputSnapshot {
            jump: true,
            restart: true,
            ..InputSnapshot::default()
        };
        assert_eq!(
            snapshot.into_frame_input().inputs,
            vec![InputEvent::Jump, InputEvent::Restart]
        );
    }

    #[test]
    fn arrows_are_spelled_out_for_the_builtin_font() {
        assert_eq!(printable("Dir: →"), "Dir: ->");
        assert_eq!(printable("Dir: ←"), "Dir: <-");
        assert!(matches!(printable("Score: 10"), Cow::Borrowed(_)));
    }

    #[test]
    fn colors_convert_channel_for_channel() {
        let converted = to_macroquad_color(visuals::PINK.with_alpha(0.5));
        assert_eq!(converted.r, 1.0);
        assert!((converted.g - 105.0 / 255.0).abs() < 1e-6);
        assert_eq!(converted.a, 0.5);
    }

    #[test]
    fn backend_builders_record_configuration() {
        let backend = MacroquadBackend::new()
            .with_vsync(false)
            .with_show_fps(true)
            .with_manifest_path("custom/manifest.toml")
            .with_asset_loading(false);
        assert_eq!(backend.swap_interval, Some(0));
        assert!(backend.show_fps);
        assert_eq!(backend.manifest_path, PathBuf::from("custom/manifest.toml"));
        assert!(!backend.load_assets);
    }

    #[test]
    fn fps_counter_reports_average_frames_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis;
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());

        let metrics = counter
            .record_frame(frame(250))
            .expect("should report FPS after one second of samples");
        assert!((metrics.per_second - 4.0).abs() <= 1e-3);
        assert!((metrics.trailing_ten_seconds - 4.0).abs() <= 1e-3);
        assert!(counter.record_frame(frame(250)).is_none());
    }

    #[test]
    fn fps_counter_tracks_trailing_ten_second_average() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis;

        for _ in 0..10 {
            for sample in 0..5 {
                let metrics = counter.record_frame(frame(200));
                if sample == 4 {
                    let metrics = metrics.expect("should report every second");
                    assert!((metrics.per_second - 5.0).abs() <= 1e-3);
                    assert!((metrics.trailing_ten_seconds - 5.0).abs() <= 1e-3);
                } else {
                    assert!(metrics.is_none());
                }
            }
        }

        for sample in 0..10 {
            let metrics = counter.record_frame(frame(100));
            if sample == 9 {
                let metrics = metrics.expect("should report every second");
                assert!((metrics.per_second - 10.0).abs() <= 1e-3);
                assert!((metrics.trailing_ten_seconds - 5.5).abs() <= 1e-3);
            } else {
                assert!(metrics.is_none());
            }
        }
    }
}
