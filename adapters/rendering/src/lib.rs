#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering and audio contracts for Dungeon Runner adapters.
//!
//! The simulation never draws directly. Each frame the host fills a [`Scene`]
//! with backend-agnostic [`DrawCommand`]s and [`SoundEffect`]s, and a
//! [`RenderingBackend`] executes them. Asset loading is expressed as one
//! `Result<_, LoadError>` per asset so adapters can choose a fallback
//! explicitly through [`select_asset`].

pub mod visuals;

use std::{path::PathBuf, time::Duration};

use anyhow::Result as AnyResult;
use dungeon_runner_core::{Event, Facing, InputEvent, Rgb, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use glam::Vec2;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb_u8(rgb.red(), rgb.green(), rgb.blue())
    }
}

/// Texture slots a backend may resolve from its asset manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// The runner.
    Player,
    /// Patrolling enemies.
    Enemy,
    /// Pickups.
    Collectible,
    /// Floor platforms.
    Platform,
}

impl SpriteKey {
    /// Every sprite slot, in manifest order.
    pub const ALL: [SpriteKey; 4] = [
        SpriteKey::Player,
        SpriteKey::Enemy,
        SpriteKey::Collectible,
        SpriteKey::Platform,
    ];

    /// Key naming the sprite in the `[sprites]` manifest table.
    #[must_use]
    pub const fn manifest_name(self) -> &'static str {
        match self {
            SpriteKey::Player => "player",
            SpriteKey::Enemy => "enemy",
            SpriteKey::Collectible => "collectible",
            SpriteKey::Platform => "platform",
        }
    }
}

/// Sound effects triggered by world events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Played when the player jumps off the ground.
    Jump,
    /// Played when a pickup is consumed.
    Collect,
    /// Played when the run ends.
    Death,
    /// Played when the web latches onto the ceiling.
    Web,
    /// Played when an enemy dashes.
    Dash,
}

impl SoundEffect {
    /// Every sound slot, in manifest order.
    pub const ALL: [SoundEffect; 5] = [
        SoundEffect::Jump,
        SoundEffect::Collect,
        SoundEffect::Death,
        SoundEffect::Web,
        SoundEffect::Dash,
    ];

    /// Key naming the sound in the `[sounds]` manifest table.
    #[must_use]
    pub const fn manifest_name(self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::Collect => "collect",
            SoundEffect::Death => "death",
            SoundEffect::Web => "web",
            SoundEffect::Dash => "dash",
        }
    }

    /// Maps a world event onto the sound it should trigger, if any.
    #[must_use]
    pub fn for_event(event: &Event, hooks: AudioHooks) -> Option<Self> {
        match event {
            Event::Jumped => Some(SoundEffect::Jump),
            Event::CollectiblePicked { .. } => Some(SoundEffect::Collect),
            Event::PlayerDied { .. } => Some(SoundEffect::Death),
            Event::WebAttached { .. } if hooks.web => Some(SoundEffect::Web),
            Event::EnemyDashed { .. } if hooks.dash => Some(SoundEffect::Dash),
            _ => None,
        }
    }
}

/// Optional sound hooks that stay silent unless enabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AudioHooks {
    /// Play [`SoundEffect::Web`] when the web attaches.
    pub web: bool,
    /// Play [`SoundEffect::Dash`] when an enemy dashes.
    pub dash: bool,
}

/// Backend-agnostic drawing primitive. Positions are screen pixels with the
/// origin at the top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Filled axis-aligned rectangle.
    Rect {
        /// Top-left corner.
        position: Vec2,
        /// Width and height.
        size: Vec2,
        /// Fill color.
        color: Color,
    },
    /// Rectangle outline.
    RectOutline {
        /// Top-left corner.
        position: Vec2,
        /// Width and height.
        size: Vec2,
        /// Stroke thickness in pixels.
        thickness: f32,
        /// Stroke color.
        color: Color,
    },
    /// Textured quad that degrades to an outlined rectangle when the sprite
    /// is unavailable.
    Sprite {
        /// Texture slot to draw.
        key: SpriteKey,
        /// Top-left corner.
        position: Vec2,
        /// Destination width and height.
        size: Vec2,
        /// Multiplicative tint applied to the texture.
        tint: Color,
        /// Fill used when the texture is missing.
        fallback: Color,
        /// Outline drawn around the fallback rectangle.
        outline: Color,
    },
    /// Straight line segment.
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Stroke thickness in pixels.
        thickness: f32,
        /// Stroke color.
        color: Color,
    },
    /// Filled circle.
    Circle {
        /// Centre point.
        center: Vec2,
        /// Radius in pixels.
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// Circle outline.
    CircleOutline {
        /// Centre point.
        center: Vec2,
        /// Radius in pixels.
        radius: f32,
        /// Stroke thickness in pixels.
        thickness: f32,
        /// Stroke color.
        color: Color,
    },
    /// Single line of text.
    Text {
        /// Text to draw.
        text: String,
        /// Top-left corner of the text box.
        position: Vec2,
        /// Font size in pixels.
        size: f32,
        /// Text color.
        color: Color,
    },
}

/// Frame description handed to a backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Color the frame is cleared to.
    pub background: Color,
    /// Draw commands executed in order.
    pub commands: Vec<DrawCommand>,
    /// Sounds to start this frame.
    pub sounds: Vec<SoundEffect>,
}

impl Scene {
    /// Creates an empty scene cleared to `background`.
    #[must_use]
    pub const fn new(background: Color) -> Self {
        Self {
            background,
            commands: Vec::new(),
            sounds: Vec::new(),
        }
    }

    /// Drops the previous frame's commands and sounds, keeping allocations.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.sounds.clear();
    }

    /// Appends a draw command.
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Appends a text command.
    pub fn text<T: Into<String>>(&mut self, text: T, position: Vec2, size: f32, color: Color) {
        self.push(DrawCommand::Text {
            text: text.into(),
            position,
            size,
            color,
        });
    }
}

/// Font size used by every HUD and overlay label.
pub const FONT_SIZE: f32 = 40.0;

/// Heads-up display shown while the run is in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Current score.
    pub score: u32,
    /// Direction the player runs in.
    pub facing: Facing,
    /// Remaining health.
    pub health: u8,
    /// Number of heart slots to draw.
    pub max_health: u8,
}

impl Hud {
    /// Appends the score, direction indicator and hearts to `scene`.
    pub fn draw(&self, scene: &mut Scene) {
        let white = visuals::WHITE;
        scene.text(
            format!("Score: {}", self.score),
            Vec2::new(10.0, 10.0),
            FONT_SIZE,
            white,
        );
        let arrow = match self.facing {
            Facing::Right => '→',
            Facing::Left => '←',
        };
        scene.text(
            format!("Dir: {arrow}"),
            Vec2::new(10.0, 50.0),
            FONT_SIZE,
            white,
        );

        for slot in 0..self.max_health {
            let center = visuals::heart_center(slot);
            let color = if slot < self.health {
                visuals::RED
            } else {
                visuals::GRAY
            };
            scene.push(DrawCommand::Circle {
                center,
                radius: visuals::HEART_RADIUS,
                color,
            });
            scene.push(DrawCommand::CircleOutline {
                center,
                radius: visuals::HEART_RADIUS,
                thickness: 2.0,
                color: visuals::BLACK,
            });
        }
    }
}

/// Overlay shown after the run ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverScreen {
    /// Score reached before dying.
    pub score: u32,
}

impl GameOverScreen {
    /// Replaces the scene contents with the game-over overlay.
    pub fn draw(&self, scene: &mut Scene) {
        scene.commands.clear();
        scene.background = visuals::BACKGROUND;

        let center_x = (VIEWPORT_WIDTH / 2.0).floor();
        let center_y = (VIEWPORT_HEIGHT / 2.0).floor();
        scene.text(
            "GAME OVER!",
            Vec2::new(center_x - 120.0, center_y - 60.0),
            FONT_SIZE,
            visuals::RED,
        );
        scene.text(
            format!("Final Score: {}", self.score),
            Vec2::new(center_x - 140.0, center_y),
            FONT_SIZE,
            visuals::WHITE,
        );
        scene.text(
            "Press R to Restart",
            Vec2::new(center_x - 150.0, center_y + 60.0),
            FONT_SIZE,
            visuals::WHITE,
        );
    }
}

/// Input gathered by an adapter during one presented frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Inputs in the order they were observed.
    pub inputs: Vec<InputEvent>,
}

/// Whether the backend should keep presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Present another frame.
    Continue,
    /// Close the window and return from [`RenderingBackend::run`].
    Exit,
}

/// Static description of the window a backend opens.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the window chrome.
    pub window_title: String,
    /// Window size in pixels.
    pub window_size: Vec2,
    /// Initial scene.
    pub scene: Scene,
}

impl Presentation {
    /// Creates a presentation sized to the game viewport.
    #[must_use]
    pub fn new<T: Into<String>>(window_title: T, scene: Scene) -> Self {
        Self {
            window_title: window_title.into(),
            window_size: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Dungeon Runner scenes.
pub trait RenderingBackend {
    /// Runs the backend until the update closure requests an exit or the
    /// window is closed.
    ///
    /// The `update_scene` closure receives the wall-clock frame delta, the
    /// input captured by the adapter, and rebuilds the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameControl + 'static;
}

/// Destination for sound effects.
pub trait AudioSink {
    /// Starts playing `effect`. Sinks without the sound loaded stay silent.
    fn play(&mut self, effect: SoundEffect);
}

/// Failure to load a single asset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The manifest does not list the asset.
    #[error("{name} is not listed in the asset manifest")]
    NotListed {
        /// Manifest key of the asset.
        name: &'static str,
    },
    /// The asset file could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The asset file was read but could not be decoded.
    #[error("failed to decode {}: {reason}", path.display())]
    Decode {
        /// File that was decoded.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },
}

/// Resolves an asset load into the asset or its fallback.
///
/// Failures are logged at `warn` and yield `None`, which callers render as a
/// flat rectangle or silence.
pub fn select_asset<T>(name: &str, loaded: Result<T, LoadError>) -> Option<T> {
    match loaded {
        Ok(asset) => Some(asset),
        Err(LoadError::NotListed { .. }) => {
            log::debug!("no {name} asset configured, using fallback");
            None
        }
        Err(error) => {
            log::warn!("{name} asset unavailable, using fallback: {error}");
            None
        }
    }
}
