#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Dungeon Runner engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters translate device input into
//! [`InputEvent`] values, the session controller turns those into [`Command`]
//! values, the world executes commands via its `apply` entry point, and then
//! broadcasts [`Event`] values that systems and adapters react to. Systems
//! read immutable snapshots and respond exclusively with new command batches.

/// Title used by windows presenting the game.
pub const WINDOW_TITLE: &str = "Dungeon Runner";

/// Width of the visible viewport measured in world units.
pub const VIEWPORT_WIDTH: f32 = 1200.0;

/// Height of the visible viewport measured in world units.
pub const VIEWPORT_HEIGHT: f32 = 700.0;

/// Discrete input observed by an adapter during a single frame.
///
/// Every variant is edge-triggered: adapters emit one value per press, never a
/// held state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Jump if standing on a platform.
    Jump,
    /// Release the web when attached, otherwise jump.
    ToggleWebOrJump,
    /// Reverse the running direction.
    FlipDirection,
    /// Release the web when attached, otherwise shoot it at the pointer.
    ToggleWebAttach {
        /// Pointer position expressed in screen space.
        pointer: ScreenPoint,
    },
    /// Start a new session after game over.
    Restart,
    /// Leave the game.
    Quit,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests a jump from the player.
    Jump,
    /// Releases the web when attached, otherwise requests a jump.
    ToggleWebOrJump,
    /// Reverses the player's running direction.
    FlipDirection,
    /// Releases the web when attached, otherwise attaches it above the pointer.
    ToggleWebAttach {
        /// Pointer position expressed in screen space.
        pointer: ScreenPoint,
    },
    /// Advances the simulation by one fixed frame.
    Tick,
    /// Appends freshly generated ceiling segments to the world.
    ExtendRoof {
        /// Segments ordered by ascending `x1`.
        segments: Vec<RoofSegment>,
    },
    /// Appends a freshly generated dungeon section to the world.
    ExtendDungeon {
        /// Platforms, pickups and enemies produced by the generator.
        section: DungeonSection,
    },
    /// Removes every entity that fell behind the camera's retention window.
    EvictBehindCamera,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced by one frame.
    TimeAdvanced {
        /// Number of frames simulated since the world was created.
        frame: u64,
    },
    /// Confirms that the player left the ground.
    Jumped,
    /// Confirms that the web latched onto the ceiling.
    WebAttached {
        /// Horizontal world position of the anchor.
        anchor_x: f32,
        /// Vertical world position of the anchor.
        anchor_y: f32,
    },
    /// Confirms that the player let go of the web.
    WebReleased,
    /// Announces that the player reversed direction.
    DirectionChanged {
        /// Direction the player faces after the change.
        facing: Facing,
    },
    /// Reports that a pickup was consumed.
    CollectiblePicked {
        /// Score after awarding the pickup.
        score: u32,
    },
    /// Reports that an enemy hurt the player.
    PlayerDamaged {
        /// Health left after the hit.
        health: u8,
    },
    /// Reports that an enemy started a dash.
    EnemyDashed {
        /// Direction of the dash.
        facing: Facing,
    },
    /// Announces the terminal transition of the session.
    PlayerDied {
        /// What ended the run.
        cause: DeathCause,
        /// Score reached before dying.
        score: u32,
    },
    /// Confirms that a dungeon section was appended.
    DungeonExtended {
        /// Horizontal position of the newest platform.
        frontier_x: f32,
        /// Vertical position of the newest platform.
        last_y: f32,
    },
    /// Confirms that ceiling segments were appended.
    RoofExtended {
        /// Right edge of the newest segment.
        frontier_x: f32,
    },
    /// Reports how many entities were dropped behind the camera.
    EntitiesEvicted {
        /// Number of removed entities across all collections.
        count: usize,
    },
}

/// Reason a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Health reached zero after enemy hits.
    Defeated,
    /// The player dropped below the bottom of the dungeon.
    Fell,
}

/// Horizontal direction of travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Towards decreasing x.
    Left,
    /// Towards increasing x.
    Right,
}

impl Facing {
    /// Returns `-1.0` for [`Facing::Left`] and `1.0` for [`Facing::Right`].
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Direction pointing from `from` towards `to`; ties resolve to the left.
    #[must_use]
    pub fn towards(from: f32, to: f32) -> Self {
        if to > from {
            Self::Right
        } else {
            Self::Left
        }
    }
}

/// Position expressed in screen space, before the camera offset is applied.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScreenPoint {
    /// Horizontal offset from the left edge of the viewport.
    pub x: f32,
    /// Vertical offset from the top edge of the viewport.
    pub y: f32,
}

impl ScreenPoint {
    /// Creates a new screen-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in world space with its origin at the top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge of the rectangle.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge of the rectangle.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Reports whether the open horizontal spans `(left, right)` intersect.
    #[must_use]
    pub fn overlaps_span(&self, left: f32, right: f32) -> bool {
        self.right() > left && self.x < right
    }

    /// Half-extent overlap test: both center deltas must lie strictly below
    /// half of the summed extents.
    #[must_use]
    pub fn touches(&self, other: &Rect) -> bool {
        (self.center_x() - other.center_x()).abs() < (self.width + other.width) / 2.0
            && (self.center_y() - other.center_y()).abs() < (self.height + other.height) / 2.0
    }
}

/// Reports whether `value` lies inside the closed range `[min, max]`.
#[must_use]
pub fn in_range(value: f32, min: f32, max: f32) -> bool {
    min <= value && value <= max
}

/// Static solid rectangle the player can land on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Platform {
    bounds: Rect,
}

impl Platform {
    /// Creates a new platform.
    ///
    /// Panics when either extent is not positive.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        assert!(
            width > 0.0 && height > 0.0,
            "platform extents must be positive (received {width}x{height})"
        );
        Self {
            bounds: Rect::new(x, y, width, height),
        }
    }

    /// World-space bounds of the platform.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.bounds.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.bounds.y
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.bounds.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.bounds.height
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.bounds.right()
    }
}

/// Horizontal ceiling line spanning `[x1, x2]` at height `y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoofSegment {
    x1: f32,
    x2: f32,
    y: f32,
}

impl RoofSegment {
    /// Creates a new roof segment.
    ///
    /// Panics when the span is empty or inverted.
    #[must_use]
    pub fn new(x1: f32, x2: f32, y: f32) -> Self {
        assert!(x2 > x1, "roof segment span must be positive ({x1}..{x2})");
        Self { x1, x2, y }
    }

    /// Left end of the span.
    #[must_use]
    pub const fn x1(&self) -> f32 {
        self.x1
    }

    /// Right end of the span.
    #[must_use]
    pub const fn x2(&self) -> f32 {
        self.x2
    }

    /// Height of the ceiling line.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Horizontal length of the span.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    /// Reports whether the closed span contains `x`.
    #[must_use]
    pub fn contains_x(&self, x: f32) -> bool {
        in_range(x, self.x1, self.x2)
    }
}

/// RGB triple used for decorative effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Placement of a pickup produced by the level generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollectibleSpawn {
    /// Left edge of the pickup.
    pub x: f32,
    /// Top edge of the pickup.
    pub y: f32,
}

/// Placement of an enemy produced by the level generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySpawn {
    /// Left edge of the enemy.
    pub x: f32,
    /// Top edge of the enemy.
    pub y: f32,
    /// Left bound of the patrol span.
    pub min_x: f32,
    /// Right bound of the patrol span.
    pub max_x: f32,
    /// Initial patrol direction.
    pub patrol: Facing,
}

/// Batch of content produced by one dungeon generation call.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DungeonSection {
    /// Platforms ordered by ascending `x`.
    pub platforms: Vec<Platform>,
    /// Pickups placed above platforms.
    pub collectibles: Vec<CollectibleSpawn>,
    /// Enemies patrolling platforms.
    pub enemies: Vec<EnemySpawn>,
    /// Vertical position of the last emitted platform, seeding the next batch.
    pub last_y: f32,
}

impl DungeonSection {
    /// Left edge of the newest platform, if the section contains any.
    #[must_use]
    pub fn frontier_x(&self) -> Option<f32> {
        self.platforms.last().map(Platform::x)
    }
}

/// Read-only snapshot describing how far content has been generated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrontierSnapshot {
    /// Horizontal position of the player.
    pub player_x: f32,
    /// Left edge of the newest platform.
    pub dungeon_x: f32,
    /// Vertical position of the newest platform.
    pub last_platform_y: f32,
    /// Right edge of the newest roof segment.
    pub roof_x: f32,
}
