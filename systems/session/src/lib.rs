#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session controller driving the per-frame simulation pipeline.
//!
//! A [`Session`] owns the authoritative world and the level generation
//! system. Each call to [`Session::step`] runs one frame: input commands,
//! the simulation tick, frontier generation and eviction. After the player
//! dies the session parks in [`Phase::GameOver`] until a restart or quit
//! input arrives; restarting rebuilds the world in place instead of nesting
//! a fresh game loop.

use std::fmt;

use dungeon_runner_core::{Command, DeathCause, Event, InputEvent};
use dungeon_runner_system_level_generation::LevelGeneration;
use dungeon_runner_world::{self as world, query, World};

const GENERATION_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Lifecycle stage of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Frames are being simulated.
    Running,
    /// The run ended; only restart and quit inputs are honoured.
    GameOver {
        /// What ended the run.
        cause: DeathCause,
        /// Final score.
        score: u32,
    },
}

/// Whether the host loop should keep going after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    /// Keep presenting frames.
    Continue,
    /// Leave the game.
    Quit,
}

/// Result of stepping the session by one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutcome {
    /// Events emitted by the world during the frame, in order.
    pub events: Vec<Event>,
    /// Whether the host should continue.
    pub control: Control,
}

impl FrameOutcome {
    fn new(events: Vec<Event>, control: Control) -> Self {
        Self { events, control }
    }
}

/// Orchestrates the world and level generation for one player.
#[derive(Debug)]
pub struct Session {
    seed: u64,
    runs: u64,
    world: World,
    generation: LevelGeneration,
    phase: Phase,
}

impl Session {
    /// Creates a session and generates the opening level.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let (world, generation) = fresh_run(seed, 0);
        log::info!("session started with seed {seed:#x}");
        Self {
            seed,
            runs: 0,
            world,
            generation,
            phase: Phase::Running,
        }
    }

    /// Advances the session by one frame.
    ///
    /// Inputs are applied in order before the tick. While the game is over
    /// only [`InputEvent::Restart`] and [`InputEvent::Quit`] have an effect.
    pub fn step(&mut self, inputs: &[InputEvent]) -> FrameOutcome {
        match self.phase {
            Phase::Running => self.step_running(inputs),
            Phase::GameOver { .. } => self.step_game_over(inputs),
        }
    }

    fn step_running(&mut self, inputs: &[InputEvent]) -> FrameOutcome {
        let mut events = Vec::new();

        for input in inputs {
            log::trace!("frame {}: input {input:?}", query::frame(&self.world));
            let command = match *input {
                InputEvent::Jump => Command::Jump,
                InputEvent::ToggleWebOrJump => Command::ToggleWebOrJump,
                InputEvent::FlipDirection => Command::FlipDirection,
                InputEvent::ToggleWebAttach { pointer } => Command::ToggleWebAttach { pointer },
                InputEvent::Restart => continue,
                InputEvent::Quit => return FrameOutcome::new(events, Control::Quit),
            };
            world::apply(&mut self.world, command, &mut events);
        }

        world::apply(&mut self.world, Command::Tick, &mut events);

        if let Some(cause) = query::game_over(&self.world) {
            let score = query::score(&self.world);
            log::info!("game over ({cause:?}), final score {score}");
            self.phase = Phase::GameOver { cause, score };
            return FrameOutcome::new(events, Control::Continue);
        }

        let mut commands = Vec::new();
        self.generation.handle(query::frontier(&self.world), &mut commands);
        commands.push(Command::EvictBehindCamera);
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        FrameOutcome::new(events, Control::Continue)
    }

    fn step_game_over(&mut self, inputs: &[InputEvent]) -> FrameOutcome {
        for input in inputs {
            match input {
                InputEvent::Restart => {
                    self.restart();
                    break;
                }
                InputEvent::Quit => return FrameOutcome::new(Vec::new(), Control::Quit),
                _ => {}
            }
        }
        FrameOutcome::new(Vec::new(), Control::Continue)
    }

    /// Discards the current run and starts a new one.
    pub fn restart(&mut self) {
        self.runs = self.runs.saturating_add(1);
        let (world, generation) = fresh_run(self.seed, self.runs);
        self.world = world;
        self.generation = generation;
        self.phase = Phase::Running;
        log::info!("session restarted (run {})", self.runs);
    }

    /// Runs a scripted sequence of inputs without presenting anything.
    ///
    /// Each script entry pairs a zero-based frame index with an input fired
    /// on that frame. Simulation stops early when a quit input is processed.
    pub fn run_script(&mut self, script: &[(u64, InputEvent)], frames: u64) -> ReplaySummary {
        let mut simulated = 0;
        for frame in 0..frames {
            let inputs: Vec<InputEvent> = script
                .iter()
                .filter(|(at, _)| *at == frame)
                .map(|(_, input)| *input)
                .collect();
            let outcome = self.step(&inputs);
            simulated += 1;
            if outcome.control == Control::Quit {
                break;
            }
        }
        self.summary(simulated)
    }

    fn summary(&self, frames: u64) -> ReplaySummary {
        let world = &self.world;
        ReplaySummary {
            frames,
            restarts: self.runs,
            score: query::score(world),
            health: query::player(world).health(),
            player_x: query::player(world).x(),
            camera_x: query::camera(world).x(),
            platforms: query::platforms(world).len(),
            roof_segments: query::roof_segments(world).len(),
            collectibles: query::collectibles(world).len(),
            enemies: query::enemies(world).len(),
            particles: query::particles(world).len(),
            game_over: matches!(self.phase, Phase::GameOver { .. }),
        }
    }

    /// Provides read-only access to the current world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current lifecycle stage.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Seed the session was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

fn fresh_run(seed: u64, run: u64) -> (World, LevelGeneration) {
    let run_seed = seed.wrapping_add(run.wrapping_mul(GENERATION_STREAM));
    let mut world = World::new(run_seed);
    let mut generation = LevelGeneration::new(run_seed ^ GENERATION_STREAM);

    let mut commands = Vec::new();
    generation.prime(&mut commands);
    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    (world, generation)
}

/// Summary of a headless run.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplaySummary {
    /// Frames stepped, including frames spent on the game-over screen.
    pub frames: u64,
    /// Number of restarts performed.
    pub restarts: u64,
    /// Score of the current run.
    pub score: u32,
    /// Remaining player health.
    pub health: u8,
    /// Final player position.
    pub player_x: f32,
    /// Final camera position.
    pub camera_x: f32,
    /// Live platform count.
    pub platforms: usize,
    /// Live roof segment count.
    pub roof_segments: usize,
    /// Live pickup count.
    pub collectibles: usize,
    /// Live enemy count.
    pub enemies: usize,
    /// Live particle count.
    pub particles: usize,
    /// Whether the run ended.
    pub game_over: bool,
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames:        {}", self.frames)?;
        writeln!(f, "restarts:      {}", self.restarts)?;
        writeln!(f, "score:         {}", self.score)?;
        writeln!(f, "health:        {}", self.health)?;
        writeln!(f, "player x:      {:.1}", self.player_x)?;
        writeln!(f, "camera x:      {:.1}", self.camera_x)?;
        writeln!(
            f,
            "entities:      {} platforms, {} roof, {} pickups, {} enemies, {} particles",
            self.platforms, self.roof_segments, self.collectibles, self.enemies, self.particles
        )?;
        write!(f, "game over:     {}", self.game_over)
    }
}
