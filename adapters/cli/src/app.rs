//! Per-frame driver connecting the session to a rendering backend.

use std::{mem, time::Duration};

use dungeon_runner_core::InputEvent;
use dungeon_runner_rendering::{AudioHooks, FrameControl, FrameInput, Scene};
use dungeon_runner_system_session::{Control, Session};

use crate::scene;

/// Simulation rate the gameplay constants are tuned for.
const STEP: Duration = Duration::from_nanos(16_666_667);
const MAX_STEPS_PER_FRAME: u32 = 4;

/// Converts variable frame deltas into a whole number of fixed simulation steps.
#[derive(Debug, Default)]
pub(crate) struct FixedStep {
    accumulated: Duration,
}

impl FixedStep {
    /// Accumulates `dt` and returns how many steps are due.
    ///
    /// At most four steps run per frame; a larger backlog is dropped so a
    /// stalled window does not fast-forward the run.
    pub(crate) fn advance(&mut self, dt: Duration) -> u32 {
        self.accumulated += dt;
        let mut steps = 0;
        while self.accumulated >= STEP && steps < MAX_STEPS_PER_FRAME {
            self.accumulated -= STEP;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME {
            self.accumulated = self.accumulated.min(STEP);
        }
        steps
    }
}

/// Owns the session and rebuilds the scene every presented frame.
#[derive(Debug)]
pub(crate) struct App {
    session: Session,
    hooks: AudioHooks,
    clock: FixedStep,
    pending: Vec<InputEvent>,
}

impl App {
    pub(crate) fn new(session: Session, hooks: AudioHooks) -> Self {
        Self {
            session,
            hooks,
            clock: FixedStep::default(),
            pending: Vec::new(),
        }
    }

    /// Runs the simulation steps due for `dt` and redraws `scene`.
    ///
    /// Inputs gathered while no step is due are held for the next step so
    /// presses are never lost on fast displays.
    pub(crate) fn frame(
        &mut self,
        dt: Duration,
        input: FrameInput,
        scene: &mut Scene,
    ) -> FrameControl {
        self.pending.extend(input.inputs);
        scene.clear();

        for _ in 0..self.clock.advance(dt) {
            let inputs = mem::take(&mut self.pending);
            let outcome = self.session.step(&inputs);
            scene::queue_sounds(scene, &outcome.events, self.hooks);
            if outcome.control == Control::Quit {
                return FrameControl::Exit;
            }
        }

        scene::populate(scene, self.session.world(), self.session.phase());
        FrameControl::Continue
    }
}
