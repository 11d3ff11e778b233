use tracing::{debug, info};

use crate::engine::{RunStatistics, SimulationEngine};
use crate::error::ViewerError;
use crate::frame::{FrameDriver, LoopState};
use crate::mapper::Viewport;
use crate::readouts::{ReadoutSink, StatusReadouts};
use crate::surface::DrawSurface;

/// User-triggered operations coming from the control panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlCommand {
    SetPaused(bool),
    Restart,
    Train,
}

/// Owns the live simulation, the pause flag and the frame driver. Every
/// entry point runs to completion on the host thread, so ticks, restarts and
/// trains never interleave.
pub struct Lifecycle<E: SimulationEngine> {
    engine: E,
    factory: Box<dyn FnMut() -> E>,
    driver: FrameDriver,
    viewport: Viewport,
    readouts: StatusReadouts,
    paused: bool,
}

impl<E: SimulationEngine> Lifecycle<E> {
    pub fn new(
        mut factory: impl FnMut() -> E + 'static,
        viewport: Viewport,
        steps_per_frame: usize,
        paused: bool,
    ) -> Self {
        let engine = factory();
        Self {
            engine,
            factory: Box::new(factory),
            driver: FrameDriver::new(steps_per_frame),
            viewport,
            readouts: StatusReadouts::default(),
            paused,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn readouts(&self) -> &StatusReadouts {
        &self.readouts
    }

    pub fn ticks(&self) -> u64 {
        self.driver.ticks()
    }

    /// Run the first tick right away; it schedules the next one unless the
    /// viewer starts paused.
    pub fn bootstrap<S: DrawSurface>(&mut self, surface: &mut S) -> Result<(), ViewerError> {
        info!(
            steps_per_frame = self.driver.steps_per_frame(),
            paused = self.paused,
            "render loop starting"
        );
        self.enter(surface)
    }

    /// Host hook for one display refresh. Runs the queued tick, if any, and
    /// reports whether one ran.
    pub fn on_frame<S: DrawSurface>(&mut self, surface: &mut S) -> Result<bool, ViewerError> {
        if !self.driver.take_scheduled() {
            return Ok(false);
        }
        self.run_tick(surface)?;
        Ok(true)
    }

    pub fn apply<S: DrawSurface>(
        &mut self,
        command: ControlCommand,
        surface: &mut S,
    ) -> Result<(), ViewerError> {
        match command {
            ControlCommand::SetPaused(value) => self.set_paused(value, surface),
            ControlCommand::Restart => {
                self.restart();
                Ok(())
            }
            ControlCommand::Train => self.train().map(|_| ()),
        }
    }

    /// Replace the simulation with a fresh one. Loop state is left alone:
    /// a running loop picks the new instance up on its next tick, a paused
    /// one keeps it inert until resumed.
    pub fn restart(&mut self) {
        self.engine = (self.factory)();
        info!(state = ?self.driver.state(), "simulation restarted");
    }

    /// Pausing only suppresses the next reschedule; an already queued tick
    /// still runs. Resuming from `Idle` re-enters the loop immediately.
    pub fn set_paused<S: DrawSurface>(
        &mut self,
        value: bool,
        surface: &mut S,
    ) -> Result<(), ViewerError> {
        let was_paused = self.paused;
        self.paused = value;

        match (was_paused, value) {
            (false, true) => {
                info!("render loop paused");
                Ok(())
            }
            (true, false) => {
                info!("render loop resumed");
                if self.driver.state() == LoopState::Idle {
                    self.enter(surface)
                } else {
                    // the queued tick becomes the live loop again
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// Finish the running generation synchronously and publish its summary.
    pub fn train(&mut self) -> Result<RunStatistics, ViewerError> {
        let stats = self.engine.train()?;
        self.readouts.update(&stats);
        info!(
            generation = stats.generation,
            min_fitness = stats.min_fitness,
            max_fitness = stats.max_fitness,
            avg_fitness = stats.avg_fitness,
            "generation trained"
        );
        Ok(stats)
    }

    fn enter<S: DrawSurface>(&mut self, surface: &mut S) -> Result<(), ViewerError> {
        debug!(tick = self.driver.ticks() + 1, "entering render loop");
        self.run_tick(surface)
    }

    fn run_tick<S: DrawSurface>(&mut self, surface: &mut S) -> Result<(), ViewerError> {
        self.driver.tick(
            &mut self.engine,
            surface,
            &mut self.readouts,
            &self.viewport,
            self.paused,
        )
    }
}
