use tracing::trace;

use crate::engine::{RunStatistics, SimulationEngine};
use crate::error::ViewerError;
use crate::mapper::Viewport;
use crate::readouts::ReadoutSink;
use crate::renderer;
use crate::surface::DrawSurface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// One tick is queued for the next display refresh.
    Scheduled,
    /// Nothing queued.
    Idle,
}

/// Per-frame render routine plus the single pending-tick slot.
pub struct FrameDriver {
    state: LoopState,
    steps_per_frame: usize,
    ticks: u64,
}

impl FrameDriver {
    pub fn new(steps_per_frame: usize) -> Self {
        Self {
            state: LoopState::Idle,
            steps_per_frame,
            ticks: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn steps_per_frame(&self) -> usize {
        self.steps_per_frame
    }

    /// Completed ticks since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Consume the queued tick, if any. The host calls this once per
    /// display refresh and runs [`FrameDriver::tick`] when it returns true.
    pub fn take_scheduled(&mut self) -> bool {
        if self.state == LoopState::Scheduled {
            self.state = LoopState::Idle;
            true
        } else {
            false
        }
    }

    /// Clear, snapshot, step, draw, update readouts, then reschedule unless
    /// paused. The snapshot is taken before stepping, so drawn positions lag
    /// the engine by `steps_per_frame` steps.
    ///
    /// On error the driver stays `Idle`: a faulted loop does not advance
    /// until something re-enters it.
    pub fn tick<E, S, R>(
        &mut self,
        engine: &mut E,
        surface: &mut S,
        readouts: &mut R,
        viewport: &Viewport,
        paused: bool,
    ) -> Result<(), ViewerError>
    where
        E: SimulationEngine,
        S: DrawSurface,
        R: ReadoutSink,
    {
        self.state = LoopState::Idle;

        surface.clear_rect(0.0, 0.0, viewport.logical_width, viewport.logical_height);

        let world = engine.world();
        let mut generation = engine.generation();
        for _ in 0..self.steps_per_frame {
            generation = engine.step()?;
        }

        let radius = viewport.food_radius();
        for food in &world.foods {
            renderer::draw_food(surface, viewport.map(food.x, food.y), radius);
        }

        let size = viewport.bird_size();
        for (index, bird) in world.birds.iter().enumerate() {
            renderer::draw_agent(
                surface,
                viewport.map(bird.x, bird.y),
                size,
                bird.rotation,
                renderer::bird_color(index),
            );
        }

        readouts.update(&RunStatistics {
            generation,
            min_fitness: engine.min_fitness(),
            max_fitness: engine.max_fitness(),
            avg_fitness: engine.avg_fitness(),
        });

        self.ticks += 1;
        trace!(
            tick = self.ticks,
            generation,
            birds = world.birds.len(),
            foods = world.foods.len(),
            "frame drawn"
        );

        if !paused {
            self.state = LoopState::Scheduled;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use macroquad::prelude::*;

    use super::*;
    use crate::config;
    use crate::engine::testing::{EngineProbe, ScriptedEngine};
    use crate::engine::{BirdView, FoodView, WorldSnapshot};
    use crate::surface::testing::{DrawCall, RecordingSurface};

    #[derive(Default)]
    struct RecordingSink {
        updates: Vec<RunStatistics>,
    }

    impl ReadoutSink for RecordingSink {
        fn update(&mut self, stats: &RunStatistics) {
            self.updates.push(*stats);
        }
    }

    fn snapshot() -> WorldSnapshot {
        WorldSnapshot {
            foods: vec![FoodView { x: 0.5, y: 0.5 }],
            birds: vec![
                BirdView {
                    x: 0.25,
                    y: 0.5,
                    rotation: 0.0,
                },
                BirdView {
                    x: 0.75,
                    y: 0.5,
                    rotation: 1.0,
                },
            ],
        }
    }

    fn engine() -> (ScriptedEngine, Rc<RefCell<EngineProbe>>) {
        let probe = Rc::new(RefCell::new(EngineProbe::default()));
        (ScriptedEngine::new(probe.clone(), snapshot()), probe)
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0, 2.0)
    }

    #[test]
    fn three_ticks_step_three_times_and_report_last_generation() {
        let (mut engine, probe) = engine();
        let mut surface = RecordingSurface::default();
        let mut sink = RecordingSink::default();
        let mut driver = FrameDriver::new(1);

        for _ in 0..3 {
            driver.tick(&mut engine, &mut surface, &mut sink, &viewport(), false).unwrap();
        }

        assert_eq!(probe.borrow().steps, 3);
        assert_eq!(probe.borrow().world_reads, 3);
        assert_eq!(surface.clears(), 3);
        // one food and two birds per frame
        assert_eq!(surface.fills().len(), 9);
        assert_eq!(sink.updates.len(), 3);
        // two steps per generation: the third step lands in generation 1
        assert_eq!(sink.updates[2].generation, 1);
        assert_eq!(driver.ticks(), 3);
    }

    #[test]
    fn food_is_drawn_at_mapped_device_coordinates() {
        let (mut engine, _) = engine();
        let mut surface = RecordingSurface::default();
        let mut sink = RecordingSink::default();
        let mut driver = FrameDriver::new(1);

        driver.tick(&mut engine, &mut surface, &mut sink, &viewport(), false).unwrap();

        let arcs = surface.arcs();
        assert_eq!(arcs.len(), 1);
        assert_eq!(arcs[0].0, vec2(400.0, 300.0));
        assert!((arcs[0].1 - 4.0).abs() < 1e-5);
    }

    #[test]
    fn tick_clears_first_then_foods_then_birds() {
        let (mut engine, _) = engine();
        let mut surface = RecordingSurface::default();
        let mut sink = RecordingSink::default();
        let mut driver = FrameDriver::new(1);

        driver.tick(&mut engine, &mut surface, &mut sink, &viewport(), false).unwrap();

        assert_eq!(
            surface.calls[0],
            DrawCall::Clear {
                x: 0.0,
                y: 0.0,
                width: 800.0,
                height: 600.0
            }
        );
        assert_eq!(
            surface.fills(),
            vec![config::FOOD_COLOR, config::LEAD_BIRD_COLOR, config::BIRD_COLOR]
        );
        let noses = surface.move_tos();
        assert_eq!(noses.len(), 2);
        assert!((noses[0] - vec2(200.0, 300.0 + 1.5 * 8.0)).length() < 1e-4);
    }

    #[test]
    fn steps_per_frame_multiplies_engine_steps() {
        let (mut engine, probe) = engine();
        let mut surface = RecordingSurface::default();
        let mut sink = RecordingSink::default();
        let mut driver = FrameDriver::new(5);

        driver.tick(&mut engine, &mut surface, &mut sink, &viewport(), false).unwrap();

        assert_eq!(probe.borrow().steps, 5);
        assert_eq!(probe.borrow().world_reads, 1);
        assert_eq!(surface.clears(), 1);
    }

    #[test]
    fn paused_tick_does_not_reschedule() {
        let (mut engine, _) = engine();
        let mut surface = RecordingSurface::default();
        let mut sink = RecordingSink::default();
        let mut driver = FrameDriver::new(1);

        driver.tick(&mut engine, &mut surface, &mut sink, &viewport(), false).unwrap();
        assert_eq!(driver.state(), LoopState::Scheduled);
        assert!(driver.take_scheduled());
        assert!(!driver.take_scheduled());

        driver.tick(&mut engine, &mut surface, &mut sink, &viewport(), true).unwrap();
        assert_eq!(driver.state(), LoopState::Idle);
        assert!(!driver.take_scheduled());
    }

    #[test]
    fn engine_fault_halts_without_drawing_or_rescheduling() {
        let (mut engine, _) = engine();
        engine.fail_on_step = Some(1);
        let mut surface = RecordingSurface::default();
        let mut sink = RecordingSink::default();
        let mut driver = FrameDriver::new(1);

        let err = driver
            .tick(&mut engine, &mut surface, &mut sink, &viewport(), false)
            .unwrap_err();

        assert!(matches!(err, ViewerError::Engine(_)));
        assert_eq!(driver.state(), LoopState::Idle);
        // cleared before the step failed, nothing drawn after
        assert_eq!(surface.clears(), 1);
        assert!(surface.fills().is_empty());
        assert!(sink.updates.is_empty());
        assert_eq!(driver.ticks(), 0);
    }
}
