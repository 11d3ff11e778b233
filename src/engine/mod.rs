//! Contract between the viewer and the simulation it renders.

pub mod forage;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("bird {index} left the finite plane at ({x}, {y})")]
    NonFinite { index: usize, x: f32, y: f32 },
    #[error("{0}")]
    Internal(String),
}

/// Food position in normalized world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FoodView {
    pub x: f32,
    pub y: f32,
}

/// Bird position in normalized world space plus heading in radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BirdView {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
}

/// Point-in-time read of everything drawable. Re-fetched every tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub foods: Vec<FoodView>,
    pub birds: Vec<BirdView>,
}

/// Generation counter plus fitness aggregates of the last completed
/// generation. Fitness values are NaN until one generation has completed.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct RunStatistics {
    pub generation: u32,
    pub min_fitness: f32,
    pub max_fitness: f32,
    pub avg_fitness: f32,
}

impl RunStatistics {
    pub fn empty(generation: u32) -> Self {
        Self {
            generation,
            min_fitness: f32::NAN,
            max_fitness: f32::NAN,
            avg_fitness: f32::NAN,
        }
    }

    pub fn from_fitness(generation: u32, fitness: &[f32]) -> Self {
        if fitness.is_empty() {
            return Self::empty(generation);
        }
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0;
        for &f in fitness {
            min = min.min(f);
            max = max.max(f);
            sum += f;
        }
        Self {
            generation,
            min_fitness: min,
            max_fitness: max,
            avg_fitness: sum / fitness.len() as f32,
        }
    }
}

pub trait SimulationEngine {
    /// Advances by one discrete step and returns the current generation.
    fn step(&mut self) -> Result<u32, EngineError>;

    fn world(&self) -> WorldSnapshot;

    /// Runs the current generation to completion and returns its statistics.
    fn train(&mut self) -> Result<RunStatistics, EngineError>;

    fn generation(&self) -> u32;
    fn min_fitness(&self) -> f32;
    fn max_fitness(&self) -> f32;
    fn avg_fitness(&self) -> f32;

    fn statistics(&self) -> RunStatistics {
        RunStatistics {
            generation: self.generation(),
            min_fitness: self.min_fitness(),
            max_fitness: self.max_fitness(),
            avg_fitness: self.avg_fitness(),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Counters shared between a test and the engines its factory creates.
    #[derive(Debug, Default)]
    pub struct EngineProbe {
        pub created: usize,
        pub steps: usize,
        pub world_reads: usize,
        pub trains: usize,
    }

    /// Deterministic engine: generation advances every `steps_per_generation`
    /// steps, fitness equals the number of completed generations.
    pub struct ScriptedEngine {
        pub probe: Rc<RefCell<EngineProbe>>,
        pub snapshot: WorldSnapshot,
        pub steps_per_generation: u32,
        pub fail_on_step: Option<usize>,
        steps: u32,
        generation: u32,
        last: RunStatistics,
    }

    impl ScriptedEngine {
        pub fn new(probe: Rc<RefCell<EngineProbe>>, snapshot: WorldSnapshot) -> Self {
            probe.borrow_mut().created += 1;
            Self {
                probe,
                snapshot,
                steps_per_generation: 2,
                fail_on_step: None,
                steps: 0,
                generation: 0,
                last: RunStatistics::empty(0),
            }
        }

        fn complete_generation(&mut self) {
            self.generation += 1;
            let g = self.generation as f32;
            self.last = RunStatistics::from_fitness(self.generation, &[g, g * 2.0, g * 3.0]);
            self.steps = 0;
        }
    }

    impl SimulationEngine for ScriptedEngine {
        fn step(&mut self) -> Result<u32, EngineError> {
            let total = {
                let mut probe = self.probe.borrow_mut();
                probe.steps += 1;
                probe.steps
            };
            if self.fail_on_step == Some(total) {
                return Err(EngineError::Internal("scripted fault".into()));
            }
            self.steps += 1;
            if self.steps >= self.steps_per_generation {
                self.complete_generation();
            }
            Ok(self.generation)
        }

        fn world(&self) -> WorldSnapshot {
            self.probe.borrow_mut().world_reads += 1;
            self.snapshot.clone()
        }

        fn train(&mut self) -> Result<RunStatistics, EngineError> {
            self.probe.borrow_mut().trains += 1;
            self.complete_generation();
            Ok(self.last)
        }

        fn generation(&self) -> u32 {
            self.generation
        }

        fn min_fitness(&self) -> f32 {
            self.last.min_fitness
        }

        fn max_fitness(&self) -> f32 {
            self.last.max_fitness
        }

        fn avg_fitness(&self) -> f32 {
            self.last.avg_fitness
        }
    }
}
