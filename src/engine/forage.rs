use ::rand::{Rng, SeedableRng};
use macroquad::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::{BirdView, EngineError, FoodView, RunStatistics, SimulationEngine, WorldSnapshot};
use crate::config::{self, ViewerConfig};

#[derive(Clone, Debug)]
struct Bird {
    pos: Vec2,
    rotation: f32,
    speed: f32,
    satiation: u32,
}

impl Bird {
    fn random(rng: &mut ChaCha8Rng) -> Self {
        Self {
            pos: vec2(rng.gen(), rng.gen()),
            rotation: rng.gen_range(0.0..std::f32::consts::TAU),
            speed: config::BIRD_INITIAL_SPEED,
            satiation: 0,
        }
    }

    /// Unit heading; rotation 0 moves along +y.
    fn heading(&self) -> Vec2 {
        vec2(-self.rotation.sin(), self.rotation.cos())
    }
}

/// Stand-in engine: birds wander with bounded random steering over a
/// toroidal unit square and respawn any food they touch.
pub struct ForageSim {
    birds: Vec<Bird>,
    foods: Vec<Vec2>,
    rng: ChaCha8Rng,
    age: usize,
    generation_length: usize,
    generation: u32,
    last: RunStatistics,
}

impl ForageSim {
    pub fn new(seed: u64, bird_count: usize, food_count: usize, generation_length: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let birds = (0..bird_count).map(|_| Bird::random(&mut rng)).collect();
        let foods = (0..food_count)
            .map(|_| vec2(rng.gen(), rng.gen()))
            .collect();

        Self {
            birds,
            foods,
            rng,
            age: 0,
            generation_length,
            generation: 0,
            last: RunStatistics::empty(0),
        }
    }

    pub fn from_config(config: &ViewerConfig, seed: u64) -> Self {
        Self::new(seed, config.birds, config.foods, config.generation_length)
    }

    fn steer(&mut self) {
        for bird in &mut self.birds {
            let turn = self
                .rng
                .gen_range(-config::BIRD_TURN_JITTER..=config::BIRD_TURN_JITTER);
            let accel = self
                .rng
                .gen_range(-config::BIRD_SPEED_JITTER..=config::BIRD_SPEED_JITTER);

            bird.rotation = (bird.rotation + turn).rem_euclid(std::f32::consts::TAU);
            bird.speed = (bird.speed + accel).clamp(config::BIRD_SPEED_MIN, config::BIRD_SPEED_MAX);
        }
    }

    fn integrate(&mut self) -> Result<(), EngineError> {
        for (index, bird) in self.birds.iter_mut().enumerate() {
            let pos = bird.pos + bird.heading() * bird.speed;
            if !pos.is_finite() {
                return Err(EngineError::NonFinite {
                    index,
                    x: pos.x,
                    y: pos.y,
                });
            }
            bird.pos = vec2(pos.x.rem_euclid(1.0), pos.y.rem_euclid(1.0));
        }
        Ok(())
    }

    fn process_collisions(&mut self) {
        for bird in &mut self.birds {
            for food in &mut self.foods {
                if bird.pos.distance(*food) <= config::EAT_RADIUS {
                    bird.satiation += 1;
                    *food = vec2(self.rng.gen(), self.rng.gen());
                }
            }
        }
    }

    /// Closes the running generation: records its fitness, reseeds the
    /// population and food, and bumps the counter.
    fn evolve(&mut self) -> RunStatistics {
        let fitness: Vec<f32> = self.birds.iter().map(|b| b.satiation as f32).collect();
        self.generation += 1;
        self.last = RunStatistics::from_fitness(self.generation, &fitness);

        for bird in &mut self.birds {
            *bird = Bird::random(&mut self.rng);
        }
        for food in &mut self.foods {
            *food = vec2(self.rng.gen(), self.rng.gen());
        }
        self.age = 0;

        self.last
    }

    fn advance(&mut self) -> Result<Option<RunStatistics>, EngineError> {
        self.steer();
        self.integrate()?;
        self.process_collisions();

        self.age += 1;
        if self.age >= self.generation_length {
            return Ok(Some(self.evolve()));
        }
        Ok(None)
    }
}

/// Engine factory for the viewer. Every call builds a fresh simulation from
/// the next seed of a stream rooted at `seed`, so restarts differ while a
/// whole session stays reproducible.
pub fn factory(config: ViewerConfig, seed: u64) -> impl FnMut() -> ForageSim {
    let mut seeds = ChaCha8Rng::seed_from_u64(seed);
    move || ForageSim::from_config(&config, seeds.gen())
}

impl SimulationEngine for ForageSim {
    fn step(&mut self) -> Result<u32, EngineError> {
        self.advance()?;
        Ok(self.generation)
    }

    fn world(&self) -> WorldSnapshot {
        WorldSnapshot {
            foods: self
                .foods
                .iter()
                .map(|f| FoodView { x: f.x, y: f.y })
                .collect(),
            birds: self
                .birds
                .iter()
                .map(|b| BirdView {
                    x: b.pos.x,
                    y: b.pos.y,
                    rotation: b.rotation,
                })
                .collect(),
        }
    }

    fn train(&mut self) -> Result<RunStatistics, EngineError> {
        if self.generation_length == 0 {
            return Err(EngineError::Internal("generation length is zero".into()));
        }
        loop {
            if let Some(stats) = self.advance()? {
                return Ok(stats);
            }
        }
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
