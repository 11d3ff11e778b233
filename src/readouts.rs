use crate::engine::RunStatistics;

/// Shown for fitness values that have no defined value yet.
pub const UNDEFINED_FITNESS: &str = "N/A";

pub fn format_fitness(value: f32) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        UNDEFINED_FITNESS.to_string()
    }
}

/// Receiver of the four textual readouts written at the end of each tick.
pub trait ReadoutSink {
    fn update(&mut self, stats: &RunStatistics);
}

/// Label text as displayed by the control panel.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StatusReadouts {
    pub generation: String,
    pub min_fitness: String,
    pub max_fitness: String,
    pub avg_fitness: String,
}

impl Default for StatusReadouts {
    fn default() -> Self {
        let mut readouts = Self {
            generation: String::new(),
            min_fitness: String::new(),
            max_fitness: String::new(),
            avg_fitness: String::new(),
        };
        readouts.update(&RunStatistics::empty(0));
        readouts
    }
}

impl ReadoutSink for StatusReadouts {
    fn update(&mut self, stats: &RunStatistics) {
        self.generation = format!("Generation: {}", stats.generation);
        self.min_fitness = format!("Minimum Fitness: {}", format_fitness(stats.min_fitness));
        self.max_fitness = format!("Maximum Fitness: {}", format_fitness(stats.max_fitness));
        self.avg_fitness = format!("Average Fitness: {}", format_fitness(stats.avg_fitness));
    }
}
