//! Windowless runs of the render loop, for smoke checks and CI.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::ViewerConfig;
use crate::engine::{forage, RunStatistics, SimulationEngine};
use crate::error::ViewerError;
use crate::lifecycle::Lifecycle;
use crate::mapper::Viewport;
use crate::readouts::StatusReadouts;
use crate::surface::CountingSurface;

#[derive(Debug, Clone, Serialize)]
pub struct HeadlessReport {
    pub seed: u64,
    pub steps_per_frame: usize,
    pub ticks: u64,
    pub clears: u64,
    pub fills: u64,
    pub birds: usize,
    pub foods: usize,
    pub trains: Vec<RunStatistics>,
    pub final_statistics: RunStatistics,
    pub readouts: StatusReadouts,
}

/// Train `trains` generations, then drive `ticks` frames through the same
/// lifecycle the window uses, drawing into a counting surface.
pub fn run(
    config: &ViewerConfig,
    seed: u64,
    ticks: u64,
    trains: usize,
) -> Result<HeadlessReport, ViewerError> {
    let viewport = Viewport::new(config.viewport_width, config.viewport_height, 1.0);
    let mut lifecycle = Lifecycle::new(
        forage::factory(config.clone(), seed),
        viewport,
        config.steps_per_frame,
        false,
    );
    let mut surface = CountingSurface::default();

    let mut summaries = Vec::with_capacity(trains);
    for _ in 0..trains {
        summaries.push(lifecycle.train()?);
    }

    if ticks > 0 {
        lifecycle.bootstrap(&mut surface)?;
        while lifecycle.ticks() < ticks {
            if !lifecycle.on_frame(&mut surface)? {
                break;
            }
        }
    }

    let world = lifecycle.engine().world();
    info!(
        ticks = lifecycle.ticks(),
        generation = lifecycle.engine().generation(),
        "headless run finished"
    );

    Ok(HeadlessReport {
        seed,
        steps_per_frame: config.steps_per_frame,
        ticks: lifecycle.ticks(),
        clears: surface.clears,
        fills: surface.fills,
        birds: world.birds.len(),
        foods: world.foods.len(),
        trains: summaries,
        final_statistics: lifecycle.engine().statistics(),
        readouts: lifecycle.readouts().clone(),
    })
}

/// Write the report as pretty JSON to `path`, or to stdout when absent.
pub fn write_report(report: &HeadlessReport, path: Option<&Path>) -> Result<(), ViewerError> {
    let json = serde_json::to_string_pretty(report)?;
    match path {
        Some(path) => {
            std::fs::write(path, json)?;
            info!(path = %path.display(), "headless report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> ViewerConfig {
        ViewerConfig {
            birds: 5,
            foods: 7,
            generation_length: 20,
            ..ViewerConfig::default()
        }
    }

    #[test]
    fn every_tick_clears_once_and_fills_every_primitive() {
        let report = run(&small_config(), 3, 10, 0).unwrap();

        assert_eq!(report.ticks, 10);
        assert_eq!(report.clears, 10);
        assert_eq!(report.fills, 10 * (5 + 7));
        assert!(report.trains.is_empty());
    }

    #[test]
    fn trains_are_reported_in_order() {
        let report = run(&small_config(), 3, 1, 2).unwrap();

        assert_eq!(report.trains.len(), 2);
        assert_eq!(report.trains[0].generation, 1);
        assert_eq!(report.trains[1].generation, 2);
        assert_eq!(report.readouts.generation, "Generation: 2");
        assert_eq!(report.final_statistics.generation, 2);
        assert_eq!(
            report.final_statistics.max_fitness,
            report.trains[1].max_fitness
        );
    }

    #[test]
    fn zero_ticks_draws_nothing() {
        let report = run(&small_config(), 3, 0, 0).unwrap();
        assert_eq!(report.ticks, 0);
        assert_eq!(report.clears, 0);
        assert_eq!(report.readouts.min_fitness, "Minimum Fitness: N/A");
    }

    #[test]
    fn report_serializes_to_json() {
        let report = run(&small_config(), 3, 1, 0).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ticks"], 1);
        assert_eq!(json["readouts"]["generation"], "Generation: 0");
    }

    #[test]
    fn report_is_written_to_file() {
        let report = run(&small_config(), 4, 2, 0).unwrap();
        let path = std::env::temp_dir().join(format!("flockview_report_{}.json", std::process::id()));

        write_report(&report, Some(&path)).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["seed"], 4);

        let _ = std::fs::remove_file(path);
    }
}
