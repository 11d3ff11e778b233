use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use macroquad::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod engine;
mod error;
mod frame;
mod headless;
mod lifecycle;
mod mapper;
mod readouts;
mod renderer;
mod surface;
mod ui;

use config::ViewerConfig;
use engine::forage;
use error::ViewerError;
use lifecycle::Lifecycle;
use mapper::Viewport;
use surface::CanvasSurface;
use ui::UiState;

#[derive(Parser, Debug)]
#[command(name = "flockview")]
#[command(about = "Real-time viewer for a foraging bird simulation")]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulation steps advanced per rendered frame
    #[arg(long)]
    steps_per_frame: Option<usize>,

    /// Seed for the simulation seed stream (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Start with the render loop paused
    #[arg(long)]
    paused: bool,

    /// Run TICKS frames without a window and print a JSON report
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,

    /// Generations to train before a headless run
    #[arg(long, default_value_t = 0, requires = "headless")]
    train: usize,

    /// Write the headless report to this file instead of stdout
    #[arg(long, requires = "headless")]
    report: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> Result<ViewerConfig, ViewerError> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)?,
            None => ViewerConfig::default(),
        };
        if let Some(steps) = self.steps_per_frame {
            config.steps_per_frame = steps;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.paused {
            config.start_paused = true;
        }
        config.validate()?;
        Ok(config)
    }
}

fn window_conf(config: &ViewerConfig) -> Conf {
    Conf {
        window_title: "Flockview".to_string(),
        window_width: (config.viewport_width + config::CONTROL_PANEL_WIDTH) as i32,
        window_height: config.viewport_height as i32,
        window_resizable: false,
        high_dpi: true,
        ..Default::default()
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flockview=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let seed = config.seed.unwrap_or_else(::rand::random);

    if let Some(ticks) = cli.headless {
        let outcome = headless::run(&config, seed, ticks, cli.train)
            .and_then(|report| headless::write_report(&report, cli.report.as_deref()));
        return match outcome {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("headless run failed: {e}");
                ExitCode::FAILURE
            }
        };
    }

    macroquad::Window::from_config(window_conf(&config), run_viewer(config, seed));
    ExitCode::SUCCESS
}

async fn run_viewer(config: ViewerConfig, seed: u64) {
    if let Err(e) = viewer_loop(config, seed).await {
        error!("viewer stopped: {e}");
        std::process::exit(1);
    }
}

async fn viewer_loop(config: ViewerConfig, seed: u64) -> Result<(), ViewerError> {
    let viewport = Viewport::new(
        config.viewport_width,
        config.viewport_height,
        screen_dpi_scale(),
    );
    let mut surface = CanvasSurface::new(viewport)?;
    let (physical_width, physical_height) = viewport.physical_size();
    info!(
        width = viewport.logical_width,
        height = viewport.logical_height,
        pixel_ratio = viewport.pixel_ratio,
        physical_width,
        physical_height,
        seed,
        "viewport ready"
    );

    let mut lifecycle = Lifecycle::new(
        forage::factory(config.clone(), seed),
        viewport,
        config.steps_per_frame,
        config.start_paused,
    );
    let mut ui_state = UiState::new(config.start_paused);

    surface.bind();
    report_fault(lifecycle.bootstrap(&mut surface));
    surface.unbind();

    loop {
        // Queued tick first, then whatever the panel produced last refresh.
        surface.bind();
        report_fault(lifecycle.on_frame(&mut surface).map(|_| ()));
        for command in ui_state.take_commands() {
            report_fault(lifecycle.apply(command, &mut surface));
        }
        surface.unbind();

        clear_background(config::BG_COLOR);
        surface.present(0.0, 0.0);
        ui::draw_ui(&mut ui_state, lifecycle.readouts());

        next_frame().await;
    }
}

/// Faults stop the loop; the window stays up showing whatever the buffer holds.
fn report_fault(result: Result<(), ViewerError>) {
    if let Err(e) = result {
        error!("render loop halted: {e}");
    }
}
