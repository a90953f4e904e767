//! Pond Runtime
//!
//! Binary that loads settings and runs the pond either in a window or
//! headless for a fixed number of frames.

mod app;
mod headless;

use anyhow::Result;
use pond_core::Simulation;
use pond_metrics::FrameTimer;
use pond_services::Settings;

/// Frames averaged for the fps readout.
const FRAME_WINDOW: usize = 120;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Pond Nitrogen Cycle v{}", pond_core::VERSION);
    let (settings, source) = Settings::discover()?;
    if let Some(path) = source {
        tracing::info!(path = %path.display(), "using settings file");
    }

    let sim = Simulation::new(settings.simulation.clone())?;
    if settings.runtime.headless {
        headless::run(&settings, sim)
    } else {
        app::run(settings, sim)
    }
}

fn log_metrics(sim: &Simulation, timer: &FrameTimer) {
    let stats = timer.stats();
    tracing::info!(
        frame = sim.frame(),
        fps = %format!("{:.1}", stats.fps),
        frame_ms = %format!("{:.2}", stats.frame_ms),
        min_ms = %format!("{:.2}", stats.min_frame_ms),
        max_ms = %format!("{:.2}", stats.max_frame_ms),
        step_ms = %format!("{:.3}", stats.step_ms),
        step_share = %format!("{:.0}%", stats.step_share * 100.0),
        counters = %sim.counter().summary(),
        "metrics"
    );
    for (system, timing) in sim.profiler().iter() {
        tracing::debug!(
            system,
            calls = timing.calls,
            avg_us = timing.average().as_micros() as u64,
            "system timing"
        );
    }
}

fn metrics_due(frame: u64, interval: u64) -> bool {
    interval > 0 && frame > 0 && frame % interval == 0
}
