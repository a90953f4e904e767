//! Fixed-step run without a window.

use std::time::Instant;

use anyhow::Result;
use pond_core::Simulation;
use pond_metrics::FrameTimer;
use pond_services::Settings;

use crate::{log_metrics, metrics_due, FRAME_WINDOW};

pub fn run(settings: &Settings, mut sim: Simulation) -> Result<()> {
    let runtime = &settings.runtime;
    tracing::info!(
        frames = runtime.headless_frames,
        dt = runtime.fixed_delta_secs,
        "running headless"
    );

    let mut timer = FrameTimer::new(FRAME_WINDOW);
    let mut conversions = 0;
    let mut absorbed = 0;
    for _ in 0..runtime.headless_frames {
        let started = Instant::now();
        let report = timer.time_step(|| sim.step(runtime.fixed_delta_secs));
        timer.record_frame(started.elapsed());

        conversions += report.conversions;
        absorbed += report.absorbed;
        if metrics_due(sim.frame(), runtime.metrics_log_interval) {
            log_metrics(&sim, &timer);
        }
    }

    let dead = sim.fish().iter().filter(|f| f.is_dead()).count();
    tracing::info!(
        frames = sim.frame(),
        elapsed_secs = sim.time().elapsed_secs(),
        conversions,
        absorbed,
        nitrates = sim.nitrates().len(),
        ammonium = sim.ammonium().len(),
        dead_fish = dead,
        "headless run finished"
    );
    Ok(())
}
