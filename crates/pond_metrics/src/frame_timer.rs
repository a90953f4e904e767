//! Host-loop timing: wall time per presented frame next to the time spent
//! inside the simulation step.

use super::window::DurationWindow;
use crate::FrameStats;
use std::time::{Duration, Instant};

pub struct FrameTimer {
    frames: DurationWindow,
    steps: DurationWindow,
}

impl FrameTimer {
    pub fn new(window: usize) -> Self {
        Self {
            frames: DurationWindow::new(window),
            steps: DurationWindow::new(window),
        }
    }

    /// Wall time between two presented frames.
    pub fn record_frame(&mut self, frame_time: Duration) {
        self.frames.push(frame_time);
    }

    /// Run one simulation step and keep its duration.
    pub fn time_step<F, R>(&mut self, step: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = step();
        self.steps.push(start.elapsed());
        result
    }

    pub fn stats(&self) -> FrameStats {
        let frame = self.frames.mean().as_secs_f64();
        let step = self.steps.mean().as_secs_f64();
        let (min, max) = self.frames.range();
        FrameStats {
            fps: if frame > 0.0 { 1.0 / frame } else { 0.0 },
            frame_ms: frame * 1000.0,
            min_frame_ms: min.as_secs_f64() * 1000.0,
            max_frame_ms: max.as_secs_f64() * 1000.0,
            step_ms: step * 1000.0,
            step_share: if frame > 0.0 { (step / frame).min(1.0) } else { 0.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_frames_drive_fps() {
        let mut timer = FrameTimer::new(4);
        for value in [20, 20, 20, 20] {
            timer.record_frame(Duration::from_millis(value));
        }
        let stats = timer.stats();
        assert!((stats.fps - 50.0).abs() < 1e-9);
        assert!((stats.min_frame_ms - 20.0).abs() < 1e-9);
        assert!((stats.max_frame_ms - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_time_is_a_share_of_the_frame() {
        let mut timer = FrameTimer::new(8);
        let value = timer.time_step(|| {
            std::thread::sleep(Duration::from_millis(2));
            7
        });
        assert_eq!(value, 7);
        timer.record_frame(Duration::from_millis(1000));

        let stats = timer.stats();
        assert!(stats.step_ms >= 2.0);
        assert!(stats.step_share > 0.0 && stats.step_share < 1.0);
    }

    #[test]
    fn test_no_frames_means_zero_fps() {
        let mut timer = FrameTimer::new(8);
        timer.time_step(|| ());
        let stats = timer.stats();
        assert_eq!(stats.fps, 0.0);
        assert_eq!(stats.step_share, 0.0);
    }
}
