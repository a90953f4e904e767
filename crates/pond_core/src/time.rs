//! Simulation clock
//!
//! The host injects the frame delta; nothing in the simulation reads the
//! wall clock. Frame-count based processes (drift, decay, wait timers)
//! advance once per `step`, time based ones (waves, fish wander, bubble
//! twinkle, flagella) read the accumulated seconds.

/// Nominal display refresh used by headless runs and tests.
pub const DEFAULT_FRAME_RATE_HZ: u32 = 60;
pub const DEFAULT_FRAME_DELTA_SECS: f32 = 1.0 / DEFAULT_FRAME_RATE_HZ as f32;

/// Simulation time tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationTime {
    frame_count: u64,
    elapsed_secs: f64,
    last_delta: f32,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            elapsed_secs: 0.0,
            last_delta: 0.0,
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Accumulated seconds across all completed frames.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn last_delta(&self) -> f32 {
        self.last_delta
    }

    /// Close the current frame. Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, delta_secs: f32) {
        let delta = if delta_secs.is_finite() {
            delta_secs.max(0.0)
        } else {
            0.0
        };
        self.frame_count += 1;
        self.elapsed_secs += delta as f64;
        self.last_delta = delta;
    }
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let mut time = SimulationTime::new();
        time.advance(0.5);
        time.advance(0.25);
        assert_eq!(time.frame_count(), 2);
        assert!((time.elapsed_secs() - 0.75).abs() < 1e-9);
        assert_eq!(time.last_delta(), 0.25);
    }

    #[test]
    fn test_bad_delta_is_ignored() {
        let mut time = SimulationTime::new();
        time.advance(f32::NAN);
        time.advance(-1.0);
        assert_eq!(time.frame_count(), 2);
        assert_eq!(time.elapsed_secs(), 0.0);
    }
}
