//! Pond Metrics - frame timing, per-system profiling and event counters
//!
//! Everything here compiles to no-op stubs unless the `metrics` feature is
//! enabled, so release builds of the simulation carry no instrumentation.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable metrics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use pond_metrics::{time_scope, SystemProfiler};
//!
//! let mut profiler = SystemProfiler::new();
//! time_scope!(profiler, "wave", {
//!     wave.update(dt);
//! });
//! ```

#[cfg(feature = "metrics")]
mod counter;
#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod system_profiler;
#[cfg(feature = "metrics")]
mod window;

#[cfg(feature = "metrics")]
pub use counter::Counter;
#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use system_profiler::{SystemProfiler, SystemTiming};
#[cfg(feature = "metrics")]
pub use window::DurationWindow;

/// Rolling host-loop figures, all zero until samples arrive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub fps: f64,
    pub frame_ms: f64,
    pub min_frame_ms: f64,
    pub max_frame_ms: f64,
    /// Mean time inside the simulation step.
    pub step_ms: f64,
    /// Fraction of the frame spent stepping, in `[0, 1]`.
    pub step_share: f64,
}

// ============================================================================
// Macros for conditional compilation
// ============================================================================

/// Execute code only when metrics are enabled
#[macro_export]
macro_rules! metrics {
    ($($tt:tt)*) => {
        #[cfg(feature = "metrics")]
        {
            $($tt)*
        }
    };
}

/// Time a statement block under `name` (plain block when metrics disabled)
#[macro_export]
macro_rules! time_scope {
    ($profiler:expr, $name:expr, $body:block) => {
        #[cfg(feature = "metrics")]
        {
            $profiler.time_system($name, || $body)
        }
        #[cfg(not(feature = "metrics"))]
        {
            $body
        }
    };
}

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Clone, Default)]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_window: usize) -> Self { Self }
    pub fn record_frame(&mut self, _frame_time: std::time::Duration) {}
    pub fn time_step<F, R>(&mut self, step: F) -> R where F: FnOnce() -> R { step() }
    pub fn stats(&self) -> FrameStats { FrameStats::default() }
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Clone, Default)]
pub struct Counter;

#[cfg(not(feature = "metrics"))]
impl Counter {
    pub fn new() -> Self { Self }
    pub fn increment(&mut self, _name: &'static str, _value: u64) {}
    pub fn get(&self, _name: &str) -> u64 { 0 }
    pub fn reset_all(&mut self) {}
    pub fn summary(&self) -> String { String::new() }
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Clone, Default)]
pub struct SystemProfiler;

#[cfg(not(feature = "metrics"))]
impl SystemProfiler {
    pub fn new() -> Self { Self }
    pub fn time_system<F, R>(&mut self, _name: &'static str, f: F) -> R where F: FnOnce() -> R { f() }
    pub fn get_timing(&self, _name: &str) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn calls(&self, _name: &str) -> u64 { 0 }
    pub fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_types_construct_in_any_build() {
        let mut timer = super::FrameTimer::new(60);
        assert_eq!(timer.time_step(|| 3), 3);
        let mut counter = super::Counter::new();
        let mut profiler = super::SystemProfiler::new();
        counter.increment("conversions", 1);
        let doubled = profiler.time_system("wave", || 21 * 2);
        assert_eq!(doubled, 42);
    }
}
