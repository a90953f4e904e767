//! Accumulated wall time per simulation system

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemTiming {
    pub total: Duration,
    pub calls: u64,
}

impl SystemTiming {
    pub fn average(&self) -> Duration {
        if self.calls == 0 {
            return Duration::ZERO;
        }
        self.total / self.calls as u32
    }
}

#[derive(Debug, Clone, Default)]
pub struct SystemProfiler {
    timings: BTreeMap<&'static str, SystemTiming>,
}

impl SystemProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_system<F, R>(&mut self, name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        let timing = self.timings.entry(name).or_default();
        timing.total += elapsed;
        timing.calls += 1;
        result
    }

    pub fn get_timing(&self, name: &str) -> Duration {
        self.timings.get(name).map(|t| t.total).unwrap_or(Duration::ZERO)
    }

    pub fn calls(&self, name: &str) -> u64 {
        self.timings.get(name).map(|t| t.calls).unwrap_or(0)
    }

    pub fn reset(&mut self) {
        self.timings.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, SystemTiming)> + '_ {
        self.timings.iter().map(|(name, timing)| (*name, *timing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calls_are_counted() {
        let mut profiler = SystemProfiler::new();
        let value = profiler.time_system("wave", || 7);
        profiler.time_system("wave", || ());
        assert_eq!(value, 7);
        assert_eq!(profiler.calls("wave"), 2);
        assert_eq!(profiler.calls("fish"), 0);
        assert_eq!(profiler.get_timing("fish"), Duration::ZERO);
    }
}
