//! Named event counters (conversions, attachments, fish deaths, ...)

use std::collections::BTreeMap;

/// Event totals keyed by a static name. Ordered so log lines are stable.
#[derive(Debug, Clone, Default)]
pub struct Counter {
    counts: BTreeMap<&'static str, u64>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, name: &'static str, value: u64) {
        if value == 0 {
            return;
        }
        *self.counts.entry(name).or_insert(0) += value;
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn reset_all(&mut self) {
        self.counts.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.counts.iter().map(|(name, count)| (*name, *count))
    }

    /// `name=count` pairs joined by spaces.
    pub fn summary(&self) -> String {
        self.iter()
            .map(|(name, count)| format!("{name}={count}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut counter = Counter::new();
        counter.increment("conversions", 2);
        counter.increment("conversions", 1);
        counter.increment("fish_deaths", 0);
        assert_eq!(counter.get("conversions"), 3);
        assert_eq!(counter.get("fish_deaths"), 0);
        assert_eq!(counter.summary(), "conversions=3");
        counter.reset_all();
        assert_eq!(counter.get("conversions"), 0);
    }
}
