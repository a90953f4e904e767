//! Rolling window of durations with an O(1) mean

use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DurationWindow {
    samples: VecDeque<Duration>,
    capacity: usize,
    total: Duration,
}

impl DurationWindow {
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            total: Duration::ZERO,
        }
    }

    pub fn push(&mut self, sample: Duration) {
        if self.samples.len() == self.capacity {
            if let Some(oldest) = self.samples.pop_front() {
                self.total -= oldest;
            }
        }
        self.total += sample;
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<Duration> {
        self.samples.back().copied()
    }

    pub fn mean(&self) -> Duration {
        match self.samples.len() {
            0 => Duration::ZERO,
            n => self.total / n as u32,
        }
    }

    /// `(min, max)`, both zero while empty.
    pub fn range(&self) -> (Duration, Duration) {
        let mut iter = self.samples.iter().copied();
        let Some(first) = iter.next() else {
            return (Duration::ZERO, Duration::ZERO);
        };
        iter.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_oldest_sample_leaves_the_mean() {
        let mut window = DurationWindow::new(3);
        for value in [10, 20, 30] {
            window.push(ms(value));
        }
        assert_eq!(window.mean(), ms(20));

        window.push(ms(60));
        assert_eq!(window.len(), 3);
        assert_eq!(window.mean(), ms(110) / 3);
        assert_eq!(window.range(), (ms(20), ms(60)));
        assert_eq!(window.latest(), Some(ms(60)));
    }

    #[test]
    fn test_empty_and_zero_capacity() {
        let mut window = DurationWindow::new(0);
        assert!(window.is_empty());
        assert_eq!(window.mean(), Duration::ZERO);
        assert_eq!(window.range(), (Duration::ZERO, Duration::ZERO));

        window.push(ms(4));
        window.push(ms(8));
        assert_eq!(window.len(), 1);
        assert_eq!(window.mean(), ms(8));
    }
}
