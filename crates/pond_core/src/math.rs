//! Deterministic math utilities
//!
//! Re-exports glam with the random sampling and ray helpers the pond
//! systems share.

pub use glam::*;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Seeded random source for every stochastic decision in the simulation.
///
/// All spawns, respawns and conversion trials draw from one stream so a
/// run is reproducible from its seed and command log.
#[derive(Debug, Clone)]
pub struct PondRng {
    seed: u64,
    inner: SmallRng,
}

impl PondRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform sample in `[0, 1)`.
    pub fn unit(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Uniform sample in `[min, max)`. Returns `min` for an empty range.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..max)
    }

    /// Uniform integer in `[min, max)`. Returns `min` for an empty range.
    pub fn range_u32(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..max)
    }

    /// Uniform angle in `[0, TAU)`.
    pub fn angle(&mut self) -> f32 {
        self.unit() * TAU
    }

    /// Single Bernoulli trial.
    pub fn chance(&mut self, probability: f32) -> bool {
        self.unit() < probability
    }

    /// Point on the horizontal plane at `y`, uniform angle and uniform
    /// radius in `[min_radius, max_radius)`.
    pub fn ring_point(&mut self, min_radius: f32, max_radius: f32, y: f32) -> Vec3 {
        let angle = self.angle();
        let radius = self.range(min_radius, max_radius);
        Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
    }
}

/// Distance from the pond's vertical axis (the world Y axis).
#[inline]
pub fn planar_distance(position: Vec3) -> f32 {
    (position.x * position.x + position.z * position.z).sqrt()
}

/// Half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing `direction`. Returns `None` for a zero or
    /// non-finite direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = PondRng::new(7);
        let mut b = PondRng::new(7);
        for _ in 0..32 {
            assert_eq!(a.unit().to_bits(), b.unit().to_bits());
        }
    }

    #[test]
    fn test_ring_point_stays_in_band() {
        let mut rng = PondRng::new(11);
        for _ in 0..1000 {
            let p = rng.ring_point(3.7, 4.0, -0.5);
            let r = planar_distance(p);
            assert!(r >= 3.7 - 1e-4 && r < 4.0 + 1e-4, "radius {r}");
            assert_eq!(p.y, -0.5);
        }
    }

    #[test]
    fn test_empty_ranges_return_min() {
        let mut rng = PondRng::new(3);
        assert_eq!(rng.range(2.0, 2.0), 2.0);
        assert_eq!(rng.range_u32(5, 5), 5);
    }

    #[test]
    fn test_ray_rejects_zero_direction() {
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0)).unwrap();
        assert_eq!(ray.at(3.0), Vec3::new(0.0, 0.0, -3.0));
    }
}
