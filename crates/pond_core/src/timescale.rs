//! Pond timescale: one slider drives algal bloom and fish mortality.

use crate::config::{AlgaeConfig, FishConfig};
use crate::fish::Fish;

/// Scalar in `[0, 1]`; 0 is a healthy pond, 1 a fully eutrophic one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timescale(f32);

impl Timescale {
    /// Clamp `value` into `[0, 1]`. NaN maps to 0.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

/// Algae patch appearance derived from the timescale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlgaeState {
    pub opacity: f32,
    /// Uniform scale on x and z; y stays 1.
    pub scale: f32,
}

impl AlgaeState {
    pub fn at(timescale: Timescale, config: &AlgaeConfig) -> Self {
        let v = timescale.value();
        let opacity =
            (config.min_opacity + v * (config.max_opacity - config.min_opacity)).min(config.max_opacity);
        let radius = config.min_radius + (config.max_radius - config.min_radius) * v;
        Self {
            opacity,
            scale: radius / config.min_radius,
        }
    }

    /// World radius of the scaled patch.
    pub fn radius(&self, config: &AlgaeConfig) -> f32 {
        config.base_radius * self.scale
    }
}

/// Owns the pond timescale and re-applies it to algae and fish.
#[derive(Debug, Clone)]
pub struct TimescaleController {
    timescale: Timescale,
    algae: AlgaeState,
}

impl TimescaleController {
    pub fn new(config: &AlgaeConfig) -> Self {
        let timescale = Timescale::default();
        Self {
            timescale,
            algae: AlgaeState::at(timescale, config),
        }
    }

    pub fn timescale(&self) -> Timescale {
        self.timescale
    }

    pub fn algae(&self) -> AlgaeState {
        self.algae
    }

    /// Set the timescale, recompute the algae state and kill every fish
    /// whose threshold is reached. Returns the number of fish that died.
    pub fn set(
        &mut self,
        value: f32,
        fish: &mut [Fish],
        algae: &AlgaeConfig,
        fish_config: &FishConfig,
    ) -> usize {
        self.timescale = Timescale::new(value);
        self.algae = AlgaeState::at(self.timescale, algae);
        let v = self.timescale.value();
        let mut deaths = 0;
        for f in fish.iter_mut() {
            if f.check_death(v, fish_config) {
                tracing::debug!(fish = %f.id, threshold = f.death_threshold, "fish died");
                deaths += 1;
            }
        }
        deaths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fish::spawn_school;
    use crate::math::PondRng;
    use crate::scene::IdAllocator;

    fn school() -> Vec<Fish> {
        let mut ids = IdAllocator::new();
        let mut rng = PondRng::new(12);
        spawn_school(&FishConfig::default(), 3.7, -0.75, &mut ids, &mut rng)
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Timescale::new(-0.5).value(), 0.0);
        assert_eq!(Timescale::new(1.5).value(), 1.0);
        assert_eq!(Timescale::new(f32::NAN).value(), 0.0);
        assert_eq!(Timescale::new(0.25).value(), 0.25);
    }

    #[test]
    fn test_zero_is_healthy() {
        let algae = AlgaeConfig::default();
        let mut controller = TimescaleController::new(&algae);
        let mut fish = school();
        let deaths = controller.set(0.0, &mut fish, &algae, &FishConfig::default());
        assert_eq!(deaths, 0);
        assert!(fish.iter().all(|f| !f.is_dead()));
        assert_eq!(controller.algae().opacity, 0.5);
        assert_eq!(controller.algae().scale, 1.0);
    }

    #[test]
    fn test_one_kills_everything() {
        let algae = AlgaeConfig::default();
        let mut controller = TimescaleController::new(&algae);
        let mut fish = school();
        let deaths = controller.set(1.0, &mut fish, &algae, &FishConfig::default());
        assert_eq!(deaths, fish.len());
        assert!(fish.iter().all(|f| f.is_dead()));
        assert!((controller.algae().opacity - 0.95).abs() < 1e-6);
        let expected = 3.7 * 0.6 / 0.8;
        assert!((controller.algae().scale - expected).abs() < 1e-5);
    }

    #[test]
    fn test_lowering_does_not_revive() {
        let algae = AlgaeConfig::default();
        let fish_config = FishConfig::default();
        let mut controller = TimescaleController::new(&algae);
        let mut fish = school();
        controller.set(0.6, &mut fish, &algae, &fish_config);
        let dead: Vec<bool> = fish.iter().map(Fish::is_dead).collect();
        for (f, &d) in fish.iter().zip(&dead) {
            assert_eq!(d, f.death_threshold <= 0.6);
        }
        assert_eq!(controller.set(0.0, &mut fish, &algae, &fish_config), 0);
        let after: Vec<bool> = fish.iter().map(Fish::is_dead).collect();
        assert_eq!(dead, after);
    }
}
