//! Fish wander while alive and sink-and-fade once the pond stress passes
//! their personal threshold.

use crate::config::FishConfig;
use crate::math::{planar_distance, PondRng, Vec3};
use crate::scene::{Collider, EntityId, IdAllocator, Material, MaterialSlot};

/// Pick radius around the fish body centre.
pub const FISH_PICK_RADIUS: f32 = 0.3;

const ORANGE: u32 = 0xff7f00;
const WHITE: u32 = 0xffffff;
const BLACK: u32 = 0x000000;
const DEAD_GREY: u32 = 0x4a4a4a;

/// Part colours of a clownfish: three body segments, three stripes, five
/// fins, two scleras and two pupils.
const PART_COLORS: [u32; 15] = [
    ORANGE, WHITE, ORANGE, // body
    BLACK, BLACK, BLACK, // stripes
    ORANGE, ORANGE, ORANGE, ORANGE, ORANGE, // dorsal, pectoral x2, anal, tail
    WHITE, BLACK, WHITE, BLACK, // eyes
];

#[derive(Debug, Clone, PartialEq)]
pub struct Fish {
    pub id: EntityId,
    /// Index within the school; offsets the wander pattern.
    pub index: u32,
    pub position: Vec3,
    pub heading: f32,
    pub swim_speed: f32,
    pub death_threshold: f32,
    dead: bool,
    pub materials: MaterialSlot,
}

impl Fish {
    pub fn spawn(
        id: EntityId,
        index: u32,
        config: &FishConfig,
        water_radius: f32,
        surface_y: f32,
        rng: &mut PondRng,
    ) -> Self {
        let angle = rng.angle();
        let r = rng.unit() * water_radius * config.spawn_radius_fraction;
        let depth = rng.range(config.depth_min, config.depth_max);
        let position = Vec3::new(angle.cos() * r, surface_y - depth, angle.sin() * r);
        let heading = rng.angle();
        let swim_speed = rng.range(config.swim_speed_min, config.swim_speed_max);
        let death_threshold = rng.range(config.death_threshold_min, config.death_threshold_max);
        Self {
            id,
            index,
            position,
            heading,
            swim_speed,
            death_threshold,
            dead: false,
            materials: MaterialSlot::Multi(
                PART_COLORS.iter().map(|&hex| Material::from_hex(hex)).collect(),
            ),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Kill the fish if `timescale` reached its threshold. Returns true on
    /// the transition; a dead fish stays dead.
    pub fn check_death(&mut self, timescale: f32, config: &FishConfig) -> bool {
        if self.dead || timescale < self.death_threshold {
            return false;
        }
        self.dead = true;
        let dead = Material::from_hex(DEAD_GREY).with_opacity(config.dead_opacity);
        for material in self.materials.as_mut_slice() {
            *material = dead;
        }
        true
    }

    pub fn update(&mut self, elapsed_secs: f64, config: &FishConfig, water_radius: f32) {
        if self.dead {
            self.sink(config);
        } else {
            self.wander(elapsed_secs, config, water_radius);
        }
    }

    fn wander(&mut self, elapsed_secs: f64, config: &FishConfig, water_radius: f32) {
        let offset = self.index as f64;
        let t = elapsed_secs * self.swim_speed as f64;
        let step = config.wander_step * (config.wander_bias + self.swim_speed);
        self.position.x += (t + offset).cos() as f32 * step;
        self.position.z += (t * 0.9 + offset).sin() as f32 * step;

        let max_radius = water_radius - config.boundary_margin;
        if planar_distance(self.position) > max_radius {
            let angle = self.position.z.atan2(self.position.x);
            let r = max_radius - config.boundary_inset;
            self.position.x = angle.cos() * r;
            self.position.z = angle.sin() * r;
        }

        let wobble = (elapsed_secs * config.heading_rate as f64 + offset).sin() as f32;
        self.heading += wobble * config.heading_step;
    }

    fn sink(&mut self, config: &FishConfig) {
        self.position.y -= config.sink_rate;
        for material in self.materials.as_mut_slice() {
            material.opacity = (material.opacity - config.fade_rate).max(0.0);
        }
    }

    pub fn opacity(&self) -> f32 {
        self.materials.max_opacity()
    }

    pub fn collider(&self) -> Collider {
        Collider::Sphere {
            center: self.position,
            radius: FISH_PICK_RADIUS,
        }
    }
}

pub fn spawn_school(
    config: &FishConfig,
    water_radius: f32,
    surface_y: f32,
    ids: &mut IdAllocator,
    rng: &mut PondRng,
) -> Vec<Fish> {
    (0..config.count)
        .map(|i| Fish::spawn(ids.allocate(), i as u32, config, water_radius, surface_y, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER_RADIUS: f32 = 3.7;
    const SURFACE_Y: f32 = -0.75;

    fn school(seed: u64) -> Vec<Fish> {
        let mut ids = IdAllocator::new();
        let mut rng = PondRng::new(seed);
        spawn_school(&FishConfig::default(), WATER_RADIUS, SURFACE_Y, &mut ids, &mut rng)
    }

    #[test]
    fn test_spawn_ranges() {
        let fish = school(1);
        assert_eq!(fish.len(), 14);
        for f in &fish {
            assert!(planar_distance(f.position) <= WATER_RADIUS * 0.88 + 1e-4);
            assert!(f.position.y <= SURFACE_Y - 0.05 + 1e-6);
            assert!(f.position.y >= SURFACE_Y - 0.5 - 1e-6);
            assert!(f.death_threshold >= 0.15 && f.death_threshold < 1.0);
            assert!(f.swim_speed >= 0.03 && f.swim_speed < 0.09);
            assert_eq!(f.materials.len(), 15);
            assert!(!f.is_dead());
        }
    }

    #[test]
    fn test_wander_stays_inside_boundary() {
        let config = FishConfig::default();
        let mut fish = school(2);
        fish[0].position = Vec3::new(WATER_RADIUS, SURFACE_Y, 0.0);
        for frame in 0..5000 {
            let t = frame as f64 / 60.0;
            for f in fish.iter_mut() {
                f.update(t, &config, WATER_RADIUS);
                assert!(planar_distance(f.position) <= WATER_RADIUS - 0.08 + 1e-4);
            }
        }
    }

    #[test]
    fn test_clamp_keeps_angle() {
        let config = FishConfig {
            wander_step: 0.0,
            ..FishConfig::default()
        };
        let mut fish = school(3).remove(0);
        fish.position = Vec3::new(3.0, SURFACE_Y, 3.0);
        fish.update(0.0, &config, WATER_RADIUS);
        let r = planar_distance(fish.position);
        assert!((r - (WATER_RADIUS - 0.1)).abs() < 1e-4);
        assert!((fish.position.x - fish.position.z).abs() < 1e-5);
    }

    #[test]
    fn test_wander_is_deterministic_in_time() {
        let config = FishConfig::default();
        let mut a = school(4);
        let mut b = school(4);
        for frame in 0..100 {
            let t = frame as f64 * 0.016;
            a[3].update(t, &config, WATER_RADIUS);
            b[3].update(t, &config, WATER_RADIUS);
        }
        assert_eq!(a[3], b[3]);
    }

    #[test]
    fn test_death_is_one_way_and_fades_to_zero() {
        let config = FishConfig::default();
        let mut fish = school(5).remove(0);
        assert!(!fish.check_death(fish.death_threshold - 0.01, &config));
        assert!(fish.check_death(fish.death_threshold, &config));
        assert!(!fish.check_death(1.0, &config));
        assert!(fish.is_dead());
        assert_eq!(fish.opacity(), 0.45);
        for m in fish.materials.as_slice() {
            assert_eq!(m.color, crate::scene::hex_to_rgb(DEAD_GREY));
        }

        let mut last = fish.opacity();
        let mut last_y = fish.position.y;
        for _ in 0..600 {
            fish.update(0.0, &config, WATER_RADIUS);
            assert!(fish.is_dead());
            assert!(fish.opacity() <= last);
            assert!(fish.opacity() >= 0.0);
            assert!(fish.position.y < last_y);
            last = fish.opacity();
            last_y = fish.position.y;
        }
        assert_eq!(fish.opacity(), 0.0);
    }
}
