//! Bacteria ring around the pond edge and the nitrate→ammonium trigger.
//!
//! Bacteria never move or search. Conversion is decided per nitrate by its
//! distance from the pond axis while the ring is switched on.

use crate::config::BacteriaConfig;
use crate::math::{planar_distance, PondRng, Vec3};
use crate::scene::{Collider, EntityId, IdAllocator, Material, MaterialSlot};
use crate::transport::NitrateIon;

/// Pick radius around a bacterium body, covering the flagella.
pub const BACTERIUM_PICK_RADIUS: f32 = 0.2;

const FLAGELLUM_BASE: [Vec3; 3] = [
    Vec3::new(0.07, 0.0, 0.0),
    Vec3::new(0.20, 0.0, 0.0),
    Vec3::new(0.35, 0.0, 0.0),
];

/// Control points of one flagellum curve, local to the bacterium.
#[derive(Debug, Clone, PartialEq)]
pub struct Flagellum {
    /// Yaw of the flagellum around the body.
    pub yaw: f32,
    pub points: [Vec3; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bacterium {
    pub id: EntityId,
    pub position: Vec3,
    pub phase: f32,
    pub flagella: [Flagellum; 3],
    pub materials: MaterialSlot,
}

impl Bacterium {
    fn new(id: EntityId, position: Vec3, phase: f32) -> Self {
        let flagellum = |i: usize| Flagellum {
            yaw: i as f32 / 10.0,
            points: FLAGELLUM_BASE,
        };
        let mut materials = vec![Material::from_hex(0x22aa22)];
        materials.extend(std::iter::repeat(Material::from_hex(0x006600)).take(3));
        Self {
            id,
            position,
            phase,
            flagella: [flagellum(0), flagellum(1), flagellum(2)],
            materials: MaterialSlot::Multi(materials),
        }
    }

    /// Bend the flagella using the phase at the start of the frame, then
    /// advance the phase.
    pub fn animate(&mut self, delta_secs: f32, config: &BacteriaConfig) {
        let phase = self.phase;
        self.phase += delta_secs * config.phase_rate;
        for flagellum in &mut self.flagella {
            for (i, (point, base)) in flagellum
                .points
                .iter_mut()
                .zip(FLAGELLUM_BASE.iter())
                .enumerate()
            {
                let wiggle = (phase + i as f32).sin() * config.wiggle * i as f32;
                *point = Vec3::new(base.x + wiggle, base.y, base.z);
            }
        }
    }

    pub fn collider(&self) -> Collider {
        Collider::Sphere {
            center: self.position,
            radius: BACTERIUM_PICK_RADIUS,
        }
    }
}

/// Toggleable bacteria population.
#[derive(Debug, Clone, Default)]
pub struct BacteriaRing {
    enabled: bool,
    members: Vec<Bacterium>,
}

impl BacteriaRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn members(&self) -> &[Bacterium] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Bacterium] {
        &mut self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Replace the population with `config.count` bacteria in the ring and
    /// switch conversion on.
    pub fn populate(&mut self, config: &BacteriaConfig, ids: &mut IdAllocator, rng: &mut PondRng) {
        self.members = (0..config.count)
            .map(|_| {
                let position =
                    rng.ring_point(config.ring_min_radius, config.ring_max_radius, config.ring_y);
                let phase = rng.angle();
                Bacterium::new(ids.allocate(), position, phase)
            })
            .collect();
        self.enabled = true;
    }

    /// Remove every bacterium and switch conversion off.
    pub fn clear(&mut self) {
        self.members.clear();
        self.enabled = false;
    }

    pub fn animate(&mut self, delta_secs: f32, config: &BacteriaConfig) {
        for bacterium in &mut self.members {
            bacterium.animate(delta_secs, config);
        }
    }

    /// Run one conversion trial for every nitrate inside the zone. Converted
    /// nitrates are removed; their last positions are returned in removal
    /// order. Does nothing while the ring is off.
    pub fn convert_nitrates(
        &self,
        nitrates: &mut Vec<NitrateIon>,
        config: &BacteriaConfig,
        rng: &mut PondRng,
    ) -> Vec<Vec3> {
        let mut converted = Vec::new();
        if !self.enabled {
            return converted;
        }
        for index in (0..nitrates.len()).rev() {
            let position = nitrates[index].position;
            let distance = planar_distance(position);
            let in_zone =
                distance > config.zone_inner_radius && distance < config.zone_outer_radius;
            if in_zone && rng.chance(config.conversion_probability) {
                nitrates.remove(index);
                converted.push(position);
            }
        }
        converted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_nitrate(id: u64, position: Vec3) -> NitrateIon {
        NitrateIon::at(EntityId::from_raw(id), position, Vec3::ZERO)
    }

    #[test]
    fn test_populate_places_ring_and_enables() {
        let config = BacteriaConfig::default();
        let mut ring = BacteriaRing::new();
        let mut ids = IdAllocator::new();
        let mut rng = PondRng::new(8);
        ring.populate(&config, &mut ids, &mut rng);
        assert!(ring.is_enabled());
        assert_eq!(ring.members().len(), 10);
        for b in ring.members() {
            let r = planar_distance(b.position);
            assert!(r >= 3.7 - 1e-4 && r <= 4.0 + 1e-4);
            assert_eq!(b.position.y, -0.8);
            assert_eq!(b.materials.len(), 4);
        }
        ring.clear();
        assert!(!ring.is_enabled());
        assert!(ring.is_empty());
    }

    #[test]
    fn test_disabled_ring_never_converts() {
        let config = BacteriaConfig {
            conversion_probability: 1.0,
            ..BacteriaConfig::default()
        };
        let ring = BacteriaRing::new();
        let mut rng = PondRng::new(1);
        let mut nitrates = vec![still_nitrate(1, Vec3::new(3.8, -0.5, 0.0))];
        assert!(ring.convert_nitrates(&mut nitrates, &config, &mut rng).is_empty());
        assert_eq!(nitrates.len(), 1);
    }

    #[test]
    fn test_zone_is_exclusive() {
        let config = BacteriaConfig {
            conversion_probability: 1.0,
            ..BacteriaConfig::default()
        };
        let mut ring = BacteriaRing::new();
        let mut ids = IdAllocator::new();
        let mut rng = PondRng::new(2);
        ring.populate(&config, &mut ids, &mut rng);

        let mut nitrates = vec![
            still_nitrate(1, Vec3::new(3.0, -0.5, 0.0)),
            still_nitrate(2, Vec3::new(0.0, -0.5, 3.8)),
            still_nitrate(3, Vec3::new(4.5, -0.5, 0.0)),
        ];
        let converted = ring.convert_nitrates(&mut nitrates, &config, &mut rng);
        assert_eq!(converted, vec![Vec3::new(0.0, -0.5, 3.8)]);
        let left: Vec<u64> = nitrates.iter().map(|n| n.id.raw()).collect();
        assert_eq!(left, vec![1, 3]);
    }

    #[test]
    fn test_flagella_wiggle_is_bounded() {
        let config = BacteriaConfig::default();
        let mut ring = BacteriaRing::new();
        let mut ids = IdAllocator::new();
        let mut rng = PondRng::new(3);
        ring.populate(&config, &mut ids, &mut rng);
        let phase_before = ring.members()[0].phase;
        ring.animate(0.5, &config);
        let b = &ring.members()[0];
        assert!((b.phase - phase_before - 1.0).abs() < 1e-5);
        for f in &b.flagella {
            assert_eq!(f.points[0], FLAGELLUM_BASE[0]);
            for (i, (p, base)) in f.points.iter().zip(FLAGELLUM_BASE).enumerate() {
                assert!((p.x - base.x).abs() <= config.wiggle * i as f32 + 1e-6);
            }
        }
    }
}
