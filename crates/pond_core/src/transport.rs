//! Drift-and-recycle particle transport for nitrate ions and bubbles.

use crate::config::{BubbleConfig, NitrateConfig};
use crate::math::{PondRng, Vec3};
use crate::scene::{Collider, EntityId, IdAllocator, Material, MaterialSlot};

/// A particle that moves by a fixed per-frame velocity and is respawned
/// from its source distribution once it leaves its band.
pub trait Particle {
    type Source;

    fn position(&self) -> Vec3;

    fn velocity(&self) -> Vec3;

    fn set_position(&mut self, position: Vec3);

    /// True once the particle has left its band and must be respawned.
    fn needs_recycle(&self, source: &Self::Source) -> bool;

    /// Redraw position and velocity from the creation distribution.
    fn respawn(&mut self, source: &Self::Source, rng: &mut PondRng);
}

/// Add every particle's velocity to its position.
pub fn advance_all<P: Particle>(particles: &mut [P]) {
    for particle in particles.iter_mut() {
        let next = particle.position() + particle.velocity();
        particle.set_position(next);
    }
}

/// Respawn every particle that left its band. Returns how many were recycled.
pub fn recycle_expired<P: Particle>(
    particles: &mut [P],
    source: &P::Source,
    rng: &mut PondRng,
) -> usize {
    let mut recycled = 0;
    for particle in particles.iter_mut() {
        if particle.needs_recycle(source) {
            particle.respawn(source, rng);
            recycled += 1;
        }
    }
    recycled
}

/// Advance then recycle.
pub fn integrate<P: Particle>(particles: &mut [P], source: &P::Source, rng: &mut PondRng) -> usize {
    advance_all(particles);
    recycle_expired(particles, source, rng)
}

// ============================================================================
// Nitrate
// ============================================================================

/// Pick radius of a nitrate molecule (oxygens sit 0.2 from the nitrogen).
pub const NITRATE_PICK_RADIUS: f32 = 0.26;

fn nitrate_materials() -> MaterialSlot {
    let mut materials = vec![Material::from_hex(0x0000ff)];
    materials.extend(std::iter::repeat(Material::from_hex(0xff0000)).take(3));
    MaterialSlot::Multi(materials)
}

#[derive(Debug, Clone, PartialEq)]
pub struct NitrateIon {
    pub id: EntityId,
    pub position: Vec3,
    /// Per-frame displacement: inward drift on x/z, fall on y.
    pub velocity: Vec3,
    /// Nitrogen first, then three oxygens.
    pub materials: MaterialSlot,
}

impl NitrateIon {
    pub fn spawn(id: EntityId, config: &NitrateConfig, rng: &mut PondRng) -> Self {
        let y = rng.range(config.spawn_y_min, config.spawn_y_max);
        let position = rng.ring_point(config.spawn_min_radius, config.spawn_max_radius, y);
        Self {
            id,
            position,
            velocity: nitrate_velocity(position, config, rng),
            materials: nitrate_materials(),
        }
    }

    /// Nitrate at `position` with a fixed velocity, for scenario setups.
    pub fn at(id: EntityId, position: Vec3, velocity: Vec3) -> Self {
        Self {
            id,
            position,
            velocity,
            materials: nitrate_materials(),
        }
    }

    pub fn collider(&self) -> Collider {
        Collider::Sphere {
            center: self.position,
            radius: NITRATE_PICK_RADIUS,
        }
    }
}

fn nitrate_velocity(position: Vec3, config: &NitrateConfig, rng: &mut PondRng) -> Vec3 {
    let fall = rng.range(config.fall_speed_min, config.fall_speed_max);
    Vec3::new(
        -position.x * config.drift_factor,
        -fall,
        -position.z * config.drift_factor,
    )
}

impl Particle for NitrateIon {
    type Source = NitrateConfig;

    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn needs_recycle(&self, source: &NitrateConfig) -> bool {
        self.position.y < source.floor_y
    }

    fn respawn(&mut self, source: &NitrateConfig, rng: &mut PondRng) {
        let y = rng.range(source.spawn_y_min, source.respawn_y_max);
        self.position = rng.ring_point(source.spawn_min_radius, source.spawn_max_radius, y);
        self.velocity = nitrate_velocity(self.position, source, rng);
    }
}

pub fn spawn_nitrates(
    config: &NitrateConfig,
    ids: &mut IdAllocator,
    rng: &mut PondRng,
) -> Vec<NitrateIon> {
    (0..config.count)
        .map(|_| NitrateIon::spawn(ids.allocate(), config, rng))
        .collect()
}

// ============================================================================
// Bubbles
// ============================================================================

/// Where bubbles come from: the water disc below the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleSource {
    pub config: BubbleConfig,
    pub water_radius: f32,
    pub surface_y: f32,
}

impl BubbleSource {
    fn spawn_radius(&self) -> f32 {
        self.water_radius * self.config.spawn_radius_fraction
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub id: EntityId,
    pub position: Vec3,
    pub rise_speed: f32,
    pub scale: f32,
    /// Cosmetic twinkle, recomputed every frame.
    pub opacity: f32,
}

impl Bubble {
    pub fn spawn(id: EntityId, source: &BubbleSource, rng: &mut PondRng) -> Self {
        let y = source.surface_y - rng.unit() * source.config.initial_depth;
        let position = rng.ring_point(0.0, source.spawn_radius(), y);
        let scale = rng.range(source.config.scale_min, source.config.scale_max);
        let rise_speed = rng.range(source.config.rise_speed_min, source.config.rise_speed_max);
        Self {
            id,
            position,
            rise_speed,
            scale,
            opacity: 0.75,
        }
    }

    /// Twinkle driven by the injected simulation clock.
    pub fn twinkle(&mut self, elapsed_secs: f64) {
        let phase = elapsed_secs * 1000.0 * 0.002 + self.rise_speed as f64 * 1000.0;
        self.opacity = 0.6 + 0.35 * phase.sin() as f32;
    }
}

impl Particle for Bubble {
    type Source = BubbleSource;

    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        Vec3::new(0.0, self.rise_speed, 0.0)
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn needs_recycle(&self, source: &BubbleSource) -> bool {
        self.position.y > source.surface_y + source.config.surface_margin
    }

    fn respawn(&mut self, source: &BubbleSource, rng: &mut PondRng) {
        let cfg = &source.config;
        let y = source.surface_y - cfg.respawn_depth - rng.unit() * cfg.respawn_jitter;
        self.position = rng.ring_point(0.0, source.spawn_radius(), y);
        self.rise_speed = rng.range(cfg.rise_speed_min, cfg.rise_speed_max);
    }
}

pub fn spawn_bubbles(
    source: &BubbleSource,
    ids: &mut IdAllocator,
    rng: &mut PondRng,
) -> Vec<Bubble> {
    (0..source.config.count)
        .map(|_| Bubble::spawn(ids.allocate(), source, rng))
        .collect()
}
