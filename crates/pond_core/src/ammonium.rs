//! Ammonium ions: free drift toward the nearest root, attachment, expiry.

use crate::config::AmmoniumConfig;
use crate::math::{PondRng, Vec3};
use crate::scene::{Collider, EntityId, Material, MaterialSlot};

/// Pick radius of an ammonium molecule (nitrogen plus hydrogen shell).
pub const AMMONIUM_PICK_RADIUS: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmoniumState {
    Free,
    /// Taken up by a root; removed when `wait_frames` reaches zero.
    Attached { wait_frames: u32 },
}

/// What happened to an ion during one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmoniumEvent {
    Attached { root: usize },
    Absorbed,
    Decayed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmmoniumIon {
    pub id: EntityId,
    pub position: Vec3,
    rise_speed: f32,
    life: f32,
    state: AmmoniumState,
    /// Nitrogen atom first, then four hydrogens.
    pub materials: MaterialSlot,
}

impl AmmoniumIon {
    pub fn spawn(id: EntityId, position: Vec3, config: &AmmoniumConfig, rng: &mut PondRng) -> Self {
        let rise_speed = rng.range(config.rise_speed_min, config.rise_speed_max);
        let mut materials = vec![Material::from_hex(0x0000ff)];
        materials.extend(std::iter::repeat(Material::from_hex(0xffffff)).take(4));
        Self {
            id,
            position,
            rise_speed,
            life: 1.0,
            state: AmmoniumState::Free,
            materials: MaterialSlot::Multi(materials),
        }
    }

    pub fn rise_speed(&self) -> f32 {
        self.rise_speed
    }

    pub fn life(&self) -> f32 {
        self.life
    }

    pub fn state(&self) -> AmmoniumState {
        self.state
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.state, AmmoniumState::Attached { .. })
    }

    pub fn wait_frames(&self) -> Option<u32> {
        match self.state {
            AmmoniumState::Free => None,
            AmmoniumState::Attached { wait_frames } => Some(wait_frames),
        }
    }

    pub fn opacity(&self) -> f32 {
        self.materials.max_opacity()
    }

    pub fn collider(&self) -> Collider {
        Collider::Sphere {
            center: self.position,
            radius: AMMONIUM_PICK_RADIUS,
        }
    }

    /// Advance one frame. Returns `Some(Absorbed | Decayed)` when the ion
    /// must be removed.
    pub fn update(
        &mut self,
        roots: &[Vec3],
        config: &AmmoniumConfig,
        rng: &mut PondRng,
    ) -> Option<AmmoniumEvent> {
        let mut event = None;
        match self.state {
            AmmoniumState::Free => {
                if let Some((root, distance)) = nearest_root(self.position, roots) {
                    let target = roots[root];
                    let direction = (target - self.position).normalize_or_zero();
                    self.position += direction * config.seek_step;
                    if distance < config.attach_distance {
                        let half = config.attach_jitter * 0.5;
                        self.position = target
                            + Vec3::new(
                                rng.range(-half, half),
                                -config.attach_drop,
                                rng.range(-half, half),
                            );
                        let wait_frames = rng.range_u32(config.wait_min, config.wait_max);
                        self.state = AmmoniumState::Attached { wait_frames };
                        event = Some(AmmoniumEvent::Attached { root });
                    }
                }
            }
            AmmoniumState::Attached { wait_frames } => {
                let wait_frames = wait_frames.saturating_sub(1);
                self.state = AmmoniumState::Attached { wait_frames };
                if wait_frames == 0 {
                    return Some(AmmoniumEvent::Absorbed);
                }
            }
        }

        let opacity = if self.is_attached() {
            config.attached_opacity
        } else {
            self.life.max(0.0)
        };
        for material in self.materials.as_mut_slice() {
            material.opacity = opacity;
        }

        if !self.is_attached() {
            self.life -= config.life_decay;
            if self.life <= 0.0 {
                return Some(AmmoniumEvent::Decayed);
            }
        }
        event
    }
}

/// Index and distance of the nearest root. Ties keep the first root in
/// slice order.
pub fn nearest_root(position: Vec3, roots: &[Vec3]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, root) in roots.iter().enumerate() {
        let distance = position.distance(*root);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }
    best
}

/// Tallies from one ammonium pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmmoniumTally {
    pub attached: usize,
    pub absorbed: usize,
    pub decayed: usize,
}

/// Update every ion, removing absorbed and decayed ones. Iterates in
/// reverse so removal does not skip entries.
pub fn update_all(
    ions: &mut Vec<AmmoniumIon>,
    roots: &[Vec3],
    config: &AmmoniumConfig,
    rng: &mut PondRng,
) -> AmmoniumTally {
    let mut tally = AmmoniumTally::default();
    for index in (0..ions.len()).rev() {
        match ions[index].update(roots, config, rng) {
            Some(AmmoniumEvent::Attached { root }) => {
                tracing::debug!(ion = %ions[index].id, root, "ammonium attached to root");
                tally.attached += 1;
            }
            Some(AmmoniumEvent::Absorbed) => {
                ions.remove(index);
                tally.absorbed += 1;
            }
            Some(AmmoniumEvent::Decayed) => {
                ions.remove(index);
                tally.decayed += 1;
            }
            None => {}
        }
    }
    tally
}
