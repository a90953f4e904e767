//! Tunable constants for every pond system.
//!
//! `Default` reproduces the classroom demo. Every group deserializes with
//! `#[serde(default)]` so a settings file only needs the values it changes.

use crate::error::PondError;
use serde::{Deserialize, Serialize};

/// Upper bound for any population count accepted from a config file.
pub const MAX_POPULATION: usize = 10_000;
/// Largest wave mesh: keeps vertex and index counts well inside `u32`.
pub const MAX_WAVE_RINGS: u32 = 256;
pub const MAX_WAVE_SEGMENTS: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PondConfig {
    /// Seed for every random draw in the simulation.
    pub seed: u64,
    pub water: WaterConfig,
    pub algae: AlgaeConfig,
    pub fish: FishConfig,
    pub nitrate: NitrateConfig,
    pub bubble: BubbleConfig,
    pub bacteria: BacteriaConfig,
    pub ammonium: AmmoniumConfig,
    pub plants: PlantConfig,
    pub highlight: HighlightConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    pub radius: f32,
    pub surface_y: f32,
    /// Concentric vertex rings between the centre and the rim.
    pub rings: u32,
    pub segments: u32,
    /// Spatial frequency applied to rest x/z before sampling noise.
    pub noise_scale: f32,
    /// Wave clock advance per second of frame time.
    pub clock_rate: f32,
    /// Multiplier applied to the wave clock when sampling noise.
    pub noise_speed: f32,
    pub amplitude: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgaeConfig {
    /// Radius of the algae disc geometry before scaling.
    pub base_radius: f32,
    pub min_opacity: f32,
    pub max_opacity: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Height of the patch above the water surface.
    pub lift: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FishConfig {
    pub count: usize,
    /// Spawn radius as a fraction of the water radius.
    pub spawn_radius_fraction: f32,
    pub depth_min: f32,
    pub depth_max: f32,
    pub swim_speed_min: f32,
    pub swim_speed_max: f32,
    pub death_threshold_min: f32,
    pub death_threshold_max: f32,
    pub wander_step: f32,
    pub wander_bias: f32,
    pub boundary_margin: f32,
    pub boundary_inset: f32,
    /// Angular rate (radians per second) of the heading oscillation.
    pub heading_rate: f32,
    pub heading_step: f32,
    pub sink_rate: f32,
    pub fade_rate: f32,
    pub dead_opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NitrateConfig {
    pub count: usize,
    pub spawn_min_radius: f32,
    pub spawn_max_radius: f32,
    pub spawn_y_min: f32,
    pub spawn_y_max: f32,
    /// Upper height bound used when a nitrate is recycled.
    pub respawn_y_max: f32,
    pub fall_speed_min: f32,
    pub fall_speed_max: f32,
    /// Inward drift per frame as a fraction of the planar position.
    pub drift_factor: f32,
    /// Height below which a nitrate is recycled.
    pub floor_y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    pub count: usize,
    pub spawn_radius_fraction: f32,
    pub initial_depth: f32,
    pub respawn_depth: f32,
    pub respawn_jitter: f32,
    pub surface_margin: f32,
    pub rise_speed_min: f32,
    pub rise_speed_max: f32,
    pub scale_min: f32,
    pub scale_max: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacteriaConfig {
    /// Bacteria created when the ring is switched on.
    pub count: usize,
    pub ring_min_radius: f32,
    pub ring_max_radius: f32,
    pub ring_y: f32,
    /// Conversion zone, exclusive on both ends.
    pub zone_inner_radius: f32,
    pub zone_outer_radius: f32,
    /// Per-frame probability that a nitrate inside the zone converts.
    pub conversion_probability: f32,
    pub phase_rate: f32,
    pub wiggle: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmmoniumConfig {
    pub rise_speed_min: f32,
    pub rise_speed_max: f32,
    pub seek_step: f32,
    pub attach_distance: f32,
    /// Attached dwell in frames, `[wait_min, wait_max)`.
    pub wait_min: u32,
    pub wait_max: u32,
    pub life_decay: f32,
    pub attach_jitter: f32,
    pub attach_drop: f32,
    pub attached_opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    pub count: usize,
    /// Gap between the water rim and the inner edge of the plant ring.
    pub ring_offset: f32,
    pub ring_width: f32,
    pub ground_y: f32,
    pub stem_height_min: f32,
    pub stem_height_max: f32,
    pub leaf_radius_min: f32,
    pub leaf_radius_max: f32,
    pub root_length_min: f32,
    pub root_length_max: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Emissive intensity while hovered.
    pub strength: f32,
    /// How far the emissive colour moves toward white (0 = unchanged, 1 = white).
    pub white_blend: f32,
}

impl Default for PondConfig {
    fn default() -> Self {
        Self {
            seed: 0x0D0C_A11E_F15B_0B1E,
            water: WaterConfig::default(),
            algae: AlgaeConfig::default(),
            fish: FishConfig::default(),
            nitrate: NitrateConfig::default(),
            bubble: BubbleConfig::default(),
            bacteria: BacteriaConfig::default(),
            ammonium: AmmoniumConfig::default(),
            plants: PlantConfig::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            radius: 3.7,
            surface_y: -0.75,
            rings: 24,
            segments: 128,
            noise_scale: 0.25,
            clock_rate: 0.6,
            noise_speed: 0.6,
            amplitude: 0.06,
        }
    }
}

impl Default for AlgaeConfig {
    fn default() -> Self {
        Self {
            base_radius: 1.2,
            min_opacity: 0.5,
            max_opacity: 0.95,
            min_radius: 0.8,
            max_radius: 3.7 * 0.6,
            lift: 0.01,
        }
    }
}

impl Default for FishConfig {
    fn default() -> Self {
        Self {
            count: 14,
            spawn_radius_fraction: 0.88,
            depth_min: 0.05,
            depth_max: 0.5,
            swim_speed_min: 0.03,
            swim_speed_max: 0.09,
            death_threshold_min: 0.15,
            death_threshold_max: 1.0,
            wander_step: 0.002,
            wander_bias: 0.8,
            boundary_margin: 0.08,
            boundary_inset: 0.02,
            heading_rate: 20.0,
            heading_step: 0.03,
            sink_rate: 0.002,
            fade_rate: 0.001,
            dead_opacity: 0.45,
        }
    }
}

impl Default for NitrateConfig {
    fn default() -> Self {
        Self {
            count: 30,
            spawn_min_radius: 3.7,
            spawn_max_radius: 4.0,
            spawn_y_min: -0.6,
            spawn_y_max: -0.5,
            respawn_y_max: -0.4,
            fall_speed_min: 0.002,
            fall_speed_max: 0.004,
            drift_factor: 0.0005,
            floor_y: -1.0,
        }
    }
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            count: 60,
            spawn_radius_fraction: 0.8,
            initial_depth: 0.5,
            respawn_depth: 0.5,
            respawn_jitter: 0.15,
            surface_margin: 0.05,
            rise_speed_min: 0.002,
            rise_speed_max: 0.007,
            scale_min: 0.6,
            scale_max: 2.0,
        }
    }
}

impl Default for BacteriaConfig {
    fn default() -> Self {
        Self {
            count: 10,
            ring_min_radius: 3.7,
            ring_max_radius: 4.0,
            ring_y: -0.8,
            zone_inner_radius: 3.5,
            zone_outer_radius: 4.1,
            conversion_probability: 0.002,
            phase_rate: 2.0,
            wiggle: 0.05,
        }
    }
}

impl Default for AmmoniumConfig {
    fn default() -> Self {
        Self {
            rise_speed_min: 0.001,
            rise_speed_max: 0.003,
            seek_step: 0.01,
            attach_distance: 0.1,
            wait_min: 200,
            wait_max: 400,
            life_decay: 0.001,
            attach_jitter: 0.1,
            attach_drop: 0.05,
            attached_opacity: 0.9,
        }
    }
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            count: 25,
            ring_offset: 0.3,
            ring_width: 0.3,
            ground_y: -0.5,
            stem_height_min: 0.2,
            stem_height_max: 0.5,
            leaf_radius_min: 0.15,
            leaf_radius_max: 0.25,
            root_length_min: 0.2,
            root_length_max: 0.4,
        }
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            strength: 0.1,
            white_blend: 1.0,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), PondError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PondError::NonPositive { field, value })
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), PondError> {
    if min <= max {
        Ok(())
    } else {
        Err(PondError::InvertedRange { field, min, max })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), PondError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PondError::OutOfUnitRange { field, value })
    }
}

fn bounded(field: &'static str, count: usize) -> Result<(), PondError> {
    if count <= MAX_POPULATION {
        Ok(())
    } else {
        Err(PondError::TooMany {
            field,
            count,
            limit: MAX_POPULATION,
        })
    }
}

impl PondConfig {
    /// Reject values the systems cannot run with.
    pub fn validate(&self) -> Result<(), PondError> {
        let w = &self.water;
        positive("water.radius", w.radius)?;
        positive("water.amplitude", w.amplitude)?;
        if w.rings == 0 || w.segments < 3 {
            return Err(PondError::NonPositive {
                field: "water.rings/segments",
                value: w.rings.min(w.segments) as f32,
            });
        }
        for (field, count, limit) in [
            ("water.rings", w.rings, MAX_WAVE_RINGS),
            ("water.segments", w.segments, MAX_WAVE_SEGMENTS),
        ] {
            if count > limit {
                return Err(PondError::TooMany {
                    field,
                    count: count as usize,
                    limit: limit as usize,
                });
            }
        }

        let a = &self.algae;
        positive("algae.base_radius", a.base_radius)?;
        positive("algae.min_radius", a.min_radius)?;
        ordered("algae.radius", a.min_radius, a.max_radius)?;
        unit("algae.min_opacity", a.min_opacity)?;
        unit("algae.max_opacity", a.max_opacity)?;
        ordered("algae.opacity", a.min_opacity, a.max_opacity)?;

        let f = &self.fish;
        bounded("fish.count", f.count)?;
        ordered("fish.depth", f.depth_min, f.depth_max)?;
        ordered("fish.swim_speed", f.swim_speed_min, f.swim_speed_max)?;
        ordered(
            "fish.death_threshold",
            f.death_threshold_min,
            f.death_threshold_max,
        )?;
        unit("fish.dead_opacity", f.dead_opacity)?;
        if f.boundary_margin + f.boundary_inset >= w.radius {
            return Err(PondError::InvertedRange {
                field: "fish.boundary",
                min: f.boundary_margin + f.boundary_inset,
                max: w.radius,
            });
        }

        let n = &self.nitrate;
        bounded("nitrate.count", n.count)?;
        ordered("nitrate.spawn_radius", n.spawn_min_radius, n.spawn_max_radius)?;
        ordered("nitrate.spawn_y", n.spawn_y_min, n.spawn_y_max)?;
        ordered("nitrate.respawn_y", n.spawn_y_min, n.respawn_y_max)?;
        ordered("nitrate.fall_speed", n.fall_speed_min, n.fall_speed_max)?;
        ordered("nitrate.floor_y", n.floor_y, n.spawn_y_min)?;

        let b = &self.bubble;
        bounded("bubble.count", b.count)?;
        ordered("bubble.rise_speed", b.rise_speed_min, b.rise_speed_max)?;
        ordered("bubble.scale", b.scale_min, b.scale_max)?;

        let bac = &self.bacteria;
        bounded("bacteria.count", bac.count)?;
        ordered("bacteria.ring", bac.ring_min_radius, bac.ring_max_radius)?;
        ordered("bacteria.zone", bac.zone_inner_radius, bac.zone_outer_radius)?;
        unit("bacteria.conversion_probability", bac.conversion_probability)?;

        let am = &self.ammonium;
        positive("ammonium.seek_step", am.seek_step)?;
        ordered("ammonium.rise_speed", am.rise_speed_min, am.rise_speed_max)?;
        ordered("ammonium.wait", am.wait_min as f32, am.wait_max as f32)?;
        unit("ammonium.attached_opacity", am.attached_opacity)?;

        let p = &self.plants;
        bounded("plants.count", p.count)?;
        ordered("plants.stem_height", p.stem_height_min, p.stem_height_max)?;
        ordered("plants.leaf_radius", p.leaf_radius_min, p.leaf_radius_max)?;
        ordered("plants.root_length", p.root_length_min, p.root_length_max)?;

        unit("highlight.white_blend", self.highlight.white_blend)?;
        Ok(())
    }
}
