//! Static pond geometry: terrain layers, water surface, algae patch and the
//! riparian plants whose roots take up ammonium.
//!
//! Colliders approximate the lathed bowl meshes the renderer draws. The
//! topsoil is picked on its rim annulus, the deeper layers as stacked
//! cylinders under it.

use crate::config::{AlgaeConfig, PlantConfig, WaterConfig};
use crate::math::{PondRng, Vec3};
use crate::scene::{Category, Collider, IdAllocator, Material, MaterialSlot, SceneObject};
use crate::timescale::AlgaeState;

const TOPSOIL_COLOR: u32 = 0x85532d;
const SUBSOIL_COLOR: u32 = 0xc38a3a;
const BEDROCK_COLOR: u32 = 0x65400c;
const WATER_COLOR: u32 = 0x4fc3f7;
const ALGAE_COLOR: u32 = 0x6fcf97;
const STEM_COLOR: u32 = 0x3a5d2b;
const LEAF_COLOR: u32 = 0x2f6b34;
const ROOT_COLOR: u32 = 0x8b5e3c;

const BOWL_OUTER_RADIUS: f32 = 6.0;
const TOPSOIL_Y: f32 = -0.5;
const SUBSOIL_RADIUS: f32 = BOWL_OUTER_RADIUS * 0.97;
const SUBSOIL_TOP: f32 = -0.9;
const SUBSOIL_BOTTOM: f32 = -2.6;
const BEDROCK_RADIUS: f32 = BOWL_OUTER_RADIUS * 0.99;
const BEDROCK_BOTTOM: f32 = -3.25;

const ROOT_RADIUS: f32 = 0.03;

fn object(
    ids: &mut IdAllocator,
    category: Category,
    position: Vec3,
    collider: Collider,
    material: Material,
) -> SceneObject {
    SceneObject {
        id: ids.allocate(),
        category,
        position,
        collider,
        materials: MaterialSlot::Single(material),
    }
}

/// Topsoil, subsoil, bedrock and the water surface, in that order.
pub fn build_terrain(water: &WaterConfig, ids: &mut IdAllocator) -> Vec<SceneObject> {
    let topsoil_center = Vec3::new(0.0, TOPSOIL_Y, 0.0);
    let subsoil_center = Vec3::new(0.0, (SUBSOIL_TOP + SUBSOIL_BOTTOM) * 0.5, 0.0);
    let bedrock_center = Vec3::new(0.0, (SUBSOIL_BOTTOM + BEDROCK_BOTTOM) * 0.5, 0.0);
    let water_center = Vec3::new(0.0, water.surface_y, 0.0);

    vec![
        object(
            ids,
            Category::Topsoil,
            topsoil_center,
            Collider::Ring {
                center: topsoil_center,
                inner: water.radius,
                outer: BOWL_OUTER_RADIUS,
            },
            Material::from_hex(TOPSOIL_COLOR),
        ),
        object(
            ids,
            Category::Subsoil,
            subsoil_center,
            Collider::Cylinder {
                center: subsoil_center,
                radius: SUBSOIL_RADIUS,
                half_height: (SUBSOIL_TOP - SUBSOIL_BOTTOM) * 0.5,
            },
            Material::from_hex(SUBSOIL_COLOR),
        ),
        object(
            ids,
            Category::Bedrock,
            bedrock_center,
            Collider::Cylinder {
                center: bedrock_center,
                radius: BEDROCK_RADIUS,
                half_height: (SUBSOIL_BOTTOM - BEDROCK_BOTTOM) * 0.5,
            },
            Material::from_hex(BEDROCK_COLOR),
        ),
        object(
            ids,
            Category::Water,
            water_center,
            Collider::Disc {
                center: water_center,
                radius: water.radius,
            },
            Material::from_hex(WATER_COLOR).with_opacity(0.7),
        ),
    ]
}

/// Algae patch floating just above the water surface.
pub fn build_algae(
    water: &WaterConfig,
    config: &AlgaeConfig,
    state: AlgaeState,
    ids: &mut IdAllocator,
) -> SceneObject {
    let center = Vec3::new(0.0, water.surface_y + config.lift, 0.0);
    object(
        ids,
        Category::Algae,
        center,
        Collider::Disc {
            center,
            radius: state.radius(config),
        },
        Material::from_hex(ALGAE_COLOR).with_opacity(state.opacity),
    )
}

/// Push a new algae state into the patch's collider and material.
pub fn apply_algae_state(patch: &mut SceneObject, config: &AlgaeConfig, state: AlgaeState) {
    if let Collider::Disc { radius, .. } = &mut patch.collider {
        *radius = state.radius(config);
    }
    for material in patch.materials.as_mut_slice() {
        material.opacity = state.opacity;
    }
}

/// One riparian plant. Every part is tagged `Grass`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plant {
    pub stem: SceneObject,
    pub leaves: SceneObject,
    pub root: SceneObject,
}

impl Plant {
    pub fn parts(&self) -> [&SceneObject; 3] {
        [&self.stem, &self.leaves, &self.root]
    }

    pub fn parts_mut(&mut self) -> [&mut SceneObject; 3] {
        [&mut self.stem, &mut self.leaves, &mut self.root]
    }
}

/// Plants around the pond plus the root anchor points.
#[derive(Debug, Clone, Default)]
pub struct Plants {
    pub plants: Vec<Plant>,
    /// Root centres in creation order; ammonium ties resolve to the first.
    pub roots: Vec<Vec3>,
}

impl Plants {
    pub fn grow(
        config: &PlantConfig,
        water_radius: f32,
        ids: &mut IdAllocator,
        rng: &mut PondRng,
    ) -> Self {
        let inner = water_radius + config.ring_offset;
        let ground = config.ground_y;
        let mut plants = Vec::with_capacity(config.count);

        for _ in 0..config.count {
            let base = rng.ring_point(inner, inner + config.ring_width, ground);

            let stem_height = rng.range(config.stem_height_min, config.stem_height_max);
            let stem_radius = rng.range(0.05, 0.1);
            let stem_center = base + Vec3::new(0.0, stem_height * 0.5, 0.0);
            let stem = object(
                ids,
                Category::Grass,
                stem_center,
                Collider::Cylinder {
                    center: stem_center,
                    radius: stem_radius,
                    half_height: stem_height * 0.5,
                },
                Material::from_hex(STEM_COLOR),
            );

            let leaf_radius = rng.range(config.leaf_radius_min, config.leaf_radius_max);
            let leaf_center = base + Vec3::new(0.0, stem_height + leaf_radius * 0.5, 0.0);
            let leaves = object(
                ids,
                Category::Grass,
                leaf_center,
                Collider::Sphere {
                    center: leaf_center,
                    radius: leaf_radius,
                },
                Material::from_hex(LEAF_COLOR),
            );

            let root_length = rng.range(config.root_length_min, config.root_length_max);
            let root_center = base - Vec3::new(0.0, root_length * 0.5, 0.0);
            let root = object(
                ids,
                Category::Grass,
                root_center,
                Collider::Cylinder {
                    center: root_center,
                    radius: ROOT_RADIUS,
                    half_height: root_length * 0.5,
                },
                Material::from_hex(ROOT_COLOR),
            );
            plants.push(Plant { stem, leaves, root });
        }

        let roots = plants.iter().map(|p| p.root.position).collect();
        Self { plants, roots }
    }

    pub fn parts(&self) -> impl Iterator<Item = &SceneObject> + '_ {
        self.plants.iter().flat_map(|p| p.parts())
    }

    pub fn parts_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> + '_ {
        self.plants.iter_mut().flat_map(|p| p.parts_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{planar_distance, Ray};
    use crate::timescale::Timescale;

    #[test]
    fn test_terrain_layers_are_tagged() {
        let mut ids = IdAllocator::new();
        let terrain = build_terrain(&WaterConfig::default(), &mut ids);
        let categories: Vec<Category> = terrain.iter().map(|o| o.category).collect();
        assert_eq!(
            categories,
            vec![
                Category::Topsoil,
                Category::Subsoil,
                Category::Bedrock,
                Category::Water
            ]
        );
    }

    #[test]
    fn test_water_hit_from_above() {
        let mut ids = IdAllocator::new();
        let terrain = build_terrain(&WaterConfig::default(), &mut ids);
        let ray = Ray::new(Vec3::new(1.0, 5.0, 0.0), Vec3::NEG_Y).unwrap();
        let water = &terrain[3];
        let t = water.collider.intersect(&ray).unwrap();
        assert!((t - 5.75).abs() < 1e-5);
        // The topsoil rim has a hole over the water
        assert!(terrain[0].collider.intersect(&ray).is_none());
    }

    #[test]
    fn test_plants_ring_and_roots() {
        let config = PlantConfig::default();
        let mut ids = IdAllocator::new();
        let mut rng = PondRng::new(21);
        let plants = Plants::grow(&config, 3.7, &mut ids, &mut rng);
        assert_eq!(plants.parts().count(), 75);
        assert_eq!(plants.roots.len(), 25);
        assert!(plants.parts().all(|p| p.category == Category::Grass));
        for root in &plants.roots {
            let r = planar_distance(*root);
            assert!(r >= 4.0 - 1e-4 && r <= 4.3 + 1e-4);
            assert!(root.y <= -0.6 + 1e-6 && root.y >= -0.7 - 1e-6);
        }
        for (plant, root) in plants.plants.iter().zip(&plants.roots) {
            assert_eq!(plant.root.position, *root);
            assert!(plant.stem.position.y > plant.root.position.y);
            assert!(plant.leaves.position.y > plant.stem.position.y);
        }
    }

    #[test]
    fn test_algae_follows_state() {
        let water = WaterConfig::default();
        let config = AlgaeConfig::default();
        let mut ids = IdAllocator::new();
        let mut patch = build_algae(&water, &config, AlgaeState::at(Timescale::new(0.0), &config), &mut ids);
        assert_eq!(patch.materials.max_opacity(), 0.5);

        let bloom = AlgaeState::at(Timescale::new(1.0), &config);
        apply_algae_state(&mut patch, &config, bloom);
        assert_eq!(patch.materials.max_opacity(), bloom.opacity);
        match patch.collider {
            Collider::Disc { radius, .. } => assert!((radius - 1.2 * bloom.scale).abs() < 1e-5),
            other => panic!("unexpected collider {other:?}"),
        }
    }
}
