//! Scene vocabulary shared by every system: entity handles, semantic
//! categories, materials and pick colliders.

use crate::math::{planar_distance, Ray, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque entity handle.
///
/// Handles are never reused within one simulation, including across
/// resets, so a stale hover target can never alias a new object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic handle allocator.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next_id: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    pub fn allocate(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Semantic category of a pickable object. Attached at construction, so
/// every sub-part of a plant or fish resolves without a hierarchy walk.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Water,
    Topsoil,
    Subsoil,
    Bedrock,
    Algae,
    Grass,
    Fish,
    Bacteria,
    Ammonium,
    Nitrate,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Water,
        Category::Topsoil,
        Category::Subsoil,
        Category::Bedrock,
        Category::Algae,
        Category::Grass,
        Category::Fish,
        Category::Bacteria,
        Category::Ammonium,
        Category::Nitrate,
    ];

    /// Label used as the info-table key.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Water => "Water",
            Category::Topsoil => "Topsoil",
            Category::Subsoil => "Subsoil",
            Category::Bedrock => "Bedrock",
            Category::Algae => "Algae",
            Category::Grass => "Grass",
            Category::Fish => "Fish",
            Category::Bacteria => "Bacteria",
            Category::Ammonium => "Ammonium",
            Category::Nitrate => "Nitrate",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.label() == label)
            .ok_or(())
    }
}

/// Surface properties the simulation and the highlight pass touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub opacity: f32,
}

impl Material {
    /// Opaque, non-emissive material from a `0xRRGGBB` colour.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            color: hex_to_rgb(hex),
            emissive: Vec3::ZERO,
            emissive_intensity: 0.0,
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

pub fn hex_to_rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// An object carries either one material or one per sub-mesh.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialSlot {
    Single(Material),
    Multi(Vec<Material>),
}

impl MaterialSlot {
    pub fn as_slice(&self) -> &[Material] {
        match self {
            MaterialSlot::Single(material) => std::slice::from_ref(material),
            MaterialSlot::Multi(materials) => materials,
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [Material] {
        match self {
            MaterialSlot::Single(material) => std::slice::from_mut(material),
            MaterialSlot::Multi(materials) => materials,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Opacity of the most opaque material, used for the render snapshot.
    pub fn max_opacity(&self) -> f32 {
        self.as_slice()
            .iter()
            .map(|m| m.opacity)
            .fold(0.0, f32::max)
    }
}

/// World-space intersection volume for picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    Sphere { center: Vec3, radius: f32 },
    /// Horizontal disc facing +Y.
    Disc { center: Vec3, radius: f32 },
    /// Horizontal annulus facing +Y.
    Ring { center: Vec3, inner: f32, outer: f32 },
    /// Capped cylinder aligned with the Y axis.
    Cylinder {
        center: Vec3,
        radius: f32,
        half_height: f32,
    },
}

const PARALLEL_EPSILON: f32 = 1e-6;

fn plane_hit(ray: &Ray, y: f32) -> Option<f32> {
    if ray.direction.y.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = (y - ray.origin.y) / ray.direction.y;
    (t >= 0.0).then_some(t)
}

impl Collider {
    /// Distance along `ray` to the first intersection, if any.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        match *self {
            Collider::Sphere { center, radius } => {
                let oc = ray.origin - center;
                let b = oc.dot(ray.direction);
                let c = oc.length_squared() - radius * radius;
                let disc = b * b - c;
                if disc < 0.0 {
                    return None;
                }
                let sqrt = disc.sqrt();
                let near = -b - sqrt;
                let far = -b + sqrt;
                if near >= 0.0 {
                    Some(near)
                } else if far >= 0.0 {
                    Some(far)
                } else {
                    None
                }
            }
            Collider::Disc { center, radius } => {
                let t = plane_hit(ray, center.y)?;
                (planar_distance(ray.at(t) - center) <= radius).then_some(t)
            }
            Collider::Ring {
                center,
                inner,
                outer,
            } => {
                let t = plane_hit(ray, center.y)?;
                let d = planar_distance(ray.at(t) - center);
                (d >= inner && d <= outer).then_some(t)
            }
            Collider::Cylinder {
                center,
                radius,
                half_height,
            } => {
                let mut best: Option<f32> = None;
                let mut consider = |t: f32| {
                    if t >= 0.0 && best.map_or(true, |b| t < b) {
                        best = Some(t);
                    }
                };

                // Curved wall
                let ox = ray.origin.x - center.x;
                let oz = ray.origin.z - center.z;
                let (dx, dz) = (ray.direction.x, ray.direction.z);
                let a = dx * dx + dz * dz;
                if a > PARALLEL_EPSILON {
                    let b = ox * dx + oz * dz;
                    let c = ox * ox + oz * oz - radius * radius;
                    let disc = b * b - a * c;
                    if disc >= 0.0 {
                        let sqrt = disc.sqrt();
                        for t in [(-b - sqrt) / a, (-b + sqrt) / a] {
                            let y = ray.origin.y + ray.direction.y * t;
                            if (y - center.y).abs() <= half_height {
                                consider(t);
                            }
                        }
                    }
                }

                // Caps
                for cap_y in [center.y - half_height, center.y + half_height] {
                    if let Some(t) = plane_hit(ray, cap_y) {
                        if planar_distance(ray.at(t) - center) <= radius {
                            consider(t);
                        }
                    }
                }
                best
            }
        }
    }
}

/// Static, pickable scene object (terrain layers, water, algae, plant parts).
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: EntityId,
    pub category: Category,
    pub position: Vec3,
    pub collider: Collider,
    pub materials: MaterialSlot,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_ray(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y).unwrap()
    }

    #[test]
    fn test_category_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>(), Ok(category));
        }
        assert!("Seaweed".parse::<Category>().is_err());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids = IdAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_sphere_hit_distance() {
        let collider = Collider::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        };
        let t = collider.intersect(&down_ray(0.0, 0.0)).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
        assert!(collider.intersect(&down_ray(2.0, 0.0)).is_none());
    }

    #[test]
    fn test_ring_excludes_hole() {
        let collider = Collider::Ring {
            center: Vec3::ZERO,
            inner: 1.0,
            outer: 2.0,
        };
        assert!(collider.intersect(&down_ray(0.5, 0.0)).is_none());
        assert!(collider.intersect(&down_ray(1.5, 0.0)).is_some());
        assert!(collider.intersect(&down_ray(2.5, 0.0)).is_none());
    }

    #[test]
    fn test_cylinder_wall_and_cap() {
        let collider = Collider::Cylinder {
            center: Vec3::ZERO,
            radius: 1.0,
            half_height: 1.0,
        };
        // Top cap from above
        let t = collider.intersect(&down_ray(0.0, 0.0)).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
        // Wall from the side
        let side = Ray::new(Vec3::new(-5.0, 0.5, 0.0), Vec3::X).unwrap();
        let t = collider.intersect(&side).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
        // Passing above
        let over = Ray::new(Vec3::new(-5.0, 1.5, 0.0), Vec3::X).unwrap();
        assert!(collider.intersect(&over).is_none());
    }

    #[test]
    fn test_material_slot_views() {
        let mut single = MaterialSlot::Single(Material::from_hex(0xff0000));
        assert_eq!(single.len(), 1);
        single.as_mut_slice()[0].opacity = 0.25;
        assert_eq!(single.max_opacity(), 0.25);

        let multi = MaterialSlot::Multi(vec![
            Material::from_hex(0x000000).with_opacity(0.2),
            Material::from_hex(0xffffff).with_opacity(0.7),
        ]);
        assert_eq!(multi.len(), 2);
        assert_eq!(multi.max_opacity(), 0.7);
        assert_eq!(multi.as_slice()[1].color, Vec3::ONE);
    }
}
