//! Per-frame render snapshot handed to the renderer.

use crate::math::Vec3;
use crate::scene::{Category, Collider, EntityId};

/// Which mesh the renderer draws for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderKind {
    Topsoil,
    Subsoil,
    Bedrock,
    Water,
    Algae,
    Stem,
    Leaves,
    Root,
    Fish,
    Nitrate,
    Bubble,
    Bacterium,
    Ammonium,
}

impl RenderKind {
    pub const COUNT: usize = 13;

    /// Stable index for instance buffers.
    pub fn index(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub id: EntityId,
    pub kind: RenderKind,
    /// `None` for cosmetic items (bubbles).
    pub category: Option<Category>,
    pub position: Vec3,
    pub scale: Vec3,
    /// Rotation about +Y in radians.
    pub heading: f32,
    pub opacity: f32,
    pub highlighted: bool,
}

/// Extent of a collider, used as the instance scale of static objects.
pub fn collider_scale(collider: &Collider) -> Vec3 {
    match *collider {
        Collider::Sphere { radius, .. } => Vec3::splat(radius),
        Collider::Disc { radius, .. } => Vec3::new(radius, 1.0, radius),
        Collider::Ring { outer, .. } => Vec3::new(outer, 1.0, outer),
        Collider::Cylinder {
            radius,
            half_height,
            ..
        } => Vec3::new(radius, half_height * 2.0, radius),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub elapsed_secs: f64,
    pub timescale: f32,
    pub bacteria_enabled: bool,
    pub items: Vec<RenderItem>,
}

impl FrameSnapshot {
    pub fn of_kind(&self, kind: RenderKind) -> impl Iterator<Item = &RenderItem> + '_ {
        self.items.iter().filter(move |item| item.kind == kind)
    }

    pub fn count(&self, kind: RenderKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn highlighted(&self) -> Option<&RenderItem> {
        self.items.iter().find(|item| item.highlighted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cylinder_scale_is_full_height() {
        let scale = collider_scale(&Collider::Cylinder {
            center: Vec3::ZERO,
            radius: 0.03,
            half_height: 0.15,
        });
        assert_eq!(scale, Vec3::new(0.03, 0.3, 0.03));
    }

    #[test]
    fn test_kind_indices_are_dense() {
        assert_eq!(RenderKind::Topsoil.index(), 0);
        assert_eq!(RenderKind::Ammonium.index() as usize, RenderKind::COUNT - 1);
    }
}
