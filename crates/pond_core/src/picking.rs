//! Pointer picking: screen coordinate → world ray → nearest tagged object,
//! plus the tooltip and info-panel views built from a hit.

use crate::info;
use crate::math::{Ray, Vec2};
use crate::scene::{Category, Collider, EntityId};

/// Screen rectangle the scene is drawn into, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            return 1.0;
        }
        self.width / self.height
    }

    /// Normalized device coordinates in `[-1, 1]`, +Y up. `None` for an
    /// empty viewport.
    pub fn to_ndc(&self, pointer: Vec2) -> Option<Vec2> {
        if self.is_empty() {
            return None;
        }
        Some(Vec2::new(
            (pointer.x - self.x) / self.width * 2.0 - 1.0,
            -((pointer.y - self.y) / self.height) * 2.0 + 1.0,
        ))
    }
}

/// Turns a pointer position into a world-space ray. Implemented by the
/// camera.
pub trait RayCaster {
    fn ray_from_pointer(&self, pointer: Vec2, viewport: &Viewport) -> Option<Ray>;
}

/// One entry in the pick set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickTarget {
    pub id: EntityId,
    pub category: Category,
    pub collider: Collider,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub id: EntityId,
    pub category: Category,
    pub distance: f32,
}

/// Nearest target along `ray`. Ties keep the earlier target.
pub fn pick_nearest<I>(ray: &Ray, targets: I) -> Option<PickHit>
where
    I: IntoIterator<Item = PickTarget>,
{
    let mut best: Option<PickHit> = None;
    for target in targets {
        let Some(distance) = target.collider.intersect(ray) else {
            continue;
        };
        if best.map_or(true, |hit| distance < hit.distance) {
            best = Some(PickHit {
                id: target.id,
                category: target.category,
                distance,
            });
        }
    }
    best
}

/// Vertical offset of the tooltip above the pointer, in pixels.
pub const TOOLTIP_OFFSET_Y: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipView {
    pub label: &'static str,
    pub title: &'static str,
    pub position: Vec2,
}

impl TooltipView {
    pub fn new(category: Category, pointer: Vec2) -> Self {
        Self::for_label(category.label(), pointer)
    }

    /// Tooltip for a raw label; labels outside the info table show "Unknown".
    pub fn for_label(label: &str, pointer: Vec2) -> Self {
        let entry = info::lookup(label);
        Self {
            label: entry.label,
            title: entry.title,
            position: Vec2::new(pointer.x, pointer.y - TOOLTIP_OFFSET_Y),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfoPanelView {
    pub label: &'static str,
    pub title: &'static str,
    pub text: &'static str,
}

impl InfoPanelView {
    pub fn new(category: Category) -> Self {
        Self::for_label(category.label())
    }

    /// Panel for a raw label; labels outside the info table get the
    /// generic fallback text.
    pub fn for_label(label: &str) -> Self {
        let entry = info::lookup(label);
        Self {
            label: entry.label,
            title: entry.title,
            text: entry.text,
        }
    }
}

/// What the pointer UI currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerUi {
    pub tooltip: Option<TooltipView>,
    pub info_panel: Option<InfoPanelView>,
}
