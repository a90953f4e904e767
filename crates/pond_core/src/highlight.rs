//! Hover highlight with exact restore.

use crate::config::HighlightConfig;
use crate::math::Vec3;
use crate::scene::{EntityId, MaterialSlot};

/// Emissive values of one material before it was highlighted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissiveSnapshot {
    pub emissive: Vec3,
    pub intensity: f32,
}

/// At most one highlighted entity, plus the values to put back.
#[derive(Debug, Clone, Default)]
pub struct HighlightState {
    hovered: Option<EntityId>,
    saved: Option<Vec<EmissiveSnapshot>>,
}

impl HighlightState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<EntityId> {
        self.hovered
    }

    pub fn is_highlighted(&self) -> bool {
        self.hovered.is_some()
    }

    /// Highlight `id`. The snapshot is taken only on the first call; a
    /// repeated highlight before `clear` keeps the original values.
    ///
    /// Callers must `clear` a different hovered entity first.
    pub fn apply(&mut self, id: EntityId, slot: &mut MaterialSlot, config: &HighlightConfig) {
        debug_assert!(
            self.hovered.map_or(true, |current| current == id),
            "highlight applied to {id} while another entity is hovered"
        );
        if self.saved.is_none() {
            self.saved = Some(
                slot.as_slice()
                    .iter()
                    .map(|m| EmissiveSnapshot {
                        emissive: m.emissive,
                        intensity: m.emissive_intensity,
                    })
                    .collect(),
            );
        }
        self.hovered = Some(id);

        let Some(saved) = self.saved.as_ref() else {
            return;
        };
        for (material, original) in slot.as_mut_slice().iter_mut().zip(saved) {
            material.emissive =
                original.emissive * (1.0 - config.white_blend) + Vec3::ONE * config.white_blend;
            material.emissive_intensity = config.strength;
        }
    }

    /// Restore the snapshot onto `slot` and forget it. Pass `None` when the
    /// hovered entity no longer exists.
    pub fn clear(&mut self, slot: Option<&mut MaterialSlot>) {
        let saved = self.saved.take();
        self.hovered = None;
        let (Some(slot), Some(saved)) = (slot, saved) else {
            return;
        };
        for (material, original) in slot.as_mut_slice().iter_mut().zip(saved) {
            material.emissive = original.emissive;
            material.emissive_intensity = original.intensity;
        }
    }

    /// Drop the hover target without touching any material (scene rebuilt).
    pub fn forget(&mut self) {
        self.hovered = None;
        self.saved = None;
    }
}
