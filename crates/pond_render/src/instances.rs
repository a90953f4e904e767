//! GPU instance packing of a `FrameSnapshot`.
//!
//! Items are grouped by mesh kind so the renderer issues one instanced
//! draw per batch.

use pond_core::snapshot::{FrameSnapshot, RenderKind};

/// Instance flag: item is under the pointer.
pub const FLAG_HIGHLIGHTED: u32 = 1;

/// Per-instance vertex data, 48 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderInstance {
    pub position: [f32; 3],
    pub heading: f32,
    pub scale: [f32; 3],
    pub opacity: f32,
    pub kind: u32,
    pub flags: u32,
    pub _pad: [u32; 2],
}

/// Contiguous range of instances sharing a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceBatch {
    pub kind: RenderKind,
    pub first: u32,
    pub count: u32,
}

/// Pack `snapshot` into instances sorted by kind, plus the draw batches.
/// Relative order within a kind is preserved.
pub fn pack(snapshot: &FrameSnapshot) -> (Vec<RenderInstance>, Vec<InstanceBatch>) {
    let mut order: Vec<usize> = (0..snapshot.items.len()).collect();
    order.sort_by_key(|&i| snapshot.items[i].kind.index());

    let mut instances = Vec::with_capacity(order.len());
    let mut batches: Vec<InstanceBatch> = Vec::new();
    for i in order {
        let item = &snapshot.items[i];
        let index = instances.len() as u32;
        match batches.last_mut() {
            Some(batch) if batch.kind == item.kind => batch.count += 1,
            _ => batches.push(InstanceBatch {
                kind: item.kind,
                first: index,
                count: 1,
            }),
        }
        instances.push(RenderInstance {
            position: item.position.to_array(),
            heading: item.heading,
            scale: item.scale.to_array(),
            opacity: item.opacity.clamp(0.0, 1.0),
            kind: item.kind.index(),
            flags: if item.highlighted { FLAG_HIGHLIGHTED } else { 0 },
            _pad: [0; 2],
        });
    }
    tracing::trace!(
        instances = instances.len(),
        batches = batches.len(),
        "snapshot packed"
    );
    (instances, batches)
}

/// Raw bytes for a buffer upload.
pub fn as_bytes(instances: &[RenderInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use pond_core::scene::{Category, EntityId};
    use pond_core::snapshot::RenderItem;

    fn item(id: u64, kind: RenderKind, highlighted: bool) -> RenderItem {
        RenderItem {
            id: EntityId::from_raw(id),
            kind,
            category: Some(Category::Fish),
            position: Vec3::new(id as f32, 0.0, 0.0),
            scale: Vec3::ONE,
            heading: 0.0,
            opacity: 1.5,
            highlighted,
        }
    }

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), 48);
    }

    #[test]
    fn test_batches_group_by_kind() {
        let snapshot = FrameSnapshot {
            frame: 3,
            elapsed_secs: 0.05,
            timescale: 0.0,
            bacteria_enabled: false,
            items: vec![
                item(1, RenderKind::Fish, false),
                item(2, RenderKind::Water, false),
                item(3, RenderKind::Fish, true),
            ],
        };
        let (instances, batches) = pack(&snapshot);
        assert_eq!(instances.len(), 3);
        assert_eq!(
            batches,
            vec![
                InstanceBatch {
                    kind: RenderKind::Water,
                    first: 0,
                    count: 1
                },
                InstanceBatch {
                    kind: RenderKind::Fish,
                    first: 1,
                    count: 2
                },
            ]
        );
        // Stable within a kind
        assert_eq!(instances[1].position[0], 1.0);
        assert_eq!(instances[2].position[0], 3.0);
        assert_eq!(instances[2].flags, FLAG_HIGHLIGHTED);
        assert_eq!(instances[1].opacity, 1.0);
        assert_eq!(as_bytes(&instances).len(), 3 * 48);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = FrameSnapshot {
            frame: 0,
            elapsed_secs: 0.0,
            timescale: 0.0,
            bacteria_enabled: false,
            items: Vec::new(),
        };
        let (instances, batches) = pack(&snapshot);
        assert!(instances.is_empty());
        assert!(batches.is_empty());
    }
}
