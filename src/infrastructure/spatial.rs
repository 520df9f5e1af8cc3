use rstar::{RTree, RTreeObject, AABB};

use crate::domain::{BoundingBox, Segment, SegmentId};

/// Coarse filter: ids of segments whose bounding box may overlap `bbox`.
///
/// Implementations must return ids in ascending order and must be safe to
/// query concurrently once built.
pub trait SpatialIndex: Sync {
    fn candidates(&self, bbox: &BoundingBox) -> Vec<SegmentId>;
}

#[derive(Clone, Debug)]
pub struct SpatialSegment {
    pub min: [f64; 2],
    pub max: [f64; 2],
    pub id: SegmentId,
}

impl RTreeObject for SpatialSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

pub struct RTreeIndex {
    tree: RTree<SpatialSegment>,
}

impl RTreeIndex {
    pub fn build(segments: &[Segment]) -> Self {
        let entries = segments
            .iter()
            .map(|s| {
                let bbox = s.bbox();
                SpatialSegment {
                    min: bbox.min,
                    max: bbox.max,
                    id: s.id,
                }
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl SpatialIndex for RTreeIndex {
    fn candidates(&self, bbox: &BoundingBox) -> Vec<SegmentId> {
        let envelope = AABB::from_corners(bbox.min, bbox.max);
        let mut ids: Vec<SegmentId> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|s| s.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}
