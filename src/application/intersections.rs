use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use hashbrown::{HashMap, HashSet};
use rayon::prelude::*;
use tracing::debug;

use crate::domain::{Coordinate, IntersectionRecord, NetworkConfig, NodeKey, Polyline, Segment, SegmentId};
use crate::infrastructure::SpatialIndex;

/// Returns the intersection of two polylines when it is exactly one point.
///
/// Collinear overlaps of positive length, and contacts at more than one
/// distinct point, yield `None`.
pub fn single_point_intersection(
    a: &Polyline,
    b: &Polyline,
    config: &NetworkConfig,
) -> Option<Coordinate> {
    let mut found: Option<(NodeKey, Coordinate)> = None;
    for la in a.lines() {
        for lb in b.lines() {
            let point = match line_intersection(la, lb) {
                None => continue,
                Some(LineIntersection::SinglePoint { intersection, .. }) => intersection,
                Some(LineIntersection::Collinear { intersection }) => {
                    if !config.same_point(intersection.start, intersection.end) {
                        return None;
                    }
                    intersection.start
                }
            };
            let key = config.key(point);
            match found {
                None => found = Some((key, point)),
                Some((k, _)) if k == key => {}
                Some(_) => return None,
            }
        }
    }
    found.map(|(_, c)| c)
}

/// Finds every pair of segments meeting in a single point and emits one record
/// per participating segment.
///
/// Pairs are enumerated with the partner id strictly greater, so each
/// unordered pair is tested once. Records come out in (segment, partner)
/// enumeration order; repeated (segment, point) records keep the first.
pub fn detect_intersections(
    segments: &[Segment],
    index: &impl SpatialIndex,
    config: &NetworkConfig,
) -> Vec<IntersectionRecord> {
    let by_id: HashMap<SegmentId, &Segment> = segments.iter().map(|s| (s.id, s)).collect();

    let hits: Vec<(SegmentId, SegmentId, Coordinate)> = segments
        .par_iter()
        .flat_map_iter(|segment| {
            let by_id = &by_id;
            index
                .candidates(&segment.bbox())
                .into_iter()
                .filter(move |&other_id| other_id > segment.id)
                .filter_map(move |other_id| {
                    let other = by_id.get(&other_id)?;
                    single_point_intersection(&segment.line, &other.line, config)
                        .map(|p| (segment.id, other_id, p))
                })
        })
        .collect();
    debug!("{} intersecting segment pairs", hits.len());

    let mut seen: HashSet<(SegmentId, NodeKey)> = HashSet::new();
    let mut records = Vec::with_capacity(hits.len() * 2);
    for (a, b, point) in hits {
        for id in [a, b] {
            if !seen.insert((id, config.key(point))) {
                continue;
            }
            let segment = by_id[&id];
            records.push(IntersectionRecord {
                segment_id: id,
                intersection: point,
                start: segment.start,
                end: segment.end,
                line: segment.line.clone(),
            });
        }
    }
    records
}
