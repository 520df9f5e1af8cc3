use geo::{LineString, Relate};
use hashbrown::HashSet;
use tracing::debug;

use crate::domain::{NetworkConfig, NodeKey, Polyline, RawGeometry, RawPosition, Segment, SegmentId};
use crate::infrastructure::{RTreeIndex, SpatialIndex};

#[derive(Clone, Debug, Default)]
pub struct NormalizedSegments {
    pub segments: Vec<Segment>,
    pub multi_part_excluded: usize,
    pub duplicates_removed: usize,
    pub contained_removed: usize,
    pub too_short_excluded: usize,
}

fn drop_z(positions: &[RawPosition]) -> Polyline {
    positions.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>().into()
}

/// Cleans raw geometries into id-stamped segments.
///
/// Multi-part lines are excluded, exact duplicates keep their first
/// occurrence, ids are assigned 1-based in input order, and any segment lying
/// wholly within another is removed. Segments sharing one footprint lie
/// within each other, so all of them are removed. Lines with fewer than two
/// positions are skipped.
pub fn normalize(geometries: &[RawGeometry], config: &NetworkConfig) -> NormalizedSegments {
    let mut out = NormalizedSegments::default();

    let mut seen: HashSet<Vec<NodeKey>> = HashSet::new();
    let mut lines: Vec<Polyline> = Vec::new();
    for geometry in geometries {
        let line = match geometry {
            RawGeometry::Line(positions) if positions.len() < 2 => {
                debug!("Skipping line with {} positions", positions.len());
                out.too_short_excluded += 1;
                continue;
            }
            RawGeometry::Line(positions) => drop_z(positions),
            RawGeometry::MultiLine(parts) => {
                debug!("Excluding multi-part line with {} parts", parts.len());
                out.multi_part_excluded += 1;
                continue;
            }
        };
        let key: Vec<NodeKey> = line.coords().map(|c| config.key(*c)).collect();
        if !seen.insert(key) {
            out.duplicates_removed += 1;
            continue;
        }
        lines.push(line);
    }

    let segments: Vec<Segment> = lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| Segment::new(i as SegmentId + 1, line))
        .collect();

    let contained = contained_segments(&segments, &RTreeIndex::build(&segments));
    out.contained_removed = contained.len();
    out.segments = segments
        .into_iter()
        .filter(|s| !contained.contains(&s.id))
        .collect();
    out
}

fn contained_segments(segments: &[Segment], index: &impl SpatialIndex) -> HashSet<SegmentId> {
    let mut contained = HashSet::new();
    for segment in segments {
        for other_id in index.candidates(&segment.bbox()) {
            if other_id == segment.id {
                continue;
            }
            // ids are still 1-based and dense here
            let other = &segments[(other_id - 1) as usize];
            if !is_within(&segment.line, &other.line) {
                continue;
            }
            debug!("Segment {} lies within segment {}", segment.id, other_id);
            contained.insert(segment.id);
            break;
        }
    }
    contained
}

fn is_within(a: &LineString<f64>, b: &LineString<f64>) -> bool {
    a.relate(b).is_within()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: &[(f64, f64)]) -> RawGeometry {
        RawGeometry::Line(
            points
                .iter()
                .map(|&(x, y)| RawPosition { x, y, z: None })
                .collect(),
        )
    }

    #[test]
    fn drops_elevation() {
        let raw = RawGeometry::Line(vec![
            RawPosition { x: 0.0, y: 0.0, z: Some(12.0) },
            RawPosition { x: 3.0, y: 4.0, z: Some(15.0) },
        ]);
        let out = normalize(&[raw], &NetworkConfig::default());
        assert_eq!(out.segments.len(), 1);
        let coords: Vec<(f64, f64)> = out.segments[0].line.coords().map(|c| (c.x, c.y)).collect();
        assert_eq!(coords, vec![(0.0, 0.0), (3.0, 4.0)]);
    }

    #[test]
    fn excludes_multi_part_lines() {
        let multi = RawGeometry::MultiLine(vec![
            vec![RawPosition { x: 0.0, y: 0.0, z: None }, RawPosition { x: 1.0, y: 0.0, z: None }],
            vec![RawPosition { x: 5.0, y: 0.0, z: None }, RawPosition { x: 6.0, y: 0.0, z: None }],
        ]);
        let out = normalize(&[multi, line(&[(0.0, 1.0), (1.0, 1.0)])], &NetworkConfig::default());
        assert_eq!(out.multi_part_excluded, 1);
        assert_eq!(out.segments.len(), 1);
        assert_eq!(out.segments[0].id, 1);
    }

    #[test]
    fn removes_duplicates_keeping_first_and_assigns_ids() {
        let raws = vec![
            line(&[(0.0, 0.0), (10.0, 0.0)]),
            line(&[(0.0, 5.0), (10.0, 5.0)]),
            line(&[(0.0, 0.0), (10.0, 0.0)]),
            line(&[(0.0, 9.0), (10.0, 9.0)]),
        ];
        let out = normalize(&raws, &NetworkConfig::default());
        assert_eq!(out.duplicates_removed, 1);
        let ids: Vec<SegmentId> = out.segments.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(out.segments[2].start, geo::coord! { x: 0.0, y: 9.0 });
    }

    #[test]
    fn removes_collinear_contained_segment() {
        let raws = vec![
            line(&[(0.0, 0.0), (10.0, 0.0)]),
            line(&[(10.0, 0.0), (20.0, 0.0)]),
            line(&[(2.0, 0.0), (5.0, 0.0)]),
        ];
        let out = normalize(&raws, &NetworkConfig::default());
        assert_eq!(out.contained_removed, 1);
        let ids: Vec<SegmentId> = out.segments.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn overlapping_segments_are_kept() {
        let raws = vec![
            line(&[(0.0, 0.0), (10.0, 0.0)]),
            line(&[(5.0, 0.0), (15.0, 0.0)]),
        ];
        let out = normalize(&raws, &NetworkConfig::default());
        assert_eq!(out.contained_removed, 0);
        assert_eq!(out.segments.len(), 2);
    }

    #[test]
    fn segments_sharing_a_footprint_are_both_removed() {
        let raws = vec![
            line(&[(0.0, 0.0), (10.0, 0.0)]),
            line(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]),
            line(&[(20.0, 0.0), (30.0, 0.0)]),
            line(&[(30.0, 0.0), (20.0, 0.0)]),
            line(&[(0.0, 5.0), (10.0, 5.0)]),
        ];
        let out = normalize(&raws, &NetworkConfig::default());
        assert_eq!(out.duplicates_removed, 0);
        assert_eq!(out.contained_removed, 4);
        let ids: Vec<SegmentId> = out.segments.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![5]);
    }

    #[test]
    fn skips_lines_without_two_positions() {
        let raws = vec![
            RawGeometry::Line(vec![]),
            line(&[(1.0, 1.0)]),
            line(&[(0.0, 0.0), (1.0, 0.0)]),
        ];
        let out = normalize(&raws, &NetworkConfig::default());
        assert_eq!(out.too_short_excluded, 2);
        assert_eq!(out.segments.len(), 1);
        assert_eq!(out.segments[0].id, 1);
    }

    #[test]
    fn records_endpoints() {
        let out = normalize(&[line(&[(1.0, 2.0), (3.0, 4.0), (5.0, 1.0)])], &NetworkConfig::default());
        let s = &out.segments[0];
        assert_eq!((s.start.x, s.start.y), (1.0, 2.0));
        assert_eq!((s.end.x, s.end.y), (5.0, 1.0));
    }
}
