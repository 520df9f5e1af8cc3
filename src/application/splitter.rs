use geo::{Distance, Euclidean, Length, Point};
use rayon::prelude::*;
use tracing::debug;

use crate::domain::{
    Coordinate, IntersectionRecord, NetworkConfig, Polyline, SplitFailure, SplitLengths, SplitResult,
};

const METRES_PER_KM: f64 = 1000.0;

/// Cuts `line` at every place it passes through `point` (within
/// `config.split_tolerance`).
///
/// A point touching consecutive pieces, such as one sitting on a shared
/// vertex, counts as a single contact. A point on the interior of the line
/// once gives two pieces; a line passing through it again gives more; a point
/// off the line, or on one of its ends, gives the untouched line.
pub fn split_at_point(line: &Polyline, point: Coordinate, config: &NetworkConfig) -> Vec<Polyline> {
    let coords = &line.0;
    let n = coords.len();
    if n < 2 || config.same_point(point, coords[0]) || config.same_point(point, coords[n - 1]) {
        return vec![line.clone()];
    }

    let target = Point::from(point);
    let touches: Vec<bool> = line
        .lines()
        .map(|piece| Euclidean.distance(&target, &piece) <= config.split_tolerance)
        .collect();

    // cut_inside[i]: cut within piece i; cut_at[k]: cut on vertex k
    let mut cut_inside = vec![false; n - 1];
    let mut cut_at = vec![false; n];
    let mut i = 0;
    while i < n - 1 {
        if !touches[i] {
            i += 1;
            continue;
        }
        let mut last = i;
        while last + 1 < n - 1 && touches[last + 1] {
            last += 1;
        }
        if last > i {
            cut_at[i + 1] = true;
        } else if config.same_point(point, coords[i + 1]) {
            cut_at[i + 1] = true;
        } else if config.same_point(point, coords[i]) {
            cut_at[i] = true;
        } else {
            cut_inside[i] = true;
        }
        i = last + 1;
    }

    let mut pieces: Vec<Polyline> = Vec::new();
    let mut current = vec![coords[0]];
    for i in 0..n - 1 {
        if cut_at[i] && i > 0 {
            pieces.push(std::mem::replace(&mut current, vec![coords[i]]).into());
        }
        if cut_inside[i] {
            current.push(point);
            pieces.push(std::mem::replace(&mut current, vec![point]).into());
        }
        current.push(coords[i + 1]);
    }
    pieces.push(current.into());
    pieces
}

fn km(line: &Polyline) -> f64 {
    Euclidean.length(line) / METRES_PER_KM
}

pub fn split_segment(record: &IntersectionRecord, config: &NetworkConfig) -> SplitResult {
    let (start_to_intersect, intersect_to_end) = if config.same_point(record.intersection, record.start) {
        (0.0, km(&record.line))
    } else if config.same_point(record.intersection, record.end) {
        (km(&record.line), 0.0)
    } else {
        let pieces = split_at_point(&record.line, record.intersection, config);
        if pieces.len() != 2 {
            debug!(
                "Segment {} did not split at ({}, {})",
                record.segment_id, record.intersection.x, record.intersection.y
            );
            return SplitResult::Failed(SplitFailure {
                segment_id: record.segment_id,
                line: record.line.clone(),
                intersection: record.intersection,
            });
        }
        (km(&pieces[0]), km(&pieces[1]))
    };

    SplitResult::Split(SplitLengths {
        segment_id: record.segment_id,
        start: record.start,
        intersection: record.intersection,
        end: record.end,
        start_to_intersect,
        intersect_to_end,
    })
}

/// Splits every record independently; output order matches input order.
pub fn split_segments(records: &[IntersectionRecord], config: &NetworkConfig) -> Vec<SplitResult> {
    records
        .par_iter()
        .map(|record| split_segment(record, config))
        .collect()
}
