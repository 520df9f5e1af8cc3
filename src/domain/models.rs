use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

/// Planar (x, y) position in a projected, metre-based CRS.
pub type Coordinate = Coord<f64>;
pub type Polyline = LineString<f64>;
pub type SegmentId = u64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawPosition {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

/// Geometry as delivered by a source, before any cleaning.
#[derive(Clone, Debug, PartialEq)]
pub enum RawGeometry {
    Line(Vec<RawPosition>),
    MultiLine(Vec<Vec<RawPosition>>),
}

/// Everything a geometry source hands to the pipeline.
#[derive(Clone, Debug, Default)]
pub struct GeometrySource {
    pub crs: Option<String>,
    pub geometries: Vec<RawGeometry>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl BoundingBox {
    pub fn of(line: &Polyline) -> Self {
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        for c in line.coords() {
            min[0] = min[0].min(c.x);
            min[1] = min[1].min(c.y);
            max[0] = max[0].max(c.x);
            max[1] = max[1].max(c.y);
        }
        Self { min, max }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub id: SegmentId,
    pub line: Polyline,
    pub start: Coordinate,
    pub end: Coordinate,
}

impl Segment {
    /// `line` must hold at least two coordinates.
    pub fn new(id: SegmentId, line: Polyline) -> Self {
        let start = line.0[0];
        let end = line.0[line.0.len() - 1];
        Self { id, line, start, end }
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::of(&self.line)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionRecord {
    pub segment_id: SegmentId,
    pub intersection: Coordinate,
    pub start: Coordinate,
    pub end: Coordinate,
    pub line: Polyline,
}

/// Both sub-lengths of a segment cut at one intersection, in kilometres.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitLengths {
    pub segment_id: SegmentId,
    pub start: Coordinate,
    pub intersection: Coordinate,
    pub end: Coordinate,
    pub start_to_intersect: f64,
    pub intersect_to_end: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SplitFailure {
    pub segment_id: SegmentId,
    pub line: Polyline,
    pub intersection: Coordinate,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SplitResult {
    Split(SplitLengths),
    Failed(SplitFailure),
}

/// Undirected connection; `distance` is in kilometres and strictly positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub start: Coordinate,
    pub end: Coordinate,
    pub distance: f64,
}

/// One row of the exported edge table.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct EdgeRow {
    pub startnode_x: f64,
    pub startnode_y: f64,
    pub endnode_x: f64,
    pub endnode_y: f64,
    pub distance: f64,
}

impl From<&Edge> for EdgeRow {
    fn from(edge: &Edge) -> Self {
        Self {
            startnode_x: edge.start.x,
            startnode_y: edge.start.y,
            endnode_x: edge.end.x,
            endnode_y: edge.end.y,
            distance: edge.distance,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub input_records: usize,
    pub multi_part_excluded: usize,
    pub too_short_excluded: usize,
    pub duplicates_removed: usize,
    pub contained_removed: usize,
    pub segments: usize,
    pub intersection_records: usize,
    pub split_failures: usize,
    pub degenerate_edges: usize,
    pub duplicate_connections: usize,
    pub edges: usize,
    pub nodes: usize,
}
