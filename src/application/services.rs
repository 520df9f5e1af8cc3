use tracing::{info, warn};

use crate::application::{
    assemble_edges, build_graph, detect_intersections, normalize, split_segments,
};
use crate::domain::{
    Edge, EdgeRow, GeometrySource, NetworkConfig, NetworkError, PipelineStats, RoadGraph,
    SplitFailure, SplitResult,
};
use crate::infrastructure::RTreeIndex;

const GEOGRAPHIC_CRS: &[&str] = &["EPSG:4326", "EPSG:4269", "EPSG:4258", "OGC:CRS84", "CRS84"];

#[derive(Clone, Debug)]
pub struct NetworkOutput {
    pub crs: String,
    pub edges: Vec<Edge>,
    pub split_failures: Vec<SplitFailure>,
    pub graph: RoadGraph,
    pub stats: PipelineStats,
}

impl NetworkOutput {
    pub fn edge_table(&self) -> Vec<EdgeRow> {
        self.edges.iter().map(EdgeRow::from).collect()
    }
}

/// Picks the CRS the run operates in. An explicit CRS wins over the declared
/// one; coordinates are assumed to already be expressed in it.
pub fn resolve_projection(
    declared: Option<&str>,
    explicit: Option<&str>,
) -> Result<String, NetworkError> {
    let crs = match (declared, explicit) {
        (_, Some(explicit)) => {
            if let Some(declared) = declared.filter(|d| !d.eq_ignore_ascii_case(explicit)) {
                warn!("Declared CRS {declared} overridden by {explicit}, no reprojection is done");
            }
            explicit
        }
        (Some(declared), None) => declared,
        (None, None) => return Err(NetworkError::MissingProjection),
    };
    let crs = crs.trim();
    if crs.is_empty() {
        return Err(NetworkError::MissingProjection);
    }
    if GEOGRAPHIC_CRS.iter().any(|g| g.eq_ignore_ascii_case(crs)) {
        return Err(NetworkError::GeographicProjection {
            crs: crs.to_string(),
        });
    }
    Ok(crs.to_string())
}

/// Runs the whole geometry-to-graph pipeline. Only a missing or unusable
/// projection aborts; every other problem is filtered and counted.
pub fn build_network(
    source: &GeometrySource,
    explicit_crs: Option<&str>,
    config: &NetworkConfig,
) -> Result<NetworkOutput, NetworkError> {
    let crs = resolve_projection(source.crs.as_deref(), explicit_crs)?;
    let mut stats = PipelineStats {
        input_records: source.geometries.len(),
        ..PipelineStats::default()
    };

    let normalized = normalize(&source.geometries, config);
    stats.multi_part_excluded = normalized.multi_part_excluded;
    stats.too_short_excluded = normalized.too_short_excluded;
    stats.duplicates_removed = normalized.duplicates_removed;
    stats.contained_removed = normalized.contained_removed;
    stats.segments = normalized.segments.len();
    info!(
        "Cleaned {} records into {} segments ({} multi-part, {} too short, {} duplicate, {} contained removed)",
        stats.input_records,
        stats.segments,
        stats.multi_part_excluded,
        stats.too_short_excluded,
        stats.duplicates_removed,
        stats.contained_removed
    );

    let index = RTreeIndex::build(&normalized.segments);
    let records = detect_intersections(&normalized.segments, &index, config);
    stats.intersection_records = records.len();
    info!("Found {} intersection records", records.len());

    let results = split_segments(&records, config);
    let split_failures: Vec<SplitFailure> = results
        .iter()
        .filter_map(|r| match r {
            SplitResult::Failed(f) => Some(f.clone()),
            SplitResult::Split(_) => None,
        })
        .collect();
    stats.split_failures = split_failures.len();
    if !split_failures.is_empty() {
        warn!("{} segments could not be split at their intersection", split_failures.len());
    }

    let assembled = assemble_edges(&results, config);
    stats.degenerate_edges = assembled.degenerate;
    stats.duplicate_connections = assembled.duplicates;
    stats.edges = assembled.edges.len();

    let graph = build_graph(&assembled.edges, &[], config);
    stats.nodes = graph.node_count();
    info!(
        "Built graph with {} nodes and {} edges ({} degenerate, {} duplicate connections dropped)",
        graph.node_count(),
        graph.edge_count(),
        stats.degenerate_edges,
        stats.duplicate_connections
    );

    Ok(NetworkOutput {
        crs,
        edges: assembled.edges,
        split_failures,
        graph,
        stats,
    })
}
