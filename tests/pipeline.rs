use road_network_graph::application::build_network;
use road_network_graph::domain::{
    GeometrySource, NetworkConfig, NetworkError, RawGeometry, RawPosition,
};
use road_network_graph::infrastructure::read_geometries;

fn line(points: &[(f64, f64)]) -> RawGeometry {
    RawGeometry::Line(
        points
            .iter()
            .map(|&(x, y)| RawPosition { x, y, z: None })
            .collect(),
    )
}

fn source(geometries: Vec<RawGeometry>) -> GeometrySource {
    GeometrySource {
        crs: Some("EPSG:27700".to_string()),
        geometries,
    }
}

fn grid() -> GeometrySource {
    let mut geometries = Vec::new();
    for i in 0..3 {
        let c = 10.0 + 10.0 * i as f64;
        geometries.push(line(&[(0.0, c), (20.0, c - 1.0), (40.0, c)]));
        geometries.push(line(&[(c, 0.0), (c + 1.0, 20.0), (c, 40.0)]));
    }
    source(geometries)
}

#[test]
fn two_crossing_segments() {
    let input = source(vec![
        line(&[(0.0, 0.0), (10.0, 10.0)]),
        line(&[(0.0, 10.0), (10.0, 0.0)]),
    ]);
    let network = build_network(&input, None, &NetworkConfig::default()).unwrap();

    assert_eq!(network.graph.node_count(), 5);
    assert_eq!(network.graph.edge_count(), 4);
    assert!(network.split_failures.is_empty());

    let half_diagonal_km = 50f64.sqrt() / 1000.0;
    for edge in &network.edges {
        assert!((edge.distance - half_diagonal_km).abs() < 1e-12);
    }

    let mut positions: Vec<(f64, f64)> = (0..5)
        .map(|i| network.graph.position(i).unwrap())
        .collect();
    positions.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(
        positions,
        vec![(0.0, 0.0), (0.0, 10.0), (5.0, 5.0), (10.0, 0.0), (10.0, 10.0)]
    );

    let db = network.graph.topological_database();
    let centre = (0..5)
        .find(|&i| network.graph.position(i) == Some((5.0, 5.0)))
        .unwrap();
    assert_eq!(db.neighbors(centre).unwrap().len(), 4);

    let table = network.edge_table();
    assert_eq!(table.len(), 4);
    assert_eq!((table[0].startnode_x, table[0].startnode_y), (0.0, 0.0));
    assert_eq!((table[0].endnode_x, table[0].endnode_y), (5.0, 5.0));
}

#[test]
fn contained_segment_is_absent_from_graph() {
    let input = source(vec![
        line(&[(0.0, 0.0), (10.0, 0.0)]),
        line(&[(10.0, 0.0), (20.0, 0.0)]),
        line(&[(2.0, 0.0), (5.0, 0.0)]),
        line(&[(3.0, -5.0), (3.0, 5.0)]),
    ]);
    let network = build_network(&input, None, &NetworkConfig::default()).unwrap();

    assert_eq!(network.stats.contained_removed, 1);
    assert_eq!(network.stats.segments, 3);
    for edge in &network.edges {
        for c in [edge.start, edge.end] {
            assert_ne!((c.x, c.y), (2.0, 0.0));
            assert_ne!((c.x, c.y), (5.0, 0.0));
        }
    }
    assert_eq!(network.stats.intersection_records, 4);
    assert_eq!(network.stats.degenerate_edges, 2);
    assert_eq!(network.edges.len(), 6);
    assert_eq!(network.graph.node_count(), 6);
}

#[test]
fn graph_is_simple_symmetric_and_positive() {
    let network = build_network(&grid(), None, &NetworkConfig::default()).unwrap();
    assert!(network.graph.edge_count() > 0);

    let db = network.graph.topological_database();
    assert_eq!(db.len(), network.graph.node_count());
    for u in 0..db.len() {
        for (&v, &w) in db.neighbors(u).unwrap() {
            assert_ne!(u, v);
            assert!(w > 0.0);
            assert_eq!(db.weight(v, u), Some(w));
        }
    }
    for edge in &network.edges {
        assert!(edge.distance > 0.0);
        assert_ne!(edge.start, edge.end);
    }
}

#[test]
fn repeated_runs_are_identical() {
    let config = NetworkConfig::default();
    let first = build_network(&grid(), None, &config).unwrap();
    let second = build_network(&grid(), None, &config).unwrap();

    assert_eq!(first.edges, second.edges);
    assert_eq!(first.stats, second.stats);
    for i in 0..first.graph.node_count() {
        assert_eq!(first.graph.position(i), second.graph.position(i));
    }
}

#[test]
fn shared_footprints_and_short_lines_drop_out() {
    let input = source(vec![
        line(&[(0.0, 0.0), (10.0, 0.0)]),
        line(&[(10.0, 0.0), (0.0, 0.0)]),
        line(&[(5.0, 5.0)]),
        line(&[(0.0, 10.0), (10.0, 0.0)]),
        line(&[(0.0, 0.0), (10.0, 10.0)]),
    ]);
    let network = build_network(&input, None, &NetworkConfig::default()).unwrap();

    assert_eq!(network.stats.too_short_excluded, 1);
    assert_eq!(network.stats.contained_removed, 2);
    assert_eq!(network.stats.segments, 2);
    assert_eq!(network.graph.node_count(), 5);
    assert_eq!(network.graph.edge_count(), 4);
}

#[test]
fn missing_projection_aborts_the_run() {
    let mut input = source(vec![line(&[(0.0, 0.0), (1.0, 1.0)])]);
    input.crs = None;
    let err = build_network(&input, None, &NetworkConfig::default()).unwrap_err();
    assert_eq!(err, NetworkError::MissingProjection);

    let network = build_network(&input, Some("EPSG:2163"), &NetworkConfig::default()).unwrap();
    assert_eq!(network.crs, "EPSG:2163");
}

#[test]
fn jsonl_source_feeds_the_pipeline() {
    let input = r#"{"type":"meta","crs":"EPSG:2163"}
{"type":"line","coordinates":[[0,0,100],[10,10,120]]}
{"type":"line","coordinates":[[0,10,90],[10,0,95]]}
{"type":"multiline","coordinates":[[[0,5],[10,5]],[[20,5],[30,5]]]}
{"type":"line","coordinates":[[0,0],[10,10]]}
"#;
    let geometries = read_geometries(input.as_bytes()).unwrap();
    let network = build_network(&geometries, None, &NetworkConfig::default()).unwrap();

    assert_eq!(network.stats.input_records, 4);
    assert_eq!(network.stats.multi_part_excluded, 1);
    assert_eq!(network.stats.duplicates_removed, 1);
    assert_eq!(network.graph.node_count(), 5);
    assert_eq!(network.graph.edge_count(), 4);
}
