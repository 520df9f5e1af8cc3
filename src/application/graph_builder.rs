use hashbrown::HashMap;
use petgraph::stable_graph::{NodeIndex, StableUnGraph};

use crate::domain::{Coordinate, Edge, EdgeData, NetworkConfig, NodeData, RoadGraph};

fn node_for(graph: &mut RoadGraph, c: Coordinate, config: &NetworkConfig) -> NodeIndex {
    let key = config.key(c);
    if let Some(idx) = graph.node_map.get(&key) {
        return *idx;
    }
    let idx = graph.graph.add_node(NodeData { x: c.x, y: c.y });
    graph.node_map.insert(key, idx);
    idx
}

/// Builds the road graph from the final edge list.
///
/// Node ids are handed out in first-seen order walking each edge's start then
/// end coordinate, followed by `extra_nodes`. Edges whose endpoints share a
/// key, and repeated connections between the same two nodes, are skipped.
pub fn build_graph(edges: &[Edge], extra_nodes: &[Coordinate], config: &NetworkConfig) -> RoadGraph {
    let mut graph = RoadGraph {
        graph: StableUnGraph::default(),
        node_map: HashMap::new(),
    };

    let mut resolved = Vec::with_capacity(edges.len());
    for edge in edges {
        let u = node_for(&mut graph, edge.start, config);
        let v = node_for(&mut graph, edge.end, config);
        resolved.push((u, v, edge.distance));
    }
    for c in extra_nodes {
        node_for(&mut graph, *c, config);
    }

    for (u, v, distance) in resolved {
        if u == v || graph.graph.find_edge(u, v).is_some() {
            continue;
        }
        graph.graph.add_edge(u, v, EdgeData { distance });
    }
    graph
}
