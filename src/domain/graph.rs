use hashbrown::HashMap;
use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use super::config::NodeKey;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct NodeData {
    pub x: f64,
    pub y: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct EdgeData {
    /// Kilometres.
    pub distance: f64,
}

/// Undirected, simple road graph. Node indices are dense in `[0, node_count)`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RoadGraph {
    pub graph: StableUnGraph<NodeData, EdgeData>,
    pub node_map: HashMap<NodeKey, NodeIndex>,
}

/// Per-node mapping from neighbour id to connecting edge weight.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TopologicalDatabase {
    pub nodes: Vec<HashMap<usize, f64>>,
}

impl TopologicalDatabase {
    pub fn neighbors(&self, node: usize) -> Option<&HashMap<usize, f64>> {
        self.nodes.get(node)
    }

    pub fn weight(&self, from: usize, to: usize) -> Option<f64> {
        self.nodes.get(from)?.get(&to).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl RoadGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn position(&self, node: usize) -> Option<(f64, f64)> {
        self.graph
            .node_weight(NodeIndex::new(node))
            .map(|n| (n.x, n.y))
    }

    pub fn node_id(&self, key: &NodeKey) -> Option<usize> {
        self.node_map.get(key).map(|idx| idx.index())
    }

    /// Every node gets an entry, isolated ones an empty map. Incident edges are
    /// resolved from whichever endpoint the edge was stored with.
    pub fn topological_database(&self) -> TopologicalDatabase {
        let nodes = self
            .graph
            .node_indices()
            .map(|n| {
                self.graph
                    .edges(n)
                    .map(|e| {
                        let other = if e.source() == n { e.target() } else { e.source() };
                        (other.index(), e.weight().distance)
                    })
                    .collect::<HashMap<usize, f64>>()
            })
            .collect();
        TopologicalDatabase { nodes }
    }
}
