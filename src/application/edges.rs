use hashbrown::HashSet;

use crate::domain::{Edge, NetworkConfig, NodeKey, SplitLengths, SplitResult};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssembledEdges {
    pub edges: Vec<Edge>,
    pub degenerate: usize,
    pub duplicates: usize,
}

fn canonical(a: NodeKey, b: NodeKey) -> (NodeKey, NodeKey) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Turns split lengths into the final undirected edge list.
///
/// Every start→intersection edge precedes every intersection→end edge, each
/// group in record order. Zero-length edges and self-loops are dropped; of
/// several edges joining the same unordered pair of points only the first is
/// kept, whatever its distance. Failed splits contribute nothing.
pub fn assemble_edges(results: &[SplitResult], config: &NetworkConfig) -> AssembledEdges {
    let splits: Vec<&SplitLengths> = results
        .iter()
        .filter_map(|r| match r {
            SplitResult::Split(lengths) => Some(lengths),
            SplitResult::Failed(_) => None,
        })
        .collect();

    let heads = splits.iter().map(|s| Edge {
        start: s.start,
        end: s.intersection,
        distance: s.start_to_intersect,
    });
    let tails = splits.iter().map(|s| Edge {
        start: s.intersection,
        end: s.end,
        distance: s.intersect_to_end,
    });

    let mut out = AssembledEdges::default();
    let mut seen: HashSet<(NodeKey, NodeKey)> = HashSet::new();
    for edge in heads.chain(tails) {
        let (a, b) = (config.key(edge.start), config.key(edge.end));
        // also rejects NaN distances
        if !(edge.distance > 0.0) || a == b {
            out.degenerate += 1;
            continue;
        }
        if !seen.insert(canonical(a, b)) {
            out.duplicates += 1;
            continue;
        }
        out.edges.push(edge);
    }
    out
}
