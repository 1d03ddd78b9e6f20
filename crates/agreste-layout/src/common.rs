//! Shared graph view for layout and statistics
//!
//! Provides a read-only, undirected view of the network topology in
//! Compressed Sparse Row (CSR) format.

use std::collections::{BTreeSet, HashMap};

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed, undirected view of the graph.
///
/// Each edge is stored in both endpoints' neighbor lists. Self-loops and
/// parallel edges are collapsed when the view is built.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,
    /// Offsets into `adjacency`. Size = node_count + 1
    pub offsets: Vec<usize>,
    /// Contiguous array of neighbor indices, sorted per node
    pub adjacency: Vec<usize>,
}

impl GraphView {
    /// Build a view from a node list and an edge list.
    ///
    /// Node order is preserved: the i-th id gets dense index i. Edges whose
    /// endpoints are not in `nodes` are ignored.
    pub fn from_edges(nodes: &[NodeId], edges: &[(NodeId, NodeId)]) -> Self {
        let node_count = nodes.len();
        let mut node_to_index = HashMap::with_capacity(node_count);
        for (idx, &id) in nodes.iter().enumerate() {
            node_to_index.entry(id).or_insert(idx);
        }

        let mut neighbor_sets: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); node_count];
        for (source, target) in edges {
            let (Some(&u), Some(&v)) = (node_to_index.get(source), node_to_index.get(target)) else {
                continue;
            };
            if u == v {
                continue;
            }
            neighbor_sets[u].insert(v);
            neighbor_sets[v].insert(u);
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut adjacency = Vec::new();
        offsets.push(0);
        for set in neighbor_sets {
            adjacency.extend(set);
            offsets.push(adjacency.len());
        }

        GraphView {
            node_count,
            index_to_node: nodes.to_vec(),
            node_to_index,
            offsets,
            adjacency,
        }
    }

    /// Degree of a node (by index)
    pub fn degree(&self, idx: usize) -> usize {
        self.offsets[idx + 1] - self.offsets[idx]
    }

    /// Neighbors of a node (by index)
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.adjacency[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Number of distinct undirected edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// True when `u` and `v` share an edge
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.neighbors(u).binary_search(&v).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges_collapses_duplicates_and_loops() {
        let view = GraphView::from_edges(&[10, 20, 30], &[(10, 20), (20, 10), (30, 30), (10, 99)]);

        assert_eq!(view.node_count, 3);
        assert_eq!(view.edge_count(), 1);
        assert_eq!(view.neighbors(0), &[1]);
        assert_eq!(view.neighbors(1), &[0]);
        assert_eq!(view.degree(2), 0);
        assert!(view.has_edge(1, 0));
        assert!(!view.has_edge(0, 2));
    }

    #[test]
    fn test_preserves_node_order() {
        let view = GraphView::from_edges(&[7, 3, 5], &[]);
        assert_eq!(view.index_to_node, vec![7, 3, 5]);
        assert_eq!(view.node_to_index[&3], 1);
    }
}
