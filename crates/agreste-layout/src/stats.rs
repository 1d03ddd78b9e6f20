//! Whole-network summary

use super::centrality::{argmax, betweenness_centrality, degree_centrality};
use super::common::{GraphView, NodeId};
use super::topology::{average_clustering, density};

/// Summary statistics shown next to the network figure
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub average_clustering: f64,
    /// Highest betweenness centrality
    pub most_central: Option<NodeId>,
    /// Highest degree centrality
    pub most_connected: Option<NodeId>,
}

pub fn network_stats(view: &GraphView) -> NetworkStats {
    let most_central = argmax(&betweenness_centrality(view)).map(|idx| view.index_to_node[idx]);
    let most_connected = argmax(&degree_centrality(view)).map(|idx| view.index_to_node[idx]);

    NetworkStats {
        node_count: view.node_count,
        edge_count: view.edge_count(),
        density: density(view),
        average_clustering: average_clustering(view),
        most_central,
        most_connected,
    }
}
