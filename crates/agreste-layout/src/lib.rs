pub mod centrality;
pub mod common;
pub mod layout;
pub mod pathfinding;
pub mod stats;
pub mod topology;

pub use centrality::{betweenness_centrality, degree_centrality};
pub use common::{GraphView, NodeId};
pub use layout::{compute_layout, LayoutAlgorithm, LayoutConfig, LayoutResult, Point};
pub use pathfinding::{all_pairs_distances, bfs_distances};
pub use stats::{network_stats, NetworkStats};
pub use topology::{average_clustering, count_triangles, density};
