//! Graph topology measures
//!
//! Triangle counting, clustering coefficients and density.

use super::common::GraphView;

/// Number of triangles through each node
pub fn triangles_per_node(view: &GraphView) -> Vec<usize> {
    let mut counts = vec![0; view.node_count];

    // Only count u < v < w once, then credit all three corners.
    for u in 0..view.node_count {
        for &v in view.neighbors(u) {
            if v <= u {
                continue;
            }
            for &w in view.neighbors(v) {
                if w <= v {
                    continue;
                }
                if view.has_edge(u, w) {
                    counts[u] += 1;
                    counts[v] += 1;
                    counts[w] += 1;
                }
            }
        }
    }

    counts
}

/// Total triangles in the graph
pub fn count_triangles(view: &GraphView) -> usize {
    triangles_per_node(view).iter().sum::<usize>() / 3
}

/// Local clustering coefficient per node; 0 for degree below 2
pub fn clustering_coefficients(view: &GraphView) -> Vec<f64> {
    triangles_per_node(view)
        .into_iter()
        .enumerate()
        .map(|(idx, t)| {
            let deg = view.degree(idx);
            if deg < 2 {
                0.0
            } else {
                2.0 * t as f64 / (deg * (deg - 1)) as f64
            }
        })
        .collect()
}

/// Mean local clustering coefficient over all nodes
pub fn average_clustering(view: &GraphView) -> f64 {
    if view.node_count == 0 {
        return 0.0;
    }
    clustering_coefficients(view).iter().sum::<f64>() / view.node_count as f64
}

/// Edge density: 2m / (n (n - 1))
pub fn density(view: &GraphView) -> f64 {
    let n = view.node_count;
    if n <= 1 {
        return 0.0;
    }
    2.0 * view.edge_count() as f64 / (n * (n - 1)) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_counting() {
        // Complete graph K4: 4 triangles
        let mut edges = Vec::new();
        for i in 0..4u64 {
            for j in (i + 1)..4 {
                edges.push((i, j));
            }
        }
        let view = GraphView::from_edges(&[0, 1, 2, 3], &edges);

        assert_eq!(count_triangles(&view), 4);
        assert_eq!(density(&view), 1.0);
        assert_eq!(average_clustering(&view), 1.0);
    }

    #[test]
    fn test_clustering_with_tail() {
        // triangle 0-1-2 plus tail 2-3
        let view = GraphView::from_edges(&[0, 1, 2, 3], &[(0, 1), (1, 2), (2, 0), (2, 3)]);
        let coefficients = clustering_coefficients(&view);

        assert_eq!(coefficients[0], 1.0);
        assert!((coefficients[2] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(coefficients[3], 0.0);
        assert!((density(&view) - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_graphs() {
        let view = GraphView::from_edges(&[1], &[]);
        assert_eq!(density(&view), 0.0);
        assert_eq!(average_clustering(&GraphView::from_edges(&[], &[])), 0.0);
    }
}
