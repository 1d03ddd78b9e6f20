//! Unweighted shortest paths
//!
//! Hop distances are what the Kamada-Kawai layout uses as ideal spring
//! lengths, so they are computed for every pair in parallel.

use super::common::GraphView;
use ndarray::Array2;
use rayon::prelude::*;
use std::collections::VecDeque;

/// Breadth-first hop distances from `source` (by index).
///
/// Unreachable nodes are `None`.
pub fn bfs_distances(view: &GraphView, source: usize) -> Vec<Option<usize>> {
    let mut dist = vec![None; view.node_count];
    if source >= view.node_count {
        return dist;
    }

    let mut queue = VecDeque::new();
    dist[source] = Some(0);
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        let next_dist = dist[current].map(|d| d + 1);
        for &next in view.neighbors(current) {
            if dist[next].is_none() {
                dist[next] = next_dist;
                queue.push_back(next);
            }
        }
    }

    dist
}

/// All-pairs hop distance matrix.
///
/// Pairs in different components get `disconnected_distance(max)`, one hop
/// longer than the longest finite path, so disconnected parts sit apart
/// without flying off.
pub fn all_pairs_distances(view: &GraphView) -> Array2<f64> {
    let n = view.node_count;
    let rows: Vec<Vec<Option<usize>>> = (0..n)
        .into_par_iter()
        .map(|source| bfs_distances(view, source))
        .collect();

    let max_finite = rows
        .iter()
        .flat_map(|row| row.iter().flatten())
        .copied()
        .max()
        .unwrap_or(0);
    let fallback = disconnected_distance(max_finite);

    let mut matrix = Array2::<f64>::zeros((n, n));
    for (i, row) in rows.iter().enumerate() {
        for (j, d) in row.iter().enumerate() {
            matrix[[i, j]] = match d {
                Some(d) => *d as f64,
                None => fallback,
            };
        }
    }
    matrix
}

fn disconnected_distance(max_finite: usize) -> f64 {
    (max_finite + 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bfs_path_graph() {
        // 0 - 1 - 2   3
        let view = GraphView::from_edges(&[0, 1, 2, 3], &[(0, 1), (1, 2)]);
        let dist = bfs_distances(&view, 0);
        assert_eq!(dist, vec![Some(0), Some(1), Some(2), None]);
    }

    #[test]
    fn test_all_pairs_disconnected_fallback() {
        let view = GraphView::from_edges(&[0, 1, 2, 3], &[(0, 1), (1, 2)]);
        let matrix = all_pairs_distances(&view);

        assert_eq!(matrix[[0, 2]], 2.0);
        assert_eq!(matrix[[2, 0]], 2.0);
        assert_eq!(matrix[[0, 3]], 3.0);
        assert_eq!(matrix[[3, 3]], 0.0);
    }
}
