//! Node centrality measures
//!
//! Degree centrality and Brandes betweenness, both normalized the usual way
//! for undirected graphs.

use super::common::{GraphView, NodeId};
use std::collections::{HashMap, VecDeque};

/// Degree centrality: degree / (n - 1)
pub fn degree_centrality(view: &GraphView) -> Vec<f64> {
    let n = view.node_count;
    if n <= 1 {
        return vec![1.0; n];
    }
    let scale = 1.0 / (n - 1) as f64;
    (0..n).map(|idx| view.degree(idx) as f64 * scale).collect()
}

/// Betweenness centrality (Brandes), normalized by (n - 1)(n - 2)
pub fn betweenness_centrality(view: &GraphView) -> Vec<f64> {
    let n = view.node_count;
    let mut centrality = vec![0.0; n];

    for source in 0..n {
        let mut stack = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut dist: Vec<i64> = vec![-1; n];
        sigma[source] = 1.0;
        dist[source] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(source);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in view.neighbors(v) {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != source {
                centrality[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for c in centrality.iter_mut() {
            *c *= scale;
        }
    }
    centrality
}

/// Index of the highest score; ties go to the lowest index
pub fn argmax(scores: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, &score) in scores.iter().enumerate() {
        match best {
            Some(b) if scores[b] >= score => {}
            _ => best = Some(idx),
        }
    }
    best
}

/// Map dense-index scores back to node ids
pub fn by_node(view: &GraphView, scores: &[f64]) -> HashMap<NodeId, f64> {
    view.index_to_node
        .iter()
        .zip(scores)
        .map(|(&node, &score)| (node, score))
        .collect()
}
