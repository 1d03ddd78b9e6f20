//! Node placement for network visualization
//!
//! Four layouts are provided: force-directed (Fruchterman-Reingold), circular,
//! random, and Kamada-Kawai. Spring and random layouts draw their initial
//! positions from a seeded `ChaCha8Rng`, so the same seed and the same graph
//! always produce the same coordinates.
//!
//! Spring and Kamada-Kawai results are centred and rescaled so the largest
//! absolute coordinate is 1. Circular positions lie on the unit circle and
//! random positions in `[0, 1)`.

use super::common::{GraphView, NodeId};
use super::pathfinding::all_pairs_distances;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

const MIN_DISTANCE: f64 = 0.01;
const KK_TOLERANCE: f64 = 1e-4;
const KK_INNER_STEPS: usize = 50;

/// Layout algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LayoutAlgorithm {
    #[default]
    Spring,
    Circular,
    Random,
    KamadaKawai,
}

impl LayoutAlgorithm {
    pub const ALL: [LayoutAlgorithm; 4] = [
        LayoutAlgorithm::Spring,
        LayoutAlgorithm::Circular,
        LayoutAlgorithm::Random,
        LayoutAlgorithm::KamadaKawai,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutAlgorithm::Spring => "spring",
            LayoutAlgorithm::Circular => "circular",
            LayoutAlgorithm::Random => "random",
            LayoutAlgorithm::KamadaKawai => "kamada_kawai",
        }
    }
}

impl fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spring" | "force" | "force_directed" => Ok(LayoutAlgorithm::Spring),
            "circular" | "circle" => Ok(LayoutAlgorithm::Circular),
            "random" => Ok(LayoutAlgorithm::Random),
            "kamada_kawai" | "kamada-kawai" | "kk" => Ok(LayoutAlgorithm::KamadaKawai),
            other => Err(format!("unknown layout algorithm: {}", other)),
        }
    }
}

/// Layout configuration
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub algorithm: LayoutAlgorithm,
    /// Seed for spring and random layouts
    pub seed: u64,
    /// Spring iterations; Kamada-Kawai uses it to bound its outer loop
    pub iterations: usize,
    /// Optimal spring distance. `None` means `sqrt(1 / n)`.
    pub optimal_distance: Option<f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            algorithm: LayoutAlgorithm::Spring,
            seed: 42,
            iterations: 50,
            optimal_distance: None,
        }
    }
}

/// A 2-D coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Computed layout: one point per node in the view
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub algorithm: LayoutAlgorithm,
    pub positions: HashMap<NodeId, Point>,
}

impl LayoutResult {
    pub fn position(&self, node: NodeId) -> Option<Point> {
        self.positions.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Compute a layout for every node of the view
pub fn compute_layout(view: &GraphView, config: &LayoutConfig) -> LayoutResult {
    let points = match config.algorithm {
        LayoutAlgorithm::Spring => spring_layout(view, config.iterations, config.seed, config.optimal_distance),
        LayoutAlgorithm::Circular => circular_layout(view.node_count),
        LayoutAlgorithm::Random => random_layout(view.node_count, config.seed),
        LayoutAlgorithm::KamadaKawai => kamada_kawai_layout(view, config.iterations),
    };

    let positions = view
        .index_to_node
        .iter()
        .zip(points)
        .map(|(&node, [x, y])| (node, Point { x, y }))
        .collect();

    LayoutResult {
        algorithm: config.algorithm,
        positions,
    }
}

/// Uniform positions in `[0, 1) x [0, 1)`
pub fn random_layout(n: usize, seed: u64) -> Vec<[f64; 2]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| [rng.gen::<f64>(), rng.gen::<f64>()]).collect()
}

/// Nodes evenly spaced on the unit circle, in index order
pub fn circular_layout(n: usize) -> Vec<[f64; 2]> {
    if n == 1 {
        return vec![[0.0, 0.0]];
    }
    (0..n)
        .map(|i| {
            let theta = 2.0 * PI * (i as f64) / (n as f64);
            [theta.cos(), theta.sin()]
        })
        .collect()
}

/// Fruchterman-Reingold force-directed layout
///
/// Repulsion `k^2 / d` between every pair, attraction `d^2 / k` along edges.
/// The step size starts at a tenth of the initial spread and cools linearly.
pub fn spring_layout(
    view: &GraphView,
    iterations: usize,
    seed: u64,
    optimal_distance: Option<f64>,
) -> Vec<[f64; 2]> {
    let n = view.node_count;
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![[0.0, 0.0]];
    }

    let mut pos = random_layout(n, seed);
    let k = optimal_distance
        .filter(|k| *k > 0.0)
        .unwrap_or_else(|| (1.0 / n as f64).sqrt());

    let mut temperature = spread(&pos) * 0.1;
    let cooling = temperature / (iterations as f64 + 1.0);

    for _ in 0..iterations {
        let current = &pos;
        let deltas: Vec<[f64; 2]> = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut disp = [0.0, 0.0];
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let dx = current[i][0] - current[j][0];
                    let dy = current[i][1] - current[j][1];
                    let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                    let attraction = if view.has_edge(i, j) { dist / k } else { 0.0 };
                    let factor = k * k / (dist * dist) - attraction;
                    disp[0] += dx * factor;
                    disp[1] += dy * factor;
                }
                let length = (disp[0] * disp[0] + disp[1] * disp[1]).sqrt().max(MIN_DISTANCE);
                [disp[0] * temperature / length, disp[1] * temperature / length]
            })
            .collect();

        for (p, d) in pos.iter_mut().zip(&deltas) {
            p[0] += d[0];
            p[1] += d[1];
        }
        temperature -= cooling;
    }

    rescale(&mut pos);
    pos
}

/// Kamada-Kawai layout
///
/// Ideal distances are graph hop counts; each node is moved in turn by
/// Newton-Raphson steps on the spring energy, starting from the circular
/// layout.
pub fn kamada_kawai_layout(view: &GraphView, iterations: usize) -> Vec<[f64; 2]> {
    let n = view.node_count;
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![[0.0, 0.0]];
    }

    let dist = all_pairs_distances(view);
    let mut pos = circular_layout(n);
    let max_rounds = iterations.max(1) * n;

    for _ in 0..max_rounds {
        let (m, delta) = (0..n)
            .map(|m| {
                let (gx, gy) = kk_gradient(&pos, &dist, m);
                (m, (gx * gx + gy * gy).sqrt())
            })
            .fold((0, f64::MIN), |best, cur| if cur.1 > best.1 { cur } else { best });

        if delta < KK_TOLERANCE {
            break;
        }

        for _ in 0..KK_INNER_STEPS {
            let (gx, gy) = kk_gradient(&pos, &dist, m);
            if (gx * gx + gy * gy).sqrt() < KK_TOLERANCE {
                break;
            }
            let (hxx, hxy, hyy) = kk_hessian(&pos, &dist, m);
            let det = hxx * hyy - hxy * hxy;
            if det.abs() < 1e-12 {
                break;
            }
            let step_x = (-gx * hyy + gy * hxy) / det;
            let step_y = (-gy * hxx + gx * hxy) / det;
            pos[m][0] += step_x;
            pos[m][1] += step_y;
        }
    }

    rescale(&mut pos);
    pos
}

fn kk_gradient(pos: &[[f64; 2]], dist: &ndarray::Array2<f64>, m: usize) -> (f64, f64) {
    let mut gx = 0.0;
    let mut gy = 0.0;
    for i in 0..pos.len() {
        if i == m {
            continue;
        }
        let d_ideal = dist[[m, i]];
        let strength = 1.0 / (d_ideal * d_ideal);
        let dx = pos[m][0] - pos[i][0];
        let dy = pos[m][1] - pos[i][1];
        let d = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
        gx += strength * (dx - d_ideal * dx / d);
        gy += strength * (dy - d_ideal * dy / d);
    }
    (gx, gy)
}

fn kk_hessian(pos: &[[f64; 2]], dist: &ndarray::Array2<f64>, m: usize) -> (f64, f64, f64) {
    let mut hxx = 0.0;
    let mut hxy = 0.0;
    let mut hyy = 0.0;
    for i in 0..pos.len() {
        if i == m {
            continue;
        }
        let d_ideal = dist[[m, i]];
        let strength = 1.0 / (d_ideal * d_ideal);
        let dx = pos[m][0] - pos[i][0];
        let dy = pos[m][1] - pos[i][1];
        let d = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
        let d3 = d * d * d;
        hxx += strength * (1.0 - d_ideal * dy * dy / d3);
        hxy += strength * (d_ideal * dx * dy / d3);
        hyy += strength * (1.0 - d_ideal * dx * dx / d3);
    }
    (hxx, hxy, hyy)
}

fn spread(pos: &[[f64; 2]]) -> f64 {
    let (mut min_x, mut max_x) = (f64::MAX, f64::MIN);
    let (mut min_y, mut max_y) = (f64::MAX, f64::MIN);
    for p in pos {
        min_x = min_x.min(p[0]);
        max_x = max_x.max(p[0]);
        min_y = min_y.min(p[1]);
        max_y = max_y.max(p[1]);
    }
    (max_x - min_x).max(max_y - min_y)
}

/// Centre on the mean and scale so the largest |coordinate| is 1
fn rescale(pos: &mut [[f64; 2]]) {
    if pos.is_empty() {
        return;
    }
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p[1]).sum::<f64>() / n;

    let mut limit: f64 = 0.0;
    for p in pos.iter_mut() {
        p[0] -= mean_x;
        p[1] -= mean_y;
        limit = limit.max(p[0].abs()).max(p[1].abs());
    }

    if limit > 0.0 {
        for p in pos.iter_mut() {
            p[0] /= limit;
            p[1] /= limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_with_tail() -> GraphView {
        GraphView::from_edges(&[1, 2, 3, 4], &[(1, 2), (2, 3), (3, 1), (3, 4)])
    }

    #[test]
    fn test_random_layout_in_unit_square() {
        let positions = random_layout(10, 42);
        assert_eq!(positions.len(), 10);
        for p in &positions {
            assert!(p[0] >= 0.0 && p[0] < 1.0);
            assert!(p[1] >= 0.0 && p[1] < 1.0);
        }
    }

    #[test]
    fn test_circular_layout_on_unit_circle() {
        let positions = circular_layout(6);
        for p in &positions {
            let r = (p[0] * p[0] + p[1] * p[1]).sqrt();
            assert!((r - 1.0).abs() < 1e-9);
        }
        assert!((positions[0][0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_spring_layout_is_deterministic_for_seed() {
        let view = triangle_with_tail();
        let config = LayoutConfig::default();

        let first = compute_layout(&view, &config);
        let second = compute_layout(&view, &config);
        assert_eq!(first, second);

        let other_seed = compute_layout(&view, &LayoutConfig { seed: 7, ..config });
        assert_ne!(first.positions, other_seed.positions);
    }

    #[test]
    fn test_random_layout_is_deterministic_for_seed() {
        let view = triangle_with_tail();
        let config = LayoutConfig {
            algorithm: LayoutAlgorithm::Random,
            ..LayoutConfig::default()
        };
        assert_eq!(compute_layout(&view, &config), compute_layout(&view, &config));
    }

    #[test]
    fn test_spring_layout_is_rescaled() {
        let view = triangle_with_tail();
        let result = compute_layout(
            &view,
            &LayoutConfig {
                optimal_distance: Some(3.0),
                ..LayoutConfig::default()
            },
        );

        assert_eq!(result.len(), 4);
        let max = result
            .positions
            .values()
            .map(|p| p.x.abs().max(p.y.abs()))
            .fold(0.0, f64::max);
        assert!((max - 1.0).abs() < 1e-9);
        assert!(result.positions.values().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_kamada_kawai_places_neighbors_closer() {
        // path 1 - 2 - 3 - 4 - 5
        let view = GraphView::from_edges(&[1, 2, 3, 4, 5], &[(1, 2), (2, 3), (3, 4), (4, 5)]);
        let result = compute_layout(
            &view,
            &LayoutConfig {
                algorithm: LayoutAlgorithm::KamadaKawai,
                ..LayoutConfig::default()
            },
        );

        let d = |a: NodeId, b: NodeId| {
            let (pa, pb) = (result.positions[&a], result.positions[&b]);
            ((pa.x - pb.x).powi(2) + (pa.y - pb.y).powi(2)).sqrt()
        };
        assert!(d(1, 2) < d(1, 5));
        assert!(result.positions.values().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_single_and_empty_graphs() {
        let empty = GraphView::from_edges(&[], &[]);
        for algorithm in LayoutAlgorithm::ALL {
            let config = LayoutConfig { algorithm, ..LayoutConfig::default() };
            assert!(compute_layout(&empty, &config).is_empty());
        }

        let single = GraphView::from_edges(&[9], &[]);
        let result = compute_layout(&single, &LayoutConfig::default());
        assert_eq!(result.position(9), Some(Point { x: 0.0, y: 0.0 }));
    }

    #[test]
    fn test_parse_algorithm_names() {
        assert_eq!("spring".parse::<LayoutAlgorithm>(), Ok(LayoutAlgorithm::Spring));
        assert_eq!("Kamada-Kawai".parse::<LayoutAlgorithm>(), Ok(LayoutAlgorithm::KamadaKawai));
        assert!("spectral".parse::<LayoutAlgorithm>().is_err());
        for algorithm in LayoutAlgorithm::ALL {
            assert_eq!(algorithm.as_str().parse::<LayoutAlgorithm>(), Ok(algorithm));
        }
    }
}
