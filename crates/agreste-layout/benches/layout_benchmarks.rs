use agreste_layout::{compute_layout, network_stats, GraphView, LayoutAlgorithm, LayoutConfig, NodeId};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

/// Ring with a chord every fifth node, roughly the shape of an actor network
fn build_view(size: u64) -> GraphView {
    let nodes: Vec<NodeId> = (0..size).collect();
    let mut edges = Vec::new();
    for i in 0..size {
        edges.push((i, (i + 1) % size));
        if i % 5 == 0 {
            edges.push((i, (i + size / 2) % size));
        }
    }
    GraphView::from_edges(&nodes, &edges)
}

/// Benchmark each layout algorithm across graph sizes
fn bench_layouts(c: &mut Criterion) {
    for algorithm in LayoutAlgorithm::ALL {
        let mut group = c.benchmark_group(format!("layout_{}", algorithm));

        for size in [25u64, 100, 250].iter() {
            let view = build_view(*size);
            let config = LayoutConfig {
                algorithm,
                optimal_distance: Some(3.0),
                ..LayoutConfig::default()
            };

            group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
                b.iter(|| {
                    let result = compute_layout(&view, &config);
                    criterion::black_box(result.len());
                });
            });
        }
        group.finish();
    }
}

/// Benchmark the statistics panel (betweenness dominates)
fn bench_network_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("network_stats");

    for size in [25u64, 100, 250].iter() {
        let view = build_view(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let stats = network_stats(&view);
                criterion::black_box(stats.density);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layouts, bench_network_stats);
criterion_main!(benches);
