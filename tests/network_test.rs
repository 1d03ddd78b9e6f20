use agreste::graph::{load_ontology_file, load_ontology_value, OntologyError};
use agreste::viz::figure::OneOrMany;
use agreste::viz::{NetworkOptions, NetworkRenderer};
use agreste_layout::LayoutAlgorithm;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const ROOT_KEY: &str = "textile_ecosystem_network_ontology";

fn write_ontology(dir: &TempDir) -> std::path::PathBuf {
    let doc = json!({
        ROOT_KEY: {
            "nodes": [
                {"id": "p001", "name": "Ana Souza", "position": "Presidente da CDL",
                 "attributes": {"main_city": "Caruaru", "relevance_degree": 10, "impact_scale": "Regional"}},
                {"id": "p002", "name": "Bruno Lima",
                 "attributes": {"main_city": "Toritama", "relevance_degree": "7"}},
                {"id": "p003", "name": "Carla Dias",
                 "attributes": {"main_city": "Caruaru", "relevance_degree": 4}},
                {"id": "p004", "name": "Davi Melo",
                 "attributes": {"main_city": "não identificado"}}
            ],
            "edges": [
                {"id": "e1", "source": "p001", "target": "p002", "type": "parceria"},
                {"id": "e2", "source": "p002", "target": "p003", "type": "fornecimento", "intensity": "alta"},
                {"id": "e3", "source": "p003", "target": "p001", "type": "parceria"},
                {"id": "e4", "source": "p004", "target": "p999", "type": "parceria"}
            ],
            "clusters": [
                {"id": "c1", "name": "Caruaru", "description": "Atores de Caruaru", "nodes": ["p001", "p003", "p404"]}
            ]
        }
    });
    let path = dir.path().join("ontologia.json");
    fs::write(&path, doc.to_string()).unwrap();
    path
}

#[test]
fn test_load_file_with_root_key() {
    let dir = TempDir::new().unwrap();
    let graph = load_ontology_file(&write_ontology(&dir), Some(ROOT_KEY)).unwrap();

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.relationship_count(), 3);
    assert_eq!(graph.report().skipped_edges.len(), 1);
    assert_eq!(graph.node("p002").unwrap().relevance(), Some(7.0));
    assert_eq!(graph.node("p004").unwrap().display_attribute("main_city"), None);
}

#[test]
fn test_missing_file_is_distinguishable() {
    let dir = TempDir::new().unwrap();
    let err = load_ontology_file(&dir.path().join("absent.json"), None).unwrap_err();
    assert!(err.is_not_found());

    let path = dir.path().join("broken.json");
    fs::write(&path, "{ nodes: ").unwrap();
    let err = load_ontology_file(&path, None).unwrap_err();
    assert!(!err.is_not_found());
    assert!(matches!(err, OntologyError::Json(_)));
}

#[test]
fn test_every_layout_places_every_actor() {
    let dir = TempDir::new().unwrap();
    let graph = load_ontology_file(&write_ontology(&dir), Some(ROOT_KEY)).unwrap();
    let renderer = NetworkRenderer::default();

    for layout in [
        LayoutAlgorithm::Spring,
        LayoutAlgorithm::Circular,
        LayoutAlgorithm::Random,
        LayoutAlgorithm::KamadaKawai,
    ] {
        let options = NetworkOptions {
            layout,
            ..NetworkOptions::default()
        };
        let view = renderer.render(&graph, &options);
        assert_eq!(view.node_ids().count(), 4, "layout {}", layout.as_str());
        assert!(view
            .positions
            .values()
            .all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}

#[test]
fn test_render_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let graph = load_ontology_file(&write_ontology(&dir), Some(ROOT_KEY)).unwrap();
    let renderer = NetworkRenderer::default();
    let options = NetworkOptions {
        layout: LayoutAlgorithm::Spring,
        ..NetworkOptions::default()
    };

    let first = renderer.render(&graph, &options).figure.to_json();
    let second = renderer.render(&graph, &options).figure.to_json();
    assert_eq!(first, second);
}

#[test]
fn test_cluster_scope_ignores_unknown_members() {
    let dir = TempDir::new().unwrap();
    let graph = load_ontology_file(&write_ontology(&dir), Some(ROOT_KEY)).unwrap();
    let options = NetworkOptions {
        cluster: Some("c1".to_string()),
        ..NetworkOptions::default()
    };
    let view = NetworkRenderer::default().render(&graph, &options);

    let mut ids: Vec<&str> = view.node_ids().map(|id| id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["p001", "p003"]);

    let unknown = NetworkOptions {
        cluster: Some("nope".to_string()),
        ..NetworkOptions::default()
    };
    assert_eq!(NetworkRenderer::default().render(&graph, &unknown).node_ids().count(), 4);
}

#[test]
fn test_legend_matches_city_colors() {
    let dir = TempDir::new().unwrap();
    let graph = load_ontology_file(&write_ontology(&dir), Some(ROOT_KEY)).unwrap();
    let view = NetworkRenderer::default().render(&graph, &NetworkOptions::default());

    let caruaru = view.legend.iter().find(|e| e.value == "Caruaru").unwrap();
    assert_eq!(caruaru.count, 2);
    assert_eq!(view.legend.iter().map(|e| e.count).sum::<usize>(), 4);
}

#[test]
fn test_color_and_size_follow_chosen_attributes() {
    let doc = json!({
        "nodes": [
            {"id": "p1", "name": "Primeiro", "attributes": {"city": "A", "relevance": 5}},
            {"id": "p2", "name": "Segundo", "attributes": {"city": "B", "relevance": 9}}
        ],
        "edges": [
            {"id": "e1", "source": "p1", "target": "p2", "type": "parceria"}
        ]
    });
    let graph = load_ontology_value(&doc, None).unwrap();
    let options = NetworkOptions {
        layout: LayoutAlgorithm::Circular,
        color_by: "city".to_string(),
        size_by: "relevance".to_string(),
        cluster: None,
    };
    let view = NetworkRenderer::default().render(&graph, &options);

    assert_eq!(view.legend.len(), 2);
    assert_ne!(view.legend[0].color, view.legend[1].color);

    let actors = view
        .figure
        .data
        .iter()
        .find(|t| t.name.as_deref() == Some("Actors"))
        .unwrap();
    let ids: Vec<&str> = view.node_ids().map(|id| id.as_str()).collect();
    let sizes = match actors.marker.as_ref().and_then(|m| m.size.as_ref()) {
        Some(OneOrMany::Many(sizes)) => sizes.clone(),
        other => panic!("expected per-actor sizes, got {other:?}"),
    };
    let p1 = sizes[ids.iter().position(|id| *id == "p1").unwrap()];
    let p2 = sizes[ids.iter().position(|id| *id == "p2").unwrap()];
    assert!(p2 > p1, "p2 ({p2}) should be larger than p1 ({p1})");
}
