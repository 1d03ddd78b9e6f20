use agreste::config::{DashboardConfig, DataConfig};
use agreste::data::{Dataset, Domain};
use agreste::notice::NoticeLevel;
use agreste::pages::{PageId, PageRegistry};
use agreste::session::SessionContext;
use std::fs;
use tempfile::TempDir;

fn data_config(dir: &TempDir) -> DataConfig {
    DataConfig {
        datasets_dir: dir.path().to_path_buf(),
        methodology_file: dir.path().join("aim.html"),
        ..DataConfig::default()
    }
}

fn write_economic(dir: &TempDir) {
    fs::write(
        dir.path().join("indicadores_economicos.csv"),
        "cidade,populacao,empresas_formais,empresas_informais,faturamento_anual_milhoes,empregos_diretos,pib_per_capita,taxa_informalidade\n\
         Caruaru,100000,3000,5000,\"1500,5\",20000,21000,55\n\
         Toritama,50000,1000,2000,800,9000,15000,70\n",
    )
    .unwrap();
}

#[test]
fn test_dataset_from_disk_feeds_overview() {
    let dir = TempDir::new().unwrap();
    write_economic(&dir);

    let dataset = Dataset::load(&data_config(&dir));
    assert!(!dataset.is_placeholder(Domain::Economic));
    assert!(dataset.is_placeholder(Domain::Social));
    assert_eq!(dataset.economic.value("Caruaru", "faturamento_anual_milhoes"), Some(1500.5));

    let combined = dataset.combined();
    assert_eq!(combined.value("Toritama", "empresas_totais"), Some(3000.0));

    let registry = PageRegistry::new(&DashboardConfig::default());
    let mut ctx = SessionContext::new("data-test");
    let view = registry.render(PageId::Overview, &mut ctx, &dataset).unwrap();
    assert_eq!(view.metric("População Total").unwrap().value, "150,000");
    assert_eq!(view.metric("Total de Empresas").unwrap().value, "11,000");
    // missing CSVs and ontology surface as notices on the overview
    assert!(view.notices.iter().any(|n| n.message.contains("indicadores_sociais.csv")));
}

#[test]
fn test_missing_key_column_is_an_error_notice() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("indicadores_sociais.csv"), "municipio,idh\nCaruaru,0.67\n").unwrap();

    let dataset = Dataset::load(&data_config(&dir));
    assert!(dataset.is_placeholder(Domain::Social));
    let errors: Vec<_> = dataset
        .notices
        .iter()
        .filter(|n| n.level == NoticeLevel::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("indicadores_sociais.csv"));
}

#[test]
fn test_every_page_renders_on_placeholder_data() {
    let registry = PageRegistry::new(&DashboardConfig::default());
    let dataset = Dataset::placeholder();
    let mut ctx = SessionContext::new("all-pages");

    for descriptor in registry.descriptors() {
        let view = registry.render(descriptor.id, &mut ctx, &dataset).unwrap();
        assert_eq!(view.page, descriptor.id);
        assert!(
            !view.sections.is_empty() || !view.notices.is_empty(),
            "page {} rendered nothing",
            descriptor.id
        );
    }
    assert_eq!(ctx.summary().pages_visited, 9);
}
