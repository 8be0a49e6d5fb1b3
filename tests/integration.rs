//! Integration tests for rfm-dashboard

use rfm_dashboard::dashboard::MISSING_FILES_MESSAGE;
use rfm_dashboard::{
    compute_kpis, load_datasets, load_or_empty, performance_table, proportion_slices, snake_plot_data,
    Dashboard, DataPaths, DatasetCache, SegmentCatalog,
};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Write both input files with sample data into `dir`
fn create_test_inputs(dir: &Path) -> DataPaths {
    let paths = DataPaths::in_dir(dir);

    fs::write(
        &paths.segments,
        "Customer ID,Recency,Frequency,Monetary,Cluster_Label,Country\n\
         12346,326,2,77556.46,1,United Kingdom\n\
         12747,2,11,4196.01,0,United Kingdom\n\
         12748,1,210,33719.73,0,United Kingdom\n\
         12820,3,4,942.34,2,United Kingdom\n\
         13047,31,10,3237.54,0,United Kingdom\n\
         17850,372,34,5391.21,1,United Kingdom\n\
         18283,4,16,2094.88,2,United Kingdom\n\
         18287,43,3,1837.28,2,United Kingdom\n",
    )
    .unwrap();

    fs::write(
        &paths.summary,
        "Cluster_Label,Recency_Mean,Frequency_Mean,Monetary_Mean,Count,Percentage\n\
         0,11.33,77.0,13717.76,3,40.0\n\
         1,349.0,18.0,41473.84,2,35.0\n\
         2,16.67,7.67,1624.83,3,25.0\n",
    )
    .unwrap();

    paths
}

#[test]
fn test_loading_is_idempotent() {
    let dir = tempdir().unwrap();
    let paths = create_test_inputs(dir.path());
    let catalog = SegmentCatalog::default();

    let first = load_datasets(&paths, &catalog).unwrap();
    let second = load_datasets(&paths, &catalog).unwrap();

    let names = |d: &rfm_dashboard::Datasets| -> Vec<String> {
        d.customers.iter().map(|c| c.strategic_name.clone()).collect()
    };
    assert_eq!(names(&first), names(&second));
    assert_eq!(first, second);
}

#[test]
fn test_mapping_is_consistent_across_datasets() {
    let dir = tempdir().unwrap();
    let paths = create_test_inputs(dir.path());
    let catalog = SegmentCatalog::default();
    let datasets = load_datasets(&paths, &catalog).unwrap();

    for customer in &datasets.customers {
        assert_eq!(customer.strategic_name, catalog.name_for(customer.cluster_label));
    }
    for cluster in &datasets.summary {
        assert_eq!(cluster.strategic_name, catalog.name_for(cluster.cluster_label));
    }
}

#[test]
fn test_kpis_match_inputs() {
    let dir = tempdir().unwrap();
    let paths = create_test_inputs(dir.path());
    let catalog = SegmentCatalog::default();
    let datasets = load_datasets(&paths, &catalog).unwrap();

    let kpis = compute_kpis(&datasets, &catalog).unwrap();

    let distinct: HashSet<&str> = datasets.customers.iter().map(|c| c.customer_id.as_str()).collect();
    assert_eq!(kpis.total_customers, distinct.len());
    assert_eq!(kpis.total_customers, 8);

    let expected_revenue: f64 = datasets.customers.iter().map(|c| c.monetary).sum();
    assert_eq!(kpis.total_revenue, expected_revenue);
    assert!((kpis.total_revenue - 128975.45).abs() < 1e-6);
}

#[test]
fn test_three_segment_scenario() {
    let dir = tempdir().unwrap();
    let paths = create_test_inputs(dir.path());
    let catalog = SegmentCatalog::default();
    let datasets = load_datasets(&paths, &catalog).unwrap();

    let slices = proportion_slices(&datasets.summary);
    assert_eq!(slices.len(), 3);
    let total: f64 = slices.iter().map(|s| s.percentage).sum();
    assert!((total - 100.0).abs() < 1e-9);

    let kpis = compute_kpis(&datasets, &catalog).unwrap();
    let best_row = datasets.summary.iter().find(|s| s.cluster_label == 0).unwrap();
    assert_eq!(kpis.best_segment_percentage, best_row.percentage);
    assert_eq!(kpis.cards()[2].value, "40.00%");
}

#[test]
fn test_snake_plot_and_table() {
    let dir = tempdir().unwrap();
    let paths = create_test_inputs(dir.path());
    let datasets = load_datasets(&paths, &SegmentCatalog::default()).unwrap();

    let snake = snake_plot_data(&datasets.summary);
    for metric in 0..3 {
        let mean = snake.series.iter().map(|s| s.values[metric]).sum::<f64>() / snake.series.len() as f64;
        assert!((mean - 1.0).abs() < 1e-9);
    }

    let table = performance_table(&datasets.summary);
    for pair in table.windows(2) {
        assert!(pair[0].monetary_mean >= pair[1].monetary_mean);
    }
    assert_eq!(table[0].strategic_name, "1 - Hibernating Customers 💤");
}

#[test]
fn test_missing_inputs_recovered_as_empty() {
    let dir = tempdir().unwrap();
    let paths = DataPaths::in_dir(dir.path());
    let mut cache = DatasetCache::new();

    let (datasets, message) = load_or_empty(&mut cache, &paths, &SegmentCatalog::default()).unwrap();
    assert!(datasets.is_empty());
    assert_eq!(message, Some(MISSING_FILES_MESSAGE));
}

#[test]
fn test_missing_summary_only_renders_nothing() {
    let dir = tempdir().unwrap();
    let paths = create_test_inputs(dir.path());
    fs::remove_file(&paths.summary).unwrap();

    let mut dashboard = Dashboard::new(paths, SegmentCatalog::default());
    let page = dashboard.render(None).unwrap();

    assert!(!page.has_content());
    let text = page.to_string();
    assert!(text.contains(MISSING_FILES_MESSAGE));
    assert!(!text.contains("Best Customers Segment Size"));
}

#[test]
fn test_custom_catalog_end_to_end() {
    let dir = tempdir().unwrap();
    let paths = create_test_inputs(dir.path());
    let catalog = SegmentCatalog::from_json_str(
        r#"{
            "best_label": 2,
            "segments": [
                {"label": 0, "name": "Champions", "insight": "Top spenders.", "strategy": "Reward them."},
                {"label": 2, "name": "Promising"}
            ]
        }"#,
    )
    .unwrap();

    let mut dashboard = Dashboard::new(paths, catalog);
    assert_eq!(
        dashboard.segment_options().unwrap().options,
        vec!["Champions".to_string(), "Cluster 1".to_string(), "Promising".to_string()]
    );

    let page = dashboard.render(Some("Cluster 1")).unwrap();
    let content = page.content.unwrap();
    assert_eq!(content.kpis.best_segment_percentage, 25.0);
    assert_eq!(content.strategy.segment, "Cluster 1");
    assert_eq!(content.strategy.insight, rfm_dashboard::strategy::NO_STRATEGY_TEXT);
}
