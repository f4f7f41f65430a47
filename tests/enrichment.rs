mod common;

use std::sync::Arc;

use rdap_gateway_analysis::application::services::EnrichmentService;
use rdap_gateway_analysis::domain::entities::RegistrarContact;
use rdap_gateway_analysis::infrastructure::directory::{JsonFileDirectory, NullDirectory};

#[tokio::test]
async fn test_enrich_from_json_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("directory.json");
    std::fs::write(
        &path,
        r#"[
            {"id": 1, "website": "https://acme.example", "email": "ops@acme.example"},
            {"id": 3, "abuse_email": "abuse@gamma.example"}
        ]"#,
    )
    .unwrap();

    let directory = JsonFileDirectory::from_path(&path).await.unwrap();
    let outcome = common::analyze(common::rrpproxy_catalog(), common::sample_records());

    let enriched = EnrichmentService::new(Arc::new(directory), 2)
        .enrich(outcome.result_set.records())
        .await;

    assert_eq!(enriched.len(), 3);
    assert_eq!(
        enriched[0].contact.as_ref().unwrap().website.as_deref(),
        Some("https://acme.example")
    );
    assert_eq!(enriched[0].category.as_deref(), Some(common::RRPPROXY));
    assert!(!enriched[1].is_enriched());
    assert!(enriched[1].lookup_error.is_none());
    assert!(enriched[2].is_enriched());

    // Enrichment leaves the classified records alone.
    assert_eq!(
        outcome.result_set.records()[0].category.as_deref(),
        Some(common::RRPPROXY)
    );
}

#[tokio::test]
async fn test_null_directory_reports_every_registrar() {
    let records = common::sample_records();

    let enriched = EnrichmentService::new(Arc::new(NullDirectory::new()), 0)
        .enrich(&records)
        .await;

    assert_eq!(enriched.len(), records.len());
    assert!(enriched.iter().all(|e| e.contact.is_none() && e.lookup_error.is_none()));
    assert_eq!(enriched[2].name, "Gamma");
    assert_eq!(enriched[2].domain_count, Some(200));
}

#[tokio::test]
async fn test_enrichment_output_serializes_without_empty_fields() {
    let directory = JsonFileDirectory::from_contacts(vec![RegistrarContact {
        id: 2,
        phone: Some("+1.5555550100".to_string()),
        ..Default::default()
    }]);

    let enriched = EnrichmentService::new(Arc::new(directory), 1)
        .enrich(&common::sample_records()[1..2])
        .await;
    let value = serde_json::to_value(&enriched).unwrap();

    assert_eq!(value[0]["contact"]["phone"], "+1.5555550100");
    assert!(value[0].get("lookup_error").is_none());
    assert!(value[0].get("category").is_none());
}
