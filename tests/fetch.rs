use std::time::Duration;

use cdr_pipeline::{config::Settings, data::pubmed::EutilsClient, error::PipelineError};

#[tokio::test]
async fn zero_chunk_size_is_rejected_before_any_request() {
    let client = EutilsClient::new(
        "curator@example.org".into(),
        None,
        "cdr_pipeline".into(),
    )
    .unwrap();
    let pmids = vec!["1".to_string(), "2".to_string()];
    let mut seen = 0usize;
    let err = client
        .fetch_records(&pmids, 0, Duration::ZERO, |_| {
            seen += 1;
            Ok(())
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::InvalidChunkSize)
    ));
    assert_eq!(seen, 0);
}

#[tokio::test]
async fn empty_pmid_list_fetches_nothing() {
    let client =
        EutilsClient::new("curator@example.org".into(), None, "cdr_pipeline".into()).unwrap();
    let fetched = client
        .fetch_records(&[], 200, Duration::ZERO, |_| Ok(()))
        .await
        .unwrap();
    assert_eq!(fetched, 0);
}

#[test]
fn throttle_clamps_unusable_values_to_zero() {
    let with = |throttle_secs: f64| Settings {
        throttle_secs,
        ..Settings::default()
    };
    assert_eq!(with(0.5).throttle(), Duration::from_millis(500));
    assert_eq!(with(1e30).throttle(), Duration::ZERO);
    assert_eq!(with(-1.0).throttle(), Duration::ZERO);
    assert_eq!(with(f64::NAN).throttle(), Duration::ZERO);
    assert_eq!(with(f64::INFINITY).throttle(), Duration::ZERO);
}
