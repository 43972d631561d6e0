use review_sentiment::admin::{UploadStore, VisitorLog, PLACEHOLDER};
use review_sentiment::{AnalysisService, ReviewAnalysisPipelineBuilder, SentimentError, UploadRequest};

fn request(bytes: &[u8]) -> UploadRequest {
    UploadRequest {
        file_name: "shop reviews.csv".to_string(),
        bytes: bytes.to_vec(),
        client_ip: Some("198.51.100.4".to_string()),
        city: None,
        ..UploadRequest::default()
    }
}

#[test]
fn records_visit_and_keeps_upload() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let service = AnalysisService::new(ReviewAnalysisPipelineBuilder::lexicon().build())
        .with_visitor_log(VisitorLog::new(dir.path()))
        .with_upload_store(UploadStore::new(dir.path()));

    let bytes = b"review\nGreat product!\n";
    let report = service.handle(&request(bytes))?;
    assert_eq!(report.summary.positive, 1);

    let visits = VisitorLog::new(dir.path()).entries()?;
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].ip, "198.51.100.4");
    assert_eq!(visits[0].city, PLACEHOLDER);
    assert!(visits[0].timestamp.ends_with(" UTC"));

    let uploads = UploadStore::new(dir.path()).list()?;
    assert_eq!(uploads.len(), 1);
    assert!(uploads[0].name.starts_with("shop_reviews.csv_"));
    assert_eq!(std::fs::read(&uploads[0].path)?, bytes);
    Ok(())
}

#[test]
fn collaborator_failures_do_not_change_the_result() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    // A regular file where a directory is expected makes both writes fail.
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"")?;

    let service = AnalysisService::new(ReviewAnalysisPipelineBuilder::lexicon().build())
        .with_visitor_log(VisitorLog::new(&blocker))
        .with_upload_store(UploadStore::new(&blocker));

    let report = service.handle(&request(b"review\n\"Terrible, broke in a day\"\n"))?;
    assert_eq!(report.summary.negative, 1);
    assert_eq!(report.summary.total, 1);
    Ok(())
}

#[test]
fn analysis_errors_are_returned() {
    let service = AnalysisService::new(ReviewAnalysisPipelineBuilder::lexicon().build());
    let err = service.handle(&request(b"")).unwrap_err();
    assert!(matches!(err, SentimentError::EmptyTable { .. }));
}
