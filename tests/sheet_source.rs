//! HTTP source tests against a local mock of the sheet export endpoint.

use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fives_dashboard::fetch::BasicClient;
use fives_dashboard::filter::AuditFilter;
use fives_dashboard::pipeline::Pipeline;
use fives_dashboard::services::{AuditSource, CachedSource, SheetSource};

const SHEET: &str = include_str!("fixtures/audit_sheet.csv");

fn export_url(server: &MockServer) -> String {
    format!("{}/spreadsheets/d/abc/export?format=csv", server.uri())
}

#[tokio::test]
async fn snapshot_downloads_and_parses() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spreadsheets/d/abc/export"))
        .and(query_param("format", "csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SHEET))
        .expect(1)
        .mount(&server)
        .await;

    let source = SheetSource::new(BasicClient::new().unwrap(), export_url(&server));
    let table = source.snapshot().await.unwrap();

    assert_eq!(table.records.len(), 6);
    assert_eq!(table.items.len(), 6);
}

#[tokio::test]
async fn server_error_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = SheetSource::new(BasicClient::new().unwrap(), export_url(&server));
    let err = source.snapshot().await.unwrap_err();

    assert!(format!("{err:#}").contains("failed to fetch audit sheet"));
}

#[tokio::test]
async fn cached_source_fetches_once_within_ttl() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SHEET))
        .expect(1)
        .mount(&server)
        .await;

    let source = CachedSource::new(
        SheetSource::new(BasicClient::new().unwrap(), export_url(&server)),
        Duration::from_secs(60),
    );
    let pipeline = Pipeline::default();

    let first = pipeline.refresh(&source, &AuditFilter::default()).await.unwrap();
    let second = pipeline.refresh(&source, &AuditFilter::default()).await.unwrap();

    assert_eq!(first.summary, second.summary);
}
