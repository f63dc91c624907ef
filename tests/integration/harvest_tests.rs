//! Full runs: dispatcher, parser and JSON export against a mock site

use crate::{client_over, fast_fetch_config};
use async_trait::async_trait;
use company_harvest::client::{ReqwestTransport, Transport, TransportError, TransportResponse};
use company_harvest::extract::CompanyPageParser;
use company_harvest::output::{JsonExporter, RecordSink};
use company_harvest::{Dispatcher, ProxyPool};
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITE: &str = "https://www.linkedin.com";

/// Sends requests for the real site to the mock server instead
struct Rerouted {
    inner: ReqwestTransport,
    base: String,
}

#[async_trait]
impl Transport for Rerouted {
    async fn get(&self, url: &str, proxy: Option<&str>) -> Result<TransportResponse, TransportError> {
        let path = url.strip_prefix(SITE).unwrap_or(url);
        self.inner.get(&format!("{}{}", self.base, path), proxy).await
    }
}

fn company_page(name: &str) -> String {
    format!(
        r#"<html><head>
        <title>{name} | LinkedIn</title>
        <script type="application/ld+json">
          {{"@type": "Organization", "name": "{name}", "url": "{slug}.example",
            "address": {{"addressLocality": "Springfield", "addressCountry": "US"}}}}
        </script>
        </head><body><p>1,234 followers</p><p>Founded 1987</p></body></html>"#,
        slug = name.to_lowercase()
    )
}

async fn mount_page(server: &MockServer, slug: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/company/{slug}")))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_run_writes_both_outputs() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "acme",
        ResponseTemplate::new(200).set_body_string(company_page("Acme")),
    )
    .await;
    mount_page(
        &mock_server,
        "globex",
        ResponseTemplate::new(200).set_body_string(company_page("Globex")),
    )
    .await;
    mount_page(&mock_server, "initech", ResponseTemplate::new(429)).await;

    let config = fast_fetch_config();
    let transport = Rerouted {
        inner: ReqwestTransport::new(&config, &ProxyPool::empty()).unwrap(),
        base: mock_server.uri(),
    };
    let client = Arc::new(client_over(Arc::new(transport), &config));
    let dispatcher = Dispatcher::new(client, Arc::new(CompanyPageParser::new(false)), 2);

    let dir = TempDir::new().unwrap();
    let bundle_path = dir.path().join("out.json");
    let mut exporter = JsonExporter::create(&bundle_path).unwrap();

    let urls = vec![
        format!("{SITE}/company/acme"),
        format!("{SITE}/company/globex"),
        format!("{SITE}/company/initech"),
        format!("{SITE}/company/acme"),
        "https://example.com/not-a-company".to_string(),
    ];
    let batch = dispatcher.run(&urls, &mut exporter).await;
    exporter.finalize().unwrap();

    assert_eq!(batch.records.len(), 2);
    assert_eq!(batch.errors.len(), 1);
    assert_eq!(batch.errors[0].url, format!("{SITE}/company/initech"));

    // Line-delimited records
    let lines = fs::read_to_string(dir.path().join("out.jsonl")).unwrap();
    let records: Vec<Value> = lines
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    for record in &records {
        assert_eq!(record["followersCount"], 1234);
        assert_eq!(record["founded"], 1987);
        assert_eq!(record["mainAddress"]["addressLocality"], "Springfield");
        assert!(record["website"].as_str().unwrap().starts_with("https://"));
        assert!(record["scrapedAt"].as_str().unwrap().ends_with('Z'));
    }

    // Bundle
    let bundle: Value = serde_json::from_str(&fs::read_to_string(&bundle_path).unwrap()).unwrap();
    assert_eq!(bundle["stats"]["records"], 2);
    assert_eq!(bundle["stats"]["errors"], 1);
    assert_eq!(bundle["errors"][0]["url"], format!("{SITE}/company/initech"));
    assert!(bundle["errors"][0]["error"]
        .as_str()
        .unwrap()
        .contains("5 attempts"));

    let mut names: Vec<&str> = bundle["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Acme", "Globex"]);
}

#[tokio::test]
async fn test_run_without_valid_urls_writes_empty_bundle() {
    let mock_server = MockServer::start().await;

    let config = fast_fetch_config();
    let transport = Rerouted {
        inner: ReqwestTransport::new(&config, &ProxyPool::empty()).unwrap(),
        base: mock_server.uri(),
    };
    let client = Arc::new(client_over(Arc::new(transport), &config));
    let dispatcher = Dispatcher::new(client, Arc::new(CompanyPageParser::new(false)), 2);

    let dir = TempDir::new().unwrap();
    let bundle_path = dir.path().join("empty.json");
    let mut exporter = JsonExporter::create(&bundle_path).unwrap();

    let batch = dispatcher
        .run(&["https://example.com/about".to_string()], &mut exporter)
        .await;
    exporter.finalize().unwrap();

    assert!(batch.records.is_empty());
    assert!(batch.errors.is_empty());
    assert!(mock_server.received_requests().await.unwrap().is_empty());

    let bundle: Value = serde_json::from_str(&fs::read_to_string(&bundle_path).unwrap()).unwrap();
    assert_eq!(bundle["stats"]["records"], 0);
    assert_eq!(bundle["errors"], Value::Array(vec![]));
}
