//! Release discovery and raw downloads against a mock server

use kgx_ingest::config::{IngestConfig, ReactomeConfig, HGNC_DATA_FILE};
use kgx_ingest::fetch::{self, Fetcher};
use kgx_ingest::reactome::version_discovery::VERSION_UNKNOWN;
use kgx_ingest::reactome::{ReactomeError, VersionDiscovery};
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const NEWS_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Reactome news</title></head>
  <body>
    <div class="item-page">
      <h2>Reactome V92 is live</h2>
      <p>This release follows V91 and adds 12 new pathways.</p>
    </div>
  </body>
</html>"#;

fn reactome_config(server: &MockServer) -> ReactomeConfig {
    ReactomeConfig::builder()
        .version_url(format!("{}/about/news", server.uri()))
        .data_url(format!("{}/download/current/reactome.graphdb.dump", server.uri()))
        .timeout_secs(5)
        .build()
}

#[tokio::test]
async fn test_latest_version_from_news_page() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/about/news"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NEWS_PAGE))
        .mount(&mock_server)
        .await;

    let discovery = VersionDiscovery::new(&reactome_config(&mock_server)).unwrap();
    assert_eq!(discovery.latest_version().await.unwrap(), "V92");
}

#[tokio::test]
async fn test_page_without_release_reports_unknown() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/about/news"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>maintenance</body></html>"))
        .mount(&mock_server)
        .await;

    let discovery = VersionDiscovery::new(&reactome_config(&mock_server)).unwrap();
    assert_eq!(discovery.latest_version().await.unwrap(), VERSION_UNKNOWN);
}

#[tokio::test]
async fn test_news_page_error_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/about/news"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let discovery = VersionDiscovery::new(&reactome_config(&mock_server)).unwrap();
    let result = discovery.latest_version().await;
    assert!(matches!(result, Err(ReactomeError::VersionPage(_))));
}

#[tokio::test]
async fn test_fetch_reactome_dump() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/current/reactome.graphdb.dump"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"neo4j dump bytes".to_vec()))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = IngestConfig {
        data_dir: dir.path().to_path_buf(),
        reactome: reactome_config(&mock_server),
        ..IngestConfig::default()
    };

    let fetcher = Fetcher::new(5).unwrap().quiet();
    let saved = fetch::fetch_reactome(&config, &fetcher).await.unwrap();

    assert_eq!(saved, dir.path().join("Reactome").join("reactome.graphdb.dump"));
    assert_eq!(std::fs::read(&saved).unwrap(), b"neo4j dump bytes");
    assert!(!saved.with_extension("part").exists());
}

#[tokio::test]
async fn test_fetch_hgnc_complete_set() {
    let mock_server = MockServer::start().await;
    let body = "hgnc_id\tsymbol\tname\nHGNC:5\tA1BG\talpha-1-B glycoprotein\n";
    Mock::given(method("GET"))
        .and(path("/hgnc/tsv/hgnc_complete_set.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = IngestConfig {
        data_dir: dir.path().to_path_buf(),
        ..IngestConfig::default()
    };
    config.hgnc.data_url = format!("{}/hgnc/tsv/hgnc_complete_set.txt", mock_server.uri());

    let fetcher = Fetcher::new(5).unwrap().quiet();
    let saved = fetch::fetch_hgnc(&config, &fetcher).await.unwrap();

    assert_eq!(saved, dir.path().join("HGNC").join(HGNC_DATA_FILE));
    assert_eq!(std::fs::read_to_string(&saved).unwrap(), body);
}

#[tokio::test]
async fn test_download_failure_leaves_no_file() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let target = dir.path().join("missing.txt");
    let fetcher = Fetcher::new(5).unwrap().quiet();

    let result = fetcher
        .download_file(&format!("{}/missing.txt", mock_server.uri()), &target)
        .await;
    assert!(result.is_err());
    assert!(!target.exists());
}
