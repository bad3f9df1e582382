//! Reactome release discovery
//!
//! Reactome announces releases on its news page ("Reactome V92 released").
//! The first `V<number>` in the page text is taken as the current release.

use regex::Regex;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{ReactomeError, Result};
use crate::config::ReactomeConfig;

/// Reported when the news page no longer carries a release number
pub const VERSION_UNKNOWN: &str = "version_broken";

/// Reactome version discovery service
pub struct VersionDiscovery {
    client: Client,
    version_url: String,
}

impl VersionDiscovery {
    pub fn new(config: &ReactomeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("KGX-Reactome-Loader/1.0")
            .build()?;

        Ok(Self {
            client,
            version_url: config.version_url.clone(),
        })
    }

    /// Fetch the news page and extract the current release
    pub async fn latest_version(&self) -> Result<String> {
        debug!("Fetching Reactome news page from: {}", self.version_url);

        let response = self.client.get(&self.version_url).send().await?;
        if !response.status().is_success() {
            return Err(ReactomeError::VersionPage(format!(
                "HTTP error: {} from {}",
                response.status(),
                self.version_url
            )));
        }

        let html = response.text().await?;
        let version = extract_version(&html)?;

        if version == VERSION_UNKNOWN {
            warn!("No release number found on {}", self.version_url);
        } else {
            info!(version = %version, "Discovered Reactome release");
        }
        Ok(version)
    }
}

/// First `V<number>` in the document text, or [`VERSION_UNKNOWN`]
pub fn extract_version(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let text: String = document.root_element().text().collect();

    let pattern = Regex::new(r"V\d+")?;
    Ok(pattern
        .find(&text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| VERSION_UNKNOWN.to_string()))
}
