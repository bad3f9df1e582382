//! Raw source downloads

use anyhow::{Context, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{IngestConfig, HGNC_DATA_FILE};
use crate::{hgnc, reactome};

/// HTTP downloader with an optional progress bar
pub struct Fetcher {
    client: reqwest::Client,
    show_progress: bool,
}

impl Fetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("KGX-Loaders/1.0")
            .build()?;
        Ok(Self {
            client,
            show_progress: true,
        })
    }

    /// Disable the progress bar (tests, non-interactive runs)
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    fn progress_bar(&self, total_size: u64, file_name: &str) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }

        let pb = ProgressBar::new(total_size);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")?
                .progress_chars("#>-"),
        );
        pb.set_message(format!("Downloading {}", file_name));
        Ok(pb)
    }

    /// Stream `url` into `output_path`, returning the byte count.
    ///
    /// The body goes to a `.part` file first and is renamed once complete.
    pub async fn download_file(&self, url: &str, output_path: &Path) -> Result<u64> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to download {}: {}", url, response.status());
        }

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file_name = output_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| url.to_string());
        let pb = self.progress_bar(response.content_length().unwrap_or(0), &file_name)?;

        let partial_path = output_path.with_extension("part");
        let mut file = std::io::BufWriter::new(
            std::fs::File::create(&partial_path)
                .with_context(|| format!("Failed to create {}", partial_path.display()))?,
        );
        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)?;
            downloaded += chunk.len() as u64;
            pb.set_position(downloaded);
        }
        file.flush()?;
        drop(file);

        std::fs::rename(&partial_path, output_path)
            .with_context(|| format!("Failed to move download into {}", output_path.display()))?;

        pb.finish_with_message(format!("Downloaded {}", file_name));
        debug!("Downloaded {} bytes from {}", downloaded, url);

        Ok(downloaded)
    }
}

/// Download the Reactome graph database dump
pub async fn fetch_reactome(config: &IngestConfig, fetcher: &Fetcher) -> Result<PathBuf> {
    let path = config
        .source_dir(reactome::SOURCE_ID)
        .join(config.reactome.dump_file_name());
    info!("Fetching Reactome dump from {}", config.reactome.data_url);
    fetcher.download_file(&config.reactome.data_url, &path).await?;
    Ok(path)
}

/// Download the HGNC complete set
pub async fn fetch_hgnc(config: &IngestConfig, fetcher: &Fetcher) -> Result<PathBuf> {
    let path = config.source_dir(hgnc::SOURCE_ID).join(HGNC_DATA_FILE);
    info!("Fetching HGNC complete set from {}", config.hgnc.data_url);
    fetcher.download_file(&config.hgnc.data_url, &path).await?;
    Ok(path)
}
