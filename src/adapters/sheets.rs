use crate::utils::error::{RaffleError, Result};
use regex::Regex;
use reqwest::{Client, StatusCode};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

pub const DIRECT: &str = "direct";

pub const DEFAULT_PROXIES: &[&str] = &[
    DIRECT,
    "https://api.allorigins.win/raw?url={url}",
    "https://corsproxy.io/?{url}",
];

static OUTPUT_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"output=[^&#]*").expect("valid output regex"));
static SPREADSHEET_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([a-zA-Z0-9_-]+)").expect("valid id regex"));
static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid bare id regex"));
static GID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#&?]gid=([0-9]+)").expect("valid gid regex"));

pub fn build_export_url(spreadsheet_id: &str, gid: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/pub?output=csv&gid={}",
        spreadsheet_id, gid
    )
}

pub fn extract_spreadsheet_id(url: &str) -> Option<&str> {
    if let Some(caps) = SPREADSHEET_ID.captures(url) {
        return caps.get(1).map(|m| m.as_str());
    }
    BARE_ID.is_match(url).then_some(url)
}

pub fn extract_gid(url: &str) -> Option<&str> {
    GID.captures(url).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

/// Turns any Google Sheets link into its publish-to-web CSV URL.
pub fn normalize_sheet_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(RaffleError::InvalidSheetUrl {
            url: input.to_string(),
        });
    }

    // pubhtml 是網頁版，換成 pub 才拿得到 CSV
    let url = trimmed.replacen("/pubhtml", "/pub", 1);

    if url.contains("/pub") && url.contains("output=csv") {
        return Ok(url);
    }
    if OUTPUT_PARAM.is_match(&url) {
        return Ok(OUTPUT_PARAM.replace(&url, "output=csv").into_owned());
    }
    if url.contains("/pub?") {
        return Ok(format!("{}&output=csv", url));
    }
    if url.ends_with("/pub") {
        return Ok(format!("{}?output=csv", url));
    }

    match extract_spreadsheet_id(&url) {
        Some(id) => Ok(build_export_url(id, extract_gid(&url).unwrap_or("0"))),
        None => Err(RaffleError::InvalidSheetUrl {
            url: input.to_string(),
        }),
    }
}

/// Fills a proxy template with the export URL. `direct` means no proxy.
pub fn proxy_url(template: &str, export_url: &str) -> String {
    if template == DIRECT {
        return export_url.to_string();
    }
    let encoded: String = url::form_urlencoded::byte_serialize(export_url.as_bytes()).collect();
    template.replace("{url}", &encoded)
}

pub fn looks_like_html(body: &str) -> bool {
    let lowered = body.to_lowercase();
    lowered.contains("<!doctype html") || lowered.contains("<html")
}

#[derive(Debug, Error)]
enum AttemptFailure {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("received HTML instead of CSV - make sure the sheet is published to the web as CSV")]
    Html,
}

/// Fetches published sheet CSV through an ordered list of proxies.
#[derive(Debug, Clone)]
pub struct SheetFetcher {
    client: Client,
    proxies: Vec<String>,
    timeout: Duration,
}

impl SheetFetcher {
    pub fn new(proxies: Vec<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            proxies,
            timeout,
        }
    }

    pub fn proxies(&self) -> &[String] {
        &self.proxies
    }

    async fn attempt(&self, target: &str) -> std::result::Result<String, AttemptFailure> {
        let response = self.client.get(target).timeout(self.timeout).send().await?;

        let status = response.status();
        tracing::debug!("Response status from {}: {}", target, status);
        if !status.is_success() {
            return Err(AttemptFailure::Status(status));
        }

        let body = response.text().await?;
        if looks_like_html(&body) {
            return Err(AttemptFailure::Html);
        }
        Ok(body)
    }

    /// Tries each proxy in turn and returns the first CSV body.
    pub async fn fetch_csv(&self, export_url: &str) -> Result<String> {
        let mut last_failure = "no proxies configured".to_string();

        for (index, template) in self.proxies.iter().enumerate() {
            let target = proxy_url(template, export_url);
            tracing::info!(
                "🌐 Fetch attempt {}/{} via {}",
                index + 1,
                self.proxies.len(),
                if template == DIRECT { "direct" } else { template.as_str() }
            );

            match self.attempt(&target).await {
                Ok(body) => {
                    tracing::info!("✅ Received {} bytes of CSV", body.len());
                    return Ok(body);
                }
                Err(failure) => {
                    tracing::warn!("Attempt {} failed: {}", index + 1, failure);
                    last_failure = failure.to_string();
                }
            }
        }

        Err(RaffleError::FetchError {
            attempts: self.proxies.len(),
            last_failure,
        })
    }
}
