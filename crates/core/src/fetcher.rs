use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Client used for upstream probes. `timeout` of `None` waits indefinitely.
pub fn build_http_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .gzip(true)
        .brotli(true)
        .pool_idle_timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(2);
    if let Some(t) = timeout {
        builder = builder.timeout(t);
    }
    builder.build().context("build http client")
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Single GET, body decoded as JSON. No retry.
///
/// The upstream status is not checked: whatever body comes back is decoded,
/// so an error page that is valid JSON is passed through for inspection.
pub async fn fetch_json(client: &Client, url: &str) -> Result<Value> {
    let start = Instant::now();
    let resp = client
        .get(url)
        .headers(json_headers())
        .send()
        .await
        .with_context(|| format!("request {url}"))?;
    let status = resp.status();
    let text = resp.text().await.context("read body text")?;
    metrics::histogram!("source_probe_upstream_fetch_seconds")
        .record(start.elapsed().as_secs_f64());
    tracing::debug!(%url, %status, bytes = text.len(), "upstream responded");

    serde_json::from_str(&text)
        .with_context(|| format!("decode JSON from {url} (HTTP {status})"))
}
