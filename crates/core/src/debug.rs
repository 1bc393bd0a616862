//! The source debug lookup: resolve a custom category and its source,
//! render the source's API URL and echo back what the upstream returns.

use std::sync::Arc;

use anyhow::Context;
use reqwest::Client;
use tracing::{error, info, instrument};

use crate::config::ConfigProvider;
use crate::error::DebugError;
use crate::fetcher::fetch_json;
use crate::models::{CategoryKind, DebugEnvelope, DebugRequest};
use crate::query::render_api_url;

/// Runs debug lookups against an injected configuration provider.
#[derive(Clone)]
pub struct DebugLookup {
    config: Arc<dyn ConfigProvider>,
    client: Client,
}

impl DebugLookup {
    pub fn new(config: Arc<dyn ConfigProvider>, client: Client) -> Self {
        Self { config, client }
    }

    #[instrument(skip_all, fields(q = %request.query, kind = %request.kind, page = request.page))]
    pub async fn run(&self, request: &DebugRequest) -> Result<DebugEnvelope, DebugError> {
        let outcome = self.lookup(request).await;
        let label = match &outcome {
            Ok(_) => "ok",
            Err(e) => e.label(),
        };
        metrics::counter!("source_probe_lookups_total", "outcome" => label).increment(1);

        if let Err(DebugError::Unexpected(e)) = &outcome {
            error!("source debug lookup failed: {e:?}");
        }
        outcome
    }

    async fn lookup(&self, request: &DebugRequest) -> Result<DebugEnvelope, DebugError> {
        let CategoryKind::Custom = request.validate()?;

        let admin = self
            .config
            .admin_config()
            .await
            .context("read admin configuration")?;

        let category = admin
            .find_category(&request.query)
            .ok_or_else(|| DebugError::CategoryNotFound(request.query.clone()))?;
        let source = admin
            .find_enabled_source(&request.query)
            .ok_or_else(|| DebugError::SourceUnavailable(request.query.clone()))?;

        let api_url = render_api_url(&source.api, &category.query, request.page);
        info!(source = %source.key, %api_url, "probing source");

        let data = fetch_json(&self.client, &api_url).await?;

        Ok(DebugEnvelope {
            success: true,
            source: source.name.clone(),
            category: category.name.clone(),
            page: request.page,
            api_url,
            data,
        })
    }
}
