use std::net::SocketAddr;

use tracing::info;

pub const DEFAULT_LOG_FILTER: &str = "source_probe=debug,source_probe_core=debug,tower_http=debug";

/// Initialize tracing subscriber with default configuration
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Tracing initialized");
}

/// Errors only, on stderr, so stdout stays clean JSON
pub fn init_tracing_json() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from("error"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();
}

/// Install the Prometheus exporter on the given port, if any.
pub fn init_metrics(port: Option<u16>) -> anyhow::Result<()> {
    let Some(port) = port else {
        return Ok(());
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    metrics::describe_counter!(
        "source_probe_lookups_total",
        "Debug lookups by outcome"
    );
    metrics::describe_histogram!(
        "source_probe_upstream_fetch_seconds",
        metrics::Unit::Seconds,
        "Upstream fetch latency"
    );
    info!("Metrics endpoint available at http://{}/metrics", addr);
    Ok(())
}
