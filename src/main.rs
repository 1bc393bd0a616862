use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use source_probe::{AppState, router};
use source_probe_core::config::default_config_path;
use source_probe_core::fetcher::build_http_client;
use source_probe_core::{
    ConfigManager, ConfigProvider, DebugError, DebugLookup, DebugRequest, ReloadPolicy,
};
use source_probe_core::{monitoring, output};

#[derive(Debug, Parser)]
#[command(name = "source-probe", version, about = "Debug custom category sources end to end")]
struct Cli {
    /// Admin configuration file (.toml or .json)
    #[arg(long, global = true, env = "SOURCE_PROBE_CONFIG")]
    config: Option<PathBuf>,

    /// Upstream request timeout in seconds (default: wait indefinitely)
    #[arg(long, global = true)]
    upstream_timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve GET /api/debugSource
    Serve {
        #[arg(long, env = "SOURCE_PROBE_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,

        /// Expose Prometheus metrics on this port
        #[arg(long, env = "SOURCE_PROBE_METRICS_PORT")]
        metrics_port: Option<u16>,

        /// Keep the admin config in memory; reload on SIGHUP instead of every request
        #[arg(long, default_value_t = false)]
        snapshot_config: bool,
    },
    /// Run a single lookup and print the envelope
    Check {
        /// Category query / source key
        #[arg(long)]
        q: Option<String>,

        /// Category kind
        #[arg(long = "type")]
        kind: Option<String>,

        /// Page number
        #[arg(long)]
        pg: Option<String>,

        /// Plain JSON output, errors-only logging
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List custom categories and the enabled source each resolves to
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let quiet = matches!(
        cli.command,
        Command::Check { json: true, .. } | Command::List { json: true }
    );
    if quiet {
        monitoring::init_tracing_json();
    } else {
        monitoring::init_tracing();
    }

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let timeout = cli.upstream_timeout_secs.map(Duration::from_secs);

    match cli.command {
        Command::Serve {
            bind,
            metrics_port,
            snapshot_config,
        } => {
            monitoring::init_metrics(metrics_port)?;
            let policy = if snapshot_config {
                ReloadPolicy::OnDemand
            } else {
                ReloadPolicy::EveryRequest
            };
            let manager = Arc::new(ConfigManager::new(config_path, policy)?);
            if snapshot_config {
                spawn_reload_on_hangup(manager.clone());
            }
            let lookup = DebugLookup::new(manager, build_http_client(timeout)?);
            serve(bind, AppState::new(lookup)).await
        }
        Command::Check { q, kind, pg, json } => {
            let request = DebugRequest::from_raw(q.as_deref(), kind.as_deref(), pg.as_deref());
            // bad input is reported before the admin file is touched
            if let Err(e) = request.validate() {
                return report_failure(&e);
            }
            let manager = ConfigManager::new(config_path, ReloadPolicy::OnDemand)?;
            let lookup = DebugLookup::new(Arc::new(manager), build_http_client(timeout)?);
            match lookup.run(&request).await {
                Ok(envelope) if json => {
                    println!("{}", serde_json::to_string_pretty(&envelope)?);
                    Ok(())
                }
                Ok(envelope) => {
                    output::print_envelope(&envelope);
                    Ok(())
                }
                Err(e) => report_failure(&e),
            }
        }
        Command::List { json } => {
            let manager = ConfigManager::new(config_path, ReloadPolicy::OnDemand)?;
            let admin = manager.admin_config().await?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output::category_overview(&admin))?
                );
            } else {
                println!("{}:", manager.path().display());
                output::print_category_table(&admin);
            }
            Ok(())
        }
    }
}

fn report_failure(e: &DebugError) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&e.body())?);
    anyhow::bail!("lookup failed with status {}", e.status_code())
}

async fn serve(bind: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("bind {bind}"))?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[cfg(unix)]
fn spawn_reload_on_hangup(manager: Arc<ConfigManager>) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("SIGHUP reload unavailable: {e}");
                return;
            }
        };
        while hangup.recv().await.is_some() {
            match manager.reload().await {
                Ok(()) => info!("Admin configuration reloaded"),
                Err(e) => tracing::error!("Admin configuration reload failed: {e:#}"),
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_reload_on_hangup(_manager: Arc<ConfigManager>) {
    tracing::warn!("SIGHUP reload is only available on unix");
}
