//! Ferry - conversational wallet core for Substrate networks.
//!
//! # Usage
//!
//! ```bash
//! # Start with static validation only
//! ferry
//!
//! # Start with the live capability oracle
//! ORACLE_ENDPOINTS="Polkadot=wss://rpc.polkadot.io,AssetHubPolkadot=wss://polkadot-asset-hub-rpc.polkadot.io" ferry
//!
//! # Print the tool catalogue and exit
//! ferry --list-tools
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::signal;
use tokio::sync::watch;
use tracing::{Instrument, debug, error, info, info_span, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ferry_core::metrics::init_metrics;
use ferry_core::models::ChainTopology;
use ferry_core::services::{DEFAULT_MAX_INPUT_SIZE, DispatcherConfig, RouteResolver, ToolDispatcher};
use ferry_graphql::{ServerConfig, build_schema, serve_with_shutdown};
use ferry_substrate::{SubstrateCapabilityOracle, SubstrateOracleConfig};
use ferry_tools::standard_bundles;

/// Ferry CLI - conversational wallet core.
#[derive(Parser, Debug)]
#[command(name = "ferry")]
#[command(about = "Ferry - validates and prepares Substrate transactions for a conversational wallet")]
#[command(version)]
struct Cli {
    /// Capability oracle endpoints as `Chain=wss://url,...`, keyed by
    /// canonical chain id. Without endpoints only static checks run.
    #[arg(long, env = "ORACLE_ENDPOINTS", default_value = "")]
    oracle_endpoints: String,

    /// GraphQL server host.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// GraphQL server port.
    #[arg(long, env = "GRAPHQL_PORT", default_value = "4000")]
    graphql_port: u16,

    /// Disable the GraphiQL page at `/`.
    #[arg(long, env = "DISABLE_PLAYGROUND")]
    disable_playground: bool,

    /// Prometheus metrics port.
    #[arg(long, env = "METRICS_PORT", default_value = "9090")]
    metrics_port: u16,

    /// Maximum tool input size in bytes.
    #[arg(long, env = "MAX_INPUT_SIZE", default_value_t = DEFAULT_MAX_INPUT_SIZE)]
    max_input_size: usize,

    /// Enable JSON log output.
    #[arg(long, env = "JSON_LOGS")]
    json_logs: bool,

    /// Print the tool catalogue as JSON and exit.
    #[arg(long)]
    list_tools: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let oracle_config = SubstrateOracleConfig::from_list(&cli.oracle_endpoints)
        .context("Invalid ORACLE_ENDPOINTS")?;

    // ─────────────────────────────────────────────────────────────────────────
    // 🧭 TOPOLOGY & CAPABILITY ORACLE
    // ─────────────────────────────────────────────────────────────────────────
    let topology = Arc::new(ChainTopology::default());
    let mut resolver = RouteResolver::new(topology.clone());

    if !cli.list_tools {
        info!("🚀 Starting Ferry");
        debug!(relays = ?topology.relay_chains(), "Chain topology loaded");

        if oracle_config.is_empty() {
            warn!("⚠️  No ORACLE_ENDPOINTS configured, capability checks disabled");
        } else {
            info!("📡 Connecting capability oracle...");
            let oracle = SubstrateCapabilityOracle::connect(&oracle_config)
                .await
                .context("Failed to connect capability oracle")?;
            info!(chains = ?oracle.chains(), "📡 Capability oracle ready");
            resolver = resolver.with_oracle(Arc::new(oracle));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 📦 TOOL BUNDLES
    // ─────────────────────────────────────────────────────────────────────────
    let registry = Arc::new(standard_bundles(Arc::new(resolver)).into_tool_registry());

    if cli.list_tools {
        let catalogue = serde_json::to_string_pretty(&registry.definitions())
            .context("Failed to encode tool catalogue")?;
        println!("{catalogue}");
        return Ok(());
    }

    info!(tools = registry.len(), "📦 Tools registered");

    // Prometheus metrics exporter (optional - failures don't crash the app)
    let metrics_enabled = match format!("0.0.0.0:{}", cli.metrics_port).parse::<std::net::SocketAddr>() {
        Ok(metrics_addr) => {
            match PrometheusBuilder::new()
                .with_http_listener(metrics_addr)
                .install()
            {
                Ok(()) => {
                    init_metrics();
                    true
                }
                Err(e) => {
                    warn!("⚠️  Failed to start metrics exporter: {}. Continuing without metrics.", e);
                    false
                }
            }
        }
        Err(e) => {
            warn!("⚠️  Invalid metrics address: {}. Continuing without metrics.", e);
            false
        }
    };

    let dispatcher = Arc::new(ToolDispatcher::new(
        registry,
        DispatcherConfig {
            max_input_size: cli.max_input_size,
        },
    ));

    // ─────────────────────────────────────────────────────────────────────────
    // ⚡ SERVICES START
    // ─────────────────────────────────────────────────────────────────────────
    let (shutdown_tx, mut graphql_shutdown_rx) = watch::channel(false);

    let graphql_config = ServerConfig {
        host: cli.host.clone(),
        port: cli.graphql_port,
        enable_playground: !cli.disable_playground,
    };

    // Includes DoS protection: depth limit (15), complexity limit (500)
    let schema = build_schema(dispatcher, topology);
    let graphql_port = cli.graphql_port;
    let graphql_handle = tokio::spawn(
        async move {
            let shutdown_signal = async move {
                while !*graphql_shutdown_rx.borrow() {
                    if graphql_shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            };

            if let Err(e) = serve_with_shutdown(schema, graphql_config, shutdown_signal).await {
                error!(error = %e, "❌ Server error");
            }
            debug!("Server stopped");
        }
        .instrument(info_span!("graphql")),
    );

    // ─────────────────────────────────────────────────────────────────────────
    // ✅ READY
    // ─────────────────────────────────────────────────────────────────────────
    info!("✅ Ferry ready");
    info!("   ⚡ GraphQL:  http://localhost:{}/graphql", graphql_port);
    if metrics_enabled {
        info!(
            "   📊 Metrics:  http://localhost:{}/metrics",
            cli.metrics_port
        );
    } else {
        info!("   📊 Metrics:  disabled");
    }
    info!("   Press Ctrl+C to stop");

    shutdown_signal().await;

    // ─────────────────────────────────────────────────────────────────────────
    // 🛑 SHUTDOWN
    // ─────────────────────────────────────────────────────────────────────────
    info!("🛑 Shutting down...");
    let _ = shutdown_tx.send(true);

    match tokio::time::timeout(std::time::Duration::from_secs(10), graphql_handle).await {
        Ok(_) => debug!("GraphQL stopped"),
        Err(_) => warn!("⚠️  GraphQL shutdown timed out"),
    }

    info!("🛑 Shutdown complete");
    Ok(())
}

/// Initialize tracing subscriber.
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "❌ Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "❌ Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
