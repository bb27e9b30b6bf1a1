//! ReviewStack Server - movie review REST API.
//!
//! # Usage
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:3000 STORAGE_BACKEND=memory reviewstack-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:3000` | Bind address |
//! | `STORAGE_BACKEND` | `memory` | `memory` or `dynamodb` |
//! | `TABLE_NAME` | `MovieReviews` | Review table name |
//! | `REGION` | `eu-west-1` | AWS region for DynamoDB |
//! | `DYNAMODB_ENDPOINT` | *(unset)* | DynamoDB endpoint override |
//! | `TRANSLATE_ENDPOINT` | `http://localhost:5000/translate` | Translation service URL |
//! | `TRANSLATE_API_KEY` | *(unset)* | Translation service API key |
//! | `TRANSLATE_TIMEOUT_SECS` | `10` | Translation request timeout |
//! | `SEED_FILE` | *(unset)* | JSON array of reviews loaded at startup |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `LOG_FORMAT` | `text` | `json` for structured log lines |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod gateway;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use reviewstack_core::config::{ReviewsConfig, StorageBackend};
use reviewstack_core::handler::MovieReviewsHandler;
use reviewstack_core::provider::MovieReviewsProvider;
use reviewstack_core::seed::seed_from_file;
use reviewstack_core::storage::{DynamoDbReviewTable, InMemoryReviewTable, ReviewStore};
use reviewstack_core::translate::{HttpTranslator, Translator};
use reviewstack_http::ReviewsHttpService;

use crate::gateway::GatewayService;

/// Server version reported in health check responses.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

/// Whether `LOG_FORMAT` asks for JSON log lines.
fn json_logs(raw: Option<&str>) -> bool {
    raw.is_some_and(|v| v.trim().eq_ignore_ascii_case("json"))
}

/// Construct the configured review store.
async fn build_store(config: &ReviewsConfig) -> Arc<dyn ReviewStore> {
    match config.backend {
        StorageBackend::Memory => Arc::new(InMemoryReviewTable::new()),
        StorageBackend::DynamoDb => {
            info!(
                table = %config.table_name,
                region = %config.region,
                endpoint = ?config.dynamodb_endpoint,
                "using DynamoDB review table",
            );
            Arc::new(DynamoDbReviewTable::from_config(config).await)
        }
    }
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(listener: TcpListener, service: GatewayService<MovieReviewsHandler>) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Perform a health check by connecting to the server and requesting the health endpoint.
///
/// Exits with code 0 if the response is 200 OK and reports the server running,
/// 1 otherwise.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /_health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if is_healthy_response(&response) {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

fn is_healthy_response(raw: &str) -> bool {
    raw.contains("200 OK") && raw.contains("\"running\"")
}

/// The address a local health probe should dial.
fn probe_addr(listen_addr: &str) -> String {
    listen_addr.replace("0.0.0.0", "127.0.0.1")
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ReviewsConfig::from_env();

    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let healthy = run_health_check(&probe_addr(&config.gateway_listen))
            .await
            .is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(
        &config.log_level,
        json_logs(std::env::var("LOG_FORMAT").ok().as_deref()),
    )?;

    let store = build_store(&config).await;

    if let Some(seed_file) = &config.seed_file {
        seed_from_file(store.as_ref(), Path::new(seed_file)).await?;
    }

    let translator: Arc<dyn Translator> = Arc::new(
        HttpTranslator::from_config(&config).context("failed to build translation client")?,
    );
    info!(endpoint = %config.translate_endpoint, "translation client configured");

    let provider = MovieReviewsProvider::new(store, translator);
    let handler = MovieReviewsHandler::new(Arc::new(provider));
    let reviews = ReviewsHttpService::new(Arc::new(handler));
    let gateway = GatewayService::new(reviews, config.backend.as_str());

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(
        %addr,
        storage = config.backend.as_str(),
        version = VERSION,
        "starting ReviewStack Server",
    );

    serve(listener, gateway).await
}
