//! Demo services entry point.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use demo_services::backend::{self, BackendState};
use demo_services::config::{BackendConfig, FrontendConfig};
use demo_services::error::ServiceError;
use demo_services::frontend::{self, FrontendState};
use demo_services::metrics;
use demo_services::probe::{build_client, probe_backend};
use demo_services::utils::shutdown_signal;

/// Demo backend and frontend services for observability tooling.
#[derive(Parser, Debug)]
#[command(name = "demo-services")]
#[command(about = "Demo HTTP services used to exercise cloud observability tooling")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the backend API service (default).
    Backend {
        /// Listen port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run the frontend page service.
    Frontend {
        /// Listen port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Backend base URL baked into the page (overrides API_URL).
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Load and validate configuration without starting a server.
    CheckConfig {
        /// Which service's configuration to check.
        #[arg(value_enum, default_value_t = Service::Backend)]
        service: Service,
    },

    /// Call a running backend the way the frontend page does.
    Probe {
        /// Backend base URL.
        #[arg(long, env = "API_URL", default_value = "http://localhost:3001")]
        url: String,

        /// Per-request timeout in seconds.
        #[arg(long, default_value = "5")]
        timeout: u64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Service {
    Backend,
    Frontend,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("demo_services=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if args.json_logs {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    match args.command {
        Some(Command::Backend { port }) => cmd_backend(port).await,
        Some(Command::Frontend { port, api_url }) => cmd_frontend(port, api_url).await,
        Some(Command::CheckConfig { service }) => cmd_check_config(service),
        Some(Command::Probe { url, timeout }) => cmd_probe(&url, timeout).await,
        None => cmd_backend(None).await,
    }
}

/// Run the backend service until a shutdown signal arrives.
async fn cmd_backend(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading backend configuration...");
    let mut config = BackendConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(port) = port_override {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(ServiceError::InvalidConfig(e).into());
    }

    metrics::install_exporter(config.metrics_port)?;
    metrics::init_metrics();

    info!("Environment: {}", config.environment);
    info!(
        "SQL connection string: {}",
        if config.sql_configured() { "configured" } else { "not configured" }
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Backend listening on {}", addr);

    let router = backend::create_router(BackendState::new(config));

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Backend stopped");
    Ok(())
}

/// Run the frontend service until a shutdown signal arrives.
async fn cmd_frontend(port_override: Option<u16>, api_url_override: Option<String>) -> anyhow::Result<()> {
    info!("Loading frontend configuration...");
    let mut config = FrontendConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(port) = port_override {
        config.port = port;
    }
    if let Some(api_url) = api_url_override {
        config.api_url = api_url;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(ServiceError::InvalidConfig(e).into());
    }

    metrics::install_exporter(config.metrics_port)?;
    metrics::init_metrics();

    info!("Backend API URL: {}", config.api_base());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Frontend listening on {}", addr);

    let state = FrontendState::new(config.api_base());
    let router = frontend::create_router(state.clone());

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            state.set_healthy(false);
        })
        .await?;

    info!("Frontend stopped");
    Ok(())
}

/// Check configuration validity.
fn cmd_check_config(service: Service) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("DEMO SERVICES - CONFIGURATION CHECK ({:?})", service);
    println!("======================================================================");

    print!("Loading configuration... ");
    let validation = match service {
        Service::Backend => match BackendConfig::load() {
            Ok(config) => {
                println!("OK");
                println!("----------------------------------------------------------------------");
                println!("  Port: {}", config.port);
                println!("  Environment: {}", config.environment);
                println!("  App Insights key: {}", config.client_id);
                println!(
                    "  SQL connection string: {}",
                    if config.sql_configured() { "configured" } else { "not configured" }
                );
                println!("  Max data items: {}", config.data_max_items);
                println!(
                    "  Metrics port: {}",
                    config.metrics_port.map_or("disabled".to_string(), |p| p.to_string())
                );
                println!("  Log level: {}", config.rust_log);
                config.validate()
            }
            Err(e) => return config_load_failed(e),
        },
        Service::Frontend => match FrontendConfig::load() {
            Ok(config) => {
                println!("OK");
                println!("----------------------------------------------------------------------");
                println!("  Port: {}", config.port);
                println!("  API URL: {}", config.api_url);
                println!(
                    "  Metrics port: {}",
                    config.metrics_port.map_or("disabled".to_string(), |p| p.to_string())
                );
                println!("  Log level: {}", config.rust_log);
                config.validate()
            }
            Err(e) => return config_load_failed(e),
        },
    };

    println!("----------------------------------------------------------------------");
    print!("Validating configuration... ");
    if let Err(e) = validation {
        println!("FAILED");
        println!("  Error: {}", e);
        return Err(ServiceError::InvalidConfig(e).into());
    }
    println!("OK");

    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

fn config_load_failed(e: envy::Error) -> anyhow::Result<()> {
    println!("FAILED");
    println!("  Error: {}", e);
    Err(ServiceError::Config(e).into())
}

/// Probe a running backend and print what came back.
async fn cmd_probe(url: &str, timeout_secs: u64) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("DEMO SERVICES - BACKEND PROBE");
    println!("======================================================================");
    println!("Target: {}", url);

    let client = build_client(Duration::from_secs(timeout_secs))?;
    let results = probe_backend(&client, url).await;

    let mut failures = 0usize;
    for result in &results {
        println!("----------------------------------------------------------------------");
        match result.status {
            Some(code) => println!("GET {} -> {}", result.path, code),
            None => println!("GET {} -> no response", result.path),
        }
        println!("{}", result.body);

        if !result.is_success() {
            failures += 1;
        }
    }

    println!("======================================================================");
    if failures > 0 {
        println!("PROBE FAILED ({} of {} requests)", failures, results.len());
        println!("======================================================================");
        return Err(anyhow::anyhow!("{} probe request(s) failed", failures));
    }

    println!("PROBE PASSED");
    println!("======================================================================");
    Ok(())
}
