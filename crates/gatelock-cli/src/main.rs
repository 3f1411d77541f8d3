//! `gatelock`: GPIO gate-lock controller.
//!
//! Loads configuration, opens the pin backend, then runs the poll loop and
//! the HTTP command API until SIGINT or SIGTERM. On the way out both output
//! lines are driven Inactive.

use anyhow::{Context, Result};
use clap::Parser;
use gatelock_controller::{PollLoop, UnlockOrchestrator};
use gatelock_core::constants::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
use gatelock_core::{BackendKind, Config, VERSION};
use gatelock_hardware::{AnyPinBackend, PinInterface};
use gatelock_network::{ApiServer, DoorbellClient, router};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gatelock")]
#[command(version, about = "GPIO gate-lock controller", long_about = None)]
struct Cli {
    /// Path to the JSON configuration file (created with defaults if missing)
    #[arg(short, long, env = CONFIG_ENV_VAR, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Pin backend override: auto, mock or rpi
    #[arg(long)]
    backend: Option<BackendKind>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    run(config).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_or_init(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    if let Some(backend) = cli.backend {
        config.gpio.backend = backend;
    }

    Ok(config)
}

async fn run(config: Config) -> Result<()> {
    info!(
        version = VERSION,
        signal_pin = %config.gpio.signal_pin,
        ack_pin = %config.gpio.ack_pin,
        relay_pin = %config.gpio.relay_pin,
        backend = ?config.gpio.backend,
        announcement_enabled = config.announcement.enabled,
        announcement_host = %config.announcement.host,
        bind_addr = %config.api.bind_addr,
        "Starting gate locker"
    );

    let pins = AnyPinBackend::open(&config.gpio, config.gpio.backend)
        .context("failed to open GPIO backend")?;
    let backend = pins.info();
    info!(backend = %backend.name, "Pin backend ready");
    if backend.is_mock() {
        info!("Simulated pins in use; POST /buttonPress injects a signal");
    }

    let announcer = DoorbellClient::new(
        &config.announcement,
        config.timing.announcement_timeout(),
    )
    .context("failed to create doorbell client")?;

    let orchestrator = Arc::new(UnlockOrchestrator::new(Arc::new(pins), announcer, &config));

    let server = ApiServer::bind(config.api.bind_addr, router(Arc::clone(&orchestrator)))
        .await
        .context("failed to start command API")?;

    let shutdown = CancellationToken::new();
    let poll = PollLoop::new(Arc::clone(&orchestrator), config.timing.poll_interval());
    let poll_task = tokio::spawn(poll.run(shutdown.clone()));
    let mut api_task = tokio::spawn(server.serve(shutdown.clone()));

    let early_exit = tokio::select! {
        () = shutdown_signal() => {
            info!("Shutdown signal received");
            None
        }
        result = &mut api_task => Some(result),
    };

    shutdown.cancel();

    let stats = poll_task.await.context("poll loop task failed")?;
    info!(
        ticks = stats.ticks,
        acknowledged = stats.acknowledged,
        "Poll loop finished"
    );

    let api_result = match early_exit {
        Some(result) => result,
        None => api_task.await,
    };

    if let Err(e) = orchestrator.close() {
        error!(error = %e, "Failed to release GPIO lines");
    }

    api_result
        .context("command API task failed")?
        .context("command API stopped with an error")?;

    info!("Gate locker stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
