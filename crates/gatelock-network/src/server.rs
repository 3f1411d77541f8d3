//! HTTP command surface.
//!
//! | Method | Path           | Action                                   |
//! |--------|----------------|------------------------------------------|
//! | GET    | `/status`      | running message plus controller snapshot |
//! | POST   | `/unlock`      | pulse the relay, answer when released    |
//! | POST   | `/buttonPress` | queue one synthetic signal sample        |
//!
//! # Example
//!
//! ```no_run
//! use gatelock_controller::{DisabledAnnouncer, UnlockOrchestrator};
//! use gatelock_core::Config;
//! use gatelock_hardware::mock::MockPins;
//! use gatelock_network::{ApiServer, router};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let (pins, _handle) = MockPins::new(&config.gpio);
//! let orchestrator = Arc::new(UnlockOrchestrator::new(Arc::new(pins), DisabledAnnouncer, &config));
//!
//! let server = ApiServer::bind(config.api.bind_addr, router(orchestrator)).await?;
//! server.serve(CancellationToken::new()).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{ApiError, Result};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use gatelock_controller::{Announcer, ControllerStatus, UnlockOrchestrator};
use gatelock_core::constants::{MSG_RUNNING, MSG_UNLOCK_TRIGGERED};
use gatelock_hardware::{BackendInfo, PinInterface};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

const MSG_BUTTON_PRESS_QUEUED: &str = "Button press queued";

/// Body of `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
    pub backend: BackendInfo,
    pub controller: ControllerStatus,
}

/// Body of `POST /unlock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of `POST /buttonPress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonPressResponse {
    pub message: String,
    pub pending_injections: u32,
}

struct ApiState<P, A> {
    orchestrator: Arc<UnlockOrchestrator<P, A>>,
}

/// Build the command router over a shared orchestrator.
pub fn router<P, A>(orchestrator: Arc<UnlockOrchestrator<P, A>>) -> Router
where
    P: PinInterface + 'static,
    A: Announcer + 'static,
{
    let state = Arc::new(ApiState { orchestrator });

    Router::new()
        .route("/status", get(status_handler::<P, A>))
        .route("/unlock", post(unlock_handler::<P, A>))
        .route("/buttonPress", post(button_press_handler::<P, A>))
        .with_state(state)
}

async fn status_handler<P, A>(State(state): State<Arc<ApiState<P, A>>>) -> Json<StatusResponse>
where
    P: PinInterface + 'static,
    A: Announcer + 'static,
{
    Json(StatusResponse {
        message: MSG_RUNNING.to_string(),
        backend: state.orchestrator.pins().info(),
        controller: state.orchestrator.status(),
    })
}

async fn unlock_handler<P, A>(State(state): State<Arc<ApiState<P, A>>>) -> Json<MessageResponse>
where
    P: PinInterface + 'static,
    A: Announcer + 'static,
{
    info!("Unlock requested over HTTP");
    state.orchestrator.trigger_relay().await;

    Json(MessageResponse {
        message: MSG_UNLOCK_TRIGGERED.to_string(),
    })
}

async fn button_press_handler<P, A>(
    State(state): State<Arc<ApiState<P, A>>>,
) -> Json<ButtonPressResponse>
where
    P: PinInterface + 'static,
    A: Announcer + 'static,
{
    state.orchestrator.inject_signal();

    Json(ButtonPressResponse {
        message: MSG_BUTTON_PRESS_QUEUED.to_string(),
        pending_injections: state.orchestrator.pending_injections(),
    })
}

/// Bound HTTP listener plus its router.
#[derive(Debug)]
pub struct ApiServer {
    listener: TcpListener,
    router: Router,
}

impl ApiServer {
    /// Bind the listener.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Bind`] if the address is unavailable.
    pub async fn bind(addr: SocketAddr, router: Router) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiError::Bind { addr, source })?;

        Ok(Self { listener, router })
    }

    /// Address actually bound (useful with port 0).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Serve`] if the socket cannot report its address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(ApiError::Serve)
    }

    /// Serve requests until `shutdown` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Serve`] if the server stops with an I/O error.
    pub async fn serve(self, shutdown: CancellationToken) -> Result<()> {
        let addr = self.local_addr()?;
        info!(addr = %addr, "Command API listening");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(ApiError::Serve)?;

        info!(addr = %addr, "Command API stopped");
        Ok(())
    }
}
