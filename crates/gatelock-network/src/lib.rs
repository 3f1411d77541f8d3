//! Network surfaces for the gate-lock controller.
//!
//! # Components
//!
//! - **DoorbellClient**: outbound call to the doorbell announcement service,
//!   used as the controller's [`Announcer`](gatelock_controller::Announcer).
//! - **ApiServer**: inbound HTTP command surface (`/status`, `/unlock`,
//!   `/buttonPress`) built with axum.

mod doorbell;
mod error;
mod server;

pub use doorbell::DoorbellClient;
pub use error::{ApiError, Result};
pub use server::{ApiServer, ButtonPressResponse, MessageResponse, StatusResponse, router};
