//! Announcement collaborator contract.
//!
//! Before acknowledging a detection the controller may ask an external
//! service to play a doorbell announcement. The service reports how long the
//! voice clip is; the acknowledgement is then delayed by a quarter of that so
//! the gate opens while the announcement is still playing.

use crate::error::Result;
use gatelock_core::constants::ANNOUNCEMENT_DELAY_DIVISOR;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// External announcement service.
///
/// Implementations must not retry; the orchestrator applies its own time
/// bound around [`announce`](Announcer::announce) and treats any error as
/// "no delay".
pub trait Announcer: Send + Sync {
    /// Whether announcements are configured. When false, `announce` is never
    /// called.
    fn is_enabled(&self) -> bool;

    /// Play the announcement and return the voice clip length in
    /// milliseconds.
    fn announce(&self) -> impl Future<Output = Result<u64>> + Send;
}

impl<T: Announcer> Announcer for Arc<T> {
    fn is_enabled(&self) -> bool {
        self.as_ref().is_enabled()
    }

    fn announce(&self) -> impl Future<Output = Result<u64>> + Send {
        self.as_ref().announce()
    }
}

/// Announcer used when the feature is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAnnouncer;

impl Announcer for DisabledAnnouncer {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn announce(&self) -> Result<u64> {
        Ok(0)
    }
}

/// Delay before the acknowledgement pulse for a given voice clip length.
///
/// Integer division in whole milliseconds, no upper bound.
///
/// # Examples
///
/// ```
/// use gatelock_controller::announcement_delay;
/// use std::time::Duration;
///
/// assert_eq!(announcement_delay(2000), Duration::from_millis(500));
/// assert_eq!(announcement_delay(3), Duration::ZERO);
/// ```
#[must_use]
pub fn announcement_delay(voice_length_ms: u64) -> Duration {
    Duration::from_millis(voice_length_ms / ANNOUNCEMENT_DELAY_DIVISOR)
}
