//! Shared fixtures for controller integration tests.

#![allow(dead_code)]

use gatelock_controller::{AnnouncementError, Announcer, UnlockOrchestrator};
use gatelock_core::Config;
use gatelock_hardware::mock::{MockPins, MockPinsHandle};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Announcer with a scripted response and an optional artificial latency.
#[derive(Debug)]
pub struct ScriptedAnnouncer {
    response: Result<u64, AnnouncementError>,
    latency: Duration,
    calls: AtomicU32,
}

impl ScriptedAnnouncer {
    pub fn voice(voice_length_ms: u64) -> Self {
        Self::new(Ok(voice_length_ms), Duration::ZERO)
    }

    pub fn failing(error: AnnouncementError) -> Self {
        Self::new(Err(error), Duration::ZERO)
    }

    pub fn slow(voice_length_ms: u64, latency: Duration) -> Self {
        Self::new(Ok(voice_length_ms), latency)
    }

    fn new(response: Result<u64, AnnouncementError>, latency: Duration) -> Self {
        Self {
            response,
            latency,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Announcer for ScriptedAnnouncer {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn announce(&self) -> Result<u64, AnnouncementError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.response.clone()
    }
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

pub fn build<A: Announcer>(
    announcer: A,
) -> (Arc<UnlockOrchestrator<MockPins, A>>, MockPinsHandle) {
    let config = Config::default();
    let (pins, handle) = MockPins::new(&config.gpio);
    let orchestrator = UnlockOrchestrator::new(Arc::new(pins), announcer, &config);
    (Arc::new(orchestrator), handle)
}
