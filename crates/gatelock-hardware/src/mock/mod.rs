//! Mock backend implementations for testing and development.
//!
//! This module provides a simulated pin backend that can be controlled
//! programmatically without requiring physical hardware.

pub mod pins;

// Re-export commonly used types
pub use pins::{MockPins, MockPinsHandle, OutputEvent};
