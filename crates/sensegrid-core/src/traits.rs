//! Trait abstraction over device operations.
//!
//! This module provides the [`SenseDevice`] trait that abstracts over the
//! real HTTP-backed device and mock devices for testing.

use async_trait::async_trait;

use sensegrid_types::{LedColor, LedGridState, SensorSnapshot};

use crate::error::Result;

/// The three operations the remote device exposes.
///
/// Implemented by [`crate::DeviceClient`] for the real HTTP API and by
/// [`crate::mock::MockSense`] for tests, so the poller and the LED grid
/// controller can be exercised without a network.
///
/// # Example
///
/// ```ignore
/// use sensegrid_core::{Result, SenseDevice};
///
/// async fn print_sensors<D: SenseDevice>(device: &D) -> Result<()> {
///     let snapshot = device.fetch_sensors().await?;
///     for reading in snapshot.readings() {
///         println!("{}: {} {}", reading.label, reading.value, reading.unit);
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait SenseDevice: Send + Sync {
    /// Fetch the current sensor values.
    async fn fetch_sensors(&self) -> Result<SensorSnapshot>;

    /// Fetch the full LED grid state in device index order.
    async fn fetch_leds(&self) -> Result<LedGridState>;

    /// Replace the full LED grid state in one request.
    ///
    /// The device has no partial-update endpoint; the entire ordered
    /// sequence is pushed on every write.
    async fn set_leds(&self, grid: &[LedColor]) -> Result<()>;
}
