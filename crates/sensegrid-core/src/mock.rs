//! Mock device implementation for testing.
//!
//! This module provides a mock device that can be used for unit testing
//! without a reachable device on the network. [`MockSense`] implements the
//! [`SenseDevice`] trait, so it slots into the poller and the LED grid
//! controller interchangeably with the real HTTP client.
//!
//! # Features
//!
//! - **Failure injection**: fail sensor fetches and/or LED operations
//! - **Call counters**: assert how many fetches and pushes happened
//! - **Push recording**: every pushed grid payload is kept in order

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use sensegrid_types::{LedColor, LedGridState, MetricValue, SensorSnapshot};

use crate::error::{Error, Result};
use crate::traits::SenseDevice;

/// A mock device for testing.
#[derive(Debug, Default)]
pub struct MockSense {
    sensors: RwLock<SensorSnapshot>,
    grid: RwLock<LedGridState>,
    fail_sensors: AtomicBool,
    fail_leds: AtomicBool,
    sensor_fetches: AtomicU32,
    led_fetches: AtomicU32,
    pushed: RwLock<Vec<LedGridState>>,
}

impl MockSense {
    /// Create a mock reporting no sensors and an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock with a plausible three-metric reading and the given
    /// grid state.
    pub fn with_grid(grid: LedGridState) -> Self {
        let mock = Self::new();
        {
            // try_write cannot fail here, nothing else holds the lock yet
            let mut sensors = mock.sensors.try_write().unwrap();
            *sensors = Self::default_snapshot();
            let mut held = mock.grid.try_write().unwrap();
            *held = grid;
        }
        mock
    }

    fn default_snapshot() -> SensorSnapshot {
        let mut snapshot = SensorSnapshot::default();
        for (key, name, value, unit) in [
            ("temperature", "Temperature", 22.5, " °C"),
            ("pressure", "Pressure", 1013.2, " hPa"),
            ("humidity", "Humidity", 50.0, "%"),
        ] {
            snapshot.0.insert(
                key.to_string(),
                MetricValue {
                    name: Some(name.to_string()),
                    value,
                    unit: Some(unit.to_string()),
                },
            );
        }
        snapshot
    }

    /// Replace the reported sensor snapshot.
    pub async fn set_sensors(&self, snapshot: SensorSnapshot) {
        *self.sensors.write().await = snapshot;
    }

    /// Replace the reported grid state.
    pub async fn set_grid(&self, grid: LedGridState) {
        *self.grid.write().await = grid;
    }

    /// Make sensor fetches fail (or succeed again).
    pub fn fail_sensors(&self, fail: bool) {
        self.fail_sensors.store(fail, Ordering::Relaxed);
    }

    /// Make LED fetches and pushes fail (or succeed again).
    pub fn fail_leds(&self, fail: bool) {
        self.fail_leds.store(fail, Ordering::Relaxed);
    }

    /// Number of sensor fetches attempted so far.
    pub fn sensor_fetches(&self) -> u32 {
        self.sensor_fetches.load(Ordering::Relaxed)
    }

    /// Number of LED grid fetches attempted so far.
    pub fn led_fetches(&self) -> u32 {
        self.led_fetches.load(Ordering::Relaxed)
    }

    /// Every grid payload pushed via `set_leds`, in push order.
    pub async fn pushed_payloads(&self) -> Vec<LedGridState> {
        self.pushed.read().await.clone()
    }

    fn unreachable_error() -> Error {
        Error::Status {
            url: "mock://device".to_string(),
            status: 503,
        }
    }
}

#[async_trait]
impl SenseDevice for MockSense {
    async fn fetch_sensors(&self) -> Result<SensorSnapshot> {
        self.sensor_fetches.fetch_add(1, Ordering::Relaxed);
        if self.fail_sensors.load(Ordering::Relaxed) {
            return Err(Self::unreachable_error());
        }
        Ok(self.sensors.read().await.clone())
    }

    async fn fetch_leds(&self) -> Result<LedGridState> {
        self.led_fetches.fetch_add(1, Ordering::Relaxed);
        if self.fail_leds.load(Ordering::Relaxed) {
            return Err(Self::unreachable_error());
        }
        Ok(self.grid.read().await.clone())
    }

    async fn set_leds(&self, grid: &[LedColor]) -> Result<()> {
        if self.fail_leds.load(Ordering::Relaxed) {
            return Err(Self::unreachable_error());
        }
        self.pushed.write().await.push(grid.to_vec());
        // The device applies full-state writes immediately.
        *self.grid.write().await = grid.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_pushes_in_order() {
        let mock = MockSense::new();
        mock.set_leds(&[LedColor(1, 2, 3)]).await.unwrap();
        mock.set_leds(&[LedColor::OFF]).await.unwrap();

        let pushed = mock.pushed_payloads().await;
        assert_eq!(pushed.len(), 2);
        assert_eq!(pushed[0], vec![LedColor(1, 2, 3)]);
        assert_eq!(pushed[1], vec![LedColor::OFF]);
        assert_eq!(mock.fetch_leds().await.unwrap(), vec![LedColor::OFF]);
    }

    #[tokio::test]
    async fn failure_injection_flips_both_ways() {
        let mock = MockSense::with_grid(vec![LedColor::OFF]);
        mock.fail_sensors(true);
        assert!(mock.fetch_sensors().await.is_err());
        mock.fail_sensors(false);
        assert!(mock.fetch_sensors().await.is_ok());
        assert_eq!(mock.sensor_fetches(), 2);
    }
}
