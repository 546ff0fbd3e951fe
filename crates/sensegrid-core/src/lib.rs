//! Client core for the sensegrid monitoring client.
//!
//! This crate implements everything between the terminal frontend and the
//! remote device's HTTP API:
//!
//! - **HTTP adapter**: typed GET/POST against `http://{host}:{port}/...`
//!   with network and parse failures surfaced as a discriminated error
//! - **Sensor poller**: a repeating timer that keeps the bounded time-series
//!   buffer synchronized with the device under a user-adjustable interval
//! - **Time-series buffer**: a fixed-capacity, FIFO-evicting sample window,
//!   the sole data source for chart rendering
//! - **LED grid controller**: full-state fetch/push of the LED grid with
//!   off-sentinel translation at the device boundary
//! - **Preferences**: durable key-value persistence of the connection
//!   parameters across sessions
//!
//! # Quick Start
//!
//! ```no_run
//! use sensegrid_core::{DeviceClient, LedGridController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DeviceClient::new("localhost", 8000)?;
//!
//!     let snapshot = client.fetch_sensors().await?;
//!     for reading in snapshot.readings() {
//!         println!("{}: {} {}", reading.label, reading.value, reading.unit);
//!     }
//!
//!     let mut leds = LedGridController::new(client);
//!     leds.refresh().await?;
//!     println!("{} LEDs", leds.grid().len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod leds;
pub mod mock;
pub mod poller;
pub mod prefs;
pub mod series;
pub mod traits;

pub use client::DeviceClient;
pub use error::{Error, Result};
pub use leds::LedGridController;
pub use poller::{PollEvent, SensorPoller};
pub use prefs::{ConnectionConfig, Preferences};
pub use series::TimeSeriesBuffer;
pub use traits::SenseDevice;

// Re-export the data model for downstream convenience.
pub use sensegrid_types as types;
