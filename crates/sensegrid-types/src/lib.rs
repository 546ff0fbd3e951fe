//! Core data types for the sensegrid monitoring client.
//!
//! This crate contains the platform-agnostic data model shared by the
//! client core and its frontends:
//!
//! - **Metrics**: sensor readings keyed by metric name, and the fixed-order
//!   time-series points derived from them
//! - **LEDs**: RGB color triples and the full-grid state pushed to and
//!   pulled from the device
//!
//! No I/O happens here; everything is plain data with `serde` support
//! matching the device's JSON wire format.

pub mod led;
pub mod metrics;

pub use led::{LedColor, LedGridState};
pub use metrics::{MetricReading, MetricValue, SensorSnapshot, TimeSeriesPoint, TRACKED_METRICS};
