//! Sensor metric types.
//!
//! The device reports its sensors as a single JSON object keyed by metric
//! name, e.g.:
//!
//! ```json
//! {
//!   "temperature": { "name": "Temperature", "value": 21.2, "unit": " °C" },
//!   "pressure":    { "name": "Pressure",    "value": 1013.4, "unit": " hPa" },
//!   "humidity":    { "name": "Humidity",    "value": 48.0, "unit": "%" }
//! }
//! ```
//!
//! `name` and `unit` are optional on the wire; display code falls back to
//! the object key and `"-"` respectively.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metric names charted by the time series, in the fixed order their values
/// occupy in every [`TimeSeriesPoint`].
pub const TRACKED_METRICS: [&str; 3] = ["temperature", "pressure", "humidity"];

/// A single metric entry as reported by the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    /// Human-readable metric name, if the device provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The measured value.
    pub value: f64,
    /// Unit suffix, if the device provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// A resolved table row: label, value, unit, with wire-level fallbacks
/// already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricReading {
    /// Display label (device-provided name, or the metric key).
    pub label: String,
    /// The measured value.
    pub value: f64,
    /// Display unit (`"-"` when the device omits it).
    pub unit: String,
}

/// One full sensor response: every metric the device reported, keyed by
/// metric name.
///
/// Keys are held in a sorted map so table rendering is deterministic
/// regardless of the JSON key order the device happens to emit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorSnapshot(pub BTreeMap<String, MetricValue>);

impl SensorSnapshot {
    /// Whether the device reported no metrics at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of reported metrics.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Look up a metric by key.
    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.0.get(key)
    }

    /// Resolve every reported metric into a display row.
    ///
    /// Missing `name` falls back to the metric key, missing `unit` to `"-"`.
    pub fn readings(&self) -> Vec<MetricReading> {
        self.0
            .iter()
            .map(|(key, metric)| MetricReading {
                label: metric.name.clone().unwrap_or_else(|| key.clone()),
                value: metric.value,
                unit: metric.unit.clone().unwrap_or_else(|| "-".to_string()),
            })
            .collect()
    }

    /// Extract the charted metrics in [`TRACKED_METRICS`] order.
    ///
    /// A metric absent from this snapshot occupies its slot as NaN; chart
    /// code skips non-finite values.
    pub fn tracked_values(&self) -> Vec<f64> {
        TRACKED_METRICS
            .iter()
            .map(|key| self.0.get(*key).map_or(f64::NAN, |m| m.value))
            .collect()
    }
}

/// One point of the scrolling time series: a clock label plus the tracked
/// metric values in [`TRACKED_METRICS`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    /// Local clock label at the time the sample arrived.
    pub timestamp: String,
    /// Metric values, one per tracked metric, in fixed order.
    pub values: Vec<f64>,
}

impl TimeSeriesPoint {
    /// Build a point from a snapshot and an arrival timestamp label.
    pub fn from_snapshot(timestamp: String, snapshot: &SensorSnapshot) -> Self {
        Self {
            timestamp,
            values: snapshot.tracked_values(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SensorSnapshot {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_full_response() {
        let snapshot = parse(
            r#"{
                "temperature": { "name": "Temperature", "value": 21.2, "unit": " °C" },
                "pressure": { "name": "Pressure", "value": 1013.4, "unit": " hPa" },
                "humidity": { "name": "Humidity", "value": 48.0, "unit": "%" }
            }"#,
        );

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.tracked_values(), vec![21.2, 1013.4, 48.0]);
    }

    #[test]
    fn readings_fall_back_to_key_and_dash() {
        let snapshot = parse(r#"{ "temperature": { "value": 21.2, "unit": "C" } }"#);

        let readings = snapshot.readings();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].label, "temperature");
        assert_eq!(readings[0].value, 21.2);
        assert_eq!(readings[0].unit, "C");

        let snapshot = parse(r#"{ "roll": { "value": 1.5 } }"#);
        let readings = snapshot.readings();
        assert_eq!(readings[0].label, "roll");
        assert_eq!(readings[0].unit, "-");
    }

    #[test]
    fn missing_tracked_metric_is_nan() {
        let snapshot = parse(r#"{ "temperature": { "value": 21.2, "unit": "C" } }"#);

        let values = snapshot.tracked_values();
        assert_eq!(values[0], 21.2);
        assert!(values[1].is_nan());
        assert!(values[2].is_nan());
    }

    #[test]
    fn point_from_snapshot_keeps_fixed_order() {
        let snapshot = parse(
            r#"{
                "humidity": { "value": 48.0 },
                "temperature": { "value": 21.2 },
                "pressure": { "value": 1013.4 }
            }"#,
        );

        let point = TimeSeriesPoint::from_snapshot("12:00:00".to_string(), &snapshot);
        assert_eq!(point.values, vec![21.2, 1013.4, 48.0]);
    }

    #[test]
    fn untracked_metrics_still_appear_in_readings() {
        let snapshot = parse(
            r#"{
                "temperature": { "value": 21.2 },
                "roll": { "value": -3.0, "unit": "°" }
            }"#,
        );

        assert_eq!(snapshot.readings().len(), 2);
        assert_eq!(snapshot.tracked_values().len(), TRACKED_METRICS.len());
    }
}
