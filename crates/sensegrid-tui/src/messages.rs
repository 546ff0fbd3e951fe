//! Message types for UI/worker communication.
//!
//! The UI thread and the background device worker talk over two bounded
//! mpsc channels:
//!
//! ```text
//! +-------------+      Command      +----------------+
//! |  UI thread  | ----------------> |  DeviceWorker  |
//! |  (ratatui)  |                   | (tokio runtime)|
//! |             | <---------------- |                |
//! +-------------+       Event       +----------------+
//! ```
//!
//! - [`Command`]: user-initiated actions requiring device I/O
//! - [`Event`]: results and poll notifications flowing back to the UI

use sensegrid_core::ConnectionConfig;
use sensegrid_types::{LedColor, LedGridState, SensorSnapshot, TimeSeriesPoint};

/// Commands sent from the UI thread to the background worker.
#[derive(Debug, Clone)]
pub enum Command {
    /// Apply saved connection settings: point the HTTP client at the new
    /// host/port and restart the poll timer with the new interval.
    ApplySettings {
        /// The freshly saved configuration.
        config: ConnectionConfig,
    },

    /// Fetch the full LED grid from the device.
    RefreshLeds,

    /// Edit one LED locally (display space; no device I/O).
    SetLed {
        /// Device LED index.
        index: usize,
        /// New display color.
        color: LedColor,
    },

    /// Push the displayed grid to the device in one full-state request.
    ApplyLeds,

    /// Turn every LED off on the device, then refetch.
    ResetLeds,

    /// Shut down the worker.
    Shutdown,
}

/// Events sent from the background worker to the UI thread.
#[derive(Debug, Clone)]
pub enum Event {
    /// A poll tick completed; the table replaces its rows wholesale and the
    /// chart redraws from the carried series.
    SensorsUpdated {
        /// The raw metric map for the tabular view.
        snapshot: SensorSnapshot,
        /// Time-series window after this tick.
        series: Vec<TimeSeriesPoint>,
    },

    /// A poll tick failed; previous display contents stay valid.
    PollFailed {
        /// Human-readable failure description.
        message: String,
    },

    /// The displayed LED grid changed (after a fetch, a local edit, or a
    /// reset-and-refetch).
    LedsUpdated {
        /// Grid in display space (off shown as the sentinel).
        grid: LedGridState,
    },

    /// A full-state push completed.
    LedsApplied,

    /// New connection settings are live.
    SettingsApplied {
        /// The configuration now in effect.
        config: ConnectionConfig,
    },

    /// An LED operation or settings change failed.
    DeviceError {
        /// Human-readable failure description.
        message: String,
    },
}
