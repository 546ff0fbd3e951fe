//! Repeating sensor poll timer.
//!
//! The poller is a two-state machine (stopped / running at an interval)
//! driving one repeating fetch task. Starting it while running cancels the
//! previous timer first, so there is never more than one active timer; an
//! interval change therefore takes effect at the next tick boundary rather
//! than altering an in-flight wait.
//!
//! Each tick issues one sensor fetch. Success appends a point to the bounded
//! time-series buffer and emits a [`PollEvent::Sample`] carrying both the
//! raw snapshot (for the table, which replaces its rows wholesale) and the
//! buffer contents (for the chart). Failure emits [`PollEvent::Failed`] and
//! leaves the buffer untouched; the timer keeps running and the fetch is
//! retried on the next tick.

use std::sync::Arc;

use time::OffsetDateTime;
use time::macros::format_description;
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use sensegrid_types::{SensorSnapshot, TimeSeriesPoint};

use crate::series::TimeSeriesBuffer;
use crate::traits::SenseDevice;

/// Notifications emitted by the poll task.
#[derive(Debug, Clone)]
pub enum PollEvent {
    /// A tick completed successfully.
    Sample {
        /// The raw metric map for the tabular view.
        snapshot: SensorSnapshot,
        /// The buffer contents after appending this tick's point.
        series: Vec<TimeSeriesPoint>,
    },
    /// A tick failed; the buffer was left untouched.
    Failed {
        /// Human-readable failure description.
        message: String,
    },
}

struct ActiveTimer {
    cancel: CancellationToken,
    interval_ms: u64,
    task: JoinHandle<()>,
}

/// Repeating poller keeping the time-series buffer synchronized with the
/// device.
pub struct SensorPoller<D> {
    device: Arc<D>,
    buffer: Arc<RwLock<TimeSeriesBuffer>>,
    events: mpsc::Sender<PollEvent>,
    active: Option<ActiveTimer>,
}

impl<D: SenseDevice + 'static> SensorPoller<D> {
    /// Create a stopped poller for the given device.
    pub fn new(device: impl Into<Arc<D>>, events: mpsc::Sender<PollEvent>) -> Self {
        Self {
            device: device.into(),
            buffer: Arc::new(RwLock::new(TimeSeriesBuffer::new())),
            events,
            active: None,
        }
    }

    /// Whether a timer is currently running.
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// The running interval in milliseconds, if any.
    pub fn interval_ms(&self) -> Option<u64> {
        self.active.as_ref().map(|timer| timer.interval_ms)
    }

    /// The current buffer contents in arrival order.
    pub async fn series(&self) -> Vec<TimeSeriesPoint> {
        self.buffer.read().await.snapshot()
    }

    /// Start (or restart) polling at the given interval.
    ///
    /// Any running timer is cancelled first; the buffer carries over across
    /// restarts. The first tick fires one full interval after this call.
    pub fn start(&mut self, interval_ms: u64) {
        self.stop();

        let interval_ms = interval_ms.max(1);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(Self::poll_loop(
            Arc::clone(&self.device),
            Arc::clone(&self.buffer),
            self.events.clone(),
            cancel.clone(),
            interval_ms,
        ));

        debug!(interval_ms, "Poller started");
        self.active = Some(ActiveTimer {
            cancel,
            interval_ms,
            task,
        });
    }

    /// Cancel any running timer.
    pub fn stop(&mut self) {
        if let Some(timer) = self.active.take() {
            timer.cancel.cancel();
            timer.task.abort();
            debug!("Poller stopped");
        }
    }

    async fn poll_loop(
        device: Arc<D>,
        buffer: Arc<RwLock<TimeSeriesBuffer>>,
        events: mpsc::Sender<PollEvent>,
        cancel: CancellationToken,
        interval_ms: u64,
    ) {
        let period = Duration::from_millis(interval_ms);
        let mut ticker = interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    Self::tick(&device, &buffer, &events).await;
                }
            }
        }
    }

    async fn tick(
        device: &D,
        buffer: &RwLock<TimeSeriesBuffer>,
        events: &mpsc::Sender<PollEvent>,
    ) {
        match device.fetch_sensors().await {
            Ok(snapshot) => {
                let point = TimeSeriesPoint::from_snapshot(clock_label(), &snapshot);
                let series = {
                    let mut buffer = buffer.write().await;
                    buffer.append(point);
                    buffer.snapshot()
                };
                // try_send keeps the timer honest: a slow consumer drops
                // this notification and the next tick re-notifies.
                let _ = events.try_send(PollEvent::Sample { snapshot, series });
            }
            Err(error) => {
                warn!(%error, "Sensor poll failed");
                let _ = events.try_send(PollEvent::Failed {
                    message: error.to_string(),
                });
            }
        }
    }
}

impl<D> Drop for SensorPoller<D> {
    fn drop(&mut self) {
        if let Some(timer) = self.active.take() {
            timer.cancel.cancel();
            timer.task.abort();
        }
    }
}

/// Local wall-clock label for a freshly arrived sample.
fn clock_label() -> String {
    let now = OffsetDateTime::now_utc();
    let now = match time::UtcOffset::current_local_offset() {
        Ok(offset) => now.to_offset(offset),
        Err(_) => now,
    };
    now.format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_default()
}
