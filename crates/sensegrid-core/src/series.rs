//! Bounded time-series sample window.

use std::collections::VecDeque;

use sensegrid_types::TimeSeriesPoint;

/// Fixed capacity of the scrolling window. Not configurable.
pub const CAPACITY: usize = 10;

/// A bounded, ordered sequence of time-series points.
///
/// Samples append at the tail in arrival order; once the window is full the
/// oldest samples are evicted from the head. The buffer is mutated only by
/// the poller on successful ticks and read by the chart via [`snapshot`].
///
/// [`snapshot`]: TimeSeriesBuffer::snapshot
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesBuffer {
    points: VecDeque<TimeSeriesPoint>,
}

impl TimeSeriesBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(CAPACITY + 1),
        }
    }

    /// Append a point at the tail, evicting from the head while over
    /// capacity.
    pub fn append(&mut self, point: TimeSeriesPoint) {
        self.points.push_back(point);
        while self.points.len() > CAPACITY {
            self.points.pop_front();
        }
    }

    /// The current contents in arrival order.
    pub fn snapshot(&self) -> Vec<TimeSeriesPoint> {
        self.points.iter().cloned().collect()
    }

    /// Number of retained points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no points have been retained yet.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
