//! LED grid state synchronization.
//!
//! The controller owns the locally displayed grid and keeps it in sync with
//! the device through full-state fetches and pushes. All sentinel
//! translation happens here, at the device boundary: the device's black
//! "off" value is displayed as a neutral gray sentinel, and the sentinel is
//! turned back into black on every push. Element order is preserved
//! end-to-end; element N of a fetch is control N in the UI and element N of
//! the next push.

use std::sync::Arc;

use tracing::debug;

use sensegrid_types::{LedColor, LedGridState};

use crate::error::Result;
use crate::traits::SenseDevice;

/// Controller for the device's addressable LED grid.
///
/// Holds the grid in display space (sentinel for "off"). A failed fetch or
/// push leaves the held state untouched, so the UI keeps showing the last
/// known good grid.
pub struct LedGridController<D> {
    device: Arc<D>,
    grid: LedGridState,
    sentinel: LedColor,
}

impl<D: SenseDevice> LedGridController<D> {
    /// Create a controller with the default gray off-sentinel.
    pub fn new(device: impl Into<Arc<D>>) -> Self {
        Self {
            device: device.into(),
            grid: LedGridState::new(),
            sentinel: LedColor::OFF_SENTINEL,
        }
    }

    /// Use a different off-sentinel color.
    pub fn with_sentinel(mut self, sentinel: LedColor) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// The display sentinel standing in for "off".
    pub fn sentinel(&self) -> LedColor {
        self.sentinel
    }

    /// The currently displayed grid, in display space.
    pub fn grid(&self) -> &LedGridState {
        &self.grid
    }

    /// Fetch the full grid from the device and replace the displayed state.
    ///
    /// Device black becomes the display sentinel. On failure the previously
    /// displayed state is left untouched and the error is returned.
    pub async fn refresh(&mut self) -> Result<()> {
        let fetched = self.device.fetch_leds().await?;
        debug!(leds = fetched.len(), "Fetched LED grid");
        self.grid = fetched
            .into_iter()
            .map(|color| color.to_display(self.sentinel))
            .collect();
        Ok(())
    }

    /// Edit one LED locally. Returns false if the index is out of range.
    pub fn set_color(&mut self, index: usize, color: LedColor) -> bool {
        match self.grid.get_mut(index) {
            Some(slot) => {
                *slot = color;
                true
            }
            None => false,
        }
    }

    /// Push the displayed grid to the device in one full-state request.
    ///
    /// The display sentinel is turned back into black; everything else is
    /// pushed unchanged. Fire-and-forget with respect to the display: no
    /// refetch happens, so the displayed state may transiently diverge from
    /// the device until the next explicit [`refresh`](Self::refresh).
    pub async fn apply(&self) -> Result<()> {
        let payload: LedGridState = self
            .grid
            .iter()
            .map(|color| color.to_device(self.sentinel))
            .collect();
        debug!(leds = payload.len(), "Pushing LED grid");
        self.device.set_leds(&payload).await
    }

    /// Turn every LED off: push an all-black payload of the current grid
    /// length regardless of displayed state, then refetch to resynchronize
    /// the display.
    pub async fn reset(&mut self) -> Result<()> {
        let payload = vec![LedColor::OFF; self.grid.len()];
        self.device.set_leds(&payload).await?;
        self.refresh().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::mock::MockSense;

    fn controller(grid: LedGridState) -> (Arc<MockSense>, LedGridController<MockSense>) {
        let mock = Arc::new(MockSense::with_grid(grid));
        let controller = LedGridController::new(Arc::clone(&mock));
        (mock, controller)
    }

    #[tokio::test]
    async fn refresh_translates_off_to_sentinel() {
        let (_mock, mut leds) = controller(vec![LedColor::OFF, LedColor(10, 20, 30)]);
        leds.refresh().await.unwrap();

        assert_eq!(
            leds.grid(),
            &vec![LedColor::OFF_SENTINEL, LedColor(10, 20, 30)]
        );
    }

    #[tokio::test]
    async fn apply_round_trips_unmodified_grid() {
        let (mock, mut leds) = controller(vec![LedColor::OFF, LedColor(10, 20, 30)]);
        leds.refresh().await.unwrap();
        leds.apply().await.unwrap();

        let pushed = mock.pushed_payloads().await;
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0], vec![LedColor::OFF, LedColor(10, 20, 30)]);
    }

    #[tokio::test]
    async fn local_edits_push_in_index_order() {
        let (mock, mut leds) = controller(vec![LedColor::OFF; 4]);
        leds.refresh().await.unwrap();

        assert!(leds.set_color(2, LedColor(255, 0, 0)));
        assert!(!leds.set_color(99, LedColor(255, 0, 0)));
        leds.apply().await.unwrap();

        let pushed = mock.pushed_payloads().await;
        assert_eq!(
            pushed[0],
            vec![
                LedColor::OFF,
                LedColor::OFF,
                LedColor(255, 0, 0),
                LedColor::OFF
            ]
        );
    }

    #[tokio::test]
    async fn reset_pushes_all_off_then_refetches_once() {
        let (mock, mut leds) = controller(vec![LedColor(1, 2, 3), LedColor(4, 5, 6)]);
        leds.refresh().await.unwrap();
        let fetches_before = mock.led_fetches();

        leds.reset().await.unwrap();

        let pushed = mock.pushed_payloads().await;
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0], vec![LedColor::OFF; 2]);
        assert_eq!(mock.led_fetches(), fetches_before + 1);
        // Refetch shows the applied all-off state as sentinels.
        assert_eq!(leds.grid(), &vec![LedColor::OFF_SENTINEL; 2]);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_state() {
        let (mock, mut leds) = controller(vec![LedColor(9, 9, 9)]);
        leds.refresh().await.unwrap();

        mock.fail_leds(true);
        assert!(leds.refresh().await.is_err());
        assert_eq!(leds.grid(), &vec![LedColor(9, 9, 9)]);
    }

    #[tokio::test]
    async fn custom_sentinel_is_used_both_ways() {
        let mock = Arc::new(MockSense::with_grid(vec![LedColor::OFF]));
        let mut leds: LedGridController<MockSense> =
            LedGridController::new(Arc::clone(&mock)).with_sentinel(LedColor(100, 100, 100));

        leds.refresh().await.unwrap();
        assert_eq!(leds.grid(), &vec![LedColor(100, 100, 100)]);

        leds.apply().await.unwrap();
        assert_eq!(mock.pushed_payloads().await[0], vec![LedColor::OFF]);
    }
}
