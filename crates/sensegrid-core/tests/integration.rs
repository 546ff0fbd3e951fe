//! End-to-end tests for the client core against the mock device.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use sensegrid_core::mock::MockSense;
use sensegrid_core::{LedGridController, PollEvent, SensorPoller};
use sensegrid_types::{LedColor, MetricValue, SensorSnapshot};

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn single_metric_response_lands_in_table_and_buffer() {
    let mock = Arc::new(MockSense::new());
    let mut snapshot = SensorSnapshot::default();
    snapshot.0.insert(
        "temperature".to_string(),
        MetricValue {
            name: None,
            value: 21.2,
            unit: Some("C".to_string()),
        },
    );
    mock.set_sensors(snapshot).await;

    let (tx, mut rx) = mpsc::channel(8);
    let mut poller: SensorPoller<MockSense> = SensorPoller::new(Arc::clone(&mock), tx);
    poller.start(1000);
    settle().await;

    tokio::time::advance(Duration::from_millis(1000)).await;
    settle().await;

    let event = rx.try_recv().unwrap();
    let PollEvent::Sample { snapshot, series } = event else {
        panic!("expected a sample");
    };

    // Table row: label falls back to the key, unit passes through.
    let readings = snapshot.readings();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].label, "temperature");
    assert_eq!(readings[0].value, 21.2);
    assert_eq!(readings[0].unit, "C");

    // Buffer gained exactly one point with first value 21.2; the missing
    // tracked metrics occupy their slots as NaN.
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].values[0], 21.2);
    assert!(series[0].values[1].is_nan());
    assert!(!series[0].timestamp.is_empty());
}

#[tokio::test]
async fn fetch_edit_apply_reset_cycle() {
    let mock = Arc::new(MockSense::with_grid(vec![
        LedColor::OFF,
        LedColor(10, 20, 30),
        LedColor::OFF,
        LedColor(40, 50, 60),
    ]));
    let mut leds: LedGridController<MockSense> = LedGridController::new(Arc::clone(&mock));

    leds.refresh().await.unwrap();
    assert_eq!(leds.grid().len(), 4);
    assert_eq!(leds.grid()[0], LedColor::OFF_SENTINEL);
    assert_eq!(leds.grid()[1], LedColor(10, 20, 30));

    // Edit one LED, turn another "off" via the sentinel, then push.
    leds.set_color(2, LedColor(255, 128, 0));
    leds.set_color(3, LedColor::OFF_SENTINEL);
    leds.apply().await.unwrap();

    let pushed = mock.pushed_payloads().await;
    assert_eq!(
        pushed[0],
        vec![
            LedColor::OFF,
            LedColor(10, 20, 30),
            LedColor(255, 128, 0),
            LedColor::OFF,
        ]
    );

    // Reset pushes all-off at the current length and resynchronizes.
    leds.reset().await.unwrap();
    let pushed = mock.pushed_payloads().await;
    assert_eq!(pushed[1], vec![LedColor::OFF; 4]);
    assert_eq!(leds.grid(), &vec![LedColor::OFF_SENTINEL; 4]);
}

#[tokio::test]
async fn led_failures_leave_display_and_device_untouched() {
    let mock = Arc::new(MockSense::with_grid(vec![LedColor(1, 2, 3)]));
    let mut leds: LedGridController<MockSense> = LedGridController::new(Arc::clone(&mock));
    leds.refresh().await.unwrap();

    mock.fail_leds(true);
    assert!(leds.apply().await.is_err());
    assert!(leds.reset().await.is_err());
    assert!(mock.pushed_payloads().await.is_empty());
    assert_eq!(leds.grid(), &vec![LedColor(1, 2, 3)]);
}
