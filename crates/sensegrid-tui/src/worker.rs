//! Background worker for device I/O.
//!
//! All network operations happen here, in a tokio task, keeping the UI
//! rendering loop responsive. The worker owns the HTTP client, the sensor
//! poller, and the LED grid controller; it receives [`Command`]s from the
//! UI, forwards poll notifications, and reports results as [`Event`]s.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, mpsc};
use tracing::{info, warn};

use sensegrid_core::{
    ConnectionConfig, DeviceClient, LedGridController, PollEvent, Result, SenseDevice,
    SensorPoller,
};
use sensegrid_types::{LedColor, LedGridState, SensorSnapshot};

use crate::messages::{Command, Event};

/// An HTTP client that can be repointed at a new host/port while the poller
/// and LED controller keep their handles (and the poller keeps its buffer)
/// across a settings change.
pub struct SharedClient {
    inner: RwLock<DeviceClient>,
}

impl SharedClient {
    fn new(client: DeviceClient) -> Self {
        Self {
            inner: RwLock::new(client),
        }
    }

    async fn swap(&self, client: DeviceClient) {
        *self.inner.write().await = client;
    }

    async fn current(&self) -> DeviceClient {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl SenseDevice for SharedClient {
    async fn fetch_sensors(&self) -> Result<SensorSnapshot> {
        self.current().await.fetch_sensors().await
    }

    async fn fetch_leds(&self) -> Result<LedGridState> {
        self.current().await.fetch_leds().await
    }

    async fn set_leds(&self, grid: &[LedColor]) -> Result<()> {
        self.current().await.set_leds(grid).await
    }
}

/// Background worker owning all device-facing state.
pub struct DeviceWorker {
    command_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<Event>,
    poll_rx: mpsc::Receiver<PollEvent>,
    device: Arc<SharedClient>,
    poller: SensorPoller<SharedClient>,
    leds: LedGridController<SharedClient>,
    config: ConnectionConfig,
}

impl DeviceWorker {
    /// Create a worker for the given connection parameters.
    pub fn new(
        config: ConnectionConfig,
        command_rx: mpsc::Receiver<Command>,
        event_tx: mpsc::Sender<Event>,
    ) -> Result<Self> {
        let client = DeviceClient::from_config(&config)?;
        let device = Arc::new(SharedClient::new(client));
        let (poll_tx, poll_rx) = mpsc::channel(32);
        let poller = SensorPoller::new(Arc::clone(&device), poll_tx);
        let leds = LedGridController::new(Arc::clone(&device));

        Ok(Self {
            command_rx,
            event_tx,
            poll_rx,
            device,
            poller,
            leds,
            config,
        })
    }

    /// Run the worker until [`Command::Shutdown`] or channel close.
    ///
    /// Startup performs the initial LED fetch and starts polling at the
    /// configured interval.
    pub async fn run(mut self) {
        info!(host = %self.config.host, port = self.config.port, "DeviceWorker started");

        self.refresh_leds().await;
        self.poller.start(self.config.refresh_interval_ms);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(Command::Shutdown) | None => break,
                        Some(cmd) => self.handle_command(cmd).await,
                    }
                }
                Some(poll) = self.poll_rx.recv() => {
                    self.forward_poll(poll).await;
                }
            }
        }

        self.poller.stop();
        info!("DeviceWorker stopped");
    }

    async fn forward_poll(&self, poll: PollEvent) {
        let event = match poll {
            PollEvent::Sample { snapshot, series } => Event::SensorsUpdated { snapshot, series },
            PollEvent::Failed { message } => Event::PollFailed { message },
        };
        let _ = self.event_tx.send(event).await;
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::ApplySettings { config } => self.apply_settings(config).await,
            Command::RefreshLeds => self.refresh_leds().await,
            Command::SetLed { index, color } => {
                if self.leds.set_color(index, color) {
                    self.send_grid().await;
                } else {
                    warn!(index, "LED edit out of range");
                }
            }
            Command::ApplyLeds => match self.leds.apply().await {
                Ok(()) => {
                    let _ = self.event_tx.send(Event::LedsApplied).await;
                }
                Err(e) => self.report_error(e).await,
            },
            Command::ResetLeds => match self.leds.reset().await {
                Ok(()) => self.send_grid().await,
                Err(e) => self.report_error(e).await,
            },
            Command::Shutdown => {}
        }
    }

    async fn apply_settings(&mut self, config: ConnectionConfig) {
        match DeviceClient::from_config(&config) {
            Ok(client) => {
                self.device.swap(client).await;
                // Restart at the new interval; the series window carries over.
                self.poller.start(config.refresh_interval_ms);
                self.config = config.clone();
                info!(host = %config.host, port = config.port,
                      interval_ms = config.refresh_interval_ms, "Settings applied");
                let _ = self.event_tx.send(Event::SettingsApplied { config }).await;
            }
            Err(e) => self.report_error(e).await,
        }
    }

    async fn refresh_leds(&mut self) {
        match self.leds.refresh().await {
            Ok(()) => self.send_grid().await,
            Err(e) => self.report_error(e).await,
        }
    }

    async fn send_grid(&self) {
        let _ = self
            .event_tx
            .send(Event::LedsUpdated {
                grid: self.leds.grid().clone(),
            })
            .await;
    }

    async fn report_error(&self, error: sensegrid_core::Error) {
        warn!(%error, "Device operation failed");
        let _ = self
            .event_tx
            .send(Event::DeviceError {
                message: error.to_string(),
            })
            .await;
    }
}
