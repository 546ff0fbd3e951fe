//! Application state for the TUI.
//!
//! The `App` holds everything the draw code needs: the active page, the
//! latest sensor rows, the time-series window, the displayed LED grid with
//! its edit cursor, and the settings form. Key presses mutate this state
//! and/or dispatch [`Command`]s to the background worker; worker [`Event`]s
//! are drained between frames.

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;
use tracing::warn;

use sensegrid_core::{ConnectionConfig, DeviceClient, Preferences};
use sensegrid_types::{LedColor, LedGridState, MetricReading, TimeSeriesPoint};

use crate::messages::{Command, Event};

/// LEDs per displayed grid row (the device lays its grid out 8 wide).
pub const GRID_COLUMNS: usize = 8;

/// Colors the operator can paint with, cycled with `[`/`]`.
pub const PALETTE: [LedColor; 8] = [
    LedColor(255, 0, 0),
    LedColor(255, 128, 0),
    LedColor(255, 255, 0),
    LedColor(0, 255, 0),
    LedColor(0, 255, 255),
    LedColor(0, 0, 255),
    LedColor(255, 0, 255),
    LedColor(255, 255, 255),
];

/// UI pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Sensors,
    Leds,
    Settings,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Tab; 3] = [Tab::Sensors, Tab::Leds, Tab::Settings];

    /// Display title.
    pub fn title(self) -> &'static str {
        match self {
            Tab::Sensors => "Sensors",
            Tab::Leds => "LED Grid",
            Tab::Settings => "Settings",
        }
    }

    /// Position in [`Self::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    /// Tab at the given position, defaulting to Sensors when out of range.
    pub fn from_index(index: usize) -> Tab {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    fn next(self) -> Tab {
        Self::from_index((self.index() + 1) % Self::ALL.len())
    }

    fn prev(self) -> Tab {
        Self::from_index((self.index() + Self::ALL.len() - 1) % Self::ALL.len())
    }
}

/// Which settings field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsField {
    #[default]
    Host,
    Port,
    Refresh,
}

impl SettingsField {
    fn next(self) -> Self {
        match self {
            Self::Host => Self::Port,
            Self::Port => Self::Refresh,
            Self::Refresh => Self::Host,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Host => Self::Refresh,
            Self::Port => Self::Host,
            Self::Refresh => Self::Port,
        }
    }
}

/// Editable settings form, kept as raw strings until save.
#[derive(Debug, Clone, Default)]
pub struct SettingsForm {
    pub host: String,
    pub port: String,
    pub refresh: String,
    pub focused: SettingsField,
}

impl SettingsForm {
    fn from_config(config: &ConnectionConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port.to_string(),
            refresh: config.refresh_interval_ms.to_string(),
            focused: SettingsField::default(),
        }
    }

    fn focused_value_mut(&mut self) -> &mut String {
        match self.focused {
            SettingsField::Host => &mut self.host,
            SettingsField::Port => &mut self.port,
            SettingsField::Refresh => &mut self.refresh,
        }
    }

    /// Resolve the form into a config, falling back to the defaults for
    /// empty or invalid fields.
    ///
    /// The host is held to the same rules the HTTP client enforces, so a
    /// resolved config can always be persisted and connected to.
    pub fn resolve(&self) -> ConnectionConfig {
        let defaults = ConnectionConfig::default();
        ConnectionConfig {
            host: {
                let host = self.host.trim();
                if DeviceClient::is_valid_host(host) {
                    host.to_string()
                } else {
                    defaults.host
                }
            },
            port: self
                .port
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|p| *p != 0)
                .unwrap_or(defaults.port),
            refresh_interval_ms: self
                .refresh
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms != 0)
                .unwrap_or(defaults.refresh_interval_ms),
        }
    }
}

/// One status-bar message.
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub text: String,
    pub error: bool,
}

/// Top-level application state.
pub struct App {
    pub active_tab: Tab,
    pub rows: Vec<MetricReading>,
    pub series: Vec<TimeSeriesPoint>,
    pub grid: LedGridState,
    pub cursor: usize,
    pub palette_index: usize,
    pub form: SettingsForm,
    pub config: ConnectionConfig,
    pub status: Option<StatusLine>,
    pub should_quit: bool,
    prefs: Preferences,
    cmd_tx: mpsc::Sender<Command>,
    event_rx: mpsc::Receiver<Event>,
}

impl App {
    /// Create the application, restoring the last active page.
    pub fn new(
        prefs: Preferences,
        config: ConnectionConfig,
        cmd_tx: mpsc::Sender<Command>,
        event_rx: mpsc::Receiver<Event>,
    ) -> Self {
        Self {
            active_tab: Tab::from_index(prefs.active_page()),
            rows: Vec::new(),
            series: Vec::new(),
            grid: LedGridState::new(),
            cursor: 0,
            palette_index: 0,
            form: SettingsForm::from_config(&config),
            config,
            status: None,
            should_quit: false,
            prefs,
            cmd_tx,
            event_rx,
        }
    }

    /// Drain pending worker events into the UI state.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: Event) {
        match event {
            Event::SensorsUpdated { snapshot, series } => {
                // Full replace: rows from a previous response never linger.
                self.rows = snapshot.readings();
                self.series = series;
            }
            Event::PollFailed { message } => {
                self.set_status(format!("Poll failed: {message}"), true);
            }
            Event::LedsUpdated { grid } => {
                self.grid = grid;
                if self.cursor >= self.grid.len() {
                    self.cursor = self.grid.len().saturating_sub(1);
                }
                self.set_status(format!("LED grid: {} LEDs", self.grid.len()), false);
            }
            Event::LedsApplied => {
                self.set_status("LED grid applied".to_string(), false);
            }
            Event::SettingsApplied { config } => {
                self.set_status(
                    format!(
                        "Connected to {}:{} every {} ms",
                        config.host, config.port, config.refresh_interval_ms
                    ),
                    false,
                );
                self.config = config;
            }
            Event::DeviceError { message } => {
                self.set_status(message, true);
            }
        }
    }

    fn set_status(&mut self, text: String, error: bool) {
        self.status = Some(StatusLine { text, error });
    }

    /// Handle one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Global navigation first; the settings form gets raw characters.
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.set_tab(self.active_tab.next());
                return;
            }
            KeyCode::BackTab => {
                self.set_tab(self.active_tab.prev());
                return;
            }
            _ => {}
        }

        if self.active_tab != Tab::Settings {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('1') => return self.set_tab(Tab::Sensors),
                KeyCode::Char('2') => return self.set_tab(Tab::Leds),
                KeyCode::Char('3') => return self.set_tab(Tab::Settings),
                _ => {}
            }
        }

        match self.active_tab {
            Tab::Sensors => {}
            Tab::Leds => self.leds_key(key.code),
            Tab::Settings => self.settings_key(key.code),
        }
    }

    fn set_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.prefs.set_active_page(tab.index());
    }

    fn leds_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Up => self.move_cursor(-(GRID_COLUMNS as isize)),
            KeyCode::Down => self.move_cursor(GRID_COLUMNS as isize),
            KeyCode::Char('[') => {
                self.palette_index = (self.palette_index + PALETTE.len() - 1) % PALETTE.len();
            }
            KeyCode::Char(']') => {
                self.palette_index = (self.palette_index + 1) % PALETTE.len();
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.send(Command::SetLed {
                    index: self.cursor,
                    color: PALETTE[self.palette_index],
                });
            }
            KeyCode::Char('x') => {
                // "Off" in display space is the sentinel; the controller
                // turns it into black on apply.
                self.send(Command::SetLed {
                    index: self.cursor,
                    color: LedColor::OFF_SENTINEL,
                });
            }
            KeyCode::Char('r') => self.send(Command::RefreshLeds),
            KeyCode::Char('a') => self.send(Command::ApplyLeds),
            KeyCode::Char('c') => self.send(Command::ResetLeds),
            _ => {}
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.grid.is_empty() {
            return;
        }
        let last = self.grid.len() as isize - 1;
        let next = (self.cursor as isize + delta).clamp(0, last);
        self.cursor = next as usize;
    }

    fn settings_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.form.focused = self.form.focused.prev(),
            KeyCode::Down => self.form.focused = self.form.focused.next(),
            KeyCode::Enter => self.save_settings(),
            KeyCode::Backspace => {
                self.form.focused_value_mut().pop();
            }
            KeyCode::Char(c) => {
                self.form.focused_value_mut().push(c);
            }
            _ => {}
        }
    }

    /// Persist the form and apply it immediately (restarting the poller).
    fn save_settings(&mut self) {
        let config = self.form.resolve();
        self.prefs.save_connection(&config);
        self.form = SettingsForm::from_config(&config);
        self.send(Command::ApplySettings { config });
    }

    fn send(&mut self, cmd: Command) {
        if let Err(e) = self.cmd_tx.try_send(cmd) {
            warn!(error = %e, "Worker busy, command dropped");
            self.set_status("Device worker busy, action dropped".to_string(), true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensegrid_types::{MetricValue, SensorSnapshot};

    fn app() -> (tempfile::TempDir, App, mpsc::Receiver<Command>, mpsc::Sender<Event>) {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::open(dir.path().join("prefs.toml"));
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, event_rx) = mpsc::channel(8);
        (
            dir,
            App::new(prefs, ConnectionConfig::default(), cmd_tx, event_rx),
            cmd_rx,
            event_tx,
        )
    }

    #[test]
    fn sensors_event_replaces_rows_wholesale() {
        let (_dir, mut app, _cmd_rx, event_tx) = app();

        let mut first = SensorSnapshot::default();
        first.0.insert(
            "temperature".to_string(),
            MetricValue {
                name: None,
                value: 21.2,
                unit: Some("C".to_string()),
            },
        );
        first.0.insert(
            "roll".to_string(),
            MetricValue {
                name: None,
                value: 1.0,
                unit: None,
            },
        );
        event_tx
            .try_send(Event::SensorsUpdated {
                snapshot: first,
                series: Vec::new(),
            })
            .unwrap();
        app.drain_events();
        assert_eq!(app.rows.len(), 2);

        // A later response without "roll" must not leave a stale row.
        let mut second = SensorSnapshot::default();
        second.0.insert(
            "temperature".to_string(),
            MetricValue {
                name: None,
                value: 22.0,
                unit: Some("C".to_string()),
            },
        );
        event_tx
            .try_send(Event::SensorsUpdated {
                snapshot: second,
                series: Vec::new(),
            })
            .unwrap();
        app.drain_events();
        assert_eq!(app.rows.len(), 1);
        assert_eq!(app.rows[0].value, 22.0);
    }

    #[test]
    fn form_resolution_falls_back_per_field() {
        let form = SettingsForm {
            host: "  ".to_string(),
            port: "70000".to_string(),
            refresh: "250".to_string(),
            focused: SettingsField::Host,
        };
        let config = form.resolve();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8000);
        assert_eq!(config.refresh_interval_ms, 250);
    }

    #[test]
    fn saved_host_always_builds_a_client() {
        // A host with a port suffix must not reach the preferences file;
        // persisting it would fail client construction on the next launch.
        let form = SettingsForm {
            host: "pi.local:9000".to_string(),
            port: "8000".to_string(),
            refresh: "1000".to_string(),
            focused: SettingsField::Host,
        };
        let config = form.resolve();
        assert_eq!(config.host, "localhost");
        assert!(DeviceClient::from_config(&config).is_ok());
    }

    #[test]
    fn dropped_command_surfaces_on_the_status_line() {
        let (_dir, mut app, cmd_rx, _event_tx) = app();
        app.status = None;

        // Fill the command channel, then one more press has to drop.
        for _ in 0..8 {
            app.leds_key(KeyCode::Char('r'));
        }
        assert!(app.status.is_none());
        app.leds_key(KeyCode::Char('a'));

        let status = app.status.clone().unwrap();
        assert!(status.error);
        assert!(status.text.contains("dropped"));
        drop(cmd_rx);
    }

    #[test]
    fn saving_settings_dispatches_apply() {
        let (_dir, mut app, mut cmd_rx, _event_tx) = app();
        app.active_tab = Tab::Settings;
        app.form.refresh = "500".to_string();
        app.settings_key(KeyCode::Enter);

        match cmd_rx.try_recv().unwrap() {
            Command::ApplySettings { config } => {
                assert_eq!(config.refresh_interval_ms, 500);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn led_cursor_stays_in_range() {
        let (_dir, mut app, _cmd_rx, event_tx) = app();
        event_tx
            .try_send(Event::LedsUpdated {
                grid: vec![LedColor::OFF_SENTINEL; 16],
            })
            .unwrap();
        app.drain_events();

        app.leds_key(KeyCode::Left);
        assert_eq!(app.cursor, 0);
        app.leds_key(KeyCode::Down);
        assert_eq!(app.cursor, GRID_COLUMNS);
        app.leds_key(KeyCode::Down);
        assert_eq!(app.cursor, 15);

        // Shrinking grid clamps the cursor.
        event_tx
            .try_send(Event::LedsUpdated {
                grid: vec![LedColor::OFF_SENTINEL; 4],
            })
            .unwrap();
        app.drain_events();
        assert_eq!(app.cursor, 3);
    }

    #[test]
    fn failed_poll_keeps_rows_and_sets_status() {
        let (_dir, mut app, _cmd_rx, event_tx) = app();
        event_tx
            .try_send(Event::SensorsUpdated {
                snapshot: SensorSnapshot::default(),
                series: Vec::new(),
            })
            .unwrap();
        event_tx
            .try_send(Event::PollFailed {
                message: "connection refused".to_string(),
            })
            .unwrap();
        app.drain_events();

        let status = app.status.unwrap();
        assert!(status.error);
        assert!(status.text.contains("connection refused"));
    }
}
