//! Terminal dashboard for a networked sensor-and-LED device.
//!
//! Polls the device's sensor endpoint on a timer, charts the last readings,
//! and lets the operator view and edit the LED grid. Connection settings are
//! persisted between runs; command-line overrides apply to the current
//! session only.

mod app;
mod messages;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use sensegrid_core::Preferences;

use crate::app::App;
use crate::messages::Command;
use crate::worker::DeviceWorker;

#[derive(Parser)]
#[command(name = "sensegrid")]
#[command(author, version, about = "Terminal dashboard for sensor and LED grid devices", long_about = None)]
struct Cli {
    /// Device host for this session (overrides the saved value)
    #[arg(long)]
    host: Option<String>,

    /// Device port for this session (overrides the saved value)
    #[arg(long)]
    port: Option<u16>,

    /// Poll interval in milliseconds for this session (overrides the saved value)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll for events with a timeout so worker events keep draining.
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        app.drain_events();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr; stdout belongs to the alternate screen.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let prefs = Preferences::open_default();
    let mut config = prefs.load_connection();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.refresh_interval_ms = interval_ms;
    }

    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    let (event_tx, event_rx) = mpsc::channel(32);

    let worker = DeviceWorker::new(config.clone(), cmd_rx, event_tx)?;
    let worker_handle = tokio::spawn(worker.run());

    let mut app = App::new(prefs, config, cmd_tx.clone(), event_rx);

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut app).await;
    restore_terminal()?;

    let _ = cmd_tx.send(Command::Shutdown).await;
    let _ = worker_handle.await;

    result
}
