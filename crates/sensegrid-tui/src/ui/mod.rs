//! Main UI layout and rendering for the dashboard.
//!
//! The layout consists of:
//!
//! - **Header**: title and current time
//! - **Tab bar**: Sensors / LED Grid / Settings
//! - **Main content**: the active page
//! - **Status bar**: key hints and the last status message

mod leds;
mod sensors;
mod settings;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::app::{App, Tab};

/// Draw the complete interface.
pub fn draw(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header bar
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, main_layout[0], app);
    draw_tab_bar(frame, main_layout[1], app);

    match app.active_tab {
        Tab::Sensors => sensors::draw(frame, main_layout[2], app),
        Tab::Leds => leds::draw(frame, main_layout[2], app),
        Tab::Settings => settings::draw(frame, main_layout[2], app),
    }

    draw_status_bar(frame, main_layout[3], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let clock = {
        let now = OffsetDateTime::now_utc();
        let now = match time::UtcOffset::current_local_offset() {
            Ok(offset) => now.to_offset(offset),
            Err(_) => now,
        };
        now.format(format_description!("[hour]:[minute]:[second]"))
            .unwrap_or_default()
    };

    let line = Line::from(vec![
        Span::styled(
            " sensegrid ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{}:{}", app.config.host, app.config.port),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(clock, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_tab_bar(frame: &mut Frame, area: Rect, app: &App) {
    let titles = Tab::ALL.iter().map(|tab| tab.title());
    let tabs = Tabs::new(titles)
        .select(app.active_tab.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(tabs, area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let hints = match app.active_tab {
        Tab::Sensors => "Tab switch page | q quit",
        Tab::Leds => "arrows move | [ ] color | space paint | x off | r refresh | a apply | c clear | q quit",
        Tab::Settings => "up/down field | type to edit | enter save | Esc quit",
    };

    let mut spans = vec![Span::styled(
        format!(" {hints} "),
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(status) = &app.status {
        let color = if status.error { Color::Red } else { Color::Green };
        spans.push(Span::styled(
            format!("| {}", status.text),
            Style::default().fg(color),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
