//! Settings page: the connection form.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{App, SettingsField};

pub(super) fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Connection ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let fields = [
        ("Host", &app.form.host, SettingsField::Host),
        ("Port", &app.form.port, SettingsField::Port),
        ("Refresh interval (ms)", &app.form.refresh, SettingsField::Refresh),
    ];

    let mut lines = vec![Line::raw("")];
    for (label, value, field) in fields {
        let focused = app.form.focused == field;
        let marker = if focused { "> " } else { "  " };
        let value_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(format!("{label:<22}"), Style::default().fg(Color::DarkGray)),
            Span::styled(value.clone(), value_style),
            Span::styled(if focused { "_" } else { "" }, value_style),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        format!(
            "  Active: {}:{} every {} ms",
            app.config.host, app.config.port, app.config.refresh_interval_ms
        ),
        Style::default().fg(Color::DarkGray),
    ));
    lines.push(Line::styled(
        "  Enter saves and reconnects; blank or invalid fields revert to defaults.",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
