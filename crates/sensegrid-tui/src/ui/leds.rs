//! LED grid page: the displayed grid, the paint palette, and the cursor.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use sensegrid_types::LedColor;

use crate::app::{App, GRID_COLUMNS, PALETTE};

pub(super) fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    draw_grid(frame, layout[0], app);
    draw_palette(frame, layout[1], app);
}

fn draw_grid(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" LED Grid ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.grid.is_empty() {
        let msg = Paragraph::new("No LED data. Press r to fetch the grid.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(msg, area);
        return;
    }

    let lines: Vec<Line> = app
        .grid
        .chunks(GRID_COLUMNS)
        .enumerate()
        .map(|(row, chunk)| {
            let mut spans = vec![Span::raw(" ")];
            for (col, color) in chunk.iter().enumerate() {
                let index = row * GRID_COLUMNS + col;
                spans.push(cell_span(*color, index == app.cursor));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn cell_span(color: LedColor, selected: bool) -> Span<'static> {
    let LedColor(r, g, b) = color;
    let style = Style::default().fg(Color::Rgb(r, g, b));
    if selected {
        Span::styled("[]", style.bg(Color::White).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("██", style)
    }
}

fn draw_palette(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Palette ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut spans = vec![Span::raw(" ")];
    for (i, color) in PALETTE.iter().enumerate() {
        spans.push(cell_span(*color, i == app.palette_index));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        PALETTE[app.palette_index].to_hex(),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
