//! Sensors page: tabular snapshot plus the scrolling time-series chart.

use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Row, Table};

use sensegrid_types::TimeSeriesPoint;

use crate::app::App;

/// Chart line per tracked metric, in the buffer's fixed value order.
const CHART_SERIES: [(&str, Color); 3] = [
    ("Temperature", Color::Rgb(0xF6, 0x61, 0x51)),
    ("Pressure", Color::Rgb(0xF8, 0xE4, 0x5C)),
    ("Humidity", Color::Rgb(0x62, 0xA0, 0xEA)),
];

pub(super) fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let table_height = (app.rows.len() as u16 + 3).min(area.height / 2);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(table_height), Constraint::Min(3)])
        .split(area);

    draw_table(frame, layout[0], app);
    draw_chart(frame, layout[1], app);
}

fn draw_table(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Current Readings ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.rows.is_empty() {
        let msg = Paragraph::new("Waiting for the first poll...")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(msg, area);
        return;
    }

    let header = Row::new(["Name", "Value", "Unit"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows = app.rows.iter().map(|reading| {
        Row::new(vec![
            reading.label.clone(),
            format!("{:.2}", reading.value),
            reading.unit.clone(),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

fn draw_chart(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" History ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.series.is_empty() {
        let msg = Paragraph::new("No samples yet")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(msg, area);
        return;
    }

    let series_data: Vec<Vec<(f64, f64)>> = (0..CHART_SERIES.len())
        .map(|metric| metric_points(&app.series, metric))
        .collect();

    let datasets = CHART_SERIES
        .iter()
        .zip(series_data.iter())
        .map(|((name, color), data)| {
            Dataset::default()
                .name(*name)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(*color))
                .data(data)
        })
        .collect();

    let x_max = (app.series.len().saturating_sub(1)).max(1) as f64;
    let (y_min, y_max) = value_bounds(&series_data);

    let x_labels = [
        app.series.first().map(|p| p.timestamp.clone()).unwrap_or_default(),
        app.series.last().map(|p| p.timestamp.clone()).unwrap_or_default(),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([y_min, y_max])
                .labels([format!("{y_min:.0}"), format!("{y_max:.0}")]),
        );

    frame.render_widget(chart, area);
}

/// Points for one tracked metric; non-finite slots (metric absent from a
/// response) are skipped rather than charted.
fn metric_points(series: &[TimeSeriesPoint], metric: usize) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .filter_map(|(i, point)| {
            let value = *point.values.get(metric)?;
            value.is_finite().then_some((i as f64, value))
        })
        .collect()
}

/// Y bounds across every finite value, with a little headroom.
fn value_bounds(series_data: &[Vec<(f64, f64)>]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for data in series_data {
        for (_, value) in data {
            min = min.min(*value);
            max = max.max(*value);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * 0.1).max(1.0);
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_slots_are_skipped() {
        let series = vec![
            TimeSeriesPoint {
                timestamp: "12:00:00".to_string(),
                values: vec![21.2, f64::NAN, 48.0],
            },
            TimeSeriesPoint {
                timestamp: "12:00:01".to_string(),
                values: vec![21.3, 1013.0, 48.1],
            },
        ];

        assert_eq!(metric_points(&series, 0), vec![(0.0, 21.2), (1.0, 21.3)]);
        assert_eq!(metric_points(&series, 1), vec![(1.0, 1013.0)]);
    }

    #[test]
    fn bounds_degrade_gracefully_without_finite_values() {
        assert_eq!(value_bounds(&[Vec::new()]), (0.0, 1.0));

        let (min, max) = value_bounds(&[vec![(0.0, 10.0), (1.0, 20.0)]]);
        assert!(min < 10.0);
        assert!(max > 20.0);
    }
}
