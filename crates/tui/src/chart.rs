//! Chart widgets for the live stream view.

use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};

/// Create the main actual-vs-prediction chart.
///
/// Points are `(record index, value)` pairs over the current rolling
/// window; both series share the x range.
pub fn transaction_chart<'a>(
    actual: &'a [(f64, f64)],
    predicted: &'a [(f64, f64)],
    title: &'a str,
) -> Chart<'a> {
    let datasets = vec![
        Dataset::default()
            .name("actual")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(actual),
        Dataset::default()
            .name("predicted")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(predicted),
    ];

    let (x_min, x_max) = x_bounds(actual);
    let (y_min, y_max) = y_bounds(actual.iter().chain(predicted.iter()));

    Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        )
        .x_axis(
            Axis::default()
                .title("Record")
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(format!("{}", x_min as u64)),
                    Span::raw(format!("{}", ((x_min + x_max) / 2.0) as u64)),
                    Span::raw(format!("{}", x_max as u64)),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Value")
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{:.1}", y_min)),
                    Span::raw(format!("{:.1}", (y_min + y_max) / 2.0)),
                    Span::raw(format!("{:.1}", y_max)),
                ]),
        )
}

/// Create the anomaly-likelihood chart (fixed [0, 1] y range).
pub fn anomaly_chart(scores: &[(f64, f64)]) -> Chart<'_> {
    let dataset = Dataset::default()
        .name("anomaly")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Red))
        .data(scores);

    let (x_min, x_max) = x_bounds(scores);

    Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Anomaly score "),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(format!("{}", x_min as u64)),
                    Span::raw(format!("{}", x_max as u64)),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 1.0])
                .labels(vec![Span::raw("0.0"), Span::raw("0.5"), Span::raw("1.0")]),
        )
}

fn x_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first.0, last.0.max(first.0 + 1.0)),
        _ => (0.0, 1.0),
    }
}

fn y_bounds<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &(_, y) in points {
        min = min.min(y);
        max = max.max(y);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * 0.05).max(0.5);
    (min - pad, max + pad)
}
