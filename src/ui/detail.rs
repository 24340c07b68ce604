//! Detail overlay rendering.
//!
//! Displays a modal overlay comparing a float's deployment values with its
//! latest resolved observation.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use floatwatch_types::EnrichedFloat;

use super::common::{format_date, format_position};
use crate::app::App;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 14;

/// Render the float detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(float) = app.selected_float() else {
        return;
    };

    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (area.height * 70 / 100).clamp(MIN_OVERLAY_HEIGHT, 20);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(6), // Identity
        Constraint::Min(6),    // Deployment vs latest
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    render_identity(frame, app, float, chunks[0]);
    render_positions(frame, app, float, chunks[1]);

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Press Esc to close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[2]);
}

fn render_identity(frame: &mut Frame, app: &App, float: &EnrichedFloat, area: Rect) {
    let s = &float.summary;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(vec![Span::styled(format!(" Float {} ", s.float_id), bold)]),
        Line::from(vec![
            Span::raw(" Project: "),
            Span::styled(text_or_unknown(&s.project_name), bold),
            Span::raw("    Institution: "),
            Span::styled(text_or_unknown(&s.institution), bold),
        ]),
        Line::from(vec![
            Span::raw(" PI: "),
            Span::raw(text_or_unknown(&s.pi_name)),
            Span::raw("    Data center: "),
            Span::raw(text_or_unknown(&s.data_center)),
        ]),
    ];

    let block = Block::default()
        .title(" Float Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_positions(frame: &mut Frame, app: &App, float: &EnrichedFloat, area: Rect) {
    let s = &float.summary;
    let deployment = s.deployment_lat.zip(s.deployment_lon);
    let latest = float.latest_lat.zip(float.latest_lon);

    let header = Row::new(vec![Cell::from(""), Cell::from("Position"), Cell::from("Date")])
        .height(1)
        .style(app.theme.header);

    let rows = vec![
        Row::new(vec![
            Cell::from("Deployment"),
            Cell::from(format_position(deployment)),
            Cell::from(format_date(s.deployment_date.as_deref())),
        ]),
        Row::new(vec![
            Cell::from("Latest"),
            Cell::from(format_position(latest)),
            Cell::from(format_date(float.latest_date.as_deref())),
        ]),
        Row::new(vec![
            Cell::from("Shown"),
            Cell::from(format_position(float.display_position())),
            Cell::from(format_date(float.display_date())),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD)),
    ];

    let widths = [
        Constraint::Length(12),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Position ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(table, area);
}

fn text_or_unknown(s: &str) -> String {
    if s.is_empty() {
        "Unknown".to_string()
    } else {
        s.to_string()
    }
}
