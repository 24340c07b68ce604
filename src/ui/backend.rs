//! Backend view rendering.
//!
//! Shows the liveness verdict in detail, the recent probe history and, while
//! the backend is unreachable, what to check.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use floatwatch_types::ConnectionStatus;

use super::common::format_time;
use crate::app::App;

/// Render the Backend view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let disconnected = app.connection_state.is_disconnected();

    let chunks = if disconnected {
        Layout::vertical([
            Constraint::Length(8),
            Constraint::Length(4),
            Constraint::Min(6),
        ])
        .split(area)
    } else {
        Layout::vertical([
            Constraint::Length(8),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area)
    };

    render_connection(frame, app, chunks[0]);
    render_history(frame, app, chunks[1]);
    if disconnected {
        render_troubleshooting(frame, app, chunks[2]);
    }
}

fn block<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

fn render_connection(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.connection_state;
    let style = app.theme.connection_style(state.status, state.checking);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let verdict = match state.status {
        ConnectionStatus::Unknown => "No probe has completed yet",
        ConnectionStatus::Connected => "The health endpoint answered with a success status",
        ConnectionStatus::Disconnected => "The health endpoint is unreachable or failing",
    };

    let last_checked = state
        .last_checked
        .map(format_time)
        .unwrap_or_else(|| "never".to_string());

    let lines = vec![
        Line::from(vec![
            Span::raw(" Status:        "),
            Span::styled(state.status.label(), style.add_modifier(Modifier::BOLD)),
            Span::raw(if state.checking { "  (probe in flight)" } else { "" }),
        ]),
        Line::from(vec![Span::raw("                "), Span::raw(verdict)]),
        Line::from(vec![
            Span::raw(" Backend:       "),
            Span::styled(app.backend_url.clone(), bold),
        ]),
        Line::from(vec![Span::raw(" Last checked:  "), Span::raw(last_checked)]),
        Line::from(vec![
            Span::raw(" Probes:        "),
            Span::raw(state.probes.to_string()),
        ]),
        Line::from(vec![
            Span::raw(" Floats:        "),
            Span::raw(app.source_description().to_string()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block(app, " Connection ")), area);
}

fn render_history(frame: &mut Frame, app: &App, area: Rect) {
    let history = &app.probe_history;
    let width = area.width.saturating_sub(4) as usize;

    let strip: Vec<Span> = history
        .strip(width)
        .into_iter()
        .map(|up| Span::styled(if up { "█" } else { "▁" }, app.theme.probe_style(up)))
        .collect();

    let summary = match history.uptime() {
        Some(uptime) => {
            let last_ok = history
                .last_success()
                .map(format_time)
                .unwrap_or_else(|| "never".to_string());
            format!(
                " {:.0}% of the last {} probes succeeded, last success {}",
                uptime * 100.0,
                history.len(),
                last_ok
            )
        }
        None => " No completed probes yet".to_string(),
    };

    let lines = vec![
        Line::from(vec![Span::raw(" ")].into_iter().chain(strip).collect::<Vec<_>>()),
        Line::from(Span::styled(summary, Style::default().add_modifier(Modifier::DIM))),
    ];

    frame.render_widget(Paragraph::new(lines).block(block(app, " Probe History ")), area);
}

fn render_troubleshooting(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            " Unable to reach the backend.",
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(" • Check that the API server is running at {}", app.backend_url)),
        Line::from(" • Set --api-url or FLOATWATCH_API_URL if it listens elsewhere"),
        Line::from(" • Check firewall and proxy settings between here and the server"),
        Line::from(" • Press r to check again"),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block(app, " Troubleshooting "));
    frame.render_widget(paragraph, area);
}
