//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, help overlay,
//! and the formatting helpers the views share.

use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::{parse_calendar_date, parse_timestamp};

/// Render the header bar with the connection badge and fleet totals.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.connection_state;
    let badge_style = app.theme.connection_style(state.status, state.checking);
    let badge = if state.checking {
        "Checking..."
    } else {
        state.status.label()
    };

    let mut spans = vec![
        Span::styled(" ● ", badge_style),
        Span::styled("FLOATWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(badge, badge_style.add_modifier(Modifier::BOLD)),
        Span::raw(" │ "),
        Span::raw(app.backend_url.clone()),
    ];

    if let Some(checked) = state.last_checked {
        spans.push(Span::raw(" │ checked "));
        spans.push(Span::raw(format_time(checked)));
    }

    spans.push(Span::raw(" │ "));
    match app.fleet {
        Some(ref fleet) => {
            spans.push(Span::styled(
                fleet.len().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" shown / "));
            spans.push(Span::styled(
                fleet.total_count.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" floats"));
        }
        None => spans.push(Span::raw("Loading...")),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Fleet "), Line::from(" 2:Backend ")];

    let selected = match app.current_view {
        View::Fleet => 0,
        View::Backend => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows the data source, age of the fleet snapshot and available controls.
/// Temporary status messages and load errors take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref fleet) = app.fleet {
        let age = Utc::now().signed_duration_since(fleet.fetched_at).num_seconds().max(0);

        let controls = match app.current_view {
            View::Fleet if app.filter_active => "Type to search | Enter:apply Esc:cancel",
            View::Fleet => "/:search s:sort Enter:detail r:probe f:floats ?:help q:quit",
            View::Backend => "r:probe f:floats Tab:switch ?:help q:quit",
        };

        let error = match app.load_error {
            Some(ref err) => format!(" | {}", err),
            None => String::new(),
        };

        format!(
            " {} | Floats loaded {}s ago{} | {}",
            app.source_description(),
            age,
            error,
            controls,
        )
    } else if let Some(ref err) = app.load_error {
        format!(" Error: {} | f:retry q:quit", err)
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Tab 1/2     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Float detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Fleet",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  /         Start filter/search"),
        Line::from("  c         Clear filter"),
        Line::from("  s         Cycle sort column"),
        Line::from("  S         Toggle sort direction"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Re-check backend"),
        Line::from("  f         Reload floats"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Format a position as `12.50°, 77.50°`, or `Unknown`.
pub fn format_position(position: Option<(f64, f64)>) -> String {
    match position {
        Some((lat, lon)) => format!("{:.2}°, {:.2}°", lat, lon),
        None => "Unknown".to_string(),
    }
}

/// Format a date string as a local calendar date, or `Unknown`.
///
/// Bare calendar dates carry no time zone and are shown unshifted. Strings
/// that do not parse are shown as-is.
pub fn format_date(date: Option<&str>) -> String {
    let Some(date) = date else {
        return "Unknown".to_string();
    };
    if let Some(day) = parse_calendar_date(date) {
        return day.format("%Y-%m-%d").to_string();
    }
    match parse_timestamp(date) {
        Some(ts) => ts.with_timezone(&Local).format("%Y-%m-%d").to_string(),
        None => date.to_string(),
    }
}

/// Format a probe time as local wall-clock time.
pub fn format_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_position() {
        assert_eq!(format_position(Some((12.5, 77.5))), "12.50°, 77.50°");
        assert_eq!(format_position(Some((-0.004, 179.999))), "-0.00°, 180.00°");
        assert_eq!(format_position(None), "Unknown");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(None), "Unknown");
        assert_eq!(format_date(Some("sometime")), "sometime");
        assert_eq!(format_date(Some("2019/11/20")), "2019-11-20");
        assert_eq!(format_date(Some("2024-06")), "2024-06-01");
        // Rendered in local time, so only the month is fixed
        assert!(format_date(Some("2024-01-01T12:00:00Z")).starts_with("2024-01-0"));
    }
}
