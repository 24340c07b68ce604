//! Terminal UI rendering using ratatui.
//!
//! Each view is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`fleet`]: Table of floats with latest position and date
//! - [`backend`]: Connection detail, probe history and troubleshooting hints
//! - [`detail`]: Modal overlay comparing deployment and latest values
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (fleet/backend::render)              │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod backend;
pub mod common;
pub mod detail;
pub mod fleet;
pub mod theme;

pub use fleet::SortColumn;
pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, View};

/// Minimum terminal size for a usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 12;

/// Row where table content starts: header, tabs, block border, table header.
pub const CONTENT_START_ROW: u16 = 3;

/// Render one frame of the whole dashboard.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5.min(area.height));
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(1), // Tabs
        Constraint::Min(8),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_tabs(frame, app, chunks[1]);

    match app.current_view {
        View::Fleet => fleet::render(frame, app, chunks[2]),
        View::Backend => backend::render(frame, app, chunks[2]),
    }

    common::render_status_bar(frame, app, chunks[3]);

    if app.show_detail_overlay {
        detail::render_overlay(frame, app, area);
    }

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ChannelSource;
    use floatwatch_types::{
        ConnectionState, ConnectionStatus, EnrichedFloat, FleetSnapshot, FloatSummary,
    };
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::watch;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn app_with(state: ConnectionState, fleet: Option<FleetSnapshot>) -> App {
        let (fleet_tx, source) = ChannelSource::create("test");
        let (_conn_tx, conn_rx) = watch::channel(state);
        let mut app = App::new(Box::new(source), conn_rx, "http://localhost:8000");
        if fleet.is_some() {
            fleet_tx.send(fleet).unwrap();
            app.reload_data().unwrap();
        }
        app
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        screen(&terminal)
    }

    #[test]
    fn test_loading_placeholder() {
        let text = render(&app_with(ConnectionState::default(), None));
        assert!(text.contains("Checking..."));
        assert!(text.contains("Loading floats..."));
    }

    #[test]
    fn test_fleet_table() {
        let floats = vec![
            EnrichedFloat {
                latest_lat: Some(12.5),
                latest_lon: Some(77.5),
                latest_date: Some("2024-01-01T12:00:00Z".to_string()),
                ..EnrichedFloat::passthrough(
                    FloatSummary::builder(2902746).institution("INCOIS").build(),
                )
            },
            EnrichedFloat::passthrough(FloatSummary::builder(5906468).build()),
        ];
        let state = ConnectionState {
            status: ConnectionStatus::Connected,
            probes: 1,
            ..Default::default()
        };
        let text = render(&app_with(state, Some(FleetSnapshot::new(floats, 412))));

        assert!(text.contains("Connected"));
        assert!(text.contains("412 floats"));
        assert!(text.contains("2902746"));
        assert!(text.contains("12.50°, 77.50°"));
        assert!(text.contains("Unknown"));
    }

    #[test]
    fn test_backend_view_troubleshooting() {
        let state = ConnectionState {
            status: ConnectionStatus::Disconnected,
            probes: 1,
            ..Default::default()
        };
        let mut app = app_with(state, None);
        app.set_view(View::Backend);

        let text = render(&app);
        assert!(text.contains("Disconnected"));
        assert!(text.contains("Unable to reach the backend."));
    }

    #[test]
    fn test_too_small() {
        let app = app_with(ConnectionState::default(), None);
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        assert!(screen(&terminal).contains("Terminal too small"));
    }
}
