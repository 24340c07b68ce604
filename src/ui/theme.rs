//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use floatwatch_types::ConnectionStatus;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for an in-flight or not yet answered probe.
    pub warning: Color,
    /// Color for an unreachable backend and load errors.
    pub critical: Color,
    /// Color for a reachable backend.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for the connection badge.
    ///
    /// An in-flight probe is shown as pending whatever the last verdict was.
    pub fn connection_style(&self, status: ConnectionStatus, checking: bool) -> Style {
        if checking {
            return Style::default().fg(self.warning);
        }
        match status {
            ConnectionStatus::Unknown => Style::default().fg(self.warning),
            ConnectionStatus::Connected => Style::default().fg(self.healthy),
            ConnectionStatus::Disconnected => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
        }
    }

    /// Style for one cell of the probe history strip.
    pub fn probe_style(&self, connected: bool) -> Style {
        if connected {
            Style::default().fg(self.healthy)
        } else {
            Style::default().fg(self.critical)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_style() {
        let theme = Theme::dark();
        assert_eq!(
            theme.connection_style(ConnectionStatus::Connected, false).fg,
            Some(Color::Green)
        );
        assert_eq!(
            theme.connection_style(ConnectionStatus::Disconnected, false).fg,
            Some(Color::Red)
        );
        assert_eq!(
            theme.connection_style(ConnectionStatus::Connected, true).fg,
            Some(Color::Yellow)
        );
    }
}
