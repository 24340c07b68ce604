//! Fleet view rendering.
//!
//! Displays a table of the listed floats with their latest known position
//! and date, falling back to deployment values.

use std::cmp::Ordering;

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use floatwatch_types::EnrichedFloat;

use super::common::{format_date, format_position};
use crate::app::App;
use crate::data::parse_timestamp;

/// Column to sort by in the Fleet view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Sort by float identifier.
    #[default]
    Id,
    /// Sort by project name.
    Project,
    /// Sort by institution.
    Institution,
    /// Sort by latest (or deployment) date.
    Date,
}

impl SortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            SortColumn::Id => SortColumn::Project,
            SortColumn::Project => SortColumn::Institution,
            SortColumn::Institution => SortColumn::Date,
            SortColumn::Date => SortColumn::Id,
        }
    }

    fn label(self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Project => "project",
            SortColumn::Institution => "institution",
            SortColumn::Date => "date",
        }
    }
}

/// Render the Fleet view showing all floats in a sortable table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(ref fleet) = app.fleet else {
        let message = match app.load_error {
            Some(ref err) => Span::styled(err.clone(), Style::default().fg(app.theme.critical)),
            None => Span::styled(
                "Loading floats...",
                Style::default().add_modifier(Modifier::DIM),
            ),
        };
        let placeholder = Paragraph::new(message)
            .alignment(Alignment::Center)
            .block(block.title(" Floats "));
        frame.render_widget(placeholder, area);
        return;
    };

    let floats = app.visible_floats();

    let header = Row::new(vec![
        Cell::from(format_header("Float", SortColumn::Id, app)),
        Cell::from(format_header("Project", SortColumn::Project, app)),
        Cell::from(format_header("Institution", SortColumn::Institution, app)),
        Cell::from("Position"),
        Cell::from(format_header("Date", SortColumn::Date, app)),
        Cell::from("PI"),
        Cell::from("DC"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = floats
        .iter()
        .map(|f| {
            let s = &f.summary;
            let position = f.display_position();
            let position_style = if position.is_some() {
                Style::default()
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            Row::new(vec![
                Cell::from(s.float_id.to_string()),
                Cell::from(or_dash(&s.project_name)),
                Cell::from(or_dash(&s.institution)),
                Cell::from(format_position(position)).style(position_style),
                Cell::from(format_date(f.display_date())),
                Cell::from(or_dash(&s.pi_name)),
                Cell::from(or_dash(&s.data_center)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Min(18),
        Constraint::Min(10),
        Constraint::Fill(2),
        Constraint::Length(3),
    ];

    let selected_visual_index = app.selected_index.min(floats.len().saturating_sub(1));
    let sort_dir = if app.sort_ascending { "↑" } else { "↓" };

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if !floats.is_empty() {
        format!(" [{}/{}]", selected_visual_index + 1, floats.len())
    } else {
        String::new()
    };

    let loading = if app.is_loading() { " (refreshing)" } else { "" };

    let title = format!(
        " Floats ({}/{}){} [s:sort {}{}]{}{} ",
        floats.len(),
        fleet.len(),
        loading,
        app.sort_column.label(),
        sort_dir,
        filter_info,
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block.title(title))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected_visual_index));

    frame.render_stateful_widget(table, area, &mut state);
}

fn format_header(name: &str, col: SortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = if app.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

fn or_dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}

/// Sort floats by the given column and direction.
///
/// Ties fall back to ascending float id. Undated floats sort before dated ones.
pub fn sort_floats_by(floats: &mut [&EnrichedFloat], column: SortColumn, ascending: bool) {
    floats.sort_by(|a, b| {
        let primary = match column {
            SortColumn::Id => a.float_id().cmp(&b.float_id()),
            SortColumn::Project => cmp_text(&a.summary.project_name, &b.summary.project_name),
            SortColumn::Institution => cmp_text(&a.summary.institution, &b.summary.institution),
            SortColumn::Date => {
                let a_date = a.display_date().and_then(parse_timestamp);
                let b_date = b.display_date().and_then(parse_timestamp);
                a_date.cmp(&b_date)
            }
        };

        let primary = if ascending {
            primary
        } else {
            primary.reverse()
        };

        if primary == Ordering::Equal {
            a.float_id().cmp(&b.float_id())
        } else {
            primary
        }
    });
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use floatwatch_types::FloatSummary;

    fn float(id: i64, project: &str, date: Option<&str>) -> EnrichedFloat {
        EnrichedFloat::passthrough(
            FloatSummary::builder(id)
                .project_name(project)
                .deployment(None, None, date)
                .build(),
        )
    }

    fn ids(floats: &[&EnrichedFloat]) -> Vec<i64> {
        floats.iter().map(|f| f.float_id()).collect()
    }

    #[test]
    fn test_sort_by_project_case_insensitive() {
        let a = float(3, "argo india", None);
        let b = float(1, "Argo Australia", None);
        let c = float(2, "ARGO INDIA", None);
        let mut floats = vec![&a, &b, &c];

        sort_floats_by(&mut floats, SortColumn::Project, true);
        assert_eq!(ids(&floats), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_by_date_chronological() {
        let a = float(1, "", Some("2021-03-01"));
        let b = float(2, "", Some("2019-11-20T10:00:00Z"));
        let c = float(3, "", None);
        let mut floats = vec![&a, &b, &c];

        sort_floats_by(&mut floats, SortColumn::Date, true);
        assert_eq!(ids(&floats), vec![3, 2, 1]);

        sort_floats_by(&mut floats, SortColumn::Date, false);
        assert_eq!(ids(&floats), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_column_cycle() {
        let mut col = SortColumn::default();
        for _ in 0..4 {
            col = col.next();
        }
        assert_eq!(col, SortColumn::Id);
    }
}
