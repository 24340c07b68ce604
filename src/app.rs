//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use floatwatch_types::{ConnectionState, EnrichedFloat, FleetSnapshot};

use crate::data::ProbeHistory;
use crate::source::DataSource;
use crate::ui::fleet::{sort_floats_by, SortColumn};
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Float detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Table of enriched floats.
    Fleet,
    /// Backend connection detail and probe history.
    Backend,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Fleet => View::Backend,
            View::Backend => View::Fleet,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        // Two views: both directions land on the other one
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Fleet => "Fleet",
            View::Backend => "Backend",
        }
    }
}

/// Document written by the export action and `--export`.
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub backend_url: &'a str,
    pub exported_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<&'a ConnectionState>,
    pub fleet: &'a FleetSnapshot,
}

impl<'a> ExportDocument<'a> {
    pub fn new(backend_url: &'a str, fleet: &'a FleetSnapshot) -> Self {
        Self {
            backend_url,
            exported_at: Utc::now(),
            connection: None,
            fleet,
        }
    }

    pub fn with_connection(mut self, connection: &'a ConnectionState) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Write the document as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Fleet data
    source: Box<dyn DataSource>,
    pub fleet: Option<FleetSnapshot>,
    pub load_error: Option<String>,

    // Backend liveness
    connection: watch::Receiver<ConnectionState>,
    pub connection_state: ConnectionState,
    pub probe_history: ProbeHistory,
    probe_trigger: Option<Box<dyn Fn() + Send>>,
    pub backend_url: String,

    // Navigation state
    pub selected_index: usize,

    // Sorting (Fleet view)
    pub sort_column: SortColumn,
    pub sort_ascending: bool,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App over a fleet source and a liveness state channel.
    pub fn new(
        source: Box<dyn DataSource>,
        connection: watch::Receiver<ConnectionState>,
        backend_url: &str,
    ) -> Self {
        let connection_state = connection.borrow().clone();
        Self {
            running: true,
            current_view: View::Fleet,
            show_help: false,
            show_detail_overlay: false,
            source,
            fleet: None,
            load_error: None,
            connection,
            connection_state,
            probe_history: ProbeHistory::new(),
            probe_trigger: None,
            backend_url: backend_url.to_string(),
            selected_index: 0,
            sort_column: SortColumn::default(),
            sort_ascending: true,
            filter_text: String::new(),
            filter_active: false,
            theme: Theme::dark(),
            status_message: None,
        }
    }

    /// Use the given theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Install the action run by a manual re-probe.
    pub fn with_probe_trigger<F>(mut self, trigger: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        self.probe_trigger = Some(Box::new(trigger));
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Check if a fleet load is in progress.
    pub fn is_loading(&self) -> bool {
        self.source.is_loading()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Pick up new fleet data and liveness state.
    ///
    /// Returns Ok(true) if anything changed.
    pub fn reload_data(&mut self) -> Result<bool> {
        let mut changed = false;

        if self.connection.has_changed().unwrap_or(false) {
            self.connection_state = self.connection.borrow_and_update().clone();
            self.probe_history.observe(&self.connection_state);
            changed = true;
        }

        if let Some(snapshot) = self.source.poll() {
            self.fleet = Some(snapshot);
            self.load_error = None;
            self.clamp_selection();
            changed = true;
        } else if let Some(err) = self.source.error() {
            if self.load_error.as_deref() != Some(err) {
                self.load_error = Some(err.to_string());
                changed = true;
            }
        }

        Ok(changed)
    }

    /// Start a manual health probe unless one is already running.
    ///
    /// Returns true if a probe was started.
    pub fn refresh_connection(&mut self) -> bool {
        // The receiver may be ahead of the last reload
        let checking = self.connection.borrow().checking;
        if checking {
            self.set_status_message("Health check already running".to_string());
            return false;
        }
        let Some(trigger) = &self.probe_trigger else {
            return false;
        };
        trigger();
        self.set_status_message("Checking backend...".to_string());
        true
    }

    /// Start a fresh fleet load.
    pub fn refresh_fleet(&mut self) -> bool {
        if self.source.refresh() {
            self.set_status_message("Reloading floats...".to_string());
            true
        } else {
            self.set_status_message("Reload already in progress".to_string());
            false
        }
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Floats after filtering and sorting, in display order.
    pub fn visible_floats(&self) -> Vec<&EnrichedFloat> {
        let Some(ref fleet) = self.fleet else {
            return Vec::new();
        };
        let mut floats: Vec<&EnrichedFloat> =
            fleet.floats.iter().filter(|f| self.matches_filter(f)).collect();
        sort_floats_by(&mut floats, self.sort_column, self.sort_ascending);
        floats
    }

    /// The float under the cursor.
    pub fn selected_float(&self) -> Option<&EnrichedFloat> {
        self.visible_floats().get(self.selected_index).copied()
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_floats().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        if self.current_view != View::Fleet {
            return;
        }
        let max = self.visible_floats().len().saturating_sub(1);
        self.selected_index = (self.selected_index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        if self.current_view != View::Fleet {
            return;
        }
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        self.selected_index = self.visible_floats().len().saturating_sub(1);
    }

    /// Open the detail overlay for the selected float.
    pub fn enter_detail(&mut self) {
        if self.current_view == View::Fleet && self.selected_float().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close the overlay first, then return to the fleet.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        self.current_view = View::Fleet;
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Cycle to the next sort column.
    pub fn cycle_sort(&mut self) {
        self.sort_column = self.sort_column.next();
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        self.sort_ascending = !self.sort_ascending;
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.selected_index = 0;
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Check if a float matches the current filter.
    ///
    /// Matches on id, institution, project, PI and data center.
    pub fn matches_filter(&self, float: &EnrichedFloat) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let search = self.filter_text.to_lowercase();
        let s = &float.summary;
        s.float_id.to_string().contains(&search)
            || [&s.institution, &s.project_name, &s.pi_name, &s.data_center]
                .iter()
                .any(|field| field.to_lowercase().contains(&search))
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current fleet and connection state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref fleet) = self.fleet else {
            anyhow::bail!("No data to export");
        };
        ExportDocument::new(&self.backend_url, fleet)
            .with_connection(&self.connection_state)
            .write_to(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ChannelSource;
    use floatwatch_types::{ConnectionStatus, FloatSummary};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    type Senders = (
        watch::Sender<Option<FleetSnapshot>>,
        watch::Sender<ConnectionState>,
    );

    fn app() -> (App, Senders) {
        let (fleet_tx, source) = ChannelSource::create("test");
        let (conn_tx, conn_rx) = watch::channel(ConnectionState::default());
        let app = App::new(Box::new(source), conn_rx, "http://localhost:8000");
        (app, (fleet_tx, conn_tx))
    }

    fn snapshot() -> FleetSnapshot {
        let floats = vec![
            FloatSummary::builder(2902746)
                .institution("INCOIS")
                .project_name("ARGO INDIA")
                .build(),
            FloatSummary::builder(1901910)
                .institution("CSIRO")
                .project_name("Argo Australia")
                .build(),
            FloatSummary::builder(5906468)
                .institution("AOML")
                .project_name("US ARGO PROJECT")
                .build(),
        ];
        FleetSnapshot::new(floats.into_iter().map(EnrichedFloat::from).collect(), 412)
    }

    #[test]
    fn test_reload_picks_up_fleet_and_connection() {
        let (mut app, (fleet_tx, conn_tx)) = app();
        assert!(!app.reload_data().unwrap());
        assert!(app.fleet.is_none());

        fleet_tx.send(Some(snapshot())).unwrap();
        conn_tx.send_modify(|s| {
            s.status = ConnectionStatus::Connected;
            s.last_checked = Some(Utc::now());
            s.probes = 1;
        });

        assert!(app.reload_data().unwrap());
        assert_eq!(app.fleet.as_ref().unwrap().total_count, 412);
        assert!(app.connection_state.is_connected());
        assert_eq!(app.probe_history.len(), 1);

        assert!(!app.reload_data().unwrap());
    }

    #[test]
    fn test_visible_floats_sorted_by_id() {
        let (mut app, (fleet_tx, _conn_tx)) = app();
        fleet_tx.send(Some(snapshot())).unwrap();
        app.reload_data().unwrap();

        let ids: Vec<i64> = app.visible_floats().iter().map(|f| f.float_id()).collect();
        assert_eq!(ids, vec![1901910, 2902746, 5906468]);

        app.toggle_sort_direction();
        assert_eq!(app.visible_floats()[0].float_id(), 5906468);
    }

    #[test]
    fn test_filter() {
        let (mut app, (fleet_tx, _conn_tx)) = app();
        fleet_tx.send(Some(snapshot())).unwrap();
        app.reload_data().unwrap();

        app.start_filter();
        for c in "argo".chars() {
            app.filter_push(c);
        }
        assert_eq!(app.visible_floats().len(), 3);

        app.clear_filter();
        for c in "csiro".chars() {
            app.filter_push(c);
        }
        assert_eq!(app.visible_floats().len(), 1);
        assert_eq!(app.selected_float().unwrap().float_id(), 1901910);

        app.clear_filter();
        app.filter_push('2');
        app.filter_push('9');
        assert_eq!(app.visible_floats().len(), 1);
    }

    #[test]
    fn test_navigation_clamps() {
        let (mut app, (fleet_tx, _conn_tx)) = app();
        fleet_tx.send(Some(snapshot())).unwrap();
        app.reload_data().unwrap();

        app.select_next_n(10);
        assert_eq!(app.selected_index, 2);
        app.select_prev();
        assert_eq!(app.selected_index, 1);
        app.select_first();
        assert_eq!(app.selected_index, 0);
        app.select_last();
        assert_eq!(app.selected_index, 2);

        // A smaller snapshot pulls the cursor back in range
        let mut small = snapshot();
        small.floats.truncate(1);
        fleet_tx.send(Some(small)).unwrap();
        app.reload_data().unwrap();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_detail_overlay() {
        let (mut app, (fleet_tx, _conn_tx)) = app();
        app.enter_detail();
        assert!(!app.show_detail_overlay);

        fleet_tx.send(Some(snapshot())).unwrap();
        app.reload_data().unwrap();
        app.enter_detail();
        assert!(app.show_detail_overlay);

        app.go_back();
        assert!(!app.show_detail_overlay);
        assert_eq!(app.current_view, View::Fleet);
    }

    #[test]
    fn test_view_cycle() {
        let (mut app, _senders) = app();
        app.next_view();
        assert_eq!(app.current_view, View::Backend);
        app.next_view();
        assert_eq!(app.current_view, View::Fleet);
        app.prev_view();
        assert_eq!(app.current_view, View::Backend);
        app.go_back();
        assert_eq!(app.current_view, View::Fleet);
    }

    #[test]
    fn test_refresh_connection_skipped_while_checking() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let (app, (_fleet_tx, conn_tx)) = app();
        let mut app = app.with_probe_trigger(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(app.refresh_connection());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        conn_tx.send_modify(|s| s.checking = true);
        assert!(!app.refresh_connection());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.get_status_message(), Some("Health check already running"));
    }

    #[test]
    fn test_refresh_connection_without_trigger() {
        let (mut app, _senders) = app();
        assert!(!app.refresh_connection());
    }

    #[test]
    fn test_export_state() {
        let (mut app, (fleet_tx, _conn_tx)) = app();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        assert!(app.export_state(&path).is_err());

        fleet_tx.send(Some(snapshot())).unwrap();
        app.reload_data().unwrap();
        app.export_state(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["backend_url"], "http://localhost:8000");
        assert_eq!(json["fleet"]["total_count"], 412);
        assert_eq!(json["fleet"]["floats"].as_array().unwrap().len(), 3);
        assert_eq!(json["connection"]["status"], "unknown");
    }
}
