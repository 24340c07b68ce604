use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use floatwatch::app::ExportDocument;
use floatwatch::data::{load_fleet, normalize};
use floatwatch::settings::Settings;
use floatwatch::ui::{self, Theme};
use floatwatch::{events, App, HttpSource, LivenessMonitor};

#[derive(Parser, Debug)]
#[command(name = "floatwatch")]
#[command(about = "Terminal dashboard for Argo float telemetry and backend liveness")]
struct Args {
    /// Backend base URL (overrides config and FLOATWATCH_API_URL)
    #[arg(short, long)]
    api_url: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of floats to list
    #[arg(short, long)]
    limit: Option<usize>,

    /// Seconds between health probes
    #[arg(long)]
    health_interval: Option<u64>,

    /// Log file; the terminal is owned by the UI
    #[arg(long, default_value = "floatwatch.log")]
    log_file: PathBuf,

    /// Load the fleet once, write it to a JSON file and exit
    #[arg(short, long, conflicts_with_all = ["check", "normalize"])]
    export: Option<PathBuf>,

    /// Probe the backend once and exit non-zero if it is unreachable
    #[arg(long, conflicts_with_all = ["export", "normalize"])]
    check: bool,

    /// Print the latest observation extracted from a float details JSON file
    #[arg(long, value_name = "FILE", conflicts_with_all = ["export", "check"])]
    normalize: Option<PathBuf>,
}

impl Args {
    fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(ref url) = self.api_url {
            settings.api_url = url.clone();
        }
        if let Some(limit) = self.limit {
            settings.float_limit = limit;
        }
        if let Some(secs) = self.health_interval {
            settings.health_interval_secs = secs;
        }
        settings.validate()?;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Offline mode: no backend, no runtime
    if let Some(ref path) = args.normalize {
        return print_normalized(path);
    }

    init_logging(&args.log_file)?;
    let settings = args.settings()?;
    info!(api_url = %settings.api_url, limit = settings.float_limit, "Starting floatwatch");

    let rt = Runtime::new()?;

    if args.check {
        return check_backend(&rt, &settings);
    }

    if let Some(ref export_path) = args.export {
        return export_to_file(&rt, &settings, export_path);
    }

    run_tui(&rt, &settings)
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("floatwatch=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Print the normalized observation of a details file
fn print_normalized(path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let details: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))?;

    println!("{}", serde_json::to_string_pretty(&normalize(&details))?);
    Ok(())
}

/// Run one probe and report the verdict through the exit code
fn check_backend(rt: &Runtime, settings: &Settings) -> Result<()> {
    let monitor = LivenessMonitor::new(settings.client()?);
    let connected = rt.block_on(monitor.probe_now());

    let state = monitor.state();
    println!("{}: {}", settings.api_url, state.status.label());
    if !connected {
        std::process::exit(1);
    }
    Ok(())
}

/// Load the fleet once and write it with the current liveness verdict
fn export_to_file(rt: &Runtime, settings: &Settings, export_path: &Path) -> Result<()> {
    let client = settings.client()?;
    let monitor = LivenessMonitor::new(client.clone());

    let snapshot = rt.block_on(async {
        monitor.probe_now().await;
        load_fleet(&client, &settings.fleet_query()).await
    });
    let snapshot = snapshot
        .with_context(|| format!("Failed to load floats from {}", settings.api_url))?;

    let state = monitor.state();
    ExportDocument::new(&settings.api_url, &snapshot)
        .with_connection(&state)
        .write_to(export_path)?;

    println!("Exported {} floats to: {}", snapshot.floats.len(), export_path.display());
    Ok(())
}

/// Run the TUI against the configured backend
fn run_tui(rt: &Runtime, settings: &Settings) -> Result<()> {
    // Background tasks spawn onto this runtime while the UI owns the main thread
    let _guard = rt.enter();

    let client = settings.client()?;
    let monitor = LivenessMonitor::builder(client.clone())
        .interval(settings.health_interval())
        .build();
    let handle = monitor.activate();

    let source = HttpSource::new(Arc::new(client), settings.fleet_query(), &settings.api_url);

    let trigger_monitor = monitor.clone();
    let runtime = rt.handle().clone();
    let mut app = App::new(Box::new(source), monitor.subscribe(), &settings.api_url)
        .with_theme(Theme::auto_detect())
        .with_probe_trigger(move || {
            let monitor = trigger_monitor.clone();
            runtime.spawn(async move {
                monitor.probe_now().await;
            });
        });

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let _ = app.reload_data();
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    rt.block_on(handle.shutdown());
    info!("Exiting");

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    events::handle_mouse_event(app, mouse, ui::CONTENT_START_ROW);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Channels are cheap to poll; pick up whatever arrived
        let _ = app.reload_data();
    }

    Ok(())
}
