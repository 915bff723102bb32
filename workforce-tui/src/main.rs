//! Workforce dashboard TUI: six pages with vim-style navigation.
//!
//! Pages:
//! 1. HR Analytics: KPIs, breakdowns, trend, and the configurable tab strip
//! 2. Holding vs Subsidiary: actual against target per subsidiary
//! 3. Company Drilldown: branch, department, designation
//! 4. Employee Drilldown: paged, searchable employee list with export
//! 5. Executive Scorecard: holding overview with risky positions
//!
//! `--sample` (or `WORKFORCE_SAMPLE=1`) runs against the seeded offline
//! dataset instead of the HTTP service.

mod app;
mod input;
mod persistence;
mod theme;
mod ui;
mod worker;

use std::fs::File;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use workforce_core::settings::DEFAULT_SETTINGS_FILE;
use workforce_core::{FilterContext, Settings};

use crate::app::AppState;
use crate::worker::{Backend, WorkerCommand};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Paths
    let app_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("workforce");
    let state_path = app_dir.join("state.json");
    std::fs::create_dir_all(&app_dir)
        .with_context(|| format!("creating {}", app_dir.display()))?;

    // The terminal is ours, so logs go to a file.
    let log_file = File::create(app_dir.join("workforce.log")).context("opening log file")?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workforce_tui=info,workforce_runner=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    let settings_path = std::env::var_os("WORKFORCE_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let settings = Settings::load_or_default(&settings_path)
        .with_context(|| format!("loading {}", settings_path.display()))?;

    let sample = std::env::args().any(|a| a == "--sample")
        || std::env::var("WORKFORCE_SAMPLE").is_ok_and(|v| v == "1");
    let backend = if sample {
        Backend::Sample {
            export_dir: app_dir.join("exports"),
        }
    } else {
        Backend::Http(settings.service.clone())
    };
    tracing::info!(sample, settings = %settings_path.display(), "starting dashboard");

    // Load persisted state
    let persisted = persistence::load(&state_path);

    // Worker channels
    let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel();
    let (resp_tx, resp_rx) = mpsc::channel();

    let worker_handle =
        worker::spawn_worker(backend, cmd_rx, resp_tx).context("spawning worker thread")?;

    let mut app = AppState::new(&settings, FilterContext::today(), cmd_tx.clone(), resp_rx);
    persistence::apply(&mut app, persisted);
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    if let Err(e) = persistence::save(&state_path, &persisted) {
        tracing::warn!(error = %e, "could not save state");
    }

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
