//! prview: terminal client for an AI pull-request review service.
//!
//! Entry point for the `prview` binary. Wires together the terminal lifecycle
//! (`tui`), unified event bus (`event`), API worker (`api`), screens (`ui`),
//! theme system (`theme`), and the session controller (`prview-core`).
//!
//! # Startup sequence
//!
//! 1. Parse flags and load the config file. Read-only, safe before terminal init.
//! 2. Open the log file and install the tracing subscriber. The terminal belongs
//!    to the UI, so nothing is ever logged to stdout or stderr.
//! 3. `install_panic_hook()`, then the SIGTERM/SIGHUP flag, then `init_tui()`.
//! 4. Spawn the crossterm event task and the API worker.
//!
//! `restore_tui()` runs after the event loop exits on every path (quit key,
//! signal, channel close, draw error). The panic hook covers panics.

mod api;
mod app;
mod cli;
mod event;
mod theme;
mod tui;
mod ui;

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use prview_core::config::{self, Config};
use prview_core::{HttpApi, ReviewApi};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::event::AppEvent;
use crate::ui::keybindings::{handle_key, handle_mouse, KeyAction};

fn init_logging(path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config_file = cli.config.clone().unwrap_or_else(config::config_path);
    let loaded = config::load(&config_file);
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };
    cli.apply(&mut config);

    init_logging(&config.log_path())?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        api_url = %config.api_url,
        "starting prview"
    );
    if let Err(e) = loaded {
        tracing::warn!(error = %e, "using default configuration");
    }

    let theme = theme::Theme::from_name(&config.theme);
    let client: Arc<dyn ReviewApi> = Arc::new(
        HttpApi::new(&config.api_url, config.request_timeout())
            .context("failed to build HTTP client")?,
    );
    ui::highlight::warm_up();

    tui::install_panic_hook();
    let term_flag =
        tui::register_shutdown_signals().context("failed to register signal handlers")?;
    let mut terminal = tui::init_tui().context("failed to initialise terminal")?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let (api_tx, api_rx) = mpsc::unbounded_channel();
    tokio::spawn(api::worker::api_worker_loop(client, api_rx, handler.tx.clone()));

    let mut state = app::AppState::new(api_tx);
    let outcome = run(&mut terminal, &mut state, handler.rx, &theme, &term_flag).await;

    tui::restore_tui().context("failed to restore terminal")?;
    tracing::info!("prview exiting");
    outcome
}

/// Event loop. Exits on quit, a shutdown signal, or the event channel closing.
async fn run(
    terminal: &mut tui::Tui,
    state: &mut app::AppState,
    mut rx: mpsc::UnboundedReceiver<AppEvent>,
    theme: &theme::Theme,
    term_flag: &AtomicBool,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            // Heartbeat: the signal flag is polled even when no events arrive.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
            maybe_event = rx.recv() => {
                let Some(event) = maybe_event else { break };
                match event {
                    AppEvent::Render => {
                        terminal.draw(|frame| ui::render(frame, state, theme))?;
                    }
                    AppEvent::Key(key) => {
                        if handle_key(key, state) == KeyAction::Quit {
                            break;
                        }
                    }
                    AppEvent::Mouse(mouse) => {
                        if handle_mouse(mouse, state) == KeyAction::Quit {
                            break;
                        }
                    }
                    // ratatui picks up the new size on the next Render.
                    AppEvent::Resize => {}
                    AppEvent::Tick => state.on_tick(),
                    AppEvent::Api(outcome) => state.apply_api_outcome(*outcome),
                    AppEvent::Quit => break,
                }
            }
        }
        if term_flag.load(Ordering::Relaxed) {
            tracing::info!("shutdown signal received");
            break;
        }
    }
    Ok(())
}
