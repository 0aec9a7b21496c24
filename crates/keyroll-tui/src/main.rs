//! Keyroll - Terminal editor for directory and local account records
//!
//! Built with Ratatui and crossterm.

mod app;
mod config;
mod handlers;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use keyroll_core::{JsonFilePersistence, RecordStore};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use app::{App, AppState};

/// Keyroll - edit account records in the terminal
#[derive(Parser, Debug)]
#[command(name = "keyroll")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Record list to edit (overrides config)
    #[arg(short, long, value_name = "KEY")]
    scope: Option<String>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("keyroll_tui=info".parse()?))
        .with_writer(std::io::stderr) // Write logs to stderr to not interfere with TUI
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = config::Config::load(args.config)?;

    if let Some(scope) = args.scope {
        tracing::info!("Overriding scope from CLI: {}", scope);
        config.scope = scope;
    }

    let persistence = JsonFilePersistence::scoped(&config.data_dir, &config.scope);
    tracing::info!("Starting Keyroll with records at {}", persistence.path().display());

    let store = RecordStore::open(Box::new(persistence)).context("Failed to load records")?;
    let mut app = App::new(store, &config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Ignore release events on platforms that report them
                if key.kind == KeyEventKind::Press && handlers::handle_key(app, key) {
                    break;
                }
            }
        }

        if matches!(app.state, AppState::Quit) {
            break;
        }
    }

    Ok(())
}
