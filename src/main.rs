//! Folio CLI - a terminal portfolio with a streaming project-pitch generator.

use std::fs::{self, OpenOptions};
use std::io;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use folio_cli::app::App;
use folio_cli::config::{Config, LoggingConfig};
use folio_cli::input;
use folio_cli::profile::Profile;

/// Log to a file so tracing output never lands on the alternate screen.
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let path = logging.file_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level)),
        )
        .with_writer(file)
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = Config::load();

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Logging disabled: {:#}", e);
    }

    let profile = Profile::load_or_default(config.profile_path().as_deref());
    info!(profile = %profile.name, "starting folio");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, profile);
    info!(backend = %app.pitch.backend_name(), "pitch backend ready");

    let res = input::run_app(&mut terminal, &mut app, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let App { theme, .. } = app;
    if theme.shutdown(&mut config.theme) {
        if let Err(e) = config.save() {
            warn!(error = %e, "failed to persist theme");
        }
    }

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    info!("folio exited");
    Ok(())
}
