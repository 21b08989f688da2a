use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use promptforge::config::AppConfig;
use promptforge::core::logging;
use promptforge::tui::app::AppState;
use promptforge::tui::services::Services;

#[tokio::main]
async fn main() -> Result<()> {
    // Keep the guard alive for the life of the process so buffered
    // log lines are flushed on exit.
    let _log_guard = logging::init_tui();

    log::info!(
        "Starting {} v{}",
        promptforge::NAME,
        promptforge::VERSION
    );

    let config = AppConfig::load();

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let services = Services::init(&config, event_tx)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppState::new(event_rx, services);
    let tick_rate = Duration::from_millis(config.tui.tick_rate_ms);
    let run_result = app.run(&mut terminal, tick_rate).await;

    // Always restore the terminal, even if the loop errored.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result?;
    log::info!("Shutdown complete");
    Ok(())
}
