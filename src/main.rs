use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;

mod api;
mod app;
mod cli;
mod config;
mod error;
mod guard;
mod i18n;
mod input;
mod logging;
mod models;
mod scope;
mod session;
mod ui;
mod views;

use api::{Backend, HttpBackend};
use app::App;
use session::{SessionFile, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    let data_dir = config::get_data_dir()?;
    // a missing log file is not a reason to refuse to start
    if let Err(e) = logging::init(&data_dir) {
        eprintln!("logging disabled: {e:#}");
    }

    if !cli::handle_cli().await? {
        return Ok(());
    }

    let config = config::load_config()?;
    let (tx, rx) = session::channel();
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&config, rx)?);
    let store = SessionStore::new(tx, backend.clone(), SessionFile::default_location()?);
    tracing::info!(server = %config.server_url, "starting");

    let mut app = App::new(config, backend, store);
    app.start();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal loop failed");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too
                if key.kind == KeyEventKind::Press && !app.handle_key(key) {
                    tracing::info!("quit");
                    return Ok(());
                }
            }
        }

        app.pump();
        app.clear_expired_notification();
    }
}
