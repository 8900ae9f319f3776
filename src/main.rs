//! termgram - Terminal Photo-Sharing Client
//!
//! A terminal client for a photo-sharing service. Sign in or create an
//! account, browse the home feed, flip through post images, like, comment,
//! and edit your profile, all from the terminal.

use std::io;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

mod domain;
mod application;
mod infrastructure;
mod presentation;

use application::{App, Services};
use infrastructure::{ApiClient, FileTokenStore};
use presentation::{render_ui, InputHandler};

/// Default base URL of the photo-sharing API.
const DEFAULT_API_URL: &str = "http://localhost:1337";

/// Entry point for the termgram terminal client.
///
/// Reads configuration from the environment (`TERMGRAM_API_URL`,
/// `TERMGRAM_DATA_DIR`), wires the external collaborators, sets up the
/// terminal interface, and runs the main event loop until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup fails or if there are issues
/// with the terminal interface during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url =
        std::env::var("TERMGRAM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let data_dir = std::env::var("TERMGRAM_DATA_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| {
            std::env::var_os("HOME")
                .map(std::path::PathBuf::from)
                .unwrap_or_else(|| std::path::PathBuf::from("."))
                .join(".termgram")
        });

    let services = Services {
        auth: Box::new(ApiClient::new(base_url.clone())),
        content: Box::new(ApiClient::new(base_url)),
        tokens: Box::new(FileTokenStore::new(data_dir)),
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::default();
    let res = run_app(&mut terminal, &mut app, &services);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Handles terminal rendering and keyboard input processing.
/// Continues running until the user presses 'q' outside a text field.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    services: &Services,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    KeyCode::Char('q') if !app.is_typing() && app.alerts.is_empty() => {
                        return Ok(())
                    }
                    _ => InputHandler::handle_key_event(app, services, key.code, key.modifiers),
                }
            }
        }
    }
}
