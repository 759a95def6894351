// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Smolder.
//!
//! A terminal music player with two themed views: a looping "Fire" playlist
//! and a single "Green Poison" track played over falling glyph rain.
//!
//! The application is event driven:
//!
//! * The **Main Thread** owns the terminal and the active view, applying
//!   every event to the view and redrawing.
//! * The **Media Worker** drives MPV and reports playback back as events.
//! * The **Frame Scheduler** paces the rain animation while music plays.
//! * The **Input Thread** forwards key, mouse and resize events.
//!
//! ## Architecture
//!
//! Everything reaches the main thread over one `std::sync::mpsc` channel. The
//! terminal is set up before the loop and always restored after it, even when
//! the loop fails.

mod actions;
mod animation;
mod config;
mod error;
mod model;
mod player;
mod render;
mod theme;
mod transport;
mod util;
mod views;

use std::{
    fs::{self, OpenOptions},
    io,
    str::FromStr,
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use anyhow::{Context, Result, anyhow};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::{
    actions::{AppEvent, process_events},
    config::{AppConfig, ViewKind},
    theme::Theme,
    views::{View, build_view},
};

const APP_NAME: &str = "smolder";

/// Application state.
struct App {
    pub view: Box<dyn View>,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,
}

impl App {
    /// Create a new instance of application state showing the `kind` view.
    pub fn new(config: &AppConfig, kind: ViewKind) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();

        let view = build_view(kind, config, event_tx.clone())?;

        Ok(Self {
            view,
            event_tx,
            event_rx,
        })
    }
}

/// The entry point of the application.
///
/// Loads and validates the configuration, builds the requested view, then
/// runs it inside a managed terminal session.
fn main() -> Result<()> {
    init_logging()?;

    let config = config::load_config();
    config.validate().context("Invalid configuration")?;

    let kind = match std::env::args().nth(1) {
        Some(arg) => ViewKind::from_str(&arg).map_err(|e| anyhow!(e))?,
        None => config.default_view,
    };
    info!(?kind, "starting");

    let mut app = App::new(&config, kind).context("Failed to initalise application")?;

    let mut terminal = setup_terminal(app.view.theme())?;
    let res = run(&mut terminal, &mut app);
    app.view.unmount();
    restore_terminal(&mut terminal);

    res.context("Application error occurred")
}

/// Sends tracing output to `smolder.log` in the user's data directory.
///
/// The level comes from `RUST_LOG` and defaults to `info`.
fn init_logging() -> Result<()> {
    let log_dir = dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME);
    fs::create_dir_all(&log_dir)?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(format!("{APP_NAME}.log")))?;

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    Ok(())
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the view's theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer and captures the
///   mouse.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(theme: &Theme) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin black outline
    if let Err(e) = util::term::set_terminal_bg(&Theme::to_hex(theme.background_colour)) {
        warn!("failed to set terminal background: {}", e);
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`]. It is best-effort
/// and does not return a result, as it runs during cleanup.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg().ok();
    terminal.show_cursor().ok();
}

/// Mounts the view and enters the main event loop.
///
/// An input thread translates terminal events to application events. The
/// media worker and frame scheduler were already started with the view.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tx_input = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            let event = match event::read() {
                Ok(Event::Key(key)) => AppEvent::Key(key),
                Ok(Event::Mouse(mouse)) => AppEvent::Mouse(mouse),
                Ok(Event::Resize(columns, rows)) => AppEvent::Resize(columns, rows),
                Ok(_) => continue,
                Err(e) => {
                    tx_input
                        .send(AppEvent::FatalError(format!("terminal input failed: {e}")))
                        .ok();
                    break;
                }
            };
            if tx_input.send(event).is_err() {
                break;
            }
        }
    });

    let size = terminal.size()?;
    app.view.mount(size.width, size.height);

    // Application event loop, process events until the user quits
    process_events(terminal, app)
}
