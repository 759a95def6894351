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

//! Application event distribution.
//!
//! Every input to the application arrives as an [`AppEvent`] on one channel:
//! terminal input from the input thread, media notices from the media worker
//! and animation frames from the frame scheduler. [`process_events`] applies
//! each one to the active view and redraws.

use std::io::Stdout;

use anyhow::{Result, anyhow};
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::{error, info};

use crate::{
    App,
    actions::commands::{KeyCommand, command_for_key},
    animation::FrameHandle,
    player::MediaNotice,
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),

    Media(MediaNotice),
    AnimationFrame(FrameHandle),

    ExitApplication,
    FatalError(String),
}

/// Runs the main loop until the user quits or the event channel closes.
///
/// # Errors
///
/// Returns an error if drawing fails or a worker reports a fatal failure.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    terminal.draw(|f| app.view.draw(f))?;

    while let Ok(event) = app.event_rx.recv() {
        match event {
            AppEvent::Key(key) => match command_for_key(key) {
                Some(KeyCommand::Quit) => app.event_tx.send(AppEvent::ExitApplication)?,
                Some(KeyCommand::View(command)) => app.view.act(command),
                None => {}
            },
            AppEvent::Mouse(mouse) => process_mouse_event(app, mouse),
            AppEvent::Resize(columns, rows) => app.view.resize(columns, rows),
            AppEvent::Media(notice) => app.view.handle_media(notice),
            AppEvent::AnimationFrame(handle) => app.view.handle_frame(handle),
            AppEvent::ExitApplication => {
                info!("exit requested");
                break;
            }
            AppEvent::FatalError(message) => {
                error!(%message, "fatal error");
                return Err(anyhow!(message));
            }
        }

        terminal.draw(|f| app.view.draw(f))?;
    }

    Ok(())
}

fn process_mouse_event(app: &mut App, mouse: MouseEvent) {
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        if let Some(command) = app.view.hit_test(mouse.column, mouse.row) {
            app.view.act(command);
        }
    }
}
