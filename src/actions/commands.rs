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

//! User intents and the keys that produce them.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A transport intent addressed to the active view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ViewCommand {
    Toggle,
    Next,
    Previous,
    SeekToFraction(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum KeyCommand {
    Quit,
    View(ViewCommand),
}

/// Maps a key press to a command.
///
/// * `space` - play / pause
/// * `n`, `p` - next / previous track
/// * `0`-`9` - seek to that tenth of the track
/// * `q`, `Esc`, `Ctrl+C` - quit
pub(crate) fn command_for_key(key: KeyEvent) -> Option<KeyCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let command = match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyCommand::Quit,
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => KeyCommand::Quit,
        (KeyCode::Char(' '), _) => KeyCommand::View(ViewCommand::Toggle),
        (KeyCode::Char('n'), _) => KeyCommand::View(ViewCommand::Next),
        (KeyCode::Char('p'), _) => KeyCommand::View(ViewCommand::Previous),
        (KeyCode::Char(digit @ '0'..='9'), _) => {
            let tenths = f64::from(digit as u8 - b'0');
            KeyCommand::View(ViewCommand::SeekToFraction(tenths / 10.0))
        }
        _ => return None,
    };

    Some(command)
}
