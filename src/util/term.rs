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

//! Terminal emulator background colour control.
//!
//! Each view paints the whole terminal in its theme's base colour using the
//! OSC 11 sequence, and the original colour is restored with OSC 111 on exit.
//! Terminals that do not understand these sequences ignore them.

use std::io::{self, Write};

/// Sets the terminal background to `hex_colour` (e.g. `"#002800"`).
pub(crate) fn set_terminal_bg(hex_colour: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "\x1b]11;{}\x07", hex_colour)?;
    stdout.flush()
}

/// Reverts the terminal background to the user's configured colour.
pub(crate) fn reset_terminal_bg() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "\x1b]111\x07")?;
    stdout.flush()
}
