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

//! Colour palettes for the two views.
//!
//! Each view has one fixed palette. Colours are kept as RGB so they can also
//! be sent to the terminal emulator as hex strings.

use ratatui::style::Color;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Theme {
    pub(crate) background_colour: Color,
    pub(crate) accent_colour: Color,
    pub(crate) border_colour: Color,
    pub(crate) text_colour: Color,
    pub(crate) button_colour: Color,
    pub(crate) gauge_track_colour: Color,
    pub(crate) error_colour: Color,

    // Rain animation: the trail fill and the falling glyphs.
    pub(crate) canvas_base_colour: Color,
    pub(crate) glyph_colour: Color,
}

impl Theme {
    pub(crate) const fn fire() -> Self {
        Self {
            background_colour: Color::Rgb(0, 0, 0),
            accent_colour: Color::Rgb(251, 146, 60),
            border_colour: Color::Rgb(249, 115, 22),
            text_colour: Color::Rgb(255, 237, 213),
            button_colour: Color::Rgb(194, 65, 12),
            gauge_track_colour: Color::Rgb(154, 52, 18),
            error_colour: Color::Rgb(239, 68, 68),

            canvas_base_colour: Color::Rgb(0, 0, 0),
            glyph_colour: Color::Rgb(251, 146, 60),
        }
    }

    pub(crate) const fn green_poison() -> Self {
        Self {
            background_colour: Color::Rgb(0, 40, 0),
            accent_colour: Color::Rgb(74, 222, 128),
            border_colour: Color::Rgb(34, 197, 94),
            text_colour: Color::Rgb(220, 252, 231),
            button_colour: Color::Rgb(21, 128, 61),
            gauge_track_colour: Color::Rgb(22, 101, 52),
            error_colour: Color::Rgb(239, 68, 68),

            canvas_base_colour: Color::Rgb(0, 40, 0),
            glyph_colour: Color::Rgb(34, 197, 94),
        }
    }

    /// Converts a colour into a CSS-style hexadecimal string.
    ///
    /// Palette colours are always RGB; any other variant reads as black.
    pub(crate) fn to_hex(colour: Color) -> String {
        let (r, g, b) = rgb(colour);
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

pub(crate) fn rgb(colour: Color) -> (u8, u8, u8) {
    match colour {
        Color::Rgb(r, g, b) => (r, g, b),
        _ => (0, 0, 0),
    }
}
