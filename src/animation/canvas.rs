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

//! Terminal-backed raster canvas.
//!
//! The canvas is addressed in device pixels but stores one glyph and colour
//! per terminal cell. Each cell covers `width / columns` by `height / rows`
//! pixels of the surface. Translucent fills blend every cell's colour toward
//! the fill colour, and a cell is blanked once it has faded into it.

use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::{animation::Canvas, theme::rgb};

/// Logical pixel size of one terminal cell.
pub(crate) const CELL_WIDTH_PX: u32 = 8;
pub(crate) const CELL_HEIGHT_PX: u32 = 16;

// Channel distance under which a faded glyph is dropped.
const FADED_OUT: u8 = 16;

#[derive(Clone, Copy, Debug, PartialEq)]
struct GlyphCell {
    glyph: char,
    colour: (u8, u8, u8),
}

const BLANK: GlyphCell = GlyphCell {
    glyph: ' ',
    colour: (0, 0, 0),
};

#[derive(Debug, Default)]
pub(crate) struct GlyphCanvas {
    width: u32,
    height: u32,
    columns: u16,
    rows: u16,
    cells: Vec<GlyphCell>,
}

impl GlyphCanvas {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sets the terminal grid the pixel surface is spread over. Takes effect
    /// on the next [`Canvas::resize`].
    pub(crate) fn set_grid(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
    }

    fn cell_size(&self) -> (u32, u32) {
        let w = self.width / u32::from(self.columns.max(1));
        let h = self.height / u32::from(self.rows.max(1));
        (w.max(1), h.max(1))
    }

    fn cell_index(&self, column: u32, row: u32) -> Option<usize> {
        if column < u32::from(self.columns) && row < u32::from(self.rows) {
            Some(row as usize * self.columns as usize + column as usize)
        } else {
            None
        }
    }

    #[cfg(test)]
    fn glyph_at(&self, column: u32, row: u32) -> Option<char> {
        self.cell_index(column, row)
            .map(|i| self.cells[i].glyph)
            .filter(|glyph| *glyph != ' ')
    }
}

impl Canvas for GlyphCanvas {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.cells = vec![BLANK; self.columns as usize * self.rows as usize];
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, colour: Color, alpha: f32) {
        let (cell_w, cell_h) = self.cell_size();
        let target = rgb(colour);
        let alpha = alpha.clamp(0.0, 1.0);

        let columns = x / cell_w..(x + width).div_ceil(cell_w);
        for row in y / cell_h..(y + height).div_ceil(cell_h) {
            for column in columns.clone() {
                let Some(i) = self.cell_index(column, row) else {
                    continue;
                };
                let cell = &mut self.cells[i];
                cell.colour = blend(cell.colour, target, alpha);
                if distance(cell.colour, target) < FADED_OUT {
                    *cell = BLANK;
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: u32, y: u32, colour: Color) {
        let (cell_w, cell_h) = self.cell_size();
        let row = y / cell_h;
        for (offset, glyph) in text.chars().enumerate() {
            if let Some(i) = self.cell_index(x / cell_w + offset as u32, row) {
                self.cells[i] = GlyphCell {
                    glyph,
                    colour: rgb(colour),
                };
            }
        }
    }
}

impl Widget for &GlyphCanvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let columns = self.columns.min(area.width);
        let rows = self.rows.min(area.height);
        for row in 0..rows {
            for column in 0..columns {
                let cell = self.cells[row as usize * self.columns as usize + column as usize];
                if cell.glyph == ' ' {
                    continue;
                }
                let (r, g, b) = cell.colour;
                if let Some(target) = buf.cell_mut((area.x + column, area.y + row)) {
                    target.set_char(cell.glyph).set_fg(Color::Rgb(r, g, b));
                }
            }
        }
    }
}

fn blend(from: (u8, u8, u8), to: (u8, u8, u8), alpha: f32) -> (u8, u8, u8) {
    let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * alpha).round() as u8;
    (mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

fn distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> u8 {
    a.0.abs_diff(b.0).max(a.1.abs_diff(b.1)).max(a.2.abs_diff(b.2))
}
