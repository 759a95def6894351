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

//! Transport widgets: buttons, track line, progress strip and error line.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::{theme::Theme, util::format::format_time};

/// Returns a rectangle at most `width` wide, centred horizontally in `area`.
pub(crate) fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// Fraction of `strip`'s width at terminal column `column`.
pub(crate) fn fraction_at(strip: Rect, column: u16) -> f64 {
    if strip.width == 0 {
        return 0.0;
    }
    let offset = column.saturating_sub(strip.x).min(strip.width);
    f64::from(offset) / f64::from(strip.width)
}

/// Draws a bordered button with a centred label.
pub(crate) fn draw_button(f: &mut Frame, area: Rect, label: &str, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
        .style(Style::default().bg(theme.button_colour));

    let button = Paragraph::new(Span::styled(
        label,
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .fg(theme.text_colour)
    .alignment(Alignment::Center)
    .block(block);

    f.render_widget(button, area);
}

/// Draws the track title on the left and the remaining time on the right.
pub(crate) fn draw_track_line(f: &mut Frame, area: Rect, title: &str, remaining: f64, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(8)])
        .split(area);

    let title = Paragraph::new(Line::from(title)).fg(theme.text_colour);
    f.render_widget(title, chunks[0]);

    let time = Paragraph::new(Line::from(format_time(remaining)))
        .fg(theme.text_colour)
        .alignment(Alignment::Right);
    f.render_widget(time, chunks[1]);
}

/// Draws the progress strip, filled to `fraction`.
pub(crate) fn draw_progress_strip(f: &mut Frame, area: Rect, fraction: f64, theme: &Theme) {
    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.accent_colour)
                .bg(theme.gauge_track_colour),
        )
        .ratio(fraction.clamp(0.0, 1.0))
        .label("")
        .use_unicode(true);

    f.render_widget(gauge, area);
}

pub(crate) fn draw_error(f: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let error = Paragraph::new(Line::from(message))
        .fg(theme.error_colour)
        .alignment(Alignment::Center);
    f.render_widget(error, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered() {
        let area = Rect::new(0, 10, 100, 3);
        assert_eq!(centered(area, 40), Rect::new(30, 10, 40, 3));
        assert_eq!(centered(area, 200), area);
    }

    #[test]
    fn test_fraction_at() {
        let strip = Rect::new(10, 20, 40, 4);
        assert_eq!(fraction_at(strip, 10), 0.0);
        assert_eq!(fraction_at(strip, 20), 0.25);
        assert_eq!(fraction_at(strip, 50), 1.0);
        assert_eq!(fraction_at(strip, 5), 0.0);
        assert_eq!(fraction_at(Rect::new(0, 0, 0, 1), 3), 0.0);
    }
}
