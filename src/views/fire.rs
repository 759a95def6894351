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

//! Fire: a looping playlist with previous / play / next controls.
//!
//! Tracks advance on their own when they finish, wrapping from the last back
//! to the first, so playback never reaches a terminal state. The bottom strip
//! shows progress and seeks to wherever it is clicked.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    widgets::Block,
};

use crate::{
    actions::ViewCommand,
    player::{MediaElement, MediaNotice},
    render::{
        icons::{ICON_NEXT, ICON_PAUSE, ICON_PLAY, ICON_PREV},
        player::{centered, draw_button, draw_error, draw_progress_strip, draw_track_line, fraction_at},
    },
    theme::Theme,
    transport::TransportController,
    views::View,
};

const CONTROLS_WIDTH: u16 = 34;
const TRACK_LINE_WIDTH: u16 = 40;
const SEEK_STRIP_HEIGHT: u16 = 4;

struct FireLayout {
    previous: Rect,
    toggle: Rect,
    next: Rect,
    track: Rect,
    error: Rect,
    seek: Rect,
}

impl FireLayout {
    fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(SEEK_STRIP_HEIGHT),
            ])
            .split(area);

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(10),
                Constraint::Length(2),
                Constraint::Length(10),
                Constraint::Length(2),
                Constraint::Length(10),
            ])
            .split(centered(rows[1], CONTROLS_WIDTH));

        Self {
            previous: buttons[0],
            toggle: buttons[2],
            next: buttons[4],
            track: centered(rows[2], TRACK_LINE_WIDTH),
            error: rows[3],
            seek: rows[5],
        }
    }
}

pub(crate) struct FireView<M: MediaElement> {
    transport: TransportController<M>,
    theme: Theme,
    area: Rect,
}

impl<M: MediaElement> FireView<M> {
    pub(crate) fn new(transport: TransportController<M>) -> Self {
        Self {
            transport,
            theme: Theme::fire(),
            area: Rect::default(),
        }
    }
}

impl<M: MediaElement> View for FireView<M> {
    fn mount(&mut self, columns: u16, rows: u16) {
        self.resize(columns, rows);
        self.transport.mount();
    }

    fn unmount(&mut self) {
        self.transport.unmount();
    }

    fn act(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::Toggle => self.transport.toggle(),
            ViewCommand::Next => self.transport.next(),
            ViewCommand::Previous => self.transport.previous(),
            ViewCommand::SeekToFraction(fraction) => {
                self.transport.seek_to_fraction(fraction);
            }
        }
    }

    fn handle_media(&mut self, notice: MediaNotice) {
        self.transport.handle_media(notice);
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        self.area = Rect::new(0, 0, columns, rows);
    }

    fn hit_test(&self, column: u16, row: u16) -> Option<ViewCommand> {
        let layout = FireLayout::new(self.area);
        let position = Position::new(column, row);

        if layout.previous.contains(position) {
            Some(ViewCommand::Previous)
        } else if layout.toggle.contains(position) {
            Some(ViewCommand::Toggle)
        } else if layout.next.contains(position) {
            Some(ViewCommand::Next)
        } else if layout.seek.contains(position) {
            Some(ViewCommand::SeekToFraction(fraction_at(layout.seek, column)))
        } else {
            None
        }
    }

    fn theme(&self) -> &Theme {
        &self.theme
    }

    fn draw(&mut self, f: &mut Frame) {
        self.area = f.area();
        let layout = FireLayout::new(self.area);
        let state = self.transport.snapshot();

        f.render_widget(
            Block::default().style(Style::default().bg(self.theme.background_colour)),
            self.area,
        );

        let toggle_icon = if state.is_playing { ICON_PAUSE } else { ICON_PLAY };
        draw_button(f, layout.previous, ICON_PREV, &self.theme);
        draw_button(f, layout.toggle, toggle_icon, &self.theme);
        draw_button(f, layout.next, ICON_NEXT, &self.theme);

        draw_track_line(
            f,
            layout.track,
            &self.transport.current_track().title,
            state.remaining_seconds,
            &self.theme,
        );

        if let Some(message) = self.transport.error_message() {
            draw_error(f, layout.error, message, &self.theme);
        }

        draw_progress_strip(f, layout.seek, state.progress_fraction, &self.theme);
    }
}
