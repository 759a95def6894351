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

//! Green Poison: one looping track over falling glyph rain.
//!
//! The rain runs only while the track is playing. Every input that can change
//! the transport state re-syncs the animation loop afterwards, so a failed
//! play attempt stops the rain as soon as the failure is reported.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    widgets::Block,
};

use crate::{
    actions::ViewCommand,
    animation::{
        AnimationDriver, FrameHandle, FrameScheduler, Viewport,
        canvas::{CELL_HEIGHT_PX, CELL_WIDTH_PX, GlyphCanvas},
    },
    player::{MediaElement, MediaNotice},
    render::player::{centered, draw_button, draw_error, draw_progress_strip, draw_track_line, fraction_at},
    theme::Theme,
    transport::TransportController,
    views::View,
};

const PANEL_WIDTH: u16 = 40;
const BUTTON_WIDTH: u16 = 12;

struct GreenPoisonLayout {
    error: Rect,
    toggle: Rect,
    track: Rect,
    progress: Rect,
}

impl GreenPoisonLayout {
    fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            error: rows[1],
            toggle: centered(rows[2], BUTTON_WIDTH),
            track: centered(rows[3], PANEL_WIDTH),
            progress: rows[5],
        }
    }
}

pub(crate) struct GreenPoisonView<M: MediaElement, S: FrameScheduler> {
    transport: TransportController<M>,
    driver: AnimationDriver<S>,
    canvas: GlyphCanvas,
    pixel_ratio: f32,
    theme: Theme,
    area: Rect,
}

impl<M: MediaElement, S: FrameScheduler> GreenPoisonView<M, S> {
    pub(crate) fn new(
        transport: TransportController<M>,
        driver: AnimationDriver<S>,
        pixel_ratio: f32,
    ) -> Self {
        Self {
            transport,
            driver,
            canvas: GlyphCanvas::new(),
            pixel_ratio,
            theme: Theme::green_poison(),
            area: Rect::default(),
        }
    }

    fn sync_animation(&mut self) {
        self.driver.sync(self.transport.is_playing());
    }
}

impl<M: MediaElement, S: FrameScheduler> View for GreenPoisonView<M, S> {
    fn mount(&mut self, columns: u16, rows: u16) {
        self.transport.mount();
        self.resize(columns, rows);
    }

    fn unmount(&mut self) {
        self.driver.stop();
        self.transport.unmount();
    }

    fn act(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::Toggle => self.transport.toggle(),
            ViewCommand::SeekToFraction(fraction) => {
                self.transport.seek_to_fraction(fraction);
            }
            // Single track.
            ViewCommand::Next | ViewCommand::Previous => return,
        }
        self.sync_animation();
    }

    fn handle_media(&mut self, notice: MediaNotice) {
        self.transport.handle_media(notice);
        self.sync_animation();
    }

    fn handle_frame(&mut self, handle: FrameHandle) {
        self.driver.on_frame(handle, &mut self.canvas);
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        self.area = Rect::new(0, 0, columns, rows);
        self.canvas.set_grid(columns, rows);
        let viewport = Viewport {
            width: u32::from(columns) * CELL_WIDTH_PX,
            height: u32::from(rows) * CELL_HEIGHT_PX,
            pixel_ratio: self.pixel_ratio,
        };
        self.driver.resize(&mut self.canvas, viewport);
    }

    fn hit_test(&self, column: u16, row: u16) -> Option<ViewCommand> {
        let layout = GreenPoisonLayout::new(self.area);
        let position = Position::new(column, row);

        if layout.toggle.contains(position) {
            Some(ViewCommand::Toggle)
        } else if layout.progress.contains(position) {
            Some(ViewCommand::SeekToFraction(fraction_at(layout.progress, column)))
        } else {
            None
        }
    }

    fn theme(&self) -> &Theme {
        &self.theme
    }

    fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        if area != self.area {
            self.resize(area.width, area.height);
        }
        let layout = GreenPoisonLayout::new(area);
        let state = self.transport.snapshot();

        f.render_widget(
            Block::default().style(Style::default().bg(self.theme.background_colour)),
            area,
        );
        f.render_widget(&self.canvas, area);

        if let Some(message) = self.transport.error_message() {
            draw_error(f, layout.error, message, &self.theme);
        }

        let label = if state.is_playing { "PAUSE" } else { "PLAY" };
        draw_button(f, layout.toggle, label, &self.theme);

        draw_track_line(
            f,
            layout.track,
            &self.transport.current_track().title,
            state.remaining_seconds,
            &self.theme,
        );
        draw_progress_strip(f, layout.progress, state.progress_fraction, &self.theme);
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::{
        animation::{RainState, fake::FakeScheduler},
        config::RainConfig,
        model::{Playlist, Track},
        player::{MediaEvent, fake::FakeMedia},
        transport::EndBehaviour,
    };

    type TestView = GreenPoisonView<FakeMedia, FakeScheduler>;

    fn view() -> TestView {
        let theme = Theme::green_poison();
        let transport = TransportController::new(
            FakeMedia::default(),
            Playlist::single(Track::new("Green Poison", "file:///green-poison.mp3")),
            EndBehaviour::LoopTrack,
        );
        let rain =
            RainState::new(&RainConfig::default(), &theme, StdRng::seed_from_u64(3)).unwrap();
        let driver = AnimationDriver::new(rain, FakeScheduler::default());
        let mut view = GreenPoisonView::new(transport, driver, 1.0);
        view.mount(80, 24);
        view
    }

    fn screen(view: &mut TestView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| view.draw(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_mount_loops_and_sizes_rain() {
        let view = view();
        assert!(view.transport.media().looping);
        assert!(!view.driver.is_running());
        // 80 columns of 8 px is under the small-screen breakpoint.
        assert_eq!(view.driver.rain().column_count(), 640 / 14);
    }

    #[test]
    fn test_toggle_runs_animation_while_playing() {
        let mut view = view();
        view.act(ViewCommand::Toggle);
        assert!(view.transport.is_playing());
        assert!(view.driver.is_running());

        let notice = view.transport.media_mut().started();
        view.handle_media(notice);
        assert!(view.driver.is_running());

        view.act(ViewCommand::Toggle);
        assert!(!view.transport.is_playing());
        assert!(!view.driver.is_running());
    }

    #[test]
    fn test_failed_play_stops_animation() {
        let mut view = view();
        view.act(ViewCommand::Toggle);
        let notice = view.transport.media().rejected("autoplay blocked");
        view.handle_media(notice);

        assert!(!view.transport.is_playing());
        assert!(!view.driver.is_running());
        assert_eq!(
            view.transport.error_message(),
            Some("Playback failed. Please try again.")
        );
    }

    #[test]
    fn test_frames_draw_only_while_running() {
        let mut view = view();
        view.handle_frame(FrameHandle(1));
        assert!(view.driver_requests().is_empty());

        view.act(ViewCommand::Toggle);
        let handle = *view.driver_requests().last().unwrap();
        view.handle_frame(handle);
        assert_eq!(view.driver_requests().len(), 2);

        view.act(ViewCommand::Toggle);
        view.handle_frame(handle);
        assert_eq!(view.driver_requests().len(), 2);
    }

    #[test]
    fn test_unmount_cancels_frame_and_pauses() {
        let mut view = view();
        view.act(ViewCommand::Toggle);
        let handle = *view.driver_requests().last().unwrap();

        view.unmount();
        assert!(!view.driver.is_running());
        assert!(view.transport.media().paused);
        assert_eq!(view.transport.media().pause_calls, 1);

        view.handle_frame(handle);
        assert_eq!(view.driver_requests().len(), 1);
    }

    #[test]
    fn test_next_and_previous_are_ignored() {
        let mut view = view();
        view.act(ViewCommand::Next);
        view.act(ViewCommand::Previous);
        assert_eq!(view.transport.media().loaded.len(), 1);
        assert!(!view.transport.is_playing());
    }

    #[test]
    fn test_hit_test_toggle_and_progress() {
        let view = view();
        let layout = GreenPoisonLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(
            view.hit_test(layout.toggle.x + 1, layout.toggle.y + 1),
            Some(ViewCommand::Toggle)
        );
        assert_eq!(view.hit_test(20, 23), Some(ViewCommand::SeekToFraction(0.25)));
        assert_eq!(view.hit_test(0, 0), None);
    }

    #[test]
    fn test_draw_shows_label_and_track() {
        let mut view = view();
        assert!(screen(&mut view).contains("PLAY"));

        view.transport.media_mut().duration = Some(200.0);
        let notice = view.transport.media().notice(MediaEvent::MetadataReady);
        view.handle_media(notice);
        view.act(ViewCommand::Toggle);

        let screen = screen(&mut view);
        assert!(screen.contains("PAUSE"));
        assert!(screen.contains("Green Poison"));
        assert!(screen.contains("3:20"));
    }

    impl TestView {
        fn driver_requests(&self) -> &[FrameHandle] {
            self.driver.scheduler().requested.as_slice()
        }
    }
}
