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

//! The two themed player views.
//!
//! * [`fire`]: a looping multi-track playlist with previous / next controls
//!   and a tall seek strip.
//! * [`green_poison`]: a single looping track over a falling glyph animation
//!   that only runs while the track plays.
//!
//! A view owns all of its state. Nothing is shared between views and only
//! one is alive per run.

pub(crate) mod fire;
pub(crate) mod green_poison;

use std::{sync::mpsc::Sender, time::Duration};

use rand::{SeedableRng, rngs::StdRng};
use ratatui::Frame;

use crate::{
    actions::{AppEvent, ViewCommand},
    animation::{AnimationDriver, FrameHandle, RainState, scheduler::TerminalFrameScheduler},
    config::{AppConfig, ViewKind},
    error::ConfigError,
    model::Playlist,
    player::{MediaNotice, MpvMedia},
    theme::Theme,
    transport::{EndBehaviour, TransportController},
    views::{fire::FireView, green_poison::GreenPoisonView},
};

pub(crate) trait View {
    /// Loads the view's media and sizes it to a terminal of the given size.
    fn mount(&mut self, columns: u16, rows: u16);

    /// Stops animation, detaches from media notices and pauses playback.
    fn unmount(&mut self);

    fn act(&mut self, command: ViewCommand);

    fn handle_media(&mut self, notice: MediaNotice);

    fn handle_frame(&mut self, _handle: FrameHandle) {}

    fn resize(&mut self, columns: u16, rows: u16);

    /// The command a left click at the given cell issues, if any.
    fn hit_test(&self, column: u16, row: u16) -> Option<ViewCommand>;

    fn theme(&self) -> &Theme;

    fn draw(&mut self, f: &mut Frame);
}

/// Builds the requested view on top of the MPV media worker.
pub(crate) fn build_view(
    kind: ViewKind,
    config: &AppConfig,
    event_tx: Sender<AppEvent>,
) -> Result<Box<dyn View>, ConfigError> {
    let view: Box<dyn View> = match kind {
        ViewKind::Fire => {
            let transport = TransportController::new(
                MpvMedia::new(event_tx),
                config.fire_playlist()?,
                EndBehaviour::AdvancePlaylist,
            );
            Box::new(FireView::new(transport))
        }
        ViewKind::GreenPoison => {
            let theme = Theme::green_poison();
            let transport = TransportController::new(
                MpvMedia::new(event_tx.clone()),
                Playlist::single(config.green_poison_track()),
                EndBehaviour::LoopTrack,
            );
            let rain = RainState::new(&config.rain, &theme, StdRng::seed_from_u64(rand::random()))?;
            let scheduler = TerminalFrameScheduler::new(
                event_tx,
                Duration::from_millis(config.frame_interval_ms.max(1)),
            );
            let driver = AnimationDriver::new(rain, scheduler);
            Box::new(GreenPoisonView::new(transport, driver, config.pixel_ratio))
        }
    };

    Ok(view)
}
