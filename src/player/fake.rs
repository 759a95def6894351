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

//! In-memory media element for exercising controllers without MPV.

use crate::{
    error::MediaError,
    player::{MediaElement, MediaEvent, MediaNotice, PlayTicket, SourceId},
};

#[derive(Debug, Default)]
pub(crate) struct FakeMedia {
    pub(crate) loaded: Vec<String>,
    pub(crate) source: u64,
    pub(crate) tickets: u64,
    pub(crate) paused: bool,
    pub(crate) pause_calls: usize,
    pub(crate) position: f64,
    pub(crate) duration: Option<f64>,
    pub(crate) looping: bool,
    pub(crate) reject_play: bool,
    pub(crate) reject_load: bool,
}

impl FakeMedia {
    pub(crate) fn notice(&self, event: MediaEvent) -> MediaNotice {
        MediaNotice {
            source: SourceId(self.source),
            event,
        }
    }

    pub(crate) fn last_ticket(&self) -> PlayTicket {
        PlayTicket(self.tickets)
    }

    /// The notice a successful start of the latest play attempt produces.
    pub(crate) fn started(&mut self) -> MediaNotice {
        self.paused = false;
        self.notice(MediaEvent::PlaySettled(self.last_ticket(), Ok(())))
    }

    pub(crate) fn rejected(&self, reason: &str) -> MediaNotice {
        self.notice(MediaEvent::PlaySettled(
            self.last_ticket(),
            Err(reason.to_string()),
        ))
    }
}

impl MediaElement for FakeMedia {
    fn load(&mut self, url: &str) -> Result<SourceId, MediaError> {
        if self.reject_load {
            return Err(MediaError::Unopenable(url.to_string()));
        }
        self.source += 1;
        self.loaded.push(url.to_string());
        self.position = 0.0;
        self.duration = None;
        self.paused = true;
        Ok(SourceId(self.source))
    }

    fn play(&mut self) -> Result<PlayTicket, MediaError> {
        if self.reject_play {
            return Err(MediaError::Disconnected);
        }
        self.tickets += 1;
        Ok(PlayTicket(self.tickets))
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        self.paused = true;
        self.pause_calls += 1;
        Ok(())
    }

    fn set_current_time(&mut self, seconds: f64) -> Result<(), MediaError> {
        self.position = seconds;
        Ok(())
    }

    fn set_looping(&mut self, looping: bool) -> Result<(), MediaError> {
        self.looping = looping;
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }
}
