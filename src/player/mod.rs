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

//! Media element capability and its MPV-backed implementation.
//!
//! The transport controller only ever talks to a [`MediaElement`]. Anything
//! that can load a source, start and pause playback asynchronously, seek,
//! loop, and report its clock can host it. [`MpvMedia`] is the implementation
//! used by the terminal application: a thin command proxy in front of a
//! worker thread that owns the `libmpv` handle (see [`commands`]).
//!
//! Notifications flow back as [`MediaNotice`]s on the application event
//! channel, each tagged with the [`SourceId`] of the load that produced it so
//! listeners can drop notices belonging to a source they no longer follow.

mod commands;
#[cfg(test)]
pub(crate) mod fake;
mod session;

use std::sync::{
    Arc, Mutex,
    mpsc::{self, Sender},
};

use crate::{actions::AppEvent, error::MediaError, player::commands::MediaCommand};

/// Identity of one `load` call on a media element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SourceId(pub(crate) u64);

/// Identity of one asynchronous `play` attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PlayTicket(pub(crate) u64);

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum MediaEvent {
    /// The playback position moved.
    TimeAdvanced,
    /// The duration of the current source became known.
    MetadataReady,
    /// The current source played to its end.
    Ended,
    /// The source could not be fetched or decoded. The reason is opaque.
    Error(String),
    /// A play attempt resolved.
    PlaySettled(PlayTicket, Result<(), String>),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MediaNotice {
    pub(crate) source: SourceId,
    pub(crate) event: MediaEvent,
}

/// The capability set a playback primitive must offer.
///
/// `play` only starts an attempt; its outcome is reported later through a
/// [`MediaEvent::PlaySettled`] notice carrying the returned ticket.
pub(crate) trait MediaElement {
    fn load(&mut self, url: &str) -> Result<SourceId, MediaError>;
    fn play(&mut self) -> Result<PlayTicket, MediaError>;
    fn pause(&mut self) -> Result<(), MediaError>;
    fn set_current_time(&mut self, seconds: f64) -> Result<(), MediaError>;
    fn set_looping(&mut self, looping: bool) -> Result<(), MediaError>;

    /// Elapsed playback time of the current source, in seconds.
    fn current_time(&self) -> f64;

    /// Total length of the current source, once its metadata has loaded.
    fn duration(&self) -> Option<f64>;
}

/// Live clock shared between the worker thread and the proxy.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct MediaClock {
    pub(crate) elapsed: f64,
    pub(crate) duration: Option<f64>,
}

/// A handle to the MPV playback worker.
///
/// This struct does no audio work itself, it forwards commands to the worker
/// thread and reads the clock the worker keeps up to date.
pub(crate) struct MpvMedia {
    command_tx: Sender<MediaCommand>,
    clock: Arc<Mutex<MediaClock>>,
    next_source: u64,
    next_ticket: u64,
}

impl MpvMedia {
    /// Spawns the worker thread and returns a handle to it.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - Channel receiving [`AppEvent::Media`] notices and a
    ///   fatal error should the worker die.
    pub(crate) fn new(event_tx: Sender<AppEvent>) -> Self {
        let (command_tx, command_rx) = mpsc::channel::<MediaCommand>();
        let clock = Arc::new(Mutex::new(MediaClock::default()));

        commands::spawn_media_worker(command_rx, event_tx, Arc::clone(&clock));

        Self {
            command_tx,
            clock,
            next_source: 0,
            next_ticket: 0,
        }
    }

    fn send(&self, command: MediaCommand) -> Result<(), MediaError> {
        self.command_tx
            .send(command)
            .map_err(|_| MediaError::Disconnected)
    }

    fn read_clock(&self) -> MediaClock {
        self.clock.lock().map(|clock| *clock).unwrap_or_default()
    }
}

impl MediaElement for MpvMedia {
    fn load(&mut self, url: &str) -> Result<SourceId, MediaError> {
        if url.trim().is_empty() {
            return Err(MediaError::Unopenable(url.to_string()));
        }
        self.next_source += 1;
        let source = SourceId(self.next_source);
        self.send(MediaCommand::Load {
            source,
            url: url.to_string(),
        })?;
        Ok(source)
    }

    fn play(&mut self) -> Result<PlayTicket, MediaError> {
        self.next_ticket += 1;
        let ticket = PlayTicket(self.next_ticket);
        self.send(MediaCommand::Play(ticket))?;
        Ok(ticket)
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        self.send(MediaCommand::Pause)
    }

    fn set_current_time(&mut self, seconds: f64) -> Result<(), MediaError> {
        self.send(MediaCommand::Seek(seconds))
    }

    fn set_looping(&mut self, looping: bool) -> Result<(), MediaError> {
        self.send(MediaCommand::SetLooping(looping))
    }

    fn current_time(&self) -> f64 {
        self.read_clock().elapsed
    }

    fn duration(&self) -> Option<f64> {
        self.read_clock().duration
    }
}
