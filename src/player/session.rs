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

//! Source bookkeeping for the MPV worker.
//!
//! MPV processes `loadfile` asynchronously, so events for the file being
//! replaced can still arrive after a new load was issued. [`MediaSession`]
//! keeps the loads MPV has not started yet in a queue and only moves on to a
//! new source when MPV reports `StartFile`. Events arriving while a load is
//! queued belong to the old file and are dropped, and every other event is
//! tagged with the file MPV is actually playing.
//!
//! The session also decides when play requests settle: immediately once the
//! file is loaded, deferred while it is loading, and with an error when there
//! is nothing to play or the file fails.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::{
    error::MediaError,
    player::{MediaClock, MediaEvent, MediaNotice, PlayTicket, SourceId},
};

/// MPV events the worker cares about, detached from the handler's borrow.
#[derive(Clone, Debug, PartialEq)]
pub(super) enum Observed {
    Started,
    Duration(f64),
    Position(f64),
    Loaded,
    Finished,
    Failed(String),
}

/// Work the session hands back to the worker.
#[derive(Clone, Debug, PartialEq)]
pub(super) enum SessionAction {
    Notify(MediaNotice),
    /// Unpause MPV and settle `ticket` with the outcome.
    Start { source: SourceId, ticket: PlayTicket },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum SourceStatus {
    Empty,
    Loading,
    Loaded,
}

#[derive(Debug)]
pub(super) struct MediaSession {
    requested: Option<SourceId>,
    pending: VecDeque<SourceId>,
    playing: Option<SourceId>,
    status: SourceStatus,
    parked: Vec<PlayTicket>,
    clock: MediaClock,
}

impl MediaSession {
    pub(super) fn new() -> Self {
        Self {
            requested: None,
            pending: VecDeque::new(),
            playing: None,
            status: SourceStatus::Empty,
            parked: Vec::new(),
            clock: MediaClock::default(),
        }
    }

    pub(super) fn clock(&self) -> MediaClock {
        self.clock
    }

    /// Records a `loadfile` sent to MPV for `source`.
    pub(super) fn load(&mut self, source: SourceId) {
        self.requested = Some(source);
        self.pending.push_back(source);
        self.status = SourceStatus::Loading;
        self.parked.clear();
        self.clock = MediaClock::default();
    }

    /// MPV refused the `loadfile` for `source`, so it will never start.
    pub(super) fn load_rejected(&mut self, source: SourceId, reason: String) -> Vec<SessionAction> {
        self.pending.retain(|queued| *queued != source);
        if self.requested == Some(source) {
            self.status = SourceStatus::Empty;
        }
        vec![notify(source, MediaEvent::Error(reason))]
    }

    pub(super) fn play(&mut self, ticket: PlayTicket) -> Vec<SessionAction> {
        let source = self.requested.unwrap_or(SourceId(0));
        match self.status {
            SourceStatus::Loaded => vec![SessionAction::Start { source, ticket }],
            SourceStatus::Loading => {
                self.parked.push(ticket);
                Vec::new()
            }
            SourceStatus::Empty => vec![notify(
                source,
                MediaEvent::PlaySettled(ticket, Err(MediaError::NoSource.to_string())),
            )],
        }
    }

    pub(super) fn pause(&mut self) {
        self.parked.clear();
    }

    pub(super) fn observe(&mut self, observed: Observed) -> Vec<SessionAction> {
        if observed == Observed::Started {
            // A restart of the same file has no queued load behind it.
            if let Some(source) = self.pending.pop_front() {
                debug!(?source, "mpv started file");
                self.playing = Some(source);
            }
            return Vec::new();
        }

        let Some(source) = self.playing else {
            trace!(?observed, "no file started yet");
            return Vec::new();
        };
        if !self.pending.is_empty() {
            trace!(?source, ?observed, "dropping event for replaced file");
            return Vec::new();
        }
        let current = self.requested == Some(source);

        match observed {
            Observed::Started => Vec::new(),
            Observed::Duration(duration) => {
                if current {
                    self.clock.duration = Some(duration);
                }
                vec![notify(source, MediaEvent::MetadataReady)]
            }
            Observed::Position(seconds) => {
                if current {
                    self.clock.elapsed = seconds;
                }
                vec![notify(source, MediaEvent::TimeAdvanced)]
            }
            Observed::Loaded if current => {
                self.status = SourceStatus::Loaded;
                std::mem::take(&mut self.parked)
                    .into_iter()
                    .map(|ticket| SessionAction::Start { source, ticket })
                    .collect()
            }
            Observed::Loaded => Vec::new(),
            Observed::Finished => vec![notify(source, MediaEvent::Ended)],
            Observed::Failed(reason) => {
                let mut actions = Vec::new();
                if current {
                    self.status = SourceStatus::Empty;
                    actions.extend(std::mem::take(&mut self.parked).into_iter().map(|ticket| {
                        notify(source, MediaEvent::PlaySettled(ticket, Err(reason.clone())))
                    }));
                }
                actions.push(notify(source, MediaEvent::Error(reason)));
                actions
            }
        }
    }
}

fn notify(source: SourceId, event: MediaEvent) -> SessionAction {
    SessionAction::Notify(MediaNotice { source, event })
}
