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

//! MPV-backed media worker.
//!
//! The worker owns the `libmpv` handle and runs two interleaved loops: it
//! drains [`MediaCommand`]s sent by the [`MpvMedia`](super::MpvMedia) proxy,
//! then waits briefly for MPV events. What each command or event means for
//! the application is decided by the [`MediaSession`]; the worker only talks
//! to MPV and forwards the resulting [`MediaNotice`]s.

use std::sync::{
    Arc, Mutex,
    mpsc::{Receiver, Sender},
};
use std::thread;

use anyhow::{Context, Result};
use mpv::Format;
use tracing::{debug, info, warn};

use crate::{
    actions::AppEvent,
    player::{
        MediaClock, MediaEvent, MediaNotice, PlayTicket, SourceId,
        session::{MediaSession, Observed, SessionAction},
    },
};

#[derive(Debug)]
pub(crate) enum MediaCommand {
    Load { source: SourceId, url: String },
    Play(PlayTicket),
    Pause,
    Seek(f64),
    SetLooping(bool),
}

struct Worker {
    handler: mpv::MpvHandler,
    event_tx: Sender<AppEvent>,
    clock: Arc<Mutex<MediaClock>>,
    session: MediaSession,
}

/// Spawns the media worker thread.
///
/// If the worker fails to start or loses its event channel the error is
/// broadcast as a fatal application event.
pub(crate) fn spawn_media_worker(
    command_rx: Receiver<MediaCommand>,
    event_tx: Sender<AppEvent>,
    clock: Arc<Mutex<MediaClock>>,
) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = media_worker(command_rx, event_tx, clock) {
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
        }
    });
}

fn media_worker(
    command_rx: Receiver<MediaCommand>,
    event_tx: Sender<AppEvent>,
    clock: Arc<Mutex<MediaClock>>,
) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to set no video output")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;

    info!("media worker started");

    let mut worker = Worker {
        handler,
        event_tx,
        clock,
        session: MediaSession::new(),
    };

    loop {
        while let Ok(command) = command_rx.try_recv() {
            worker.process_command(command)?;
        }
        worker.process_mpv_events()?;
    }
}

impl Worker {
    fn process_command(&mut self, command: MediaCommand) -> Result<()> {
        match command {
            MediaCommand::Load { source, url } => {
                debug!(?source, %url, "loading source");
                self.session.load(source);

                if let Err(e) = self.handler.set_property("pause", true) {
                    warn!("failed to pause before load: {:?}", e);
                }
                if let Err(e) = self.handler.command(&["loadfile", &url, "replace"]) {
                    let actions = self.session.load_rejected(source, format!("{:?}", e));
                    self.apply(actions)?;
                }
            }
            MediaCommand::Play(ticket) => {
                let actions = self.session.play(ticket);
                self.apply(actions)?;
            }
            MediaCommand::Pause => {
                self.session.pause();
                if let Err(e) = self.handler.set_property("pause", true) {
                    warn!("failed to pause: {:?}", e);
                }
            }
            MediaCommand::Seek(seconds) => {
                let target = format!("{:.3}", seconds);
                if let Err(e) = self.handler.command(&["seek", &target, "absolute"]) {
                    warn!(seconds, "seek rejected: {:?}", e);
                }
            }
            MediaCommand::SetLooping(looping) => {
                let value = if looping { "inf" } else { "no" };
                if let Err(e) = self.handler.set_property("loop-file", value) {
                    warn!("failed to set loop-file: {:?}", e);
                }
            }
        }

        self.publish_clock();
        Ok(())
    }

    /// Waits up to 50ms for an MPV event and forwards what it means.
    fn process_mpv_events(&mut self) -> Result<()> {
        let observed = match self.handler.wait_event(0.05) {
            Some(mpv::Event::StartFile) => Some(Observed::Started),
            Some(mpv::Event::PropertyChange { name, change, .. }) => match (name, change) {
                ("duration", Format::Double(duration)) => Some(Observed::Duration(duration)),
                ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                    Some(Observed::Position(seconds))
                }
                _ => None,
            },
            Some(mpv::Event::FileLoaded) => Some(Observed::Loaded),
            Some(mpv::Event::EndFile(Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF))) => {
                Some(Observed::Finished)
            }
            Some(mpv::Event::EndFile(Err(e))) => Some(Observed::Failed(format!("{:?}", e))),
            _ => None,
        };

        if let Some(observed) = observed {
            if let Observed::Failed(reason) = &observed {
                warn!(%reason, "source failed");
            }
            let actions = self.session.observe(observed);
            self.apply(actions)?;
            self.publish_clock();
        }

        Ok(())
    }

    fn apply(&mut self, actions: Vec<SessionAction>) -> Result<()> {
        for action in actions {
            match action {
                SessionAction::Notify(notice) => self.send(notice)?,
                SessionAction::Start { source, ticket } => {
                    let result = self
                        .handler
                        .set_property("pause", false)
                        .map_err(|e| format!("{:?}", e));
                    self.send(MediaNotice {
                        source,
                        event: MediaEvent::PlaySettled(ticket, result),
                    })?;
                }
            }
        }
        Ok(())
    }

    fn send(&self, notice: MediaNotice) -> Result<()> {
        self.event_tx
            .send(AppEvent::Media(notice))
            .context("Failed to send media event")
    }

    fn publish_clock(&self) {
        if let Ok(mut clock) = self.clock.lock() {
            *clock = self.session.clock();
        }
    }
}
