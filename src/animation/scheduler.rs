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

//! Frame scheduling for the terminal.
//!
//! A small worker thread stands in for the display's frame clock. Each
//! request is answered with one [`AppEvent::AnimationFrame`] after the frame
//! interval, unless it is cancelled first. Dropping the scheduler shuts the
//! worker down.

use std::{
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, warn};

use crate::{
    actions::AppEvent,
    animation::{FrameHandle, FrameScheduler},
};

#[derive(Debug)]
enum FrameRequest {
    Schedule(FrameHandle),
    Cancel(FrameHandle),
}

pub(crate) struct TerminalFrameScheduler {
    request_tx: Sender<FrameRequest>,
}

impl TerminalFrameScheduler {
    pub(crate) fn new(event_tx: Sender<AppEvent>, interval: Duration) -> Self {
        let (request_tx, request_rx) = mpsc::channel();

        thread::spawn(move || frame_worker(request_rx, event_tx, interval));

        Self { request_tx }
    }

    fn send(&self, request: FrameRequest) {
        if let Err(e) = self.request_tx.send(request) {
            warn!("frame worker has stopped: {:?}", e.0);
        }
    }
}

impl FrameScheduler for TerminalFrameScheduler {
    fn request_frame(&mut self, handle: FrameHandle) {
        self.send(FrameRequest::Schedule(handle));
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.send(FrameRequest::Cancel(handle));
    }
}

fn frame_worker(request_rx: Receiver<FrameRequest>, event_tx: Sender<AppEvent>, interval: Duration) {
    let mut pending: Option<(FrameHandle, Instant)> = None;

    loop {
        let request = match pending {
            Some((_, due)) => request_rx.recv_timeout(due.saturating_duration_since(Instant::now())),
            None => request_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match request {
            Ok(FrameRequest::Schedule(handle)) => {
                pending = Some((handle, Instant::now() + interval));
            }
            Ok(FrameRequest::Cancel(handle)) => {
                if pending.is_some_and(|(pending_handle, _)| pending_handle == handle) {
                    pending = None;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if let Some((handle, _)) = pending.take() {
                    if event_tx.send(AppEvent::AnimationFrame(handle)).is_err() {
                        break;
                    }
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!("frame worker stopped");
}
