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

//! Transport control for a playlist bound to one media element.
//!
//! [`TransportController`] turns user intents (toggle, next, previous, seek)
//! into media element commands and keeps a [`PlaybackState`] projection of
//! the element's clock. It is the only writer to its element.
//!
//! # State machine
//!
//! ```text
//! Paused  --toggle-->         Loading --settled ok-->  Playing
//! Playing --toggle-->         Paused
//! Loading --toggle-->         Paused   (late result discarded)
//! any     --next/previous-->  Loading
//! Loading --failure-->        Errored  (message kept until the next attempt)
//! Errored --toggle-->         Loading
//! ```
//!
//! Media notices are only accepted while the controller is mounted and only
//! for the source it currently subscribes to. Anything else, including play
//! results that arrive after the attempt was abandoned, is dropped.

pub(crate) mod progress;

use tracing::{debug, info, warn};

use crate::{
    error::PlaybackError,
    model::{Playlist, Track},
    player::{MediaElement, MediaEvent, MediaNotice, PlayTicket, SourceId},
    transport::progress::{PlaybackProgress, known_duration},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransportState {
    Paused,
    Loading,
    Playing,
    Errored,
}

/// What happens when the current track reaches its end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EndBehaviour {
    /// The element repeats the track by itself.
    LoopTrack,
    /// Move to the next playlist entry and keep playing.
    AdvancePlaylist,
}

/// Read-only view of transport state for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PlaybackState {
    pub(crate) is_playing: bool,
    pub(crate) progress_fraction: f64,
    pub(crate) remaining_seconds: f64,
}

// Notices are accepted for this source only. Acquired on every load,
// released on the next load or on unmount.
#[derive(Debug)]
struct Subscription {
    source: SourceId,
}

pub(crate) struct TransportController<M: MediaElement> {
    media: M,
    playlist: Playlist,
    end_behaviour: EndBehaviour,
    state: TransportState,
    progress: PlaybackProgress,
    error: Option<PlaybackError>,
    subscription: Option<Subscription>,
    pending_play: Option<PlayTicket>,
    mounted: bool,
}

impl<M: MediaElement> TransportController<M> {
    pub(crate) fn new(media: M, playlist: Playlist, end_behaviour: EndBehaviour) -> Self {
        Self {
            media,
            playlist,
            end_behaviour,
            state: TransportState::Paused,
            progress: PlaybackProgress::default(),
            error: None,
            subscription: None,
            pending_play: None,
            mounted: false,
        }
    }

    /// Loads the current track, paused, and starts listening to the element.
    pub(crate) fn mount(&mut self) {
        self.mounted = true;
        let looping = self.end_behaviour == EndBehaviour::LoopTrack;
        if let Err(e) = self.media.set_looping(looping) {
            warn!("failed to set looping: {}", e);
        }
        self.change_source();
    }

    /// Stops listening to the element and leaves it paused.
    pub(crate) fn unmount(&mut self) {
        self.mounted = false;
        self.release();
        self.state = TransportState::Paused;
        if let Err(e) = self.media.pause() {
            debug!("pause on unmount failed: {}", e);
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> TransportState {
        self.state
    }

    /// True while playback is running or on its way to running.
    pub(crate) fn is_playing(&self) -> bool {
        matches!(self.state, TransportState::Playing | TransportState::Loading)
    }

    pub(crate) fn snapshot(&self) -> PlaybackState {
        PlaybackState {
            is_playing: self.is_playing(),
            progress_fraction: self.progress.fraction,
            remaining_seconds: self.progress.remaining,
        }
    }

    pub(crate) fn error_message(&self) -> Option<&'static str> {
        let other_tracks = self.end_behaviour == EndBehaviour::AdvancePlaylist;
        self.error
            .as_ref()
            .and_then(|error| error.user_message(other_tracks))
    }

    pub(crate) fn current_track(&self) -> &Track {
        self.playlist.current()
    }

    #[cfg(test)]
    pub(crate) fn current_index(&self) -> usize {
        self.playlist.current_index()
    }

    pub(crate) fn toggle(&mut self) {
        if !self.mounted {
            return;
        }

        match self.state {
            TransportState::Playing | TransportState::Loading => self.pause(),
            TransportState::Paused | TransportState::Errored => self.begin_play(),
        }
    }

    pub(crate) fn next(&mut self) {
        if !self.mounted {
            return;
        }

        let track = self.playlist.next();
        info!(title = %track.title, "next track");
        self.switch_track();
    }

    pub(crate) fn previous(&mut self) {
        if !self.mounted {
            return;
        }

        let track = self.playlist.previous();
        info!(title = %track.title, "previous track");
        self.switch_track();
    }

    /// Moves the playback position to `fraction` of the track.
    ///
    /// The fraction is clamped into `[0, 1]`. Returns the position sought to,
    /// or `None` when the duration is not known yet and nothing was done.
    pub(crate) fn seek_to_fraction(&mut self, fraction: f64) -> Option<f64> {
        if !self.mounted {
            return None;
        }

        let Some(duration) = known_duration(self.media.duration()) else {
            debug!("seek ignored: {}", PlaybackError::UnknownDuration);
            return None;
        };

        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        let position = fraction * duration;
        match self.media.set_current_time(position) {
            Ok(()) => Some(position),
            Err(e) => {
                warn!(position, "seek failed: {}", e);
                None
            }
        }
    }

    pub(crate) fn handle_media(&mut self, notice: MediaNotice) {
        match &self.subscription {
            Some(subscription) if subscription.source == notice.source => {}
            _ => {
                debug!(source = ?notice.source, "dropping notice for unsubscribed source");
                return;
            }
        }

        match notice.event {
            MediaEvent::TimeAdvanced | MediaEvent::MetadataReady => {
                self.progress =
                    PlaybackProgress::project(self.media.current_time(), self.media.duration());
            }
            MediaEvent::Ended => match self.end_behaviour {
                EndBehaviour::AdvancePlaylist => self.next(),
                EndBehaviour::LoopTrack => {
                    if let Err(e) = self.media.set_current_time(0.0) {
                        warn!("rewind failed: {}", e);
                    }
                    self.begin_play();
                }
            },
            MediaEvent::Error(reason) => {
                let url = self.playlist.current().url.clone();
                self.fail(PlaybackError::LoadFailure { url, reason });
            }
            MediaEvent::PlaySettled(ticket, result) => {
                if self.pending_play != Some(ticket) {
                    debug!(?ticket, "discarding result of abandoned play attempt");
                    return;
                }
                self.pending_play = None;
                match result {
                    Ok(()) => self.state = TransportState::Playing,
                    Err(reason) => self.fail(PlaybackError::PlaybackStartFailure(reason)),
                }
            }
        }
    }

    fn switch_track(&mut self) {
        if self.change_source() {
            self.begin_play();
        }
    }

    // Loads the current playlist entry, resetting error and progress first
    // so nothing from the previous source is shown once playback starts.
    fn change_source(&mut self) -> bool {
        self.release();
        self.error = None;
        self.progress = PlaybackProgress::default();
        self.state = TransportState::Paused;

        let url = self.playlist.current().url.clone();
        match self.media.load(&url) {
            Ok(source) => {
                debug!(?source, %url, "subscribed to source");
                self.subscription = Some(Subscription { source });
                true
            }
            Err(e) => {
                self.fail(PlaybackError::LoadFailure {
                    url,
                    reason: e.to_string(),
                });
                false
            }
        }
    }

    fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            debug!(source = ?subscription.source, "released source");
        }
        self.pending_play = None;
    }

    fn begin_play(&mut self) {
        // A source that failed to load has to be fetched again before it can
        // play.
        let reload = matches!(self.error, Some(PlaybackError::LoadFailure { .. }));
        if reload && !self.change_source() {
            return;
        }

        self.error = None;
        match self.media.play() {
            Ok(ticket) => {
                self.pending_play = Some(ticket);
                self.state = TransportState::Loading;
            }
            Err(e) => self.fail(PlaybackError::PlaybackStartFailure(e.to_string())),
        }
    }

    fn pause(&mut self) {
        self.pending_play = None;
        self.state = TransportState::Paused;
        if let Err(e) = self.media.pause() {
            warn!("pause failed: {}", e);
        }
    }

    fn fail(&mut self, error: PlaybackError) {
        warn!("{}", error);
        self.pending_play = None;
        self.state = TransportState::Errored;
        if let Err(e) = self.media.pause() {
            debug!("pause after failure failed: {}", e);
        }
        self.error = Some(error);
    }

    #[cfg(test)]
    pub(crate) fn media(&self) -> &M {
        &self.media
    }

    #[cfg(test)]
    pub(crate) fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::fake::FakeMedia;

    fn playlist() -> Playlist {
        Playlist::new(vec![
            Track::new("A", "file:///a.mp3"),
            Track::new("B", "file:///b.mp3"),
        ])
        .unwrap()
    }

    fn mounted(end_behaviour: EndBehaviour) -> TransportController<FakeMedia> {
        let mut transport = TransportController::new(FakeMedia::default(), playlist(), end_behaviour);
        transport.mount();
        transport
    }

    fn settle_ok(transport: &mut TransportController<FakeMedia>) {
        let notice = transport.media_mut().started();
        transport.handle_media(notice);
    }

    #[test]
    fn test_mount_loads_first_track_paused() {
        let transport = mounted(EndBehaviour::AdvancePlaylist);
        assert_eq!(transport.state(), TransportState::Paused);
        assert!(!transport.is_playing());
        assert_eq!(transport.media().loaded, vec!["file:///a.mp3"]);
        assert!(!transport.media().looping);
        assert_eq!(transport.snapshot().progress_fraction, 0.0);
    }

    #[test]
    fn test_single_track_view_loops() {
        let transport = mounted(EndBehaviour::LoopTrack);
        assert!(transport.media().looping);
    }

    #[test]
    fn test_toggle_plays_then_pauses() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        transport.toggle();
        assert_eq!(transport.state(), TransportState::Loading);
        assert!(transport.is_playing());

        settle_ok(&mut transport);
        assert_eq!(transport.state(), TransportState::Playing);

        transport.toggle();
        assert_eq!(transport.state(), TransportState::Paused);
        assert!(transport.media().paused);
        assert_eq!(transport.media().pause_calls, 1);
    }

    #[test]
    fn test_failed_play_attempt_leaves_paused_with_message() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        transport.toggle();
        assert!(transport.is_playing());

        let notice = transport.media().rejected("autoplay blocked");
        transport.handle_media(notice);

        assert!(!transport.is_playing());
        assert_eq!(transport.state(), TransportState::Errored);
        assert!(transport.media().paused);
        assert!(!transport.error_message().unwrap_or_default().is_empty());
    }

    #[test]
    fn test_play_rejected_synchronously() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        transport.media_mut().reject_play = true;
        transport.toggle();
        assert_eq!(transport.state(), TransportState::Errored);
        assert_eq!(transport.error_message(), Some("Playback failed. Please try again."));
    }

    #[test]
    fn test_retry_after_failure_clears_message() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        transport.toggle();
        let notice = transport.media().rejected("busy");
        transport.handle_media(notice);
        assert!(transport.error_message().is_some());

        transport.toggle();
        assert_eq!(transport.state(), TransportState::Loading);
        assert_eq!(transport.error_message(), None);
        settle_ok(&mut transport);
        assert_eq!(transport.state(), TransportState::Playing);
    }

    #[test]
    fn test_pausing_while_loading_discards_late_result() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        transport.toggle();
        transport.toggle();
        assert_eq!(transport.state(), TransportState::Paused);

        settle_ok(&mut transport);
        assert_eq!(transport.state(), TransportState::Paused);
        assert!(!transport.is_playing());
    }

    #[test]
    fn test_next_three_times_wraps_and_keeps_playing() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        let mut indices = Vec::new();
        for _ in 0..3 {
            transport.next();
            assert!(transport.is_playing());
            settle_ok(&mut transport);
            assert!(transport.is_playing());
            indices.push(transport.current_index());
        }
        assert_eq!(indices, vec![1, 0, 1]);
        assert_eq!(transport.state(), TransportState::Playing);
    }

    #[test]
    fn test_previous_wraps_to_last() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        transport.previous();
        assert_eq!(transport.current_index(), 1);
        assert_eq!(transport.current_track().title, "B");
        assert_eq!(transport.media().loaded.last().map(String::as_str), Some("file:///b.mp3"));
    }

    #[test]
    fn test_progress_follows_metadata_and_time() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        assert_eq!(transport.snapshot().progress_fraction, 0.0);
        assert_eq!(transport.snapshot().remaining_seconds, 0.0);

        transport.media_mut().duration = Some(120.0);
        let notice = transport.media().notice(MediaEvent::MetadataReady);
        transport.handle_media(notice);
        assert_eq!(transport.snapshot().remaining_seconds, 120.0);

        transport.media_mut().position = 30.0;
        let notice = transport.media().notice(MediaEvent::TimeAdvanced);
        transport.handle_media(notice);

        let snapshot = transport.snapshot();
        assert_eq!(snapshot.progress_fraction, 0.25);
        assert_eq!(snapshot.remaining_seconds, 90.0);
    }

    #[test]
    fn test_source_change_resets_progress_and_ignores_old_source() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        transport.media_mut().duration = Some(100.0);
        transport.media_mut().position = 50.0;
        let stale = transport.media().notice(MediaEvent::TimeAdvanced);
        transport.handle_media(stale.clone());
        assert_eq!(transport.snapshot().progress_fraction, 0.5);

        transport.next();
        assert_eq!(transport.snapshot().progress_fraction, 0.0);

        transport.media_mut().duration = Some(100.0);
        transport.media_mut().position = 80.0;
        transport.handle_media(stale);
        assert_eq!(transport.snapshot().progress_fraction, 0.0);
    }

    #[test]
    fn test_seek_within_range() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        transport.media_mut().duration = Some(200.0);

        for fraction in [0.0, 0.1, 0.5, 0.999, 1.0] {
            let position = transport.seek_to_fraction(fraction).unwrap();
            assert!((position - fraction * 200.0).abs() < 1e-9);
            assert!((transport.media().position - fraction * 200.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_seek_outside_range_is_clamped() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        transport.media_mut().duration = Some(60.0);

        assert_eq!(transport.seek_to_fraction(1.7), Some(60.0));
        assert_eq!(transport.seek_to_fraction(-0.3), Some(0.0));
        assert_eq!(transport.seek_to_fraction(f64::NAN), Some(0.0));
    }

    #[test]
    fn test_seek_without_duration_is_a_no_op() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        transport.media_mut().position = 7.0;
        assert_eq!(transport.seek_to_fraction(0.5), None);
        assert_eq!(transport.media().position, 7.0);

        transport.media_mut().duration = Some(f64::INFINITY);
        assert_eq!(transport.seek_to_fraction(0.5), None);
    }

    #[test]
    fn test_end_of_track_advances_playlist() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        transport.toggle();
        settle_ok(&mut transport);

        let ended = transport.media().notice(MediaEvent::Ended);
        transport.handle_media(ended);
        assert_eq!(transport.current_index(), 1);
        assert!(transport.is_playing());

        settle_ok(&mut transport);
        let ended = transport.media().notice(MediaEvent::Ended);
        transport.handle_media(ended);
        assert_eq!(transport.current_index(), 0);
        assert!(transport.is_playing());
    }

    #[test]
    fn test_end_of_track_restarts_looping_track() {
        let mut transport = mounted(EndBehaviour::LoopTrack);
        transport.toggle();
        settle_ok(&mut transport);
        transport.media_mut().position = 180.0;

        let ended = transport.media().notice(MediaEvent::Ended);
        transport.handle_media(ended);
        assert_eq!(transport.current_index(), 0);
        assert_eq!(transport.media().position, 0.0);
        assert!(transport.is_playing());
    }

    #[test]
    fn test_load_error_is_retained_until_next_attempt() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        transport.toggle();
        let error = transport.media().notice(MediaEvent::Error("404".into()));
        transport.handle_media(error);

        assert_eq!(transport.state(), TransportState::Errored);
        assert!(!transport.is_playing());
        assert_eq!(
            transport.error_message(),
            Some("Failed to load audio. Please try another song.")
        );

        transport.toggle();
        assert_eq!(transport.error_message(), None);
        assert_eq!(transport.media().loaded.len(), 2);
        assert_eq!(transport.state(), TransportState::Loading);
    }

    #[test]
    fn test_load_rejected_by_element() {
        let mut transport = TransportController::new(
            FakeMedia {
                reject_load: true,
                ..FakeMedia::default()
            },
            playlist(),
            EndBehaviour::AdvancePlaylist,
        );
        transport.mount();
        assert_eq!(transport.state(), TransportState::Errored);

        transport.next();
        assert_eq!(transport.state(), TransportState::Errored);
        assert!(transport.error_message().is_some());
    }

    #[test]
    fn test_next_clears_previous_error() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        let error = transport.media().notice(MediaEvent::Error("decode".into()));
        transport.handle_media(error);
        assert!(transport.error_message().is_some());

        transport.next();
        assert_eq!(transport.error_message(), None);
        assert_eq!(transport.state(), TransportState::Loading);
    }

    #[test]
    fn test_unmount_discards_late_results() {
        let mut transport = mounted(EndBehaviour::AdvancePlaylist);
        transport.toggle();
        let late = transport.media_mut().started();
        transport.unmount();

        transport.handle_media(late);
        assert_eq!(transport.state(), TransportState::Paused);
        assert!(transport.media().paused);

        transport.toggle();
        assert_eq!(transport.state(), TransportState::Paused);
        assert_eq!(transport.media().pause_calls, 1);
    }

    #[test]
    fn test_single_track_load_error_does_not_suggest_another_song() {
        let mut transport = mounted(EndBehaviour::LoopTrack);
        let error = transport.media().notice(MediaEvent::Error("404".into()));
        transport.handle_media(error);
        assert_eq!(
            transport.error_message(),
            Some("Failed to load audio. Please try again.")
        );
    }
}
