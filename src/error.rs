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

//! Error types shared across the playback, animation and configuration seams.
//!
//! Only [`PlaybackError`] ever reaches the user, and then only as the
//! single-line message returned by [`PlaybackError::user_message`]. The rest
//! are logged or, for configuration, reported before the terminal is taken
//! over.

use thiserror::Error;

const LOAD_FAILED_MESSAGE: &str = "Failed to load audio. Please try another song.";
const LOAD_FAILED_SINGLE_MESSAGE: &str = "Failed to load audio. Please try again.";
const PLAYBACK_FAILED_MESSAGE: &str = "Playback failed. Please try again.";

/// Failures raised by a media element implementation.
#[derive(Debug, Error)]
pub(crate) enum MediaError {
    #[error("media worker is no longer running")]
    Disconnected,

    #[error("no media source is loaded")]
    NoSource,

    #[error("cannot open '{0}'")]
    Unopenable(String),
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum PlaylistError {
    #[error("a playlist needs at least one track")]
    Empty,
}

/// Failures observed at the transport controller boundary.
#[derive(Debug, Error)]
pub(crate) enum PlaybackError {
    #[error("failed to load '{url}': {reason}")]
    LoadFailure { url: String, reason: String },

    #[error("playback could not start: {0}")]
    PlaybackStartFailure(String),

    #[error("track duration is not known yet")]
    UnknownDuration,
}

impl PlaybackError {
    /// The message shown next to the transport controls, if any. Only a
    /// player with `other_tracks` to pick from suggests switching song.
    pub(crate) fn user_message(&self, other_tracks: bool) -> Option<&'static str> {
        match self {
            Self::LoadFailure { .. } if other_tracks => Some(LOAD_FAILED_MESSAGE),
            Self::LoadFailure { .. } => Some(LOAD_FAILED_SINGLE_MESSAGE),
            Self::PlaybackStartFailure(_) => Some(PLAYBACK_FAILED_MESSAGE),
            Self::UnknownDuration => None,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error(transparent)]
    Playlist(#[from] PlaylistError),

    #[error("the rain glyph alphabet is empty")]
    EmptyGlyphs,

    #[error("rain reset probability {0} is outside [0, 1]")]
    ResetProbability(f64),

    #[error("pixel ratio {0} must be positive")]
    PixelRatio(f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let load = PlaybackError::LoadFailure {
            url: "a.mp3".into(),
            reason: "404".into(),
        };
        assert_eq!(load.user_message(true), Some(LOAD_FAILED_MESSAGE));
        assert_eq!(load.user_message(false), Some(LOAD_FAILED_SINGLE_MESSAGE));
        assert_eq!(
            PlaybackError::PlaybackStartFailure("denied".into()).user_message(false),
            Some(PLAYBACK_FAILED_MESSAGE)
        );
        assert_eq!(PlaybackError::UnknownDuration.user_message(true), None);
    }
}
