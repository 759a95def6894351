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

//! Fixed-length playlist state.
//!
//! The playlist never grows or shrinks after construction. Navigation wraps
//! in both directions, so there is no end of the list to run off.

use crate::{error::PlaylistError, model::Track};

#[derive(Debug, Clone)]
pub(crate) struct Playlist {
    tracks: Vec<Track>,
    current: usize,
}

impl Playlist {
    pub(crate) fn new(tracks: Vec<Track>) -> Result<Self, PlaylistError> {
        if tracks.is_empty() {
            return Err(PlaylistError::Empty);
        }

        Ok(Self { tracks, current: 0 })
    }

    /// A playlist holding exactly one track.
    pub(crate) fn single(track: Track) -> Self {
        Self {
            tracks: vec![track],
            current: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.tracks.len()
    }

    #[cfg(test)]
    pub(crate) fn current_index(&self) -> usize {
        self.current
    }

    pub(crate) fn current(&self) -> &Track {
        &self.tracks[self.current]
    }

    pub(crate) fn next(&mut self) -> &Track {
        self.current = (self.current + 1) % self.tracks.len();
        self.current()
    }

    pub(crate) fn previous(&mut self) -> &Track {
        let len = self.tracks.len();
        self.current = (self.current + len - 1) % len;
        self.current()
    }

    #[cfg(test)]
    pub(crate) fn select(&mut self, index: usize) {
        self.current = index % self.tracks.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track::new(format!("Track {i}"), format!("file:///{i}.mp3")))
            .collect()
    }

    #[test]
    fn test_empty_playlist_rejected() {
        assert_eq!(Playlist::new(vec![]).unwrap_err(), PlaylistError::Empty);
    }

    #[test]
    fn test_next_wraps_back_to_start() {
        for len in 1..=5 {
            for start in 0..len {
                let mut playlist = Playlist::new(tracks(len)).unwrap();
                playlist.select(start);
                for _ in 0..len {
                    playlist.next();
                }
                assert_eq!(playlist.current_index(), start);
            }
        }
    }

    #[test]
    fn test_previous_wraps_back_to_start() {
        for len in 1..=5 {
            for start in 0..len {
                let mut playlist = Playlist::new(tracks(len)).unwrap();
                playlist.select(start);
                for _ in 0..len {
                    playlist.previous();
                }
                assert_eq!(playlist.current_index(), start);
            }
        }
    }

    #[test]
    fn test_previous_from_first_goes_to_last() {
        let mut playlist = Playlist::new(tracks(3)).unwrap();
        assert_eq!(playlist.previous().title, "Track 2");
        assert_eq!(playlist.next().title, "Track 0");
    }

    #[test]
    fn test_single_track_stays_put() {
        let mut playlist = Playlist::single(Track::new("Only", "file:///only.mp3"));
        assert_eq!(playlist.len(), 1);
        playlist.next();
        playlist.previous();
        assert_eq!(playlist.current_index(), 0);
    }
}
