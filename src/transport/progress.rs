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

//! Progress projection.
//!
//! The media element owns the clock. This is a cached view of it, refreshed
//! when the element says time advanced or metadata arrived, and never polled.

/// Snapshot of progress through the current source.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct PlaybackProgress {
    /// Elapsed over duration, in `[0, 1]`.
    pub(crate) fraction: f64,
    /// Seconds left, never negative.
    pub(crate) remaining: f64,
}

impl PlaybackProgress {
    /// Projects the element's clock into a progress snapshot.
    ///
    /// A duration that is missing, non-finite or zero leaves progress at the
    /// start with nothing remaining.
    pub(crate) fn project(elapsed: f64, duration: Option<f64>) -> Self {
        match known_duration(duration) {
            Some(duration) => {
                let elapsed = if elapsed.is_finite() {
                    elapsed.clamp(0.0, duration)
                } else {
                    0.0
                };
                Self {
                    fraction: elapsed / duration,
                    remaining: duration - elapsed,
                }
            }
            None => Self::default(),
        }
    }
}

/// A duration progress maths can divide by.
pub(crate) fn known_duration(duration: Option<f64>) -> Option<f64> {
    duration.filter(|d| d.is_finite() && *d > 0.0)
}
