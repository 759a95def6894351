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

//! Decorative falling-glyph animation gated by playback.
//!
//! The animation is written against two capabilities:
//!
//! * [`Canvas`] - a 2D raster surface that can be resized, filled and drawn
//!   on with text.
//! * [`FrameScheduler`] - a one-shot "call me back next frame" primitive
//!   that can be cancelled.
//!
//! [`AnimationDriver`] runs the [`RainState`] as a cancellable repeating
//! task. `start` hands out a [`FrameHandle`] and asks for one frame; every
//! frame delivered for the live handle draws and asks for the next. `stop`
//! cancels the pending frame and retires the handle, so a frame that was
//! already on its way is ignored when it arrives.

pub(crate) mod canvas;
pub(crate) mod rain;
pub(crate) mod scheduler;

use ratatui::style::Color;
use tracing::{debug, trace};

pub(crate) use rain::RainState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FrameHandle(pub(crate) u64);

pub(crate) trait FrameScheduler {
    /// Asks for exactly one frame callback carrying `handle`.
    fn request_frame(&mut self, handle: FrameHandle);

    /// Drops a pending frame for `handle`, if there is one.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// A 2D raster surface addressed in device pixels.
pub(crate) trait Canvas {
    /// Sets the pixel dimensions, clearing the surface.
    fn resize(&mut self, width: u32, height: u32);
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Paints `colour` at the given opacity over a rectangle.
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, colour: Color, alpha: f32);
    fn draw_text(&mut self, text: &str, x: u32, y: u32, colour: Color);
}

/// Logical viewport size and the display's pixel density.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Viewport {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) pixel_ratio: f32,
}

impl Viewport {
    /// Device pixel dimensions of a canvas covering the viewport.
    pub(crate) fn pixel_size(&self) -> (u32, u32) {
        let scale = |logical: u32| (logical as f32 * self.pixel_ratio).round() as u32;
        (scale(self.width), scale(self.height))
    }
}

pub(crate) struct AnimationDriver<S: FrameScheduler> {
    rain: RainState,
    scheduler: S,
    active: Option<FrameHandle>,
    issued: u64,
}

impl<S: FrameScheduler> AnimationDriver<S> {
    pub(crate) fn new(rain: RainState, scheduler: S) -> Self {
        Self {
            rain,
            scheduler,
            active: None,
            issued: 0,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Starts the frame loop, or returns the handle of the running one.
    pub(crate) fn start(&mut self) -> FrameHandle {
        if let Some(handle) = self.active {
            return handle;
        }

        self.issued += 1;
        let handle = FrameHandle(self.issued);
        debug!(?handle, "animation started");
        self.active = Some(handle);
        self.scheduler.request_frame(handle);
        handle
    }

    pub(crate) fn stop(&mut self) {
        if let Some(handle) = self.active.take() {
            debug!(?handle, "animation stopped");
            self.scheduler.cancel_frame(handle);
        }
    }

    /// Runs the loop exactly while `playing` is true.
    pub(crate) fn sync(&mut self, playing: bool) {
        match (playing, self.is_running()) {
            (true, false) => {
                self.start();
            }
            (false, true) => self.stop(),
            _ => {}
        }
    }

    /// Draws one frame and schedules the next. Frames for a retired handle
    /// are ignored; returns whether anything was drawn.
    pub(crate) fn on_frame<C: Canvas>(&mut self, handle: FrameHandle, canvas: &mut C) -> bool {
        if self.active != Some(handle) {
            trace!(?handle, "ignoring frame for retired handle");
            return false;
        }

        self.rain.draw_frame(canvas);
        self.scheduler.request_frame(handle);
        true
    }

    /// Fits the canvas to a new viewport and restarts every column at the top.
    pub(crate) fn resize<C: Canvas>(&mut self, canvas: &mut C, viewport: Viewport) {
        let (width, height) = viewport.pixel_size();
        canvas.resize(width, height);
        self.rain.reset(width, height, viewport.width);
    }

    #[cfg(test)]
    pub(crate) fn rain(&self) -> &RainState {
        &self.rain
    }

    #[cfg(test)]
    pub(crate) fn scheduler(&self) -> &S {
        &self.scheduler
    }
}
