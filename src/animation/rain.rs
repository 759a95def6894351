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

//! Falling glyph ("rain") state.
//!
//! One drop per column. Each frame every column gets one random glyph at its
//! drop position and moves down a step. Once a column has fallen past the
//! bottom it restarts at the top with a small per-frame probability, so the
//! columns drift out of step with each other. Frames are laid over a low
//! opacity wash of the base colour rather than a clear, leaving trails.

use rand::{
    distr::{Bernoulli, Distribution},
    rngs::StdRng,
    seq::IndexedRandom,
};
use ratatui::style::Color;

use crate::{animation::Canvas, config::RainConfig, error::ConfigError, theme::Theme};

/// Drop position of a column at the top of the canvas.
pub(crate) const DROP_START: u32 = 1;

pub(crate) struct RainState {
    config: RainConfig,
    glyphs: Vec<char>,
    reset: Bernoulli,
    base_colour: Color,
    glyph_colour: Color,
    glyph_size: u32,
    height: u32,
    drops: Vec<u32>,
    rng: StdRng,
}

impl RainState {
    /// Creates an empty rain; call [`RainState::reset`] once the canvas size
    /// is known.
    pub(crate) fn new(config: &RainConfig, theme: &Theme, rng: StdRng) -> Result<Self, ConfigError> {
        let reset = Bernoulli::new(config.reset_probability)
            .map_err(|_| ConfigError::ResetProbability(config.reset_probability))?;

        Ok(Self {
            config: config.clone(),
            glyphs: config.glyphs.chars().collect(),
            reset,
            base_colour: theme.canvas_base_colour,
            glyph_colour: theme.glyph_colour,
            glyph_size: config.glyph_size,
            height: 0,
            drops: Vec::new(),
            rng,
        })
    }

    /// Resizes to a canvas of `width` x `height` device pixels, picking the
    /// glyph size for a viewport `viewport_width` logical pixels wide. Every
    /// column restarts at the top.
    pub(crate) fn reset(&mut self, width: u32, height: u32, viewport_width: u32) {
        self.glyph_size = self.config.glyph_size_for(viewport_width);
        self.height = height;
        let columns = (width / self.glyph_size) as usize;
        self.drops = vec![DROP_START; columns];
    }

    #[cfg(test)]
    pub(crate) fn column_count(&self) -> usize {
        self.drops.len()
    }

    #[cfg(test)]
    pub(crate) fn drops(&self) -> &[u32] {
        &self.drops
    }

    pub(crate) fn draw_frame<C: Canvas>(&mut self, canvas: &mut C) {
        canvas.fill_rect(
            0,
            0,
            canvas.width(),
            canvas.height(),
            self.base_colour,
            self.config.trail_alpha,
        );

        let size = self.glyph_size;
        let mut buf = [0u8; 4];
        for (column, drop) in self.drops.iter_mut().enumerate() {
            if let Some(glyph) = self.glyphs.choose(&mut self.rng) {
                let text = glyph.encode_utf8(&mut buf);
                let y = drop.saturating_mul(size);
                canvas.draw_text(text, column as u32 * size, y, self.glyph_colour);
            }

            // Saturating so a column that never restarts stays below the bottom.
            if drop.saturating_mul(size) > self.height && self.reset.sample(&mut self.rng) {
                *drop = 0;
            }
            *drop = drop.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::animation::fake::FakeCanvas;

    fn rain(reset_probability: f64) -> (RainState, FakeCanvas) {
        let config = RainConfig {
            reset_probability,
            ..RainConfig::default()
        };
        let mut rain =
            RainState::new(&config, &Theme::green_poison(), StdRng::seed_from_u64(42)).unwrap();
        let mut canvas = FakeCanvas::default();
        canvas.resize(180, 90);
        rain.reset(180, 90, 180);
        (rain, canvas)
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let config = RainConfig {
            reset_probability: 2.0,
            ..RainConfig::default()
        };
        let rain = RainState::new(&config, &Theme::green_poison(), StdRng::seed_from_u64(1));
        assert!(matches!(rain, Err(ConfigError::ResetProbability(_))));
    }

    #[test]
    fn test_columns_follow_width() {
        let (rain, _) = rain(0.015);
        assert_eq!(rain.column_count(), 180 / 14);
        assert!(rain.drops().iter().all(|&drop| drop == DROP_START));
    }

    #[test]
    fn test_frame_fades_then_draws_each_column() {
        let (mut rain, mut canvas) = rain(0.015);
        rain.draw_frame(&mut canvas);

        assert_eq!(canvas.fills, vec![(0, 0, 180, 90, 0.1)]);
        assert_eq!(canvas.texts.len(), rain.column_count());
        for (column, (text, x, y)) in canvas.texts.iter().enumerate() {
            assert!("FASITO".contains(text.as_str()));
            assert_eq!(*x, column as u32 * 14);
            assert_eq!(*y, 14);
        }
        assert!(rain.drops().iter().all(|&drop| drop == DROP_START + 1));
    }

    #[test]
    fn test_columns_past_bottom_restart_when_chance_hits() {
        let (mut rain, mut canvas) = rain(1.0);
        // 90px tall with 14px glyphs: drop 7 is the first below the bottom.
        for _ in 0..6 {
            rain.draw_frame(&mut canvas);
        }
        assert!(rain.drops().iter().all(|&drop| drop == 7));

        rain.draw_frame(&mut canvas);
        assert!(rain.drops().iter().all(|&drop| drop == 1));
    }

    #[test]
    fn test_columns_keep_falling_without_chance() {
        let (mut rain, mut canvas) = rain(0.0);
        for _ in 0..20 {
            rain.draw_frame(&mut canvas);
        }
        assert!(rain.drops().iter().all(|&drop| drop == DROP_START + 20));
    }

    #[test]
    fn test_column_that_never_restarts_does_not_overflow() {
        let (mut rain, mut canvas) = rain(0.0);
        rain.drops = vec![u32::MAX - 1; rain.column_count()];
        rain.draw_frame(&mut canvas);
        rain.draw_frame(&mut canvas);

        assert!(rain.drops().iter().all(|&drop| drop == u32::MAX));
        assert!(canvas.texts.iter().all(|(_, _, y)| *y == u32::MAX));
    }

    #[test]
    fn test_restarts_are_staggered() {
        let config = RainConfig {
            reset_probability: 0.5,
            ..RainConfig::default()
        };
        let mut rain =
            RainState::new(&config, &Theme::green_poison(), StdRng::seed_from_u64(3)).unwrap();
        let mut canvas = FakeCanvas::default();
        canvas.resize(1400, 28);
        rain.reset(1400, 28, 1400);
        for _ in 0..4 {
            rain.draw_frame(&mut canvas);
        }

        let first = rain.drops()[0];
        assert!(rain.drops().iter().any(|&drop| drop != first));
    }
}
