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

//! Application configuration.
//!
//! Configuration is read once at start-up from the `confy` managed file and
//! then overlaid with environment variables, so track locations can be
//! supplied by whatever launches the player:
//!
//! * `SMOLDER_AUDIO_URL`, `SMOLDER_TRACK_TITLE` - the Green Poison track.
//! * `SMOLDER_FIRE_<n>_URL`, `SMOLDER_FIRE_<n>_TITLE` - Fire playlist entry
//!   `n`, counting from 1. URLs past the end of the configured list append
//!   new entries.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::{ConfigError, PlaylistError},
    model::{Playlist, Track},
};

const CONFIG_NAME: &str = "smolder";
const ENV_PREFIX: &str = "SMOLDER";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ViewKind {
    #[default]
    Fire,
    GreenPoison,
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fire" => Ok(Self::Fire),
            "green-poison" => Ok(Self::GreenPoison),
            other => Err(format!(
                "unknown view '{}', expected 'fire' or 'green-poison'",
                other
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct TrackConfig {
    pub(crate) title: String,
    pub(crate) url: String,
}

impl From<&TrackConfig> for Track {
    fn from(config: &TrackConfig) -> Self {
        Track::new(config.title.clone(), config.url.clone())
    }
}

/// Falling glyph animation settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct RainConfig {
    pub(crate) glyphs: String,
    pub(crate) glyph_size: u32,
    /// Glyph size used when the viewport is narrower than `compact_below`.
    pub(crate) compact_glyph_size: u32,
    pub(crate) compact_below: u32,
    /// Per-frame chance that a column past the bottom restarts at the top.
    pub(crate) reset_probability: f64,
    /// Opacity of the base colour laid over each frame.
    pub(crate) trail_alpha: f32,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            glyphs: "FASITO".to_string(),
            glyph_size: 18,
            compact_glyph_size: 14,
            compact_below: 768,
            reset_probability: 0.015,
            trail_alpha: 0.1,
        }
    }
}

impl RainConfig {
    pub(crate) fn glyph_size_for(&self, viewport_width: u32) -> u32 {
        let size = if viewport_width < self.compact_below {
            self.compact_glyph_size
        } else {
            self.glyph_size
        };
        size.max(1)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) version: u32,
    pub(crate) default_view: ViewKind,
    pub(crate) frame_interval_ms: u64,
    pub(crate) pixel_ratio: f32,
    pub(crate) green_poison: TrackConfig,
    pub(crate) fire: Vec<TrackConfig>,
    pub(crate) rain: RainConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            default_view: ViewKind::default(),
            frame_interval_ms: 33,
            pixel_ratio: 1.0,
            green_poison: TrackConfig {
                title: "Green Poison".to_string(),
                url: String::new(),
            },
            fire: vec![
                TrackConfig {
                    title: "Fire 1".to_string(),
                    url: String::new(),
                },
                TrackConfig {
                    title: "Fire 2".to_string(),
                    url: String::new(),
                },
            ],
            rain: RainConfig::default(),
        }
    }
}

impl AppConfig {
    /// Overlays values found through `lookup` (normally the environment).
    pub(crate) fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(&format!("{ENV_PREFIX}_AUDIO_URL")) {
            self.green_poison.url = url;
        }
        if let Some(title) = lookup(&format!("{ENV_PREFIX}_TRACK_TITLE")) {
            self.green_poison.title = title;
        }

        for n in 1.. {
            let url = lookup(&format!("{ENV_PREFIX}_FIRE_{n}_URL"));
            let title = lookup(&format!("{ENV_PREFIX}_FIRE_{n}_TITLE"));

            match self.fire.get_mut(n - 1) {
                Some(track) => {
                    if let Some(url) = url {
                        track.url = url;
                    }
                    if let Some(title) = title {
                        track.title = title;
                    }
                }
                None => match url {
                    Some(url) => self.fire.push(TrackConfig {
                        title: title.unwrap_or_else(|| format!("Fire {n}")),
                        url,
                    }),
                    None => break,
                },
            }
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.fire.is_empty() {
            return Err(PlaylistError::Empty.into());
        }
        if self.rain.glyphs.chars().next().is_none() {
            return Err(ConfigError::EmptyGlyphs);
        }
        let probability = self.rain.reset_probability;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ConfigError::ResetProbability(probability));
        }
        if !self.pixel_ratio.is_finite() || self.pixel_ratio <= 0.0 {
            return Err(ConfigError::PixelRatio(self.pixel_ratio));
        }
        Ok(())
    }

    pub(crate) fn fire_playlist(&self) -> Result<Playlist, PlaylistError> {
        Playlist::new(self.fire.iter().map(Track::from).collect())
    }

    pub(crate) fn green_poison_track(&self) -> Track {
        Track::from(&self.green_poison)
    }
}

/// Loads the configuration file, falling back to defaults, then applies
/// environment overrides.
pub(crate) fn load_config() -> AppConfig {
    let mut config: AppConfig = confy::load(CONFIG_NAME, None).unwrap_or_else(|e| {
        warn!("using default configuration: {}", e);
        AppConfig::default()
    });
    config.apply_env(|key| std::env::var(key).ok());
    config
}
