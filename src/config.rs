// Startup settings, read once from <dir>/guitarfx.json.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::EffectSpec;

const CONFIG_FILE: &str = "guitarfx.json";

const MIN_SAMPLE_RATE: u32 = 8000;
const MAX_BLOCK_SIZE: usize = 8192;
const MAX_LOOP_SECONDS: f32 = 600.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sample_rate: u32,
    pub block_size: usize,
    pub input_device: Option<usize>,  // index into the host's input list
    pub output_device: Option<usize>, // None = system default
    pub max_loop_seconds: f32,
    pub effects: Vec<EffectSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            block_size: 128,
            input_device: None,
            output_device: None,
            max_loop_seconds: 30.0,
            effects: EffectSpec::default_rack(),
        }
    }
}

// <dir>/guitarfx.json
pub fn config_file_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

impl Config {
    /// Missing file means defaults. A file that doesn't parse is reported
    /// and then ignored, so a typo never keeps the pedal from starting.
    pub fn load(dir: &Path) -> Config {
        let path = config_file_path(dir);
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(path = %path.display(), "no config file ({e}), using defaults");
                return Config::default();
            }
        };
        match serde_json::from_str::<Config>(&data) {
            Ok(cfg) => {
                tracing::info!(path = %path.display(), "loaded config");
                cfg.sanitized()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "bad config file, using defaults: {e}");
                Config::default()
            }
        }
    }

    pub fn save(&self, dir: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(config_file_path(dir), json)?;
        Ok(())
    }

    /// Pull every value back into a range the engine can run with.
    pub fn sanitized(mut self) -> Config {
        self.sample_rate = self.sample_rate.max(MIN_SAMPLE_RATE);
        self.block_size = self.block_size.clamp(1, MAX_BLOCK_SIZE);
        self.max_loop_seconds = if self.max_loop_seconds.is_finite() {
            self.max_loop_seconds.clamp(0.1, MAX_LOOP_SECONDS)
        } else {
            Config::default().max_loop_seconds
        };
        if self.effects.is_empty() {
            self.effects = EffectSpec::default_rack();
        }
        self
    }
}
