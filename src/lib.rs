//! Realtime mono guitar effects: the DSP, the engine that routes blocks
//! through it, and the device glue that feeds the engine.

pub mod audio;
pub mod audio_api;
pub mod config;

pub use audio::{Effect, EffectSpec, Engine};
pub use config::Config;
