// Everything that crosses from the control thread into the audio callback,
// and the answers that come back. All of it is Copy so nothing allocates
// on the way through the channels.

use std::fmt;

pub use crate::audio::{CommandError, EffectSpec, LooperMode, LooperStatus, SharedStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCommand {
    // Single mode: run only effect `index` from the rack. Leaves chain mode.
    SelectEffect(usize),

    // true = run the chain, false = back to the single selection
    SetChainMode(bool),

    // Only meaningful in chain mode
    ToggleChainEffect(usize),
    ResetChain,

    Looper(LooperCommand),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LooperCommand {
    StartRecording,
    StopRecording,
    TogglePlayback,
    StopOrToggle, // stop if recording, otherwise toggle playback
    Clear,
}

/// What an accepted command did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ack {
    EffectSelected(&'static str),
    ChainToggled { name: &'static str, enabled: bool },
    ChainMode(bool),
    ChainReset,
    RecordingStarted,
    LoopSaved { seconds: f32 },
    Playing,
    Paused,
    LoopCleared,
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ack::EffectSelected(name) => write!(f, "{name} enabled"),
            Ack::ChainToggled { name, enabled } => {
                write!(f, "{name} toggled {}", if *enabled { "ON" } else { "OFF" })
            }
            Ack::ChainMode(true) => f.write_str("Switched to Chain Mode"),
            Ack::ChainMode(false) => f.write_str("Switched to Single Effect Mode"),
            Ack::ChainReset => f.write_str("All effects reset"),
            Ack::RecordingStarted => f.write_str("Recording..."),
            Ack::LoopSaved { seconds } => write!(f, "Loop saved ({seconds:.1}s) - Playing back"),
            Ack::Playing => f.write_str("Playing"),
            Ack::Paused => f.write_str("Paused"),
            Ack::LoopCleared => f.write_str("Loop cleared"),
        }
    }
}

pub type CommandOutcome = Result<Ack, CommandError>;
