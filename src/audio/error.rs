use thiserror::Error;

/// Why a control command was refused. Refusals never touch the audio:
/// the engine keeps running whatever it was running before.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Invalid effect number {} (1-{len})", index + 1)]
    InvalidEffect { index: usize, len: usize },

    #[error("Invalid chain slot {} (1-{len})", index + 1)]
    InvalidChainSlot { index: usize, len: usize },

    #[error("Not in chain mode")]
    NotInChainMode,

    #[error("Not recording")]
    NotRecording,

    #[error("No loop recorded")]
    NothingRecorded,

    #[error("No loop to play")]
    NoLoop,
}
