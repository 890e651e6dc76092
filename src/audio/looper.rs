use std::fmt;

use super::effect::Effect;
use super::error::CommandError;

#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LooperMode {
    #[default]
    Idle = 0,
    Recording = 1,
    Playing = 2,
    Paused = 3,
}

impl LooperMode {
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => LooperMode::Recording,
            2 => LooperMode::Playing,
            3 => LooperMode::Paused,
            _ => LooperMode::Idle,
        }
    }
}

/// Read-only view of where the looper is, for display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LooperStatus {
    pub mode: LooperMode,
    pub position: usize, // record cursor while recording, play cursor otherwise
    pub length: usize,
    pub sample_rate: f32,
}

impl LooperStatus {
    pub fn position_secs(&self) -> f32 {
        self.position as f32 / self.sample_rate
    }

    pub fn length_secs(&self) -> f32 {
        self.length as f32 / self.sample_rate
    }
}

impl fmt::Display for LooperStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            LooperMode::Recording => write!(f, "REC [{:.1}s]", self.position_secs()),
            LooperMode::Playing if self.length > 0 => {
                write!(f, "PLAY [{:.1}/{:.1}s]", self.position_secs(), self.length_secs())
            }
            _ if self.length > 0 => write!(f, "PAUSED [{:.1}s]", self.length_secs()),
            _ => f.write_str("EMPTY"),
        }
    }
}

/// One-track overdub looper. Runs after whatever effect is selected and
/// mixes its loop on top of the live signal.
///
/// The whole buffer is allocated up front; recording past the end stops
/// the take exactly like an explicit stop.
pub struct Looper {
    sample_rate: f32,
    buf: Vec<f32>,
    dirty: usize, // slots [0, dirty) may hold old audio
    loop_len: usize,
    record_pos: usize,
    play_pos: usize,
    mode: LooperMode,
}

impl Looper {
    pub const NAME: &'static str = "Looper";

    pub fn new(sample_rate: f32, max_loop_seconds: f32) -> Self {
        let capacity = ((sample_rate * max_loop_seconds.max(0.0)) as usize).max(1);
        Self {
            sample_rate,
            buf: vec![0.0; capacity],
            dirty: 0,
            loop_len: 0,
            record_pos: 0,
            play_pos: 0,
            mode: LooperMode::Idle,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn mode(&self) -> LooperMode {
        self.mode
    }

    pub fn loop_length(&self) -> usize {
        self.loop_len
    }

    pub fn play_position(&self) -> usize {
        self.play_pos
    }

    pub fn record_position(&self) -> usize {
        self.record_pos
    }

    pub fn status(&self) -> LooperStatus {
        let position = match self.mode {
            LooperMode::Recording => self.record_pos,
            _ => self.play_pos,
        };
        LooperStatus {
            mode: self.mode,
            position,
            length: self.loop_len,
            sample_rate: self.sample_rate,
        }
    }

    /// Throw away any loop and start a new take from sample 0.
    pub fn start_recording(&mut self) {
        self.reset();
        self.mode = LooperMode::Recording;
    }

    /// Close the take. Returns the loop length in samples; an empty take
    /// drops back to idle.
    pub fn stop_recording(&mut self) -> Result<usize, CommandError> {
        if self.mode != LooperMode::Recording {
            return Err(CommandError::NotRecording);
        }
        if self.record_pos == 0 {
            self.mode = LooperMode::Idle;
            return Err(CommandError::NothingRecorded);
        }
        self.commit();
        Ok(self.loop_len)
    }

    /// Playing <-> Paused. Needs a loop.
    pub fn toggle_playback(&mut self) -> Result<LooperMode, CommandError> {
        self.mode = match self.mode {
            _ if self.loop_len == 0 => return Err(CommandError::NoLoop),
            LooperMode::Playing => LooperMode::Paused,
            LooperMode::Paused => LooperMode::Playing,
            other => other,
        };
        Ok(self.mode)
    }

    pub fn clear_loop(&mut self) {
        self.reset();
    }

    fn commit(&mut self) {
        self.loop_len = self.record_pos;
        self.play_pos = 0;
        self.mode = LooperMode::Playing;
    }
}

impl Effect for Looper {
    fn process(&mut self, buf: &mut [f32]) {
        for s in buf.iter_mut() {
            match self.mode {
                LooperMode::Recording => {
                    // dry signal passes through untouched
                    self.buf[self.record_pos] = *s;
                    self.record_pos += 1;
                    self.dirty = self.dirty.max(self.record_pos);
                    if self.record_pos == self.buf.len() {
                        self.commit();
                    }
                }
                LooperMode::Playing => {
                    *s += self.buf[self.play_pos];
                    self.play_pos += 1;
                    if self.play_pos == self.loop_len {
                        self.play_pos = 0;
                    }
                }
                LooperMode::Idle | LooperMode::Paused => {}
            }
        }
    }

    fn reset(&mut self) {
        // only the part ever written can be non-zero
        self.buf[..self.dirty].fill(0.0);
        self.dirty = 0;
        self.loop_len = 0;
        self.record_pos = 0;
        self.play_pos = 0;
        self.mode = LooperMode::Idle;
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
