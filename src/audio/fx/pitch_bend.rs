use serde::{Deserialize, Serialize};

use crate::audio::delay_line::DelayLine;
use crate::audio::effect::Effect;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchBendParams {
    pub ratio: f32, // 1.5 = up a fifth, 0.5 = down an octave
    pub buffer_len: usize,
}

impl Default for PitchBendParams {
    fn default() -> Self {
        // buffer length is in samples and deliberately does not follow
        // the sample rate: 1000 samples is ~21ms at 48k, ~11ms at 96k
        Self { ratio: 1.5, buffer_len: 1000 }
    }
}

/// Reads a short ring at `ratio` times the write speed. Reads truncate
/// to the slot below, so ratios far from 1 crackle; that's the sound.
pub struct PitchBend {
    ring: DelayLine,
    ratio: f32,
    read_pos: f32,
}

impl PitchBend {
    pub const NAME: &'static str = "PitchBend";

    pub fn new(p: &PitchBendParams) -> Self {
        Self {
            ring: DelayLine::new(p.buffer_len),
            ratio: p.ratio.max(0.0),
            read_pos: 0.0,
        }
    }

    pub fn buffer_len(&self) -> usize {
        self.ring.capacity()
    }
}

impl Effect for PitchBend {
    fn process(&mut self, buf: &mut [f32]) {
        let len = self.ring.capacity();
        // the write index restarts at every block, the read cursor doesn't
        for (i, s) in buf.iter_mut().enumerate() {
            self.ring.set(i % len, *s);
            *s = self.ring.get(self.read_pos as usize);

            self.read_pos += self.ratio;
            if self.read_pos >= len as f32 {
                self.read_pos -= len as f32;
            }
        }
    }

    fn reset(&mut self) {
        self.ring.clear();
        self.read_pos = 0.0;
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
