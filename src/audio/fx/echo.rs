use serde::{Deserialize, Serialize};

use crate::audio::delay_line::DelayLine;
use crate::audio::effect::Effect;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoParams {
    pub delay_ms: f32,
    pub feedback: f32, // [0, 1); near 1 the tail never dies, caller's call
    pub mix: f32,      // 0 = dry only, 1 = wet only
    pub max_seconds: f32,
}

impl Default for EchoParams {
    fn default() -> Self {
        Self {
            delay_ms: 350.0,
            feedback: 0.35,
            mix: 0.5,
            max_seconds: 2.0,
        }
    }
}

/// Single feedback delay line.
pub struct Echo {
    line: DelayLine,
    delay: usize, // samples, always < capacity
    feedback: f32,
    mix: f32,
}

impl Echo {
    pub const NAME: &'static str = "Echo";

    pub fn new(sample_rate: f32, p: &EchoParams) -> Self {
        let line = DelayLine::with_seconds(sample_rate, p.max_seconds);
        let delay = (sample_rate as f64 * p.delay_ms.max(0.0) as f64 / 1000.0) as usize;
        Self {
            delay: delay.min(line.capacity() - 1),
            line,
            feedback: p.feedback.clamp(0.0, 1.0),
            mix: p.mix.clamp(0.0, 1.0),
        }
    }

    pub fn delay_samples(&self) -> usize {
        self.delay
    }
}

impl Effect for Echo {
    fn process(&mut self, buf: &mut [f32]) {
        if self.delay == 0 {
            return; // zero-length delay, nothing to echo
        }
        for s in buf.iter_mut() {
            let dry = *s;
            let wet = self.line.read(self.delay);
            *s = (1.0 - self.mix) * dry + self.mix * wet;
            self.line.push(dry + wet * self.feedback);
        }
    }

    fn reset(&mut self) {
        self.line.clear();
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
