use serde::{Deserialize, Serialize};

use crate::audio::biquad::flush_denormal;
use crate::audio::delay_line::DelayLine;
use crate::audio::effect::Effect;

// Tunings at 44.1k; scaled to the running rate. Mutually non-harmonic so
// the combs don't reinforce each other into a metallic ring.
const COMB_TUNING: [usize; 4] = [1557, 1617, 1491, 1422];
const ALLPASS_TUNING: [usize; 4] = [225, 556, 441, 341];
const REFERENCE_RATE: f64 = 44100.0;
const ALLPASS_GAIN: f32 = 0.5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverbParams {
    pub room_size: f32, // 0..1, comb feedback = 0.7 * room_size
    pub damping: f32,   // 0..1, high-frequency absorption
    pub wet: f32,
    pub dry: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            room_size: 0.75,
            damping: 0.5,
            wet: 0.3,
            dry: 0.7,
        }
    }
}

// Feedback comb with a one-pole lowpass in the loop.
struct Comb {
    line: DelayLine,
    damp_state: f32,
}

impl Comb {
    fn new(len: usize) -> Self {
        Self { line: DelayLine::new(len), damp_state: 0.0 }
    }

    #[inline]
    fn tick(&mut self, input: f32, feedback: f32, damping: f32) -> f32 {
        // the line is exactly `len` long, so the slot under the cursor
        // is the one written `len` samples ago
        let delayed = self.line.read(0);
        self.damp_state = flush_denormal(delayed * (1.0 - damping) + self.damp_state * damping);
        self.line.push(input + self.damp_state * feedback);
        delayed
    }

    fn clear(&mut self) {
        self.line.clear();
        self.damp_state = 0.0;
    }
}

struct Allpass {
    line: DelayLine,
}

impl Allpass {
    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        let delayed = self.line.read(0);
        self.line.push(flush_denormal(input + delayed * ALLPASS_GAIN));
        delayed - input
    }
}

/// Schroeder reverb: four parallel combs averaged, then four all-passes
/// in series.
pub struct Reverb {
    combs: [Comb; 4],
    allpasses: [Allpass; 4],
    feedback: f32,
    damping: f32,
    wet: f32,
    dry: f32,
}

impl Reverb {
    pub const NAME: &'static str = "Reverb";

    pub fn new(sample_rate: f32, p: &ReverbParams) -> Self {
        let scale =
            |len: usize| ((len as f64 * sample_rate as f64 / REFERENCE_RATE) as usize).max(1);
        Self {
            combs: COMB_TUNING.map(|len| Comb::new(scale(len))),
            allpasses: ALLPASS_TUNING.map(|len| Allpass { line: DelayLine::new(scale(len)) }),
            feedback: 0.7 * p.room_size.clamp(0.0, 1.0),
            damping: p.damping.clamp(0.0, 1.0),
            wet: p.wet,
            dry: p.dry,
        }
    }

    pub fn comb_lengths(&self) -> [usize; 4] {
        self.combs.each_ref().map(|c| c.line.capacity())
    }
}

impl Effect for Reverb {
    fn process(&mut self, buf: &mut [f32]) {
        for s in buf.iter_mut() {
            let input = *s;

            let mut sum = 0.0;
            for comb in &mut self.combs {
                sum += comb.tick(input, self.feedback, self.damping);
            }
            let mut diffused = sum / self.combs.len() as f32;

            for ap in &mut self.allpasses {
                diffused = ap.tick(diffused);
            }

            *s = input * self.dry + diffused * self.wet;
        }
    }

    fn reset(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        for ap in &mut self.allpasses {
            ap.line.clear();
        }
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
