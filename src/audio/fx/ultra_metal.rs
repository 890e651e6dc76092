use serde::{Deserialize, Serialize};

use crate::audio::biquad::{BiquadCoeffs, FixedBiquad};
use crate::audio::effect::Effect;

// One peaking band: centre Hz, linear gain, Q.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeakBand {
    pub freq: f32,
    pub gain: f32,
    pub q: f32,
}

impl PeakBand {
    fn design(&self, sample_rate: f32) -> FixedBiquad {
        let freq = self.freq.clamp(1.0, (sample_rate * 0.49).max(1.0));
        FixedBiquad::new(BiquadCoeffs::peaking(sample_rate, freq, self.gain, self.q.max(0.01)))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UltraMetalParams {
    pub pre_gain: f32,
    pub drive: f32,
    pub post_level: f32,
    pub focus: PeakBand, // narrow pre-clip boost where pinch harmonics live
    pub bass: PeakBand,
    pub mid: PeakBand,
    pub high: PeakBand,
}

impl Default for UltraMetalParams {
    fn default() -> Self {
        Self {
            pre_gain: 80.0,
            drive: 0.6,
            post_level: 0.6,
            focus: PeakBand { freq: 2500.0, gain: 3.5, q: 8.0 },
            bass: PeakBand { freq: 100.0, gain: 0.5, q: 1.0 },
            mid: PeakBand { freq: 750.0, gain: 0.25, q: 1.0 },
            high: PeakBand { freq: 4000.0, gain: 5.0, q: 2.0 },
        }
    }
}

/// High-gain chain: pre-gain, focus boost, waveshaper, V-scoop EQ, level.
pub struct UltraMetal {
    pre_gain: f32,
    drive: f32,
    post_level: f32,
    focus: FixedBiquad,
    // bass, mid, high; run in that order after the clipper
    post_eq: [FixedBiquad; 3],
}

impl UltraMetal {
    pub const NAME: &'static str = "Ultra Metal";

    pub fn new(sample_rate: f32, p: &UltraMetalParams) -> Self {
        Self {
            pre_gain: p.pre_gain,
            drive: p.drive,
            post_level: p.post_level,
            focus: p.focus.design(sample_rate),
            post_eq: [
                p.bass.design(sample_rate),
                p.mid.design(sample_rate),
                p.high.design(sample_rate),
            ],
        }
    }
}

// tanh plus a fifth-power term that piles on high-order harmonics.
// Output is confined to [-1.5, 1.5].
#[inline]
fn harsh_clip(x: f32, drive: f32) -> f32 {
    let z = (x * (1.0 + 2.0 * drive)).tanh();
    z + 0.5 * z.powi(5)
}

impl Effect for UltraMetal {
    fn process(&mut self, buf: &mut [f32]) {
        for s in buf.iter_mut() {
            let mut x = self.focus.tick(*s * self.pre_gain);
            x = harsh_clip(x, self.drive);
            for eq in &mut self.post_eq {
                x = eq.tick(x);
            }
            *s = x * self.post_level;
        }
    }

    fn reset(&mut self) {
        self.focus.reset();
        for eq in &mut self.post_eq {
            eq.reset();
        }
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
