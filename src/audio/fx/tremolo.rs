use serde::{Deserialize, Serialize};

use super::lfo::{Lfo, LfoWaveform};
use crate::audio::effect::Effect;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TremoloParams {
    pub rate_hz: f32,
    pub depth: f32, // 0..1, gain swings over [1 - depth, 1 + depth]
    pub waveform: LfoWaveform,
}

impl Default for TremoloParams {
    fn default() -> Self {
        Self {
            rate_hz: 5.0,
            depth: 0.5,
            waveform: LfoWaveform::Sine,
        }
    }
}

pub struct Tremolo {
    depth: f32,
    waveform: LfoWaveform,
    lfo: Lfo,
}

impl Tremolo {
    pub const NAME: &'static str = "Tremolo";

    pub fn new(sample_rate: f32, p: &TremoloParams) -> Self {
        Self {
            depth: p.depth.clamp(0.0, 1.0),
            waveform: p.waveform,
            lfo: Lfo::new(p.rate_hz, sample_rate),
        }
    }
}

impl Effect for Tremolo {
    fn process(&mut self, buf: &mut [f32]) {
        for s in buf.iter_mut() {
            *s *= 1.0 + self.lfo.value(self.waveform) * self.depth;
            self.lfo.advance();
        }
    }

    fn reset(&mut self) {
        self.lfo.reset();
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(waveform: LfoWaveform) -> Vec<f32> {
        let p = TremoloParams { rate_hz: 1.0, depth: 0.5, waveform };
        let mut fx = Tremolo::new(100.0, &p);
        let mut buf = vec![1.0f32; 100];
        fx.process(&mut buf);
        buf
    }

    #[test]
    fn gain_swings_between_one_minus_and_one_plus_depth() {
        for w in [LfoWaveform::Sine, LfoWaveform::Triangle, LfoWaveform::Square] {
            let env = envelope(w);
            let lo = env.iter().cloned().fold(f32::MAX, f32::min);
            let hi = env.iter().cloned().fold(f32::MIN, f32::max);
            assert!(lo >= 0.5 - 1e-5 && hi <= 1.5 + 1e-5, "{w:?}: {lo}..{hi}");
            assert!(hi - lo > 0.9, "{w:?} barely moves");
        }
    }

    #[test]
    fn square_only_has_two_levels() {
        let env = envelope(LfoWaveform::Square);
        assert!(env.iter().all(|g| *g == 0.5 || *g == 1.5));
    }

    #[test]
    fn zero_depth_is_transparent() {
        let p = TremoloParams { depth: 0.0, ..Default::default() };
        let mut fx = Tremolo::new(48000.0, &p);
        let mut buf = [0.3f32, -0.2, 0.9];
        fx.process(&mut buf);
        assert_eq!(buf, [0.3, -0.2, 0.9]);
    }
}
