use serde::{Deserialize, Serialize};

use super::lfo::{Lfo, LfoWaveform};
use crate::audio::biquad::{Biquad, BiquadCoeffs};
use crate::audio::effect::Effect;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WahWahParams {
    pub lfo_hz: f32, // sweep speed
    pub min_hz: f32,
    pub max_hz: f32,
    pub q: f32, // higher = more pronounced wah
}

impl Default for WahWahParams {
    fn default() -> Self {
        Self {
            lfo_hz: 0.5,
            min_hz: 400.0,
            max_hz: 2500.0,
            q: 5.0,
        }
    }
}

/// Bandpass whose centre sweeps between `min_hz` and `max_hz`.
pub struct WahWah {
    sample_rate: f32,
    min_hz: f32,
    max_hz: f32,
    q: f32,
    lfo: Lfo,
    filter: Biquad,
}

impl WahWah {
    pub const NAME: &'static str = "Wah-Wah";

    pub fn new(sample_rate: f32, p: &WahWahParams) -> Self {
        // keep the sweep strictly below nyquist so the design stays stable
        let nyquist = (sample_rate * 0.49).max(1.0);
        let min_hz = p.min_hz.clamp(1.0, nyquist);
        Self {
            sample_rate,
            min_hz,
            max_hz: p.max_hz.clamp(min_hz, nyquist),
            q: p.q.max(0.01),
            lfo: Lfo::new(p.lfo_hz, sample_rate),
            filter: Biquad::new(),
        }
    }
}

impl Effect for WahWah {
    fn process(&mut self, buf: &mut [f32]) {
        for s in buf.iter_mut() {
            let sweep = 0.5 * (1.0 + self.lfo.value(LfoWaveform::Sine));
            let center = self.min_hz + sweep * (self.max_hz - self.min_hz);
            // the centre moves every sample, so the design does too
            let coeffs = BiquadCoeffs::bandpass(self.sample_rate, center, self.q);
            *s = self.filter.tick(&coeffs, *s);
            self.lfo.advance();
        }
    }

    fn reset(&mut self) {
        self.lfo.reset();
        self.filter.reset();
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
