use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LfoWaveform {
    #[default]
    Sine,
    Triangle,
    Square,
}

// Phase accumulator in radians, [0, TAU).
#[derive(Clone, Copy, Debug)]
pub struct Lfo {
    phase: f32,
    inc: f32,
}

impl Lfo {
    pub fn new(rate_hz: f32, sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            inc: TAU * rate_hz.max(0.0) / sample_rate,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    pub fn advance(&mut self) {
        // inc exceeds TAU when the rate is at or above the sample rate
        self.phase = (self.phase + self.inc).rem_euclid(TAU);
    }

    /// Current value in [-1, 1].
    #[inline]
    pub fn value(&self, waveform: LfoWaveform) -> f32 {
        match waveform {
            LfoWaveform::Sine => self.phase.sin(),
            LfoWaveform::Triangle => {
                let t = self.phase / TAU;
                if t < 0.5 { 4.0 * t - 1.0 } else { 3.0 - 4.0 * t }
            }
            LfoWaveform::Square => {
                if self.phase.sin() >= 0.0 { 1.0 } else { -1.0 }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_wraps_below_tau() {
        let mut lfo = Lfo::new(1000.0, 3000.0);
        for _ in 0..10 {
            lfo.advance();
            assert!(lfo.phase() >= 0.0 && lfo.phase() < TAU);
        }
    }

    #[test]
    fn rate_above_sample_rate_still_wraps() {
        let mut lfo = Lfo::new(7300.0, 1000.0);
        for _ in 0..1000 {
            lfo.advance();
            assert!(lfo.phase() >= 0.0 && lfo.phase() < TAU, "phase {}", lfo.phase());
        }
    }

    #[test]
    fn triangle_hits_corners() {
        let mut lfo = Lfo::new(1.0, 4.0); // quarter turn per step
        assert_eq!(lfo.value(LfoWaveform::Triangle), -1.0);
        lfo.advance();
        assert!(lfo.value(LfoWaveform::Triangle).abs() < 1e-6);
        lfo.advance();
        assert!((lfo.value(LfoWaveform::Triangle) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn square_follows_sine_sign() {
        let mut lfo = Lfo::new(1.0, 8.0);
        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(lfo.value(LfoWaveform::Square));
            lfo.advance();
        }
        assert_eq!(&seen[..4], &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(&seen[5..], &[-1.0, -1.0, -1.0]);
    }
}
