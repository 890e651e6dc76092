use serde::{Deserialize, Serialize};

use super::lfo::{Lfo, LfoWaveform};
use crate::audio::delay_line::DelayLine;
use crate::audio::effect::Effect;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlangerParams {
    pub rate_hz: f32,
    pub min_delay_s: f32,
    pub max_delay_s: f32,
    pub feedback: f32, // kept within [0, 0.95]
    pub mix: f32,
}

impl Default for FlangerParams {
    fn default() -> Self {
        Self {
            rate_hz: 0.5,
            min_delay_s: 0.001,
            max_delay_s: 0.005,
            feedback: 0.5,
            mix: 0.5,
        }
    }
}

/// Sine-swept fractional delay with feedback. The moving comb notches
/// are the whole sound.
pub struct Flanger {
    line: DelayLine,
    min_delay: f32, // samples
    max_delay: f32,
    feedback: f32,
    mix: f32,
    lfo: Lfo,
}

impl Flanger {
    pub const NAME: &'static str = "Flanger";

    pub fn new(sample_rate: f32, p: &FlangerParams) -> Self {
        let min_delay = (p.min_delay_s.max(0.0) * sample_rate).max(1.0);
        let max_delay = (p.max_delay_s * sample_rate).max(min_delay);
        Self {
            // one extra slot so the longest delay never reads the cursor
            line: DelayLine::new(max_delay as usize + 1),
            min_delay,
            max_delay,
            feedback: p.feedback.clamp(0.0, 0.95),
            mix: p.mix.clamp(0.0, 1.0),
            lfo: Lfo::new(p.rate_hz, sample_rate),
        }
    }
}

impl Effect for Flanger {
    fn process(&mut self, buf: &mut [f32]) {
        let range = self.max_delay - self.min_delay;
        for s in buf.iter_mut() {
            let sweep = (self.lfo.value(LfoWaveform::Sine) + 1.0) * 0.5;
            let delay = self.min_delay + sweep * range;
            let delayed = self.line.read_interpolated(delay);

            let input = *s;
            self.line.push(input + delayed * self.feedback);
            *s = input * (1.0 - self.mix) + delayed * self.mix;

            self.lfo.advance();
        }
    }

    fn reset(&mut self) {
        self.line.clear();
        self.lfo.reset();
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dc_input_settles_to_a_bounded_level() {
        let mut fx = Flanger::new(48000.0, &FlangerParams::default());
        let mut peak = 0.0f32;
        for _ in 0..1000 {
            let mut buf = [1.0f32; 128];
            fx.process(&mut buf);
            peak = buf.iter().fold(peak, |m, s| m.max(s.abs()));
        }
        // feedback 0.5 and mix 0.5: the delayed path converges to 2.0,
        // so the output sits around 1.5
        assert!(peak < 1.6, "peak {peak}");
        assert!(peak > 1.4, "peak {peak}");
    }

    #[test]
    fn impulse_reappears_between_min_and_max_delay() {
        let p = FlangerParams { rate_hz: 0.0, feedback: 0.0, mix: 1.0, ..Default::default() };
        // rate 0 pins the sweep at its midpoint: (1ms + 5ms) / 2 at 10k = 30 samples
        let mut fx = Flanger::new(10000.0, &p);
        let mut buf = vec![0.0f32; 60];
        buf[0] = 1.0;
        fx.process(&mut buf);
        let (at, peak) = buf
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |(ai, av), (i, v)| if *v > av { (i, *v) } else { (ai, av) });
        assert_eq!(at, 30);
        assert!((peak - 1.0).abs() < 1e-4);
    }

    #[test]
    fn reset_clears_the_tail() {
        let mut fx = Flanger::new(44100.0, &FlangerParams::default());
        let mut buf = [1.0f32; 64];
        fx.process(&mut buf);
        fx.reset();
        let mut silence = [0.0f32; 512];
        fx.process(&mut silence);
        assert!(silence.iter().all(|s| *s == 0.0));
    }

    fn block_peak(fx: &mut Flanger) -> f32 {
        let mut block = [0.0f32; 256];
        fx.process(&mut block);
        block.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn feedback_tail_fades_until_reset() {
        let mut fx = Flanger::new(48000.0, &FlangerParams::default());
        let mut hit = [0.0f32; 256];
        hit[0] = 1.0;
        fx.process(&mut hit);

        let peaks: Vec<f32> = (0..30).map(|_| block_peak(&mut fx)).collect();
        let early = peaks[..5].iter().fold(0.0f32, |m, p| m.max(*p));
        let late = peaks[25..].iter().fold(0.0f32, |m, p| m.max(*p));
        assert!(late < early, "{peaks:?}");
        assert!(peaks[29] < 0.01 * peaks[0], "{peaks:?}");
        // still ringing: silence alone does not clear the line
        assert!(peaks[29] > 0.0);

        fx.reset();
        assert_eq!(block_peak(&mut fx), 0.0);
    }
}
