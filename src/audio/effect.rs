use serde::{Deserialize, Serialize};

use super::biquad::flush_denormal;
use super::fx::{
    Echo, EchoParams, Flanger, FlangerParams, PitchBend, PitchBendParams, Reverb, ReverbParams,
    Tremolo, TremoloParams, UltraMetal, UltraMetalParams, WahWah, WahWahParams,
};

/// Every processor the engine can run on a block: single effects, the
/// chain, and the looper.
///
/// `process` runs in the audio callback, so implementations must not
/// allocate, lock, or do anything whose cost isn't linear in `buf.len()`.
/// All state is sized in the constructor.
pub trait Effect: Send {
    /// Transform one block in place, advancing internal state once per sample.
    fn process(&mut self, buf: &mut [f32]);

    /// Back to the just-constructed state (silence in every buffer).
    fn reset(&mut self);

    fn name(&self) -> &'static str;
}

// The closed set of effects, with their construction-time parameters.
// This is also what the config file lists, so every field has a default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EffectSpec {
    Clean,
    GainBoost(GainParams),
    LowPass(LowPassParams),
    Distortion(DistortionParams),
    Echo(EchoParams),
    WahWah(WahWahParams),
    Tremolo(TremoloParams),
    Flanger(FlangerParams),
    Reverb(ReverbParams),
    PitchBend(PitchBendParams),
    UltraMetal(UltraMetalParams),
}

impl EffectSpec {
    pub fn build(&self, sample_rate: f32) -> Box<dyn Effect> {
        match self {
            EffectSpec::Clean => Box::new(Clean),
            EffectSpec::GainBoost(p) => Box::new(GainBoost::new(p)),
            EffectSpec::LowPass(p) => Box::new(LowPassFilter::new(p)),
            EffectSpec::Distortion(p) => Box::new(Distortion::new(p)),
            EffectSpec::Echo(p) => Box::new(Echo::new(sample_rate, p)),
            EffectSpec::WahWah(p) => Box::new(WahWah::new(sample_rate, p)),
            EffectSpec::Tremolo(p) => Box::new(Tremolo::new(sample_rate, p)),
            EffectSpec::Flanger(p) => Box::new(Flanger::new(sample_rate, p)),
            EffectSpec::Reverb(p) => Box::new(Reverb::new(sample_rate, p)),
            EffectSpec::PitchBend(p) => Box::new(PitchBend::new(p)),
            EffectSpec::UltraMetal(p) => Box::new(UltraMetal::new(sample_rate, p)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EffectSpec::Clean => Clean::NAME,
            EffectSpec::GainBoost(_) => GainBoost::NAME,
            EffectSpec::LowPass(_) => LowPassFilter::NAME,
            EffectSpec::Distortion(_) => Distortion::NAME,
            EffectSpec::Echo(_) => Echo::NAME,
            EffectSpec::WahWah(_) => WahWah::NAME,
            EffectSpec::Tremolo(_) => Tremolo::NAME,
            EffectSpec::Flanger(_) => Flanger::NAME,
            EffectSpec::Reverb(_) => Reverb::NAME,
            EffectSpec::PitchBend(_) => PitchBend::NAME,
            EffectSpec::UltraMetal(_) => UltraMetal::NAME,
        }
    }

    // The full rack, menu order.
    pub fn default_rack() -> Vec<EffectSpec> {
        vec![
            EffectSpec::Clean,
            EffectSpec::GainBoost(GainParams::default()),
            EffectSpec::LowPass(LowPassParams::default()),
            EffectSpec::Distortion(DistortionParams::default()),
            EffectSpec::Echo(EchoParams::default()),
            EffectSpec::WahWah(WahWahParams::default()),
            EffectSpec::Tremolo(TremoloParams::default()),
            EffectSpec::Flanger(FlangerParams::default()),
            EffectSpec::Reverb(ReverbParams::default()),
            EffectSpec::PitchBend(PitchBendParams::default()),
            EffectSpec::UltraMetal(UltraMetalParams::default()),
        ]
    }
}

//clean
pub struct Clean;

impl Clean {
    pub const NAME: &'static str = "Clean";
}

impl Effect for Clean {
    fn process(&mut self, _buf: &mut [f32]) {}

    fn reset(&mut self) {}

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

//gain boost
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainParams {
    pub gain: f32,
}

impl Default for GainParams {
    fn default() -> Self {
        Self { gain: 10.0 }
    }
}

pub struct GainBoost {
    gain: f32,
}

impl GainBoost {
    pub const NAME: &'static str = "Gain Boost";

    pub fn new(p: &GainParams) -> Self {
        Self { gain: p.gain }
    }
}

impl Effect for GainBoost {
    fn process(&mut self, buf: &mut [f32]) {
        for s in buf.iter_mut() {
            *s *= self.gain;
        }
    }

    fn reset(&mut self) {}

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

//low pass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowPassParams {
    pub alpha: f32, // smoothing factor, (0, 1)
}

impl Default for LowPassParams {
    fn default() -> Self {
        Self { alpha: 0.1 }
    }
}

// one-pole smoother: y += alpha * (x - y)
pub struct LowPassFilter {
    alpha: f32,
    prev: f32,
}

impl LowPassFilter {
    pub const NAME: &'static str = "Low-Pass Filter";

    pub fn new(p: &LowPassParams) -> Self {
        Self {
            alpha: p.alpha.clamp(1e-6, 1.0),
            prev: 0.0,
        }
    }
}

impl Effect for LowPassFilter {
    fn process(&mut self, buf: &mut [f32]) {
        for s in buf.iter_mut() {
            self.prev = flush_denormal(self.prev + self.alpha * (*s - self.prev));
            *s = self.prev;
        }
    }

    fn reset(&mut self) {
        self.prev = 0.0;
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

//distortion
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistortionParams {
    pub drive: f32,
}

impl Default for DistortionParams {
    fn default() -> Self {
        Self { drive: 20.0 }
    }
}

pub struct Distortion {
    drive: f32,
}

impl Distortion {
    pub const NAME: &'static str = "Distortion";

    pub fn new(p: &DistortionParams) -> Self {
        Self { drive: p.drive }
    }
}

impl Effect for Distortion {
    fn process(&mut self, buf: &mut [f32]) {
        for s in buf.iter_mut() {
            *s = (*s * self.drive).tanh();
        }
    }

    fn reset(&mut self) {}

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
