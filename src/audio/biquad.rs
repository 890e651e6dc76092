use std::f32::consts::TAU;

// Below this a decaying recursive state is inaudible; snapping it to zero
// keeps the tail out of the subnormal range.
const DENORMAL_FLOOR: f32 = 1e-15;

#[inline]
pub(crate) fn flush_denormal(x: f32) -> f32 {
    if x.abs() < DENORMAL_FLOOR { 0.0 } else { x }
}

// Normalised coefficients (a0 already divided out).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoeffs {
    /// Bandpass with 0 dB gain at the centre frequency.
    pub fn bandpass(sample_rate: f32, center: f32, q: f32) -> Self {
        let w0 = TAU * center / sample_rate;
        let alpha = w0.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;
        Self {
            b0: alpha / a0,
            b1: 0.0,
            b2: -alpha / a0,
            a1: -2.0 * w0.cos() / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// Peaking EQ. `gain` is a linear amplitude factor at the centre
    /// frequency (so 0.5 cuts, 3.5 boosts); A = sqrt(gain).
    pub fn peaking(sample_rate: f32, center: f32, gain: f32, q: f32) -> Self {
        let w0 = TAU * center / sample_rate;
        let a = gain.max(f32::MIN_POSITIVE).sqrt();
        let alpha = w0.sin() / (2.0 * q);
        let cos = w0.cos();
        let a0 = 1.0 + alpha / a;
        Self {
            b0: (1.0 + alpha * a) / a0,
            b1: -2.0 * cos / a0,
            b2: (1.0 - alpha * a) / a0,
            a1: -2.0 * cos / a0,
            a2: (1.0 - alpha / a) / a0,
        }
    }
}

/// One second-order section. The coefficients live outside the state so
/// a swept filter can hand in fresh ones every sample while a fixed EQ
/// stage designs them once.
#[derive(Clone, Copy, Debug, Default)]
pub struct Biquad {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn tick(&mut self, c: &BiquadCoeffs, x: f32) -> f32 {
        let y = c.b0 * x + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;
        let y = flush_denormal(y);
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

/// A biquad bundled with coefficients designed once at construction.
#[derive(Clone, Copy, Debug)]
pub struct FixedBiquad {
    coeffs: BiquadCoeffs,
    state: Biquad,
}

impl FixedBiquad {
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self { coeffs, state: Biquad::new() }
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    #[inline]
    pub fn tick(&mut self, x: f32) -> f32 {
        self.state.tick(&self.coeffs, x)
    }
}
