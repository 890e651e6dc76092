// Fixed-capacity circular sample buffer. Everything with a memory
// (echo, flanger, reverb stages, pitch bend) sits on top of this.

#[derive(Clone, Debug)]
pub struct DelayLine {
    buf: Vec<f32>,
    write: usize, // always in [0, capacity)
}

impl DelayLine {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0.0; capacity.max(1)], // a zero-size ring has no valid index
            write: 0,
        }
    }

    // capacity from a duration, e.g. 2.0s at 48k = 96000 slots
    pub fn with_seconds(sample_rate: f32, max_seconds: f32) -> Self {
        Self::new((sample_rate * max_seconds.max(0.0)) as usize)
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn write_pos(&self) -> usize {
        self.write
    }

    pub fn clear(&mut self) {
        self.buf.fill(0.0);
        self.write = 0;
    }

    /// Sample written `delay` samples ago. `delay` is taken modulo capacity,
    /// so a delay of 0 reads the slot about to be overwritten.
    #[inline]
    pub fn read(&self, delay: usize) -> f32 {
        let cap = self.buf.len();
        self.buf[(self.write + cap - delay % cap) % cap]
    }

    /// Fractional read `delay` samples behind the write cursor, linearly
    /// blending the two neighbouring slots.
    #[inline]
    pub fn read_interpolated(&self, delay: f32) -> f32 {
        let cap = self.buf.len() as f32;
        let mut pos = self.write as f32 - delay;
        if pos < 0.0 {
            pos = pos.rem_euclid(cap);
        }
        self.read_at(pos)
    }

    /// Read at an absolute fractional index, wrapping past the end.
    #[inline]
    pub fn read_at(&self, pos: f32) -> f32 {
        let cap = self.buf.len();
        let i = pos as usize; // ex. 10.7 -> 10
        let frac = pos - i as f32; // ex. 0.7
        let a = self.buf[i % cap];
        let b = self.buf[(i + 1) % cap];
        a * (1.0 - frac) + b * frac
    }

    /// Raw slot access, no cursor arithmetic.
    #[inline]
    pub fn get(&self, index: usize) -> f32 {
        self.buf[index % self.buf.len()]
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: f32) {
        let cap = self.buf.len();
        self.buf[index % cap] = value;
    }

    /// Overwrite the slot under the cursor without moving it.
    #[inline]
    pub fn write(&mut self, value: f32) {
        self.buf[self.write] = value;
    }

    #[inline]
    pub fn advance(&mut self) {
        self.write += 1;
        if self.write == self.buf.len() {
            self.write = 0;
        }
    }

    /// Write then advance, the usual per-sample step.
    #[inline]
    pub fn push(&mut self, value: f32) {
        self.write(value);
        self.advance();
    }
}
