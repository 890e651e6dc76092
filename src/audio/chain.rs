use super::effect::{Effect, EffectSpec};

/// Fixed-order series of effects, each with its own on/off switch.
///
/// Slots are appended once while building and never reordered. A disabled
/// slot is skipped entirely: it gets no `process` calls, so an LFO inside
/// it resumes from where it stopped rather than where it "would" be.
/// `reset_all` still reaches every slot.
pub struct EffectChain {
    slots: Vec<Slot>,
}

struct Slot {
    effect: Box<dyn Effect>,
    enabled: bool,
}

impl EffectChain {
    pub const NAME: &'static str = "Effect Chain";

    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// One instance per rack entry, all switched off.
    pub fn from_specs(specs: &[EffectSpec], sample_rate: f32) -> Self {
        let mut chain = Self::new();
        for spec in specs {
            chain.add_effect(spec.build(sample_rate), false);
        }
        chain
    }

    pub fn add_effect(&mut self, effect: Box<dyn Effect>, enabled: bool) {
        self.slots.push(Slot { effect, enabled });
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Flip slot `index`. Returns the new state, or `None` if there is no
    /// such slot (nothing changes).
    pub fn toggle_effect(&mut self, index: usize) -> Option<bool> {
        let slot = self.slots.get_mut(index)?;
        slot.enabled = !slot.enabled;
        Some(slot.enabled)
    }

    pub fn is_enabled(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.enabled)
    }

    pub fn effect_name(&self, index: usize) -> Option<&'static str> {
        self.slots.get(index).map(|s| s.effect.name())
    }

    // bit i set = slot i enabled; slots past 63 aren't represented
    pub fn enabled_mask(&self) -> u64 {
        self.slots
            .iter()
            .take(64)
            .enumerate()
            .filter(|(_, s)| s.enabled)
            .fold(0, |mask, (i, _)| mask | (1 << i))
    }

    pub fn reset_all(&mut self) {
        for slot in &mut self.slots {
            slot.effect.reset();
        }
    }
}

impl Default for EffectChain {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for EffectChain {
    fn process(&mut self, buf: &mut [f32]) {
        for slot in &mut self.slots {
            if slot.enabled {
                slot.effect.process(buf);
            }
        }
    }

    fn reset(&mut self) {
        self.reset_all();
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Gain stage that counts its calls through shared counters, so the
    // test can still see them after the chain has taken the box.
    struct Spy {
        gain: f32,
        processed: Arc<AtomicUsize>,
        resets: Arc<AtomicUsize>,
    }

    #[derive(Default)]
    struct Counters {
        processed: Arc<AtomicUsize>,
        resets: Arc<AtomicUsize>,
    }

    impl Counters {
        fn spy(&self, gain: f32) -> Box<Spy> {
            Box::new(Spy {
                gain,
                processed: Arc::clone(&self.processed),
                resets: Arc::clone(&self.resets),
            })
        }

        fn get(&self) -> (usize, usize) {
            (self.processed.load(Ordering::Relaxed), self.resets.load(Ordering::Relaxed))
        }
    }

    impl Effect for Spy {
        fn process(&mut self, buf: &mut [f32]) {
            self.processed.fetch_add(1, Ordering::Relaxed);
            for s in buf.iter_mut() {
                *s *= self.gain;
            }
        }

        fn reset(&mut self) {
            self.resets.fetch_add(1, Ordering::Relaxed);
        }

        fn name(&self) -> &'static str {
            "Spy"
        }
    }

    #[test]
    fn enabled_slots_fold_in_order() {
        let c = Counters::default();
        let mut chain = EffectChain::new();
        chain.add_effect(c.spy(2.0), true);
        chain.add_effect(c.spy(0.0), false);
        chain.add_effect(c.spy(3.0), true);

        let mut buf = [1.0f32, -0.5];
        chain.process(&mut buf);
        assert_eq!(buf, [6.0, -3.0]);
    }

    #[test]
    fn all_disabled_is_pass_through() {
        let mut chain = EffectChain::from_specs(&EffectSpec::default_rack(), 48000.0);
        assert_eq!(chain.enabled_mask(), 0);
        let mut buf = [0.1f32, 0.2, -0.3];
        chain.process(&mut buf);
        assert_eq!(buf, [0.1, 0.2, -0.3]);
    }

    #[test]
    fn double_toggle_restores_flag() {
        let mut chain = EffectChain::from_specs(&EffectSpec::default_rack(), 48000.0);
        assert_eq!(chain.toggle_effect(4), Some(true));
        assert!(chain.is_enabled(4));
        assert_eq!(chain.enabled_mask(), 1 << 4);
        assert_eq!(chain.toggle_effect(4), Some(false));
        assert!(!chain.is_enabled(4));
    }

    #[test]
    fn out_of_range_toggle_changes_nothing() {
        let mut chain = EffectChain::from_specs(&EffectSpec::default_rack(), 48000.0);
        chain.toggle_effect(1);
        let before = chain.enabled_mask();
        assert_eq!(chain.toggle_effect(chain.len()), None);
        assert_eq!(chain.toggle_effect(usize::MAX), None);
        assert_eq!(chain.enabled_mask(), before);
        assert!(!chain.is_enabled(chain.len()));
    }

    #[test]
    fn disabled_slot_gets_resets_but_no_blocks() {
        let off = Counters::default();
        let on = Counters::default();
        let mut chain = EffectChain::new();
        chain.add_effect(off.spy(1.0), false);
        chain.add_effect(on.spy(1.0), true);

        let mut buf = [0.0f32; 16];
        for _ in 0..5 {
            chain.process(&mut buf);
        }
        chain.reset_all();

        assert_eq!(off.get(), (0, 1));
        assert_eq!(on.get(), (5, 1));
    }

    #[test]
    fn re_enabled_lfo_resumes_where_it_stopped() {
        // a tremolo that sat disabled starts from phase zero when switched
        // on, not from where a free-running LFO would be
        let rack = EffectSpec::default_rack();
        let tremolo = rack.iter().position(|s| s.label() == "Tremolo").unwrap();

        let mut skipped = EffectChain::from_specs(&rack, 1000.0);
        let mut buf = [1.0f32; 100];
        skipped.process(&mut buf);
        skipped.toggle_effect(tremolo);
        let mut late = [1.0f32; 16];
        skipped.process(&mut late);

        let mut fresh = EffectChain::from_specs(&rack, 1000.0);
        fresh.toggle_effect(tremolo);
        let mut early = [1.0f32; 16];
        fresh.process(&mut early);

        assert_eq!(late, early);
    }
}
