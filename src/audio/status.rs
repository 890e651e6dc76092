use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, AtomicU64, AtomicUsize, Ordering};

use super::looper::{LooperMode, LooperStatus};

/// Engine state mirrored for the display. The audio side stores once per
/// block; the control side reads whenever it redraws.
///
/// Fields are independent atomics, so a reader can see one field from
/// block n and another from block n+1. That is fine for drawing a menu and
/// nothing else should be decided from it.
#[derive(Debug, Default)]
pub struct SharedStatus {
    selected: AtomicUsize,
    chain_mode: AtomicBool,
    chain_mask: AtomicU64,
    looper_mode: AtomicU8,
    looper_position: AtomicUsize,
    loop_length: AtomicUsize,
    sample_rate: AtomicU32, // f32 bits
}

/// One read of every field in `SharedStatus`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusSnapshot {
    pub selected: usize,
    pub chain_mode: bool,
    pub chain_mask: u64,
    pub looper: LooperStatus,
}

impl StatusSnapshot {
    pub fn chain_enabled(&self, index: usize) -> bool {
        index < 64 && self.chain_mask & (1 << index) != 0
    }
}

impl SharedStatus {
    pub fn new(sample_rate: f32) -> Self {
        let status = Self::default();
        status.sample_rate.store(sample_rate.to_bits(), Ordering::Relaxed);
        status
    }

    pub(crate) fn store(
        &self,
        selected: usize,
        chain_mode: bool,
        chain_mask: u64,
        looper: &LooperStatus,
    ) {
        self.selected.store(selected, Ordering::Relaxed);
        self.chain_mode.store(chain_mode, Ordering::Relaxed);
        self.chain_mask.store(chain_mask, Ordering::Relaxed);
        self.looper_mode.store(looper.mode as u8, Ordering::Relaxed);
        self.looper_position.store(looper.position, Ordering::Relaxed);
        self.loop_length.store(looper.length, Ordering::Relaxed);
        self.sample_rate.store(looper.sample_rate.to_bits(), Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            selected: self.selected.load(Ordering::Relaxed),
            chain_mode: self.chain_mode.load(Ordering::Relaxed),
            chain_mask: self.chain_mask.load(Ordering::Relaxed),
            looper: LooperStatus {
                mode: LooperMode::from_u8(self.looper_mode.load(Ordering::Relaxed)),
                position: self.looper_position.load(Ordering::Relaxed),
                length: self.loop_length.load(Ordering::Relaxed),
                sample_rate: f32::from_bits(self.sample_rate.load(Ordering::Relaxed)),
            },
        }
    }
}
