// The stateful effects. The stateless ones live next to the trait in effect.rs.

mod echo;
mod flanger;
mod lfo;
mod pitch_bend;
mod reverb;
mod tremolo;
mod ultra_metal;
mod wahwah;

pub use echo::{Echo, EchoParams};
pub use flanger::{Flanger, FlangerParams};
pub use lfo::LfoWaveform;
pub use pitch_bend::{PitchBend, PitchBendParams};
pub use reverb::{Reverb, ReverbParams};
pub use tremolo::{Tremolo, TremoloParams};
pub use ultra_metal::{PeakBand, UltraMetal, UltraMetalParams};
pub use wahwah::{WahWah, WahWahParams};
