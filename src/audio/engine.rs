use crate::audio_api::{Ack, AudioCommand, CommandOutcome, LooperCommand};

use super::chain::EffectChain;
use super::effect::{Effect, EffectSpec};
use super::error::CommandError;
use super::looper::{Looper, LooperMode};
use super::status::SharedStatus;

/// Owns every effect and decides which of them a block goes through.
///
/// Lives on the audio thread. The control side never touches it directly:
/// it sends `AudioCommand`s that the callback applies between blocks, so a
/// selection change can never land halfway through one.
pub struct Engine {
    sample_rate: f32,
    effects: Vec<Box<dyn Effect>>, // single-mode rack
    chain: EffectChain,            // its own instances, never aliased with `effects`
    looper: Looper,
    selected: usize,
    chain_mode: bool,
}

impl Engine {
    pub fn new(specs: &[EffectSpec], sample_rate: f32, max_loop_seconds: f32) -> Self {
        Self {
            sample_rate,
            effects: specs.iter().map(|s| s.build(sample_rate)).collect(),
            chain: EffectChain::from_specs(specs, sample_rate),
            looper: Looper::new(sample_rate, max_loop_seconds),
            selected: 0,
            chain_mode: false,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    pub fn effect_names(&self) -> Vec<&'static str> {
        self.effects.iter().map(|fx| fx.name()).collect()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn chain_mode(&self) -> bool {
        self.chain_mode
    }

    pub fn chain(&self) -> &EffectChain {
        &self.chain
    }

    pub fn looper(&self) -> &Looper {
        &self.looper
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) -> CommandOutcome {
        match cmd {
            AudioCommand::SelectEffect(index) => self.select_effect(index),
            AudioCommand::SetChainMode(on) => Ok(self.set_chain_mode(on)),
            AudioCommand::ToggleChainEffect(index) => self.toggle_chain_effect(index),
            AudioCommand::ResetChain => self.reset_chain(),
            AudioCommand::Looper(cmd) => self.handle_looper(cmd),
        }
    }

    pub fn select_effect(&mut self, index: usize) -> CommandOutcome {
        let fx = self.effects.get(index).ok_or(CommandError::InvalidEffect {
            index,
            len: self.effects.len(),
        })?;
        let name = fx.name();
        self.selected = index;
        self.chain_mode = false;
        Ok(Ack::EffectSelected(name))
    }

    pub fn set_chain_mode(&mut self, on: bool) -> Ack {
        self.chain_mode = on;
        Ack::ChainMode(on)
    }

    pub fn toggle_chain_effect(&mut self, index: usize) -> CommandOutcome {
        if !self.chain_mode {
            return Err(CommandError::NotInChainMode);
        }
        let invalid = CommandError::InvalidChainSlot { index, len: self.chain.len() };
        let enabled = self.chain.toggle_effect(index).ok_or(invalid)?;
        let name = self.chain.effect_name(index).ok_or(invalid)?;
        Ok(Ack::ChainToggled { name, enabled })
    }

    pub fn reset_chain(&mut self) -> CommandOutcome {
        if !self.chain_mode {
            return Err(CommandError::NotInChainMode);
        }
        self.chain.reset_all();
        Ok(Ack::ChainReset)
    }

    fn handle_looper(&mut self, cmd: LooperCommand) -> CommandOutcome {
        match cmd {
            LooperCommand::StartRecording => {
                self.looper.start_recording();
                Ok(Ack::RecordingStarted)
            }
            LooperCommand::StopRecording => {
                let len = self.looper.stop_recording()?;
                Ok(Ack::LoopSaved { seconds: len as f32 / self.sample_rate })
            }
            LooperCommand::TogglePlayback => match self.looper.toggle_playback()? {
                LooperMode::Paused => Ok(Ack::Paused),
                _ => Ok(Ack::Playing),
            },
            LooperCommand::StopOrToggle => {
                let next = if self.looper.mode() == LooperMode::Recording {
                    LooperCommand::StopRecording
                } else {
                    LooperCommand::TogglePlayback
                };
                self.handle_looper(next)
            }
            LooperCommand::Clear => {
                self.looper.clear_loop();
                Ok(Ack::LoopCleared)
            }
        }
    }

    /// Run one block in place: the selected path, then the looper.
    pub fn render_block(&mut self, block: &mut [f32]) {
        if self.chain_mode {
            self.chain.process(block);
        } else if let Some(fx) = self.effects.get_mut(self.selected) {
            fx.process(block);
        }
        self.looper.process(block);
    }

    pub fn publish(&self, status: &SharedStatus) {
        status.store(
            self.selected,
            self.chain_mode,
            self.chain.enabled_mask(),
            &self.looper.status(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::new(&EffectSpec::default_rack(), 1000.0, 1.0)
    }

    #[test]
    fn starts_on_clean() {
        let mut e = engine();
        assert_eq!(e.selected(), 0);
        assert!(!e.chain_mode());
        let mut buf = [0.3f32, -0.2];
        e.render_block(&mut buf);
        assert_eq!(buf, [0.3, -0.2]);
    }

    #[test]
    fn select_reports_the_effect_name() {
        let mut e = engine();
        assert_eq!(
            e.handle_cmd(AudioCommand::SelectEffect(1)),
            Ok(Ack::EffectSelected("Gain Boost"))
        );
        let mut buf = [0.1f32];
        e.render_block(&mut buf);
        assert!((buf[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn bad_selection_keeps_the_old_one() {
        let mut e = engine();
        e.select_effect(3).unwrap();
        assert_eq!(
            e.select_effect(11),
            Err(CommandError::InvalidEffect { index: 11, len: 11 })
        );
        assert_eq!(e.selected(), 3);
    }

    #[test]
    fn chain_commands_need_chain_mode() {
        let mut e = engine();
        assert_eq!(e.toggle_chain_effect(0), Err(CommandError::NotInChainMode));
        assert_eq!(e.reset_chain(), Err(CommandError::NotInChainMode));

        e.set_chain_mode(true);
        assert_eq!(
            e.toggle_chain_effect(1),
            Ok(Ack::ChainToggled { name: "Gain Boost", enabled: true })
        );
        assert_eq!(
            e.toggle_chain_effect(20),
            Err(CommandError::InvalidChainSlot { index: 20, len: 11 })
        );
        assert_eq!(e.chain().enabled_mask(), 0b10);
        assert_eq!(e.reset_chain(), Ok(Ack::ChainReset));
    }

    #[test]
    fn selecting_leaves_chain_mode() {
        let mut e = engine();
        e.set_chain_mode(true);
        e.select_effect(2).unwrap();
        assert!(!e.chain_mode());
    }

    #[test]
    fn stop_or_toggle_follows_looper_mode() {
        let mut e = engine();
        let l = AudioCommand::Looper;
        assert_eq!(e.handle_cmd(l(LooperCommand::StopOrToggle)), Err(CommandError::NoLoop));
        assert_eq!(e.handle_cmd(l(LooperCommand::StartRecording)), Ok(Ack::RecordingStarted));

        let mut block = [0.5f32; 500];
        e.render_block(&mut block);
        assert_eq!(
            e.handle_cmd(l(LooperCommand::StopOrToggle)),
            Ok(Ack::LoopSaved { seconds: 0.5 })
        );
        assert_eq!(e.handle_cmd(l(LooperCommand::StopOrToggle)), Ok(Ack::Paused));
        assert_eq!(e.handle_cmd(l(LooperCommand::TogglePlayback)), Ok(Ack::Playing));
        assert_eq!(e.handle_cmd(l(LooperCommand::Clear)), Ok(Ack::LoopCleared));
        assert_eq!(
            e.handle_cmd(l(LooperCommand::StopRecording)),
            Err(CommandError::NotRecording)
        );
    }

    #[test]
    fn publish_mirrors_state() {
        let mut e = engine();
        let status = SharedStatus::new(1000.0);
        e.set_chain_mode(true);
        e.toggle_chain_effect(4).unwrap();
        e.handle_cmd(AudioCommand::Looper(LooperCommand::StartRecording)).unwrap();
        e.render_block(&mut [0.0; 300]);
        e.publish(&status);

        let snap = status.snapshot();
        assert!(snap.chain_mode);
        assert!(snap.chain_enabled(4));
        assert!(!snap.chain_enabled(3));
        assert_eq!(snap.looper.mode, LooperMode::Recording);
        assert_eq!(snap.looper.to_string(), "REC [0.3s]");
    }
}
