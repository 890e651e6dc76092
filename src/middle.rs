// Sits between the keyboard and the engine: turns key events into engine
// commands, and engine status into something the menu can draw.
use guitarfx::audio::StatusSnapshot;
use guitarfx::audio_api::{AudioCommand, CommandOutcome, LooperCommand};

use crate::shared::{DisplayState, EffectEntry, InputEvent};

pub struct Middle {
    names: Vec<&'static str>,
    chain_mode: bool, // what the digit keys currently mean
    message: Option<String>,
}

impl Middle {
    pub fn new(names: Vec<&'static str>) -> Self {
        Self { names, chain_mode: false, message: None }
    }

    /// The command to send for `event`, if any. `Quit` is the caller's job.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<AudioCommand> {
        let cmd = match event {
            InputEvent::EffectKey(index) if index >= self.names.len() => {
                self.message = Some("Invalid effect number".to_string());
                return None;
            }
            InputEvent::EffectKey(index) if self.chain_mode => {
                AudioCommand::ToggleChainEffect(index)
            }
            InputEvent::EffectKey(index) => AudioCommand::SelectEffect(index),
            InputEvent::ChainMode => {
                self.chain_mode = true;
                AudioCommand::SetChainMode(true)
            }
            InputEvent::SingleMode => {
                self.chain_mode = false;
                AudioCommand::SetChainMode(false)
            }
            InputEvent::ResetChain => AudioCommand::ResetChain,
            InputEvent::StartRecording => AudioCommand::Looper(LooperCommand::StartRecording),
            InputEvent::StopOrToggle => AudioCommand::Looper(LooperCommand::StopOrToggle),
            InputEvent::ClearLoop => AudioCommand::Looper(LooperCommand::Clear),
            InputEvent::Quit => return None,
        };
        Some(cmd)
    }

    pub fn on_outcome(&mut self, outcome: CommandOutcome) {
        let text = match outcome {
            Ok(ack) => ack.to_string(),
            Err(e) => e.to_string(),
        };
        self.message = Some(text);
    }

    pub fn display_state(&self, status: &StatusSnapshot) -> DisplayState {
        let effects = self
            .names
            .iter()
            .enumerate()
            .map(|(i, &name)| EffectEntry { name, enabled: status.chain_enabled(i) })
            .collect();
        DisplayState {
            looper: status.looper.to_string(),
            chain_mode: status.chain_mode,
            selected: status.selected,
            effects,
            message: self.message.clone(),
        }
    }
}
