use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::shared::InputEvent;

// poll for a key press, resolve it to an input event for the middle layer
pub fn poll_input(timeout: Duration) -> anyhow::Result<Option<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }
        // raw mode swallows the signal, so ctrl-c has to be a key
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(InputEvent::Quit));
        }
        return Ok(handle_key(key.code));
    }
    Ok(None)
}

pub fn handle_key(code: KeyCode) -> Option<InputEvent> {
    let event = match code {
        KeyCode::Esc | KeyCode::Char('q') => InputEvent::Quit,

        // effect keys, one per rack slot
        KeyCode::Char(c @ '1'..='9') => InputEvent::EffectKey(c as usize - '1' as usize),
        KeyCode::Char('0') => InputEvent::EffectKey(9),
        KeyCode::Char('-') => InputEvent::EffectKey(10),

        KeyCode::Char('c') => InputEvent::ChainMode,
        KeyCode::Char('s') => InputEvent::SingleMode,
        KeyCode::Char('r') => InputEvent::ResetChain,

        // looper: shifted L starts a take, lowercase stops / toggles
        KeyCode::Char('L') => InputEvent::StartRecording,
        KeyCode::Char('l') => InputEvent::StopOrToggle,
        KeyCode::Char('x') => InputEvent::ClearLoop,

        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_keys_cover_eleven_slots() {
        assert_eq!(handle_key(KeyCode::Char('1')), Some(InputEvent::EffectKey(0)));
        assert_eq!(handle_key(KeyCode::Char('9')), Some(InputEvent::EffectKey(8)));
        assert_eq!(handle_key(KeyCode::Char('0')), Some(InputEvent::EffectKey(9)));
        assert_eq!(handle_key(KeyCode::Char('-')), Some(InputEvent::EffectKey(10)));
    }

    #[test]
    fn looper_case_matters() {
        assert_eq!(handle_key(KeyCode::Char('L')), Some(InputEvent::StartRecording));
        assert_eq!(handle_key(KeyCode::Char('l')), Some(InputEvent::StopOrToggle));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        assert_eq!(handle_key(KeyCode::Char('z')), None);
        assert_eq!(handle_key(KeyCode::Enter), None);
    }
}
