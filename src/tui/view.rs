use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Text};
use ratatui::widgets::Paragraph;

use crate::shared::DisplayState;

const RULE: &str = "==================================================";

// digit shown next to each rack slot, matching the input keys
const SLOT_KEYS: [&str; 11] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-"];

/// The whole menu as lines of text.
pub fn menu_lines(state: &DisplayState) -> Vec<String> {
    let mut lines = vec![
        RULE.to_string(),
        " Guitar FX".to_string(),
        RULE.to_string(),
        String::new(),
        format!("[LOOPER: {}]", state.looper),
        String::new(),
    ];

    if state.chain_mode {
        lines.push("[CHAIN MODE - Multiple Effects]".to_string());
        lines.push(String::new());
        lines.push("Effect Chain:".to_string());
        for (i, fx) in state.effects.iter().enumerate() {
            let dot = if fx.enabled { "●" } else { "○" };
            lines.push(format!("  {}. [{dot}] {}", slot_key(i), fx.name));
        }
        lines.push(String::new());
        lines.push("Commands:".to_string());
        lines.push("  1-9,0,- : Toggle effect on/off".to_string());
        lines.push("  s       : Switch to Single Mode".to_string());
        lines.push("  r       : Reset all effects".to_string());
    } else {
        lines.push("[SINGLE EFFECT MODE]".to_string());
        lines.push(String::new());
        lines.push("Effects:".to_string());
        for (i, fx) in state.effects.iter().enumerate() {
            let marker = if i == state.selected { "→" } else { " " };
            lines.push(format!("  {marker} {}. {}", slot_key(i), fx.name));
        }
        lines.push(String::new());
        lines.push("Commands:".to_string());
        lines.push("  1-9,0,- : Select effect".to_string());
        lines.push("  c       : Switch to Chain Mode".to_string());
    }

    lines.push(String::new());
    lines.push("Looper Controls:".to_string());
    lines.push("  L       : Start recording loop".to_string());
    lines.push("  l       : Stop recording / Toggle playback".to_string());
    lines.push("  x       : Clear loop".to_string());
    lines.push("  q       : Quit".to_string());
    lines.push(RULE.to_string());

    if let Some(msg) = &state.message {
        lines.push(String::new());
        lines.push(format!("✓ {msg}"));
    }
    lines
}

fn slot_key(i: usize) -> &'static str {
    SLOT_KEYS.get(i).copied().unwrap_or("?")
}

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let text: Text = menu_lines(state).into_iter().map(Line::from).collect();
    frame.render_widget(Paragraph::new(text), area);
}
