// Controller-side types: what the keyboard produces and what the menu draws.
//
// Keys:
//   1-9, 0, -      //  EffectKey(0..=10): select in single mode, toggle in chain mode
//   c              //  ChainMode
//   s              //  SingleMode
//   r              //  ResetChain (chain mode only)
//   L              //  StartRecording
//   l              //  StopOrToggle (stop recording, else play/pause)
//   x              //  ClearLoop
//   q / Esc        //  Quit

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    EffectKey(usize), // 0-based
    ChainMode,
    SingleMode,
    ResetChain,
    StartRecording,
    StopOrToggle,
    ClearLoop,
    Quit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayState {
    pub looper: String, // "EMPTY", "REC [1.2s]", ...
    pub chain_mode: bool,
    pub selected: usize,
    pub effects: Vec<EffectEntry>,
    pub message: Option<String>, // result of the last command
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectEntry {
    pub name: &'static str,
    pub enabled: bool, // chain slot state
}
