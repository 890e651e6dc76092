mod middle;
mod shared;
mod tui;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use crossterm::terminal;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use guitarfx::{Config, Engine, audio};
use middle::Middle;
use shared::InputEvent;

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// RUST_LOG wins; otherwise only warnings, so the menu stays readable
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> anyhow::Result<()> {
    let config_dir: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    let cfg = Config::load(&config_dir);

    let engine = Engine::new(&cfg.effects, cfg.sample_rate as f32, cfg.max_loop_seconds);
    let mut middle = Middle::new(engine.effect_names());
    tracing::info!(effects = cfg.effects.len(), "engine ready");

    let audio = audio::start_audio(&cfg, engine).context("could not start audio")?;

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = Duration::from_millis(30);
    let mut last_drawn: Option<shared::DisplayState> = None;

    loop {
        while let Some(outcome) = audio.poll_outcome() {
            tracing::debug!(?outcome, "command outcome");
            middle.on_outcome(outcome);
        }

        // redraw only when something visible changed
        let ds = middle.display_state(&audio.status().snapshot());
        if last_drawn.as_ref() != Some(&ds) {
            term.draw(|frame| tui::view::render(frame, frame.area(), &ds))?;
            last_drawn = Some(ds);
        }

        match tui::input::poll_input(tick_rate)? {
            Some(InputEvent::Quit) => break,
            Some(event) => {
                if let Some(cmd) = middle.handle_input(event) {
                    audio.send(cmd);
                }
            }
            None => {}
        }
    }

    drop(term);
    drop(audio);
    Ok(())
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
