use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use fight_kokaton::compute::{init_state, tick};
use fight_kokaton::config::GameConfig;
use fight_kokaton::display::{self, Projection};
use fight_kokaton::entities::{FrameInput, GameState, GameStatus, HeldKeys};
use fight_kokaton::Result;

/// When set, log output goes to this file instead of stderr.
const LOG_FILE_VAR: &str = "KOKATON_LOG_FILE";

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// OS key-repeat runs at ≥ 15 Hz, so 7 frames (140 ms at 50 ticks/s) is
/// refreshed before it expires.
const HOLD_WINDOW: u64 = 7;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

fn held_keys(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> HeldKeys {
    use KeyCode::{Char, Down, Left, Right, Up};
    HeldKeys {
        up: any_held(key_frame, &[Up, Char('w'), Char('W')], frame),
        down: any_held(key_frame, &[Down, Char('s'), Char('S')], frame),
        left: any_held(key_frame, &[Left, Char('a'), Char('A')], frame),
        right: any_held(key_frame, &[Right, Char('d'), Char('D')], frame),
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Run one session until the kokaton is hit or the player quits.
///
/// Input model: a `key_frame` map records the frame of the last
/// press/repeat event for every key, and each frame the still-fresh
/// movement keys form the held-key snapshot.  Space and quit are edge
/// events: only a `Press` counts, never a repeat.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    config: &GameConfig,
    proj: &Projection,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let frame_len = config.frame_duration();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        let mut input = FrameInput::default();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            input.quit = true;
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            input.quit = true;
                        }
                        KeyCode::Char(' ') => input.fire = true,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }
        input.held = held_keys(&key_frame, frame);

        *state = tick(state, &input, config);
        display::render(out, state, proj)?;

        match state.status {
            GameStatus::Running => {}
            GameStatus::Quit => return Ok(()),
            GameStatus::Ending => {
                thread::sleep(config.death_pause);
                return Ok(());
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            thread::sleep(frame_len - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// The game owns the terminal, so logs can be diverted to a file.
fn init_logging() {
    let mut builder = env_logger::Builder::from_default_env();
    if let Ok(path) = std::env::var(LOG_FILE_VAR) {
        match File::create(&path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("cannot open log file {path}: {e}"),
        }
    }
    builder.init();
}

fn main() -> Result<()> {
    init_logging();

    let config = GameConfig::from_env()?;
    let (cols, rows) = terminal::size()?;
    let proj = Projection::new(cols, rows, config.viewport)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut state = init_state(&config, &mut rng);
    info!(
        "session start: viewport {}x{}, {} hazards, seed {:?}, culling {}",
        config.viewport.width,
        config.viewport.height,
        state.hazards.len(),
        config.seed,
        config.culling.as_str()
    );

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicated thread for blocking event reads so the loop never blocks.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut state, &config, &proj, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        if let Err(e) = out.execute(PopKeyboardEnhancementFlags) {
            warn!("failed to pop keyboard flags: {e}");
        }
    }
    if let Err(e) = out.execute(cursor::Show) {
        warn!("failed to show cursor: {e}");
    }
    if let Err(e) = out.execute(terminal::LeaveAlternateScreen) {
        warn!("failed to leave alternate screen: {e}");
    }
    if let Err(e) = terminal::disable_raw_mode() {
        warn!("failed to disable raw mode: {e}");
    }

    info!(
        "session over: {:?} after {} frames, score {}",
        state.status, state.frame, state.score.score
    );
    result
}
