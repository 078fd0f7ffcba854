mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::filter::EnvFilter;

use torch_dungeon::{GameConfig, World};

const FRAME: Duration = Duration::from_micros(16_667); // ≈60 FPS

/// Degrees of rotate input per frame while a turn key is held.
const TURN_RATE: f64 = 1.5;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

#[derive(Parser)]
#[command(name = "torch_dungeon")]
#[command(about = "Top-down torch-lit dungeon shooter in the terminal")]
struct Args {
    /// Seed for a reproducible dungeon (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file overriding balance constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write tracing output here (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

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

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: instead of acting on each key event individually, we keep a
/// `key_frame` map with the frame number of the last press/repeat event
/// for every key.  Each frame every "fresh" key applies its effect, so
/// walking, turning and shooting combine freely.
fn game_loop<W: Write>(
    out: &mut W,
    world: &mut World,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut debug = false;
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if world.is_game_over() => {
                            world.start_game(rng);
                        }
                        KeyCode::F(3) => debug = !debug,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Apply held-key actions every frame ────────────────────────────────
        if !world.is_game_over() {
            let mut forward = 0.0;
            let mut turn = 0.0;
            if any_held(&key_frame, &[KeyCode::Char('w'), KeyCode::Char('W'), KeyCode::Up], frame) {
                forward += 1.0;
            }
            if any_held(&key_frame, &[KeyCode::Char('s'), KeyCode::Char('S'), KeyCode::Down], frame) {
                forward -= 1.0;
            }
            if any_held(&key_frame, &[KeyCode::Char('a'), KeyCode::Char('A'), KeyCode::Left], frame) {
                turn -= TURN_RATE;
            }
            if any_held(&key_frame, &[KeyCode::Char('d'), KeyCode::Char('D'), KeyCode::Right], frame) {
                turn += TURN_RATE;
            }

            world.move_player(forward);
            world.rotate_player(turn);
            if is_held(&key_frame, &KeyCode::Char(' '), frame) {
                world.player_shoot();
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last_tick).as_secs_f64();
        last_tick = now;
        world.update(dt, rng);

        display::render(out, world, debug).context("failed to draw frame")?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    // The terminal belongs to the game, so logs only go to a file.
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    tracing::info!(seed = ?args.seed, "starting session");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let mut world = World::new(config);
    world.start_game(&mut rng);
    let result = game_loop(&mut out, &mut world, &mut rng, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Some(player) = &world.player {
        tracing::info!(kills = player.kills, "session ended");
    }
    result
}
