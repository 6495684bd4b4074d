mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};
use tracing_subscriber::EnvFilter;

use alien_invasion::compute::{new_game, next_round, outcome, tick, toggle_pause, Outcome};
use alien_invasion::config::GameConfig;
use alien_invasion::entities::{RoundPhase, RoundState};
use alien_invasion::error::GameError;
use alien_invasion::events::{Cue, CueSink, FrameInput};
use alien_invasion::score::{HighScoreStore, ScoreTracker};

use display::Screen;

/// A key counts as "held" if its last press/repeat event arrived within
/// this window. Covers terminals that never send key-release events: OS
/// key repeat runs at ≥ 15 Hz, so the window is refreshed before expiry.
const HOLD_WINDOW_MS: u64 = 133;

const MAX_START_LEVEL: i64 = 999;

#[derive(Parser)]
#[command(name = "alien_invasion")]
#[command(about = "Fend off descending waves of aliens in your terminal")]
struct Cli {
    /// TOML file overriding the built-in game settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where the high score is kept
    #[arg(long)]
    highscore_file: Option<PathBuf>,

    /// Log file (the terminal belongs to the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Level to start at
    #[arg(
        short,
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=MAX_START_LEVEL)
    )]
    level: u32,
}

// ── Audio collaborator ────────────────────────────────────────────────────────

/// Logs every cue; rings the terminal bell on lost lives when enabled.
struct TerminalCues {
    bell: bool,
    ring: bool,
}

impl CueSink for TerminalCues {
    fn play(&mut self, cue: Cue) {
        trace!(cue = cue.name(), "cue");
        if self.bell && matches!(cue, Cue::LifeLost | Cue::Death) {
            self.ring = true;
        }
    }
}

impl TerminalCues {
    fn take_ring(&mut self) -> bool {
        std::mem::take(&mut self.ring)
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn left_click(event: &Event) -> Option<(u16, u16)> {
    match event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => Some((*column, *row)),
        _ => None,
    }
}

/// Tracks which keys are held from a stream of press/repeat/release events.
struct HeldKeys {
    last_seen: HashMap<KeyCode, u64>,
    window: u64,
}

impl HeldKeys {
    fn new(fps: u32) -> Self {
        let window = (u64::from(fps) * HOLD_WINDOW_MS / 1000).max(1);
        HeldKeys { last_seen: HashMap::new(), window }
    }

    fn record(&mut self, code: KeyCode, kind: KeyEventKind, frame: u64) {
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.last_seen.insert(code, frame);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&code);
            }
        }
    }

    fn is_held(&self, code: KeyCode, frame: u64) -> bool {
        self.last_seen
            .get(&code)
            .map(|&last| frame.saturating_sub(last) <= self.window)
            .unwrap_or(false)
    }

    fn any_held(&self, codes: &[KeyCode], frame: u64) -> bool {
        codes.iter().any(|&c| self.is_held(c, frame))
    }

    fn snapshot(&self, frame: u64) -> FrameInput {
        FrameInput {
            left: self.any_held(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
            right: self.any_held(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
            fire: self.is_held(KeyCode::Char(' '), frame),
        }
    }

    fn clear(&mut self) {
        self.last_seen.clear();
    }
}

/// Pause or resume, forgetting held keys so nothing moves on resume.
fn switch_pause(state: &RoundState, keys: &mut HeldKeys) -> RoundState {
    keys.clear();
    toggle_pause(state)
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuChoice {
    Start,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    screen: &Screen,
    high_score: u32,
) -> std::io::Result<MenuChoice> {
    display::render_menu(out, screen, high_score)?;
    let (start, quit) = display::menu_buttons(screen);

    while let Ok(ev) = rx.recv() {
        if let Some((col, row)) = left_click(&ev) {
            if start.contains(col, row) {
                return Ok(MenuChoice::Start);
            }
            if quit.contains(col, row) {
                return Ok(MenuChoice::Quit);
            }
        }
        if let Event::Key(KeyEvent { code, modifiers, kind: KeyEventKind::Press, .. }) = ev {
            if is_quit(code, modifiers) {
                return Ok(MenuChoice::Quit);
            }
            if matches!(code, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('s')) {
                return Ok(MenuChoice::Start);
            }
        }
    }
    Ok(MenuChoice::Quit)
}

// ── Round loop ────────────────────────────────────────────────────────────────

enum RoundEnd {
    Finished(RoundState),
    Quit,
}

/// Tick one round at the configured frame rate until it reaches a terminal
/// phase or the player quits.
fn round_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    screen: &Screen,
    cfg: &GameConfig,
    rng: &mut StdRng,
    cues: &mut TerminalCues,
    mut state: RoundState,
) -> std::io::Result<RoundEnd> {
    let frame_time = cfg.frame_duration();
    let mut keys = HeldKeys::new(cfg.fps);
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Input ─────────────────────────────────────────────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Some((col, row)) = left_click(&ev) {
                let (resume, quit) = display::pause_buttons(screen);
                match state.phase {
                    RoundPhase::Playing if display::pause_button().contains(col, row) => {
                        state = switch_pause(&state, &mut keys);
                    }
                    RoundPhase::Paused if resume.contains(col, row) => {
                        state = switch_pause(&state, &mut keys);
                    }
                    RoundPhase::Paused if quit.contains(col, row) => return Ok(RoundEnd::Quit),
                    _ => {}
                }
                continue;
            }
            if let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev {
                if kind == KeyEventKind::Press {
                    if is_quit(code, modifiers) {
                        return Ok(RoundEnd::Quit);
                    }
                    if matches!(code, KeyCode::Char('p') | KeyCode::Char('P')) {
                        state = switch_pause(&state, &mut keys);
                        continue;
                    }
                }
                keys.record(code, kind, frame);
            }
        }

        let input = if state.phase == RoundPhase::Playing {
            keys.snapshot(frame)
        } else {
            FrameInput::idle()
        };

        let result = tick(&state, &input, cfg, rng);
        cues.play_all(&result.cues);
        state = result.state;

        display::render(out, screen, &state, cfg)?;
        if cues.take_ring() {
            out.queue(Print("\x07"))?;
            out.flush()?;
        }

        if state.phase.is_terminal() {
            return Ok(RoundEnd::Finished(state));
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

/// Keep a banner up for the configured time. Quit still works meanwhile.
fn hold_banner<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    screen: &Screen,
    cfg: &GameConfig,
    text: &str,
    color: Color,
) -> std::io::Result<bool> {
    display::render_banner(out, screen, text, color)?;
    let deadline = Instant::now() + cfg.banner_duration();
    while Instant::now() < deadline {
        while let Ok(ev) = rx.try_recv() {
            if let Event::Key(KeyEvent { code, modifiers, kind: KeyEventKind::Press, .. }) = ev {
                if is_quit(code, modifiers) {
                    return Ok(true);
                }
            }
        }
        thread::sleep(Duration::from_millis(20));
    }
    Ok(false)
}

/// Play levels back to back until a round is lost. `Ok(true)` means the
/// player asked to quit the program.
fn play_game<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    screen: &Screen,
    cfg: &GameConfig,
    rng: &mut StdRng,
    tracker: &mut ScoreTracker,
    start_level: u32,
) -> std::io::Result<bool> {
    let mut cues = TerminalCues { bell: cfg.bell, ring: false };
    let mut state = new_game(start_level, tracker.high_score(), cfg, rng);

    loop {
        let finished = match round_loop(out, rx, screen, cfg, rng, &mut cues, state)? {
            RoundEnd::Quit => return Ok(true),
            RoundEnd::Finished(finished) => finished,
        };
        tracker.record(finished.score);

        match outcome(&finished) {
            Outcome::AdvanceLevel => {
                if hold_banner(out, rx, screen, cfg, "Level Cleared!", Color::Green)? {
                    return Ok(true);
                }
                state = next_round(&finished, cfg, rng);
            }
            Outcome::GameOver => {
                let text = if finished.phase == RoundPhase::Defeated {
                    "You were destroyed! Game Over!"
                } else {
                    "Game Over!"
                };
                return hold_banner(out, rx, screen, cfg, text, Color::Red);
            }
            Outcome::Continue => state = finished,
        }
    }
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    screen: &Screen,
    cfg: &GameConfig,
    rng: &mut StdRng,
    tracker: &mut ScoreTracker,
    start_level: u32,
) -> std::io::Result<()> {
    loop {
        match show_menu(out, rx, screen, tracker.high_score())? {
            MenuChoice::Quit => break,
            MenuChoice::Start => {
                if play_game(out, rx, screen, cfg, rng, tracker, start_level)? {
                    break;
                }
            }
        }
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("alien_invasion.log"));
    init_logging(&log_path)?;

    let base = match &cli.config {
        Some(path) => GameConfig::load(path).context("could not load config")?,
        None => GameConfig::default(),
    };

    let screen = Screen::current().context("could not query terminal size")?;
    if !screen.is_big_enough() {
        return Err(GameError::TerminalTooSmall {
            cols: screen.cols,
            rows: screen.rows,
            min_cols: display::MIN_COLS,
            min_rows: display::MIN_ROWS,
        }
        .into());
    }
    let (play_width, play_height) = screen.play_area();
    let cfg = base
        .with_play_area(play_width, play_height)
        .context("config does not fit this terminal")?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let store = HighScoreStore::new(cli.highscore_file.unwrap_or_else(HighScoreStore::default_path));
    debug!(path = %store.path().display(), "high score file");
    let mut tracker = ScoreTracker::open(store);

    info!(cols = screen.cols, rows = screen.rows, seed = ?cli.seed, "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Release events make held keys exact; without them HeldKeys falls back
    // to the repeat window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads happen on their own thread; the loops poll the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &screen, &cfg, &mut rng, &mut tracker, cli.level);

    // Restore the terminal even when the game loop failed
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!(high_score = tracker.high_score(), "exiting");
    result.context("terminal I/O failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_pause_forgets_held_keys() {
        let cfg = GameConfig::default();
        let state = new_game(1, 0, &cfg, &mut StdRng::seed_from_u64(5));
        let mut keys = HeldKeys::new(cfg.fps);
        keys.record(KeyCode::Left, KeyEventKind::Press, 1);
        keys.record(KeyCode::Char(' '), KeyEventKind::Press, 1);
        assert!(keys.snapshot(1).left);

        let paused = switch_pause(&state, &mut keys);
        assert_eq!(paused.phase, RoundPhase::Paused);
        assert_eq!(keys.snapshot(2), FrameInput::idle());

        keys.record(KeyCode::Right, KeyEventKind::Press, 3);
        let resumed = switch_pause(&paused, &mut keys);
        assert_eq!(resumed.phase, RoundPhase::Playing);
        assert_eq!(keys.snapshot(4), FrameInput::idle());
    }

    #[test]
    fn start_level_is_bounded() {
        assert!(Cli::try_parse_from(["alien_invasion", "--level", "999"]).is_ok());
        assert!(Cli::try_parse_from(["alien_invasion", "--level", "1000"]).is_err());
        assert!(Cli::try_parse_from(["alien_invasion", "--level", "0"]).is_err());
        assert!(Cli::try_parse_from(["alien_invasion", "--level", "4294967295"]).is_err());
    }
}
