//! Round state machine and the per-frame tick.
//!
//! Every public function takes an immutable reference to the current
//! `RoundState` (plus the shared `GameConfig` and, where needed, an RNG
//! handle) and returns a brand-new `RoundState`. Randomness only comes
//! through the injected RNG, so a seeded RNG replays a round exactly.

use rand::Rng;
use tracing::info;

use crate::collision;
use crate::config::GameConfig;
use crate::entities::{Projectile, RoundPhase, RoundState, Ship};
use crate::events::{Cue, FrameInput};
use crate::fleet::Fleet;

/// What the caller should do after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep ticking (also while paused).
    Continue,
    /// Level cleared; build the next round with `next_round`.
    AdvanceLevel,
    /// Ship destroyed or fleet breached.
    GameOver,
}

/// Result of one `tick`.
#[derive(Clone, Debug)]
pub struct TickOutput {
    pub state: RoundState,
    pub cues: Vec<Cue>,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Fresh round at `level` with the running totals carried in.
pub fn init_round(
    level: u32,
    score: u32,
    high_score: u32,
    cfg: &GameConfig,
    rng: &mut impl Rng,
) -> RoundState {
    let level = level.max(1);
    RoundState {
        level,
        score,
        high_score,
        phase: RoundPhase::Playing,
        ship: Ship::spawn(cfg),
        fleet: Fleet::spawn(level, cfg, rng),
        projectiles: Vec::new(),
        power_ups: Vec::new(),
        frame: 0,
    }
}

/// First round of a new game.
pub fn new_game(start_level: u32, high_score: u32, cfg: &GameConfig, rng: &mut impl Rng) -> RoundState {
    info!(start_level, high_score, "new game");
    init_round(start_level, 0, high_score, cfg, rng)
}

/// Round that follows a cleared one: bigger fleet, same totals, everything
/// else reset.
pub fn next_round(state: &RoundState, cfg: &GameConfig, rng: &mut impl Rng) -> RoundState {
    init_round(state.level.saturating_add(1), state.score, state.high_score, cfg, rng)
}

// ── Input-driven transitions ─────────────────────────────────────────────────

/// Playing ⇄ Paused. Any other phase is left alone.
pub fn toggle_pause(state: &RoundState) -> RoundState {
    let phase = match state.phase {
        RoundPhase::Playing => RoundPhase::Paused,
        RoundPhase::Paused => RoundPhase::Playing,
        other => other,
    };
    RoundState { phase, ..state.clone() }
}

/// Fire from the ship's nose. Blocked once `max_player_projectiles` player
/// shots are live; with double-shot active one trigger pull emits three
/// shots under that single check.
pub fn player_shoot(state: &RoundState, cfg: &GameConfig) -> (RoundState, bool) {
    let mut next = state.clone();
    let fired = fire(&mut next, cfg);
    (next, fired)
}

fn fire(state: &mut RoundState, cfg: &GameConfig) -> bool {
    if state.live_player_projectiles() >= cfg.max_player_projectiles {
        return false;
    }
    let cx = state.ship.rect.center_x();
    let top = state.ship.rect.y;
    state.projectiles.push(Projectile::player(cx, top, cfg));
    if state.ship.double_shot_active {
        state.projectiles.push(Projectile::player(cx - cfg.double_shot_offset, top, cfg));
        state.projectiles.push(Projectile::player(cx + cfg.double_shot_offset, top, cfg));
    }
    true
}

// ── Terminal conditions ──────────────────────────────────────────────────────

/// The phase the round should end in, if any, by priority: health gone,
/// then breach, then empty fleet.
pub fn terminal_phase(state: &RoundState, cfg: &GameConfig) -> Option<RoundPhase> {
    if state.ship.is_destroyed() {
        Some(RoundPhase::Defeated)
    } else if state.fleet.is_breached(cfg.play_height) {
        Some(RoundPhase::Breached)
    } else if state.fleet.is_cleared() {
        Some(RoundPhase::Cleared)
    } else {
        None
    }
}

fn conclude(state: &mut RoundState, phase: RoundPhase, cfg: &GameConfig) {
    if phase == RoundPhase::Cleared {
        state.score = state.score.saturating_add(cfg.clear_bonus);
    }
    state.high_score = state.high_score.max(state.score);
    state.phase = phase;
    info!(?phase, level = state.level, score = state.score, "round over");
}

pub fn outcome(state: &RoundState) -> Outcome {
    match state.phase {
        RoundPhase::Playing | RoundPhase::Paused => Outcome::Continue,
        RoundPhase::Cleared => Outcome::AdvanceLevel,
        RoundPhase::Defeated | RoundPhase::Breached => Outcome::GameOver,
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the round by one frame.
///
/// Only a `Playing` round changes. Terminal conditions are checked first,
/// so whatever the previous tick did (last alien shot, last point of
/// health lost) ends the round here before anything else moves.
pub fn tick(
    state: &RoundState,
    input: &FrameInput,
    cfg: &GameConfig,
    rng: &mut impl Rng,
) -> TickOutput {
    if state.phase != RoundPhase::Playing {
        return TickOutput { state: state.clone(), cues: Vec::new() };
    }

    let mut next = state.clone();
    let mut cues = Vec::new();
    next.frame += 1;

    // ── 1. Terminal conditions ───────────────────────────────────────────────
    if let Some(phase) = terminal_phase(&next, cfg) {
        conclude(&mut next, phase, cfg);
        return TickOutput { state: next, cues };
    }

    // ── 2. Ship: move, shield decay, fire ────────────────────────────────────
    next.ship.advance(input, cfg);
    if input.fire && fire(&mut next, cfg) {
        cues.push(Cue::Shoot);
    }

    // ── 3. Projectiles & power-ups ───────────────────────────────────────────
    for shot in &mut next.projectiles {
        shot.step();
    }
    next.projectiles.retain(|p| !p.out_of_bounds(cfg.play_height));
    for power_up in &mut next.power_ups {
        power_up.step();
    }
    next.power_ups.retain(|p| !p.out_of_bounds(cfg.play_height));

    // ── 4. Fleet sweep ───────────────────────────────────────────────────────
    let shots = next.fleet.advance(cfg, rng);
    next.projectiles.extend(shots);

    // ── 5. Collisions & effects ──────────────────────────────────────────────
    collision::resolve(&mut next, cfg, rng, &mut cues);

    TickOutput { state: next, cues }
}
