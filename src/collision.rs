//! Collision & effects resolver.
//!
//! Each pass mutates the working copy of the round in place and records
//! the cues it raises. `compute::tick` runs them once per frame in a
//! fixed order: player shots vs aliens, ship vs power-ups, double-shot
//! decay, alien shots vs ship.

use rand::Rng;
use tracing::debug;

use crate::config::GameConfig;
use crate::entities::{Bounded, Origin, PowerUp, PowerUpEffect, PowerUpKind, RoundState};
use crate::events::Cue;

/// Player shots vs aliens. Returns the number of aliens destroyed.
///
/// An alien overlapped by several shots dies once and scores once; every
/// shot that touched a dead alien is consumed. Each kill rolls
/// `power_up_chance` for a drop at the alien's centre.
pub fn resolve_player_hits(
    state: &mut RoundState,
    cfg: &GameConfig,
    rng: &mut impl Rng,
    cues: &mut Vec<Cue>,
) -> usize {
    let mut used = vec![false; state.projectiles.len()];
    let mut survivors = Vec::with_capacity(state.fleet.aliens.len());
    let mut destroyed = 0;

    for alien in std::mem::take(&mut state.fleet.aliens) {
        let mut hit = false;
        for (i, shot) in state.projectiles.iter().enumerate() {
            if shot.origin == Origin::Player && shot.overlaps(&alien) {
                used[i] = true;
                hit = true;
            }
        }

        if !hit {
            survivors.push(alien);
            continue;
        }

        destroyed += 1;
        state.score = state.score.saturating_add(alien.kind.points());
        cues.push(Cue::Hit);

        if rng.gen_bool(cfg.power_up_chance) {
            let kind = PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())];
            debug!(?kind, "power-up dropped");
            state.power_ups.push(PowerUp::spawn(
                alien.rect.center_x(),
                alien.rect.center_y(),
                kind,
                cfg,
            ));
        }
    }

    state.fleet.aliens = survivors;
    state.projectiles = std::mem::take(&mut state.projectiles)
        .into_iter()
        .zip(used)
        .filter(|(_, used)| !used)
        .map(|(p, _)| p)
        .collect();

    destroyed
}

/// Ship vs falling power-ups. A touched power-up is always removed, even
/// when its effect has nothing left to give.
pub fn collect_power_ups(state: &mut RoundState, cfg: &GameConfig, cues: &mut Vec<Cue>) {
    let ship_box = state.ship.bounds();
    let (caught, missed): (Vec<PowerUp>, Vec<PowerUp>) = std::mem::take(&mut state.power_ups)
        .into_iter()
        .partition(|p| p.bounds().overlaps(&ship_box));
    state.power_ups = missed;

    for power_up in caught {
        debug!(kind = ?power_up.kind, "power-up collected");
        match power_up.kind.effect() {
            PowerUpEffect::Shield => {
                state.ship.activate_shield(cfg.shield_ticks);
                cues.push(Cue::PowerUp);
            }
            // At full health nothing happens, not even a cue.
            PowerUpEffect::Health => {
                if state.ship.health < cfg.max_health {
                    state.ship.health += 1;
                    cues.push(Cue::LifeGain);
                }
            }
            PowerUpEffect::DoubleShot => {
                state.ship.activate_double_shot(cfg.double_shot_ticks);
                cues.push(Cue::PowerUp);
            }
        }
    }
}

/// Alien shots vs ship. Every overlapping shot is consumed; damage only
/// lands while the shield is down and the ship is still alive.
pub fn resolve_alien_hits(state: &mut RoundState, cues: &mut Vec<Cue>) {
    let ship_box = state.ship.bounds();
    let (hits, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut state.projectiles)
        .into_iter()
        .partition(|p| p.origin == Origin::Alien && p.bounds().overlaps(&ship_box));
    state.projectiles = rest;

    for _ in hits {
        if state.ship.shield_active || state.ship.is_destroyed() {
            continue;
        }
        state.ship.health -= 1;
        if state.ship.is_destroyed() {
            debug!(score = state.score, "ship destroyed");
            cues.push(Cue::Death);
        } else {
            cues.push(Cue::LifeLost);
        }
    }
}

/// All passes in their fixed order.
pub fn resolve(state: &mut RoundState, cfg: &GameConfig, rng: &mut impl Rng, cues: &mut Vec<Cue>) {
    resolve_player_hits(state, cfg, rng, cues);
    collect_power_ups(state, cfg, cues);
    state.ship.decay_double_shot();
    resolve_alien_hits(state, cues);
}
