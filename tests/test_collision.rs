use alien_invasion::collision::*;
use alien_invasion::config::GameConfig;
use alien_invasion::entities::*;
use alien_invasion::events::Cue;
use alien_invasion::fleet::Fleet;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn cfg() -> GameConfig {
    GameConfig { power_up_chance: 0.0, ..GameConfig::default() }
}

fn alien(x: i32, y: i32, kind: AlienKind) -> Alien {
    Alien { rect: Rect::new(x, y, 24, 16), kind }
}

fn shot(x: i32, y: i32, origin: Origin) -> Projectile {
    let vy = if origin == Origin::Player { -8 } else { 5 };
    Projectile { rect: Rect::new(x, y, 8, 16), vy, origin }
}

/// Power-up sitting on top of the ship.
fn power_up_on_ship(state: &RoundState, kind: PowerUpKind) -> PowerUp {
    PowerUp { rect: Rect::new(state.ship.rect.x + 4, state.ship.rect.y, 8, 16), kind, vy: 2 }
}

fn make_state(cfg: &GameConfig) -> RoundState {
    RoundState {
        level: 1,
        score: 0,
        high_score: 0,
        phase: RoundPhase::Playing,
        ship: Ship::spawn(cfg),
        fleet: Fleet::from_aliens(Vec::new()),
        projectiles: Vec::new(),
        power_ups: Vec::new(),
        frame: 0,
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(3)
}

// ── Player shots × aliens ─────────────────────────────────────────────────────

#[test]
fn overlapping_shot_and_alien_both_removed() {
    let cfg = cfg();
    let mut s = make_state(&cfg);
    s.fleet = Fleet::from_aliens(vec![alien(100, 100, AlienKind::Medium)]);
    s.projectiles.push(shot(110, 105, Origin::Player));
    let mut cues = Vec::new();

    let destroyed = resolve_player_hits(&mut s, &cfg, &mut seeded_rng(), &mut cues);
    assert_eq!(destroyed, 1);
    assert!(s.fleet.aliens.is_empty());
    assert!(s.projectiles.is_empty());
    assert_eq!(s.score, 20);
    assert_eq!(cues, vec![Cue::Hit]);
}

#[test]
fn alien_hit_by_three_shots_dies_once() {
    let cfg = cfg();
    let mut s = make_state(&cfg);
    s.fleet = Fleet::from_aliens(vec![alien(100, 100, AlienKind::Weak)]);
    for x in [96, 106, 118] {
        s.projectiles.push(shot(x, 105, Origin::Player));
    }
    let mut cues = Vec::new();

    let destroyed = resolve_player_hits(&mut s, &cfg, &mut seeded_rng(), &mut cues);
    assert_eq!(destroyed, 1);
    assert_eq!(s.score, 10);
    assert!(s.projectiles.is_empty());
    assert_eq!(cues.len(), 1);
}

#[test]
fn one_shot_across_two_aliens_kills_both() {
    let cfg = cfg();
    let mut s = make_state(&cfg);
    // aliens 100..124 and 124..148; the shot straddles the seam
    s.fleet = Fleet::from_aliens(vec![
        alien(100, 100, AlienKind::Weak),
        alien(124, 100, AlienKind::Strong),
    ]);
    s.projectiles.push(shot(120, 105, Origin::Player));
    let mut cues = Vec::new();

    let destroyed = resolve_player_hits(&mut s, &cfg, &mut seeded_rng(), &mut cues);
    assert_eq!(destroyed, 2);
    assert_eq!(s.score, 40);
}

#[test]
fn alien_shots_pass_through_aliens() {
    let cfg = cfg();
    let mut s = make_state(&cfg);
    s.fleet = Fleet::from_aliens(vec![alien(100, 100, AlienKind::Weak)]);
    s.projectiles.push(shot(110, 105, Origin::Alien));
    let mut cues = Vec::new();

    assert_eq!(resolve_player_hits(&mut s, &cfg, &mut seeded_rng(), &mut cues), 0);
    assert_eq!(s.fleet.aliens.len(), 1);
    assert_eq!(s.projectiles.len(), 1);
}

#[test]
fn misses_leave_everything_in_place() {
    let cfg = cfg();
    let mut s = make_state(&cfg);
    s.fleet = Fleet::from_aliens(vec![alien(100, 100, AlienKind::Weak)]);
    s.projectiles.push(shot(124, 105, Origin::Player)); // touches the right edge only
    let mut cues = Vec::new();

    assert_eq!(resolve_player_hits(&mut s, &cfg, &mut seeded_rng(), &mut cues), 0);
    assert_eq!(s.projectiles.len(), 1);
    assert!(cues.is_empty());
}

#[test]
fn no_drop_chance_means_no_power_ups() {
    let cfg = cfg();
    let mut s = make_state(&cfg);
    let aliens = (0..10).map(|i| alien(i * 40, 100, AlienKind::Weak)).collect();
    s.fleet = Fleet::from_aliens(aliens);
    for i in 0..10 {
        s.projectiles.push(shot(i * 40 + 8, 105, Origin::Player));
    }
    let mut cues = Vec::new();

    resolve_player_hits(&mut s, &cfg, &mut seeded_rng(), &mut cues);
    assert_eq!(s.score, 100);
    assert!(s.power_ups.is_empty());
}

// ── Ship × power-ups ──────────────────────────────────────────────────────────

#[test]
fn health_power_up_at_cap_is_consumed_without_effect() {
    let cfg = cfg();
    let mut s = make_state(&cfg);
    s.ship.health = 5;
    s.power_ups.push(power_up_on_ship(&s, PowerUpKind::Health));
    let mut cues = Vec::new();

    collect_power_ups(&mut s, &cfg, &mut cues);
    assert_eq!(s.ship.health, 5);
    assert!(s.power_ups.is_empty());
    assert!(cues.is_empty());
}

#[test]
fn health_power_up_below_cap_adds_one() {
    let cfg = cfg();
    let mut s = make_state(&cfg);
    s.power_ups.push(power_up_on_ship(&s, PowerUpKind::Health));
    let mut cues = Vec::new();

    collect_power_ups(&mut s, &cfg, &mut cues);
    assert_eq!(s.ship.health, 4);
    assert_eq!(cues, vec![Cue::LifeGain]);
}

#[test]
fn shield_power_up_resets_timer() {
    let cfg = cfg();
    let mut s = make_state(&cfg);
    s.ship.activate_shield(5);
    s.power_ups.push(power_up_on_ship(&s, PowerUpKind::Shield));
    let mut cues = Vec::new();

    collect_power_ups(&mut s, &cfg, &mut cues);
    assert!(s.ship.shield_active);
    assert_eq!(s.ship.shield_ticks, 600);
    assert_eq!(cues, vec![Cue::PowerUp]);
}

#[test]
fn other_power_ups_grant_double_shot() {
    let cfg = cfg();
    for kind in [PowerUpKind::Star, PowerUpKind::Speed, PowerUpKind::Upgrade] {
        let mut s = make_state(&cfg);
        s.power_ups.push(power_up_on_ship(&s, kind));
        let mut cues = Vec::new();

        collect_power_ups(&mut s, &cfg, &mut cues);
        assert!(s.ship.double_shot_active, "{:?}", kind);
        assert_eq!(s.ship.double_shot_ticks, 300);
        assert_eq!(cues, vec![Cue::PowerUp]);
    }
}

#[test]
fn power_ups_away_from_ship_stay() {
    let cfg = cfg();
    let mut s = make_state(&cfg);
    s.power_ups.push(PowerUp { rect: Rect::new(10, 10, 8, 16), kind: PowerUpKind::Shield, vy: 2 });
    let mut cues = Vec::new();

    collect_power_ups(&mut s, &cfg, &mut cues);
    assert_eq!(s.power_ups.len(), 1);
    assert!(!s.ship.shield_active);
}

// ── Alien shots × ship ────────────────────────────────────────────────────────

#[test]
fn player_shots_do_not_hurt_the_ship() {
    let cfg = cfg();
    let mut s = make_state(&cfg);
    let (x, y) = (s.ship.rect.x, s.ship.rect.y);
    s.projectiles.push(shot(x + 4, y + 4, Origin::Player));
    let mut cues = Vec::new();

    resolve_alien_hits(&mut s, &mut cues);
    assert_eq!(s.ship.health, 3);
    assert_eq!(s.projectiles.len(), 1);
}

#[test]
fn health_never_drops_below_zero() {
    let cfg = cfg();
    let mut s = make_state(&cfg);
    s.ship.health = 1;
    let (x, y) = (s.ship.rect.x, s.ship.rect.y);
    for dx in [0, 10, 20] {
        s.projectiles.push(shot(x + dx, y + 4, Origin::Alien));
    }
    let mut cues = Vec::new();

    resolve_alien_hits(&mut s, &mut cues);
    assert_eq!(s.ship.health, 0);
    assert!(s.projectiles.is_empty());
    assert_eq!(cues, vec![Cue::Death]);
}

#[test]
fn two_hits_cost_two_lives() {
    let cfg = cfg();
    let mut s = make_state(&cfg);
    let (x, y) = (s.ship.rect.x, s.ship.rect.y);
    s.projectiles.push(shot(x, y, Origin::Alien));
    s.projectiles.push(shot(x + 16, y, Origin::Alien));
    let mut cues = Vec::new();

    resolve_alien_hits(&mut s, &mut cues);
    assert_eq!(s.ship.health, 1);
    assert_eq!(cues, vec![Cue::LifeLost, Cue::LifeLost]);
}

// ── Full pass order ───────────────────────────────────────────────────────────

#[test]
fn shield_collected_this_frame_blocks_this_frames_hit() {
    let cfg = cfg();
    let mut s = make_state(&cfg);
    s.power_ups.push(power_up_on_ship(&s, PowerUpKind::Shield));
    let (x, y) = (s.ship.rect.x, s.ship.rect.y);
    s.projectiles.push(shot(x + 20, y + 4, Origin::Alien));
    let mut cues = Vec::new();

    resolve(&mut s, &cfg, &mut seeded_rng(), &mut cues);
    assert_eq!(s.ship.health, 3);
    assert_eq!(cues, vec![Cue::PowerUp]);
}

#[test]
fn double_shot_collected_this_frame_decays_once() {
    let cfg = cfg();
    let mut s = make_state(&cfg);
    s.power_ups.push(power_up_on_ship(&s, PowerUpKind::Star));
    let mut cues = Vec::new();

    resolve(&mut s, &cfg, &mut seeded_rng(), &mut cues);
    assert_eq!(s.ship.double_shot_ticks, 299);
}
