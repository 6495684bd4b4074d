//! All game entity types, plus the small per-type movement rules that
//! touch nothing but the entity itself.

use crate::config::GameConfig;
use crate::events::FrameInput;
use crate::fleet::Fleet;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned box in play-area units. `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// Box of the given size whose centre sits at (`cx`, `cy`).
    pub fn centered(cx: i32, cy: i32, w: i32, h: i32) -> Self {
        Rect { x: cx - w / 2, y: cy - h / 2, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    /// Strict overlap: boxes that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Anything with a bounding box the collision resolver can test.
pub trait Bounded {
    fn bounds(&self) -> Rect;

    fn overlaps<B: Bounded + ?Sized>(&self, other: &B) -> bool {
        self.bounds().overlaps(&other.bounds())
    }
}

// ── Kinds ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlienKind {
    Weak,
    Medium,
    Strong,
}

impl AlienKind {
    pub const ALL: [AlienKind; 3] = [AlienKind::Weak, AlienKind::Medium, AlienKind::Strong];

    pub fn points(self) -> u32 {
        match self {
            AlienKind::Weak => 10,
            AlienKind::Medium => 20,
            AlienKind::Strong => 30,
        }
    }

    /// Only strong aliens shoot back.
    pub fn fires(self) -> bool {
        self == AlienKind::Strong
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    Star,
    Speed,
    Health,
    Upgrade,
    Shield,
}

/// What collecting a power-up does to the ship.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpEffect {
    Shield,
    Health,
    DoubleShot,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Star,
        PowerUpKind::Speed,
        PowerUpKind::Health,
        PowerUpKind::Upgrade,
        PowerUpKind::Shield,
    ];

    pub fn effect(self) -> PowerUpEffect {
        match self {
            PowerUpKind::Shield => PowerUpEffect::Shield,
            PowerUpKind::Health => PowerUpEffect::Health,
            PowerUpKind::Star | PowerUpKind::Speed | PowerUpKind::Upgrade => {
                PowerUpEffect::DoubleShot
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    Player,
    Alien,
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub rect: Rect,
    pub health: u32,
    pub shield_active: bool,
    pub shield_ticks: u32,
    pub double_shot_active: bool,
    pub double_shot_ticks: u32,
}

impl Ship {
    /// Horizontally centred, resting `ship_bottom_margin` above the bottom.
    pub fn spawn(cfg: &GameConfig) -> Self {
        Ship {
            rect: Rect::new(
                cfg.play_width / 2 - cfg.ship_width / 2,
                cfg.play_height - cfg.ship_bottom_margin - cfg.ship_height,
                cfg.ship_width,
                cfg.ship_height,
            ),
            health: cfg.start_health,
            shield_active: false,
            shield_ticks: 0,
            double_shot_active: false,
            double_shot_ticks: 0,
        }
    }

    /// Move by held direction keys, clamped to the play area, then let the
    /// shield run down one tick.
    pub fn advance(&mut self, input: &FrameInput, cfg: &GameConfig) {
        let dir = i32::from(input.right) - i32::from(input.left);
        let max_x = cfg.play_width - self.rect.w;
        self.rect.x = (self.rect.x + dir * cfg.ship_speed).clamp(0, max_x);

        if self.shield_active {
            self.shield_ticks = self.shield_ticks.saturating_sub(1);
            if self.shield_ticks == 0 {
                self.shield_active = false;
            }
        }
    }

    pub fn activate_shield(&mut self, ticks: u32) {
        self.shield_active = ticks > 0;
        self.shield_ticks = ticks;
    }

    pub fn activate_double_shot(&mut self, ticks: u32) {
        self.double_shot_active = ticks > 0;
        self.double_shot_ticks = ticks;
    }

    pub fn decay_double_shot(&mut self) {
        if self.double_shot_active {
            self.double_shot_ticks = self.double_shot_ticks.saturating_sub(1);
            if self.double_shot_ticks == 0 {
                self.double_shot_active = false;
            }
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }
}

impl Bounded for Ship {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub rect: Rect,
    /// Units per tick; negative is upward.
    pub vy: i32,
    pub origin: Origin,
}

impl Projectile {
    /// Upward shot centred on (`cx`, `top`).
    pub fn player(cx: i32, top: i32, cfg: &GameConfig) -> Self {
        Projectile {
            rect: Rect::centered(cx, top, cfg.projectile_width, cfg.projectile_height),
            vy: -cfg.player_projectile_speed,
            origin: Origin::Player,
        }
    }

    /// Downward shot centred on (`cx`, `bottom`).
    pub fn alien(cx: i32, bottom: i32, cfg: &GameConfig) -> Self {
        Projectile {
            rect: Rect::centered(cx, bottom, cfg.projectile_width, cfg.projectile_height),
            vy: cfg.alien_projectile_speed,
            origin: Origin::Alien,
        }
    }

    pub fn step(&mut self) {
        self.rect.y += self.vy;
    }

    pub fn out_of_bounds(&self, play_height: i32) -> bool {
        self.rect.bottom() < 0 || self.rect.y > play_height
    }
}

impl Bounded for Projectile {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

// ── Aliens & power-ups ────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Alien {
    pub rect: Rect,
    pub kind: AlienKind,
}

impl Bounded for Alien {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub rect: Rect,
    pub kind: PowerUpKind,
    pub vy: i32,
}

impl PowerUp {
    pub fn spawn(cx: i32, cy: i32, kind: PowerUpKind, cfg: &GameConfig) -> Self {
        PowerUp {
            rect: Rect::centered(cx, cy, cfg.power_up_width, cfg.power_up_height),
            kind,
            vy: cfg.power_up_speed,
        }
    }

    pub fn step(&mut self) {
        self.rect.y += self.vy;
    }

    pub fn out_of_bounds(&self, play_height: i32) -> bool {
        self.rect.y > play_height
    }
}

impl Bounded for PowerUp {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

// ── Tagged view for collaborators ─────────────────────────────────────────────

/// Borrowed view of one live entity, handed to the renderer.
#[derive(Clone, Copy, Debug)]
pub enum Entity<'a> {
    Ship(&'a Ship),
    Projectile(&'a Projectile),
    Alien(&'a Alien),
    PowerUp(&'a PowerUp),
}

impl Bounded for Entity<'_> {
    fn bounds(&self) -> Rect {
        match self {
            Entity::Ship(s) => s.bounds(),
            Entity::Projectile(p) => p.bounds(),
            Entity::Alien(a) => a.bounds(),
            Entity::PowerUp(p) => p.bounds(),
        }
    }
}

// ── Round state ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    Playing,
    Paused,
    /// Ship health reached zero.
    Defeated,
    /// An alien reached the bottom of the play area.
    Breached,
    /// Fleet destroyed; the caller starts the next level.
    Cleared,
}

impl RoundPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, RoundPhase::Defeated | RoundPhase::Breached | RoundPhase::Cleared)
    }
}

/// Everything one round owns. Cloneable so the pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundState {
    pub level: u32,
    pub score: u32,
    pub high_score: u32,
    pub phase: RoundPhase,
    pub ship: Ship,
    pub fleet: Fleet,
    /// Player and alien shots together; `origin` tells them apart.
    pub projectiles: Vec<Projectile>,
    pub power_ups: Vec<PowerUp>,
    pub frame: u64,
}

impl RoundState {
    /// Every live entity, ship first.
    pub fn entities(&self) -> impl Iterator<Item = Entity<'_>> {
        std::iter::once(Entity::Ship(&self.ship))
            .chain(self.fleet.aliens.iter().map(Entity::Alien))
            .chain(self.power_ups.iter().map(Entity::PowerUp))
            .chain(self.projectiles.iter().map(Entity::Projectile))
    }

    pub fn live_player_projectiles(&self) -> usize {
        self.projectiles
            .iter()
            .filter(|p| p.origin == Origin::Player)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(!a.overlaps(&Rect::new(10, 0, 10, 10)));
        assert!(!a.overlaps(&Rect::new(0, 10, 10, 10)));
        assert!(a.overlaps(&Rect::new(9, 9, 10, 10)));
    }

    #[test]
    fn centered_rect_round_trips_center() {
        let r = Rect::centered(50, 40, 8, 16);
        assert_eq!((r.center_x(), r.center_y()), (50, 40));
    }

    #[test]
    fn only_strong_aliens_fire() {
        assert!(!AlienKind::Weak.fires());
        assert!(!AlienKind::Medium.fires());
        assert!(AlienKind::Strong.fires());
    }
}
