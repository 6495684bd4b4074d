//! Fleet manager: the grid of aliens that sweeps side to side in lockstep,
//! drops a row whenever it touches a side wall, and occasionally shoots.

use rand::Rng;
use tracing::debug;

use crate::config::GameConfig;
use crate::entities::{Alien, AlienKind, Projectile, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fleet {
    pub aliens: Vec<Alien>,
    pub direction: Direction,
}

impl Fleet {
    /// Fleet of existing aliens heading right.
    pub fn from_aliens(aliens: Vec<Alien>) -> Self {
        Fleet { aliens, direction: Direction::Right }
    }

    /// Lay out the grid for `level`: one extra row and column per level up
    /// to `GameConfig::fleet_capacity`, each alien's kind drawn uniformly.
    pub fn spawn(level: u32, cfg: &GameConfig, rng: &mut impl Rng) -> Self {
        let (rows, cols) = cfg.fleet_size(level);
        let mut aliens = Vec::with_capacity(rows as usize * cols as usize);
        for row in 0..rows as i32 {
            for col in 0..cols as i32 {
                let kind = AlienKind::ALL[rng.gen_range(0..AlienKind::ALL.len())];
                aliens.push(Alien {
                    rect: Rect::new(
                        col * (cfg.alien_width + cfg.alien_gap_x) + cfg.fleet_margin_x,
                        row * (cfg.alien_height + cfg.alien_gap_y) + cfg.fleet_margin_y,
                        cfg.alien_width,
                        cfg.alien_height,
                    ),
                    kind,
                });
            }
        }
        debug!(level, rows, cols, "spawned fleet");
        Fleet::from_aliens(aliens)
    }

    /// One sweep step. Returns the shots fired this tick.
    ///
    /// Every alien moves by `alien_speed` in the shared direction. If any
    /// of them now touches a side wall the direction flips once and the
    /// whole fleet drops by `alien_drop` on this same tick. Shots leave
    /// from the shooter's bottom centre before the drop.
    pub fn advance(&mut self, cfg: &GameConfig, rng: &mut impl Rng) -> Vec<Projectile> {
        let dx = cfg.alien_speed * self.direction.sign();
        let mut hit_wall = false;
        let mut shots = Vec::new();

        for alien in &mut self.aliens {
            alien.rect.x += dx;
            if alien.rect.right() >= cfg.play_width || alien.rect.x <= 0 {
                hit_wall = true;
            }
            if alien.kind.fires() && rng.gen_bool(cfg.alien_fire_chance) {
                shots.push(Projectile::alien(
                    alien.rect.center_x(),
                    alien.rect.bottom(),
                    cfg,
                ));
            }
        }

        if hit_wall {
            self.direction = self.direction.reversed();
            for alien in &mut self.aliens {
                alien.rect.y += cfg.alien_drop;
            }
        }

        shots
    }

    pub fn is_cleared(&self) -> bool {
        self.aliens.is_empty()
    }

    /// True once any alien's lower edge reaches the bottom of the play area.
    pub fn is_breached(&self, play_height: i32) -> bool {
        self.aliens.iter().any(|a| a.rect.bottom() >= play_height)
    }
}
