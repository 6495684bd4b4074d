//! Immutable game configuration.
//!
//! All sizes, speeds and distances are in play-area units; the core
//! never sees terminal cells. A `GameConfig` is built once at startup
//! (defaults, optionally overlaid by a TOML file, then sized to the
//! terminal) and shared by reference with everything that needs it.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{GameError, Result};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Target ticks per second.
    pub fps: u32,
    pub play_width: i32,
    pub play_height: i32,

    // ── Ship ──────────────────────────────────────────────────────────────────
    pub ship_width: i32,
    pub ship_height: i32,
    pub ship_speed: i32,
    /// Gap between the ship's lower edge and the bottom of the play area.
    pub ship_bottom_margin: i32,
    pub start_health: u32,
    pub max_health: u32,

    // ── Projectiles ───────────────────────────────────────────────────────────
    pub projectile_width: i32,
    pub projectile_height: i32,
    pub player_projectile_speed: i32,
    pub alien_projectile_speed: i32,
    pub max_player_projectiles: usize,
    /// Horizontal distance of the two side shots from the centre shot.
    pub double_shot_offset: i32,

    // ── Fleet ─────────────────────────────────────────────────────────────────
    pub alien_width: i32,
    pub alien_height: i32,
    pub alien_gap_x: i32,
    pub alien_gap_y: i32,
    pub fleet_margin_x: i32,
    pub fleet_margin_y: i32,
    /// Rows at level 0; level N spawns `fleet_base_rows + N` rows.
    pub fleet_base_rows: u32,
    pub fleet_base_cols: u32,
    pub alien_speed: i32,
    pub alien_drop: i32,
    /// Per strong alien, per tick.
    pub alien_fire_chance: f64,

    // ── Power-ups ─────────────────────────────────────────────────────────────
    pub power_up_width: i32,
    pub power_up_height: i32,
    pub power_up_speed: i32,
    /// Per destroyed alien.
    pub power_up_chance: f64,
    pub shield_ticks: u32,
    pub double_shot_ticks: u32,

    // ── Round ─────────────────────────────────────────────────────────────────
    pub clear_bonus: u32,
    /// How long the game-over / level-cleared banners stay up.
    pub banner_millis: u64,
    /// Ring the terminal bell on life-lost and death cues.
    pub bell: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            fps: 60,
            play_width: 640,
            play_height: 320,

            ship_width: 40,
            ship_height: 32,
            ship_speed: 4,
            ship_bottom_margin: 16,
            start_health: 3,
            max_health: 5,

            projectile_width: 8,
            projectile_height: 16,
            player_projectile_speed: 8,
            alien_projectile_speed: 5,
            max_player_projectiles: 5,
            double_shot_offset: 8,

            alien_width: 24,
            alien_height: 16,
            alien_gap_x: 16,
            alien_gap_y: 16,
            fleet_margin_x: 16,
            fleet_margin_y: 16,
            fleet_base_rows: 3,
            fleet_base_cols: 6,
            alien_speed: 1,
            alien_drop: 16,
            alien_fire_chance: 0.002,

            power_up_width: 8,
            power_up_height: 16,
            power_up_speed: 2,
            power_up_chance: 0.1,
            shield_ticks: 600,
            double_shot_ticks: 300,

            clear_bonus: 50,
            banner_millis: 2000,
            bell: false,
        }
    }
}

impl GameConfig {
    /// Read a TOML file over the defaults and validate the result.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: GameConfig = toml::from_str(&text).map_err(|source| GameError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Same config with a different play area.
    pub fn with_play_area(self, width: i32, height: i32) -> Result<Self> {
        let cfg = GameConfig {
            play_width: width,
            play_height: height,
            ..self
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(GameError::InvalidConfig(msg.to_string()));

        if self.fps == 0 {
            return invalid("fps must be positive");
        }
        if self.ship_width <= 0 || self.ship_height <= 0 {
            return invalid("ship size must be positive");
        }
        if self.alien_width <= 0 || self.alien_height <= 0 {
            return invalid("alien size must be positive");
        }
        if self.projectile_width <= 0 || self.projectile_height <= 0 {
            return invalid("projectile size must be positive");
        }
        if self.power_up_width <= 0 || self.power_up_height <= 0 {
            return invalid("power-up size must be positive");
        }
        if self.play_width < self.ship_width || self.play_width < self.fleet_margin_x + self.alien_width {
            return invalid("play area is narrower than the ship or one alien column");
        }
        if self.play_height < self.ship_height + self.ship_bottom_margin + self.fleet_margin_y {
            return invalid("play area is shorter than the ship plus margins");
        }
        if self.ship_speed <= 0 || self.player_projectile_speed <= 0 || self.alien_projectile_speed <= 0 {
            return invalid("ship and projectile speeds must be positive");
        }
        if self.alien_speed <= 0 || self.alien_drop <= 0 || self.power_up_speed <= 0 {
            return invalid("fleet and power-up speeds must be positive");
        }
        if self.alien_gap_x < 0 || self.alien_gap_y < 0 || self.fleet_margin_x < 0 || self.fleet_margin_y < 0 {
            return invalid("fleet gaps and margins must not be negative");
        }
        let (max_rows, max_cols) = self.fleet_capacity();
        if max_rows < self.fleet_base_rows.saturating_add(1) || max_cols < self.fleet_base_cols.saturating_add(1) {
            return invalid("play area cannot hold the level 1 fleet with room to sweep");
        }
        if self.max_health == 0 || self.start_health == 0 || self.start_health > self.max_health {
            return invalid("start_health must be in 1..=max_health");
        }
        if self.max_player_projectiles == 0 {
            return invalid("max_player_projectiles must be positive");
        }
        if !(0.0..=1.0).contains(&self.alien_fire_chance) || !(0.0..=1.0).contains(&self.power_up_chance) {
            return invalid("probabilities must be within 0..=1");
        }
        Ok(())
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.fps))
    }

    pub fn banner_duration(&self) -> Duration {
        Duration::from_millis(self.banner_millis)
    }

    /// Largest fleet grid (rows, cols) the play area holds. The fleet may
    /// span three quarters of the width and the top half of the height.
    pub fn fleet_capacity(&self) -> (u32, u32) {
        let cols = (self.play_width * 3 / 4 - self.fleet_margin_x + self.alien_gap_x)
            / (self.alien_width + self.alien_gap_x);
        let rows = (self.play_height / 2 - self.fleet_margin_y + self.alien_gap_y)
            / (self.alien_height + self.alien_gap_y);
        (rows.max(0) as u32, cols.max(0) as u32)
    }

    /// Fleet dimensions (rows, cols) for a level: one extra row and column
    /// per level, capped at `fleet_capacity`.
    pub fn fleet_size(&self, level: u32) -> (u32, u32) {
        let (max_rows, max_cols) = self.fleet_capacity();
        (
            self.fleet_base_rows.saturating_add(level).min(max_rows),
            self.fleet_base_cols.saturating_add(level).min(max_cols),
        )
    }
}
