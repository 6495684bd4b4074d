//! Terminal renderer for rounds, menus and banners.
//!
//! Reads a `RoundState` and maps play-area units onto terminal cells
//! (8 units per column, 16 per row). Nothing here changes game state.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use alien_invasion::config::GameConfig;
use alien_invasion::entities::{
    Alien, AlienKind, Entity, Origin, PowerUp, PowerUpKind, Projectile, RoundPhase, RoundState,
    Ship,
};

/// Play-area units per terminal column / row.
pub const UNITS_PER_COL: i32 = 8;
pub const UNITS_PER_ROW: i32 = 16;

/// HUD on row 0, border on row 1, play area from row 2.
const PLAY_TOP: u16 = 2;
const PLAY_LEFT: u16 = 1;

pub const MIN_COLS: u16 = 49;
pub const MIN_ROWS: u16 = 20;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::White;
const C_HUD_HIGH: Color = Color::Yellow;
const C_HUD_HEARTS: Color = Color::Red;
const C_SHIP: Color = Color::White;
const C_SHIP_SHIELDED: Color = Color::Cyan;
const C_ALIEN_WEAK: Color = Color::Green;
const C_ALIEN_MEDIUM: Color = Color::Yellow;
const C_ALIEN_STRONG: Color = Color::Red;
const C_SHOT_PLAYER: Color = Color::Red;
const C_SHOT_ALIEN: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;
const C_BUTTON_GO: Color = Color::Green;
const C_BUTTON_STOP: Color = Color::Red;
const C_BUTTON_PAUSE: Color = Color::Yellow;

// ── Screen geometry ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Screen {
    pub cols: u16,
    pub rows: u16,
}

impl Screen {
    pub fn current() -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Screen { cols, rows })
    }

    pub fn is_big_enough(&self) -> bool {
        self.cols >= MIN_COLS && self.rows >= MIN_ROWS
    }

    /// Play-area size in units for this terminal.
    pub fn play_area(&self) -> (i32, i32) {
        (
            (i32::from(self.cols) - 2) * UNITS_PER_COL,
            (i32::from(self.rows) - 4) * UNITS_PER_ROW,
        )
    }

    /// Terminal cell of a play-area point, kept inside the border.
    fn cell(&self, x: i32, y: i32) -> (u16, u16) {
        let max_col = i32::from(self.cols) - 2;
        let max_row = i32::from(self.rows) - 3;
        let col = (i32::from(PLAY_LEFT) + x.div_euclid(UNITS_PER_COL)).clamp(1, max_col.max(1));
        let row = (i32::from(PLAY_TOP) + y.div_euclid(UNITS_PER_ROW)).clamp(2, max_row.max(2));
        (col as u16, row as u16)
    }

    fn center_col(&self, text: &str) -> u16 {
        (self.cols / 2).saturating_sub(text.chars().count() as u16 / 2)
    }
}

// ── Buttons ───────────────────────────────────────────────────────────────────

/// A clickable one-row label, drawn as `[ label ]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub col: u16,
    pub row: u16,
}

impl Button {
    fn centered(label: &'static str, screen: &Screen, row: u16) -> Self {
        let width = label.chars().count() as u16 + 4;
        Button { label, col: (screen.cols / 2).saturating_sub(width / 2), row }
    }

    pub fn width(&self) -> u16 {
        self.label.chars().count() as u16 + 4
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        row == self.row && col >= self.col && col < self.col + self.width()
    }
}

pub fn pause_button() -> Button {
    Button { label: "Pause", col: 1, row: 0 }
}

/// (Start Game, Quit) on the title screen.
pub fn menu_buttons(screen: &Screen) -> (Button, Button) {
    let cy = screen.rows / 2;
    (
        Button::centered("Start Game", screen, cy),
        Button::centered("Quit", screen, cy + 2),
    )
}

/// (Resume, Quit) on the pause screen.
pub fn pause_buttons(screen: &Screen) -> (Button, Button) {
    let cy = screen.rows / 2;
    (
        Button::centered("Resume", screen, cy),
        Button::centered("Quit", screen, cy + 2),
    )
}

fn draw_button<W: Write>(out: &mut W, button: &Button, color: Color) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(button.col, button.row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(format!("[ {} ]", button.label)))?;
    Ok(())
}

fn draw_centered<W: Write>(
    out: &mut W,
    screen: &Screen,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(screen.center_col(text), row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame of a round.
pub fn render<W: Write>(
    out: &mut W,
    screen: &Screen,
    state: &RoundState,
    cfg: &GameConfig,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, screen)?;
    draw_hud(out, screen, state, cfg)?;

    for entity in state.entities() {
        match entity {
            Entity::Ship(ship) => draw_ship(out, screen, ship)?,
            Entity::Alien(alien) => draw_alien(out, screen, alien)?,
            Entity::PowerUp(power_up) => draw_power_up(out, screen, power_up)?,
            Entity::Projectile(shot) => draw_projectile(out, screen, shot)?,
        }
    }

    draw_controls_hint(out, screen)?;

    if state.phase == RoundPhase::Paused {
        draw_pause_menu(out, screen)?;
    }

    finish(out, screen)
}

/// Title screen with the high score and Start/Quit buttons.
pub fn render_menu<W: Write>(out: &mut W, screen: &Screen, high_score: u32) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let cy = screen.rows / 2;
    draw_centered(out, screen, cy.saturating_sub(5), "A L I E N   I N V A S I O N", Color::White)?;
    draw_centered(
        out,
        screen,
        cy.saturating_sub(3),
        &format!("High Score: {}", high_score),
        C_HUD_HIGH,
    )?;

    let (start, quit) = menu_buttons(screen);
    draw_button(out, &start, C_BUTTON_GO)?;
    draw_button(out, &quit, C_BUTTON_STOP)?;

    draw_centered(out, screen, cy + 5, "ENTER / click : Start   Q : Quit", C_HINT)?;

    finish(out, screen)
}

/// A one-line banner over the current frame, e.g. "Level Cleared!".
pub fn render_banner<W: Write>(
    out: &mut W,
    screen: &Screen,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let pad = "═".repeat(text.chars().count() + 2);
    let cy = screen.rows / 2;
    draw_centered(out, screen, cy.saturating_sub(1), &format!("╔{}╗", pad), color)?;
    draw_centered(out, screen, cy, &format!("║ {} ║", text), color)?;
    draw_centered(out, screen, cy + 1, &format!("╚{}╝", pad), color)?;
    finish(out, screen)
}

fn finish<W: Write>(out: &mut W, screen: &Screen) -> std::io::Result<()> {
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, screen.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, screen: &Screen) -> std::io::Result<()> {
    let w = screen.cols as usize;
    let h = screen.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(screen.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    screen: &Screen,
    state: &RoundState,
    cfg: &GameConfig,
) -> std::io::Result<()> {
    draw_button(out, &pause_button(), C_BUTTON_PAUSE)?;

    let score = format!("Score: {}   Hi: {}   Level {}", state.score, state.high_score, state.level);
    out.queue(cursor::MoveTo(screen.center_col(&score), 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(&score))?;

    // Right side: power-up status, then hearts
    let mut status = String::new();
    if state.ship.shield_active {
        status.push_str("Shield: ON ");
    }
    if state.ship.double_shot_active {
        status.push_str(&format!("Triple {:>2}s ", state.ship.double_shot_ticks / cfg.fps + 1));
    }
    let hearts = "♥".repeat(state.ship.health as usize);
    let width = (status.chars().count() + hearts.chars().count()) as u16 + 1;
    out.queue(cursor::MoveTo(screen.cols.saturating_sub(width), 0))?;
    if !status.is_empty() {
        out.queue(style::SetForegroundColor(C_HUD_HIGH))?;
        out.queue(Print(&status))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_HEARTS))?;
    out.queue(Print(&hearts))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_ship<W: Write>(out: &mut W, screen: &Screen, ship: &Ship) -> std::io::Result<()> {
    //   /^\      ← nose
    //  <===>     ← hull
    let color = if ship.shield_active { C_SHIP_SHIELDED } else { C_SHIP };
    out.queue(style::SetForegroundColor(color))?;

    let (col, row) = screen.cell(ship.rect.x, ship.rect.y);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print(" /^\\ "))?;
    let (col, row) = screen.cell(ship.rect.x, ship.rect.y + UNITS_PER_ROW);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print("<===>"))?;
    Ok(())
}

fn draw_alien<W: Write>(out: &mut W, screen: &Screen, alien: &Alien) -> std::io::Result<()> {
    let (sprite, color) = match alien.kind {
        AlienKind::Weak => ("<o>", C_ALIEN_WEAK),
        AlienKind::Medium => ("{@}", C_ALIEN_MEDIUM),
        AlienKind::Strong => ("/W\\", C_ALIEN_STRONG),
    };
    let (col, row) = screen.cell(alien.rect.x, alien.rect.y);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(sprite))?;
    Ok(())
}

fn draw_projectile<W: Write>(out: &mut W, screen: &Screen, shot: &Projectile) -> std::io::Result<()> {
    let (glyph, color) = match shot.origin {
        Origin::Player => ("║", C_SHOT_PLAYER),
        Origin::Alien => ("↓", C_SHOT_ALIEN),
    };
    let (col, row) = screen.cell(shot.rect.x, shot.rect.y);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

/// Symbols:
///   ★ star, » speed, ▲ upgrade: triple shot
///   ♥ health: one heart back
///   ◊ shield: blocks alien shots
fn draw_power_up<W: Write>(out: &mut W, screen: &Screen, power_up: &PowerUp) -> std::io::Result<()> {
    let (glyph, color) = match power_up.kind {
        PowerUpKind::Star => ("★", Color::Yellow),
        PowerUpKind::Speed => ("»", Color::Green),
        PowerUpKind::Health => ("♥", Color::Magenta),
        PowerUpKind::Upgrade => ("▲", Color::Blue),
        PowerUpKind::Shield => ("◊", Color::Cyan),
    };
    let (col, row) = screen.cell(power_up.rect.x, power_up.rect.y);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Controls hint (last row) & pause overlay ──────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, screen: &Screen) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, screen.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → : Move   SPACE : Shoot   P : Pause   Q : Quit"))?;
    Ok(())
}

fn draw_pause_menu<W: Write>(out: &mut W, screen: &Screen) -> std::io::Result<()> {
    let (resume, quit) = pause_buttons(screen);
    draw_centered(out, screen, resume.row.saturating_sub(3), "P A U S E D", Color::White)?;
    draw_button(out, &resume, C_BUTTON_GO)?;
    draw_button(out, &quit, C_BUTTON_STOP)?;
    Ok(())
}
