/// Rendering layer — all terminal output lives here.
///
/// The simulation runs in logical pixels (`Viewport`); a `Projection` maps
/// those onto the terminal grid inside the border.  Nothing here changes
/// game state.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::IVec2;

use crate::entities::{
    Actor, Effect, GameState, GameStatus, Hazard, Projectile, Sprite, Viewport, SPRITE_HAPPY,
    SPRITE_HIT,
};
use crate::error::{GameError, Result};

pub const MIN_COLS: u16 = 40;
pub const MIN_ROWS: u16 = 12;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_TITLE: Color = Color::White;
const C_SCORE: Color = Color::Blue;
const C_ACTOR: Color = Color::Yellow;
const C_ACTOR_HAPPY: Color = Color::Green;
const C_ACTOR_HIT: Color = Color::Red;
const C_HAZARD: Color = Color::Red;
const C_BEAM: Color = Color::Cyan;
const C_EFFECT: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

// ── Sprite tables ─────────────────────────────────────────────────────────────

/// Kokaton facing sprites, indexed by `Direction::index()`.
const ACTOR_SPRITES: [&str; 8] = ["(→)", "(↗)", "(↑)", "(↖)", "(←)", "(↙)", "(↓)", "(↘)"];
/// Beam rotated to each facing.
const BEAM_SPRITES: [&str; 8] = ["━", "╱", "┃", "╲", "━", "╱", "┃", "╲"];
/// The explosion image and its flipped twin.
const EFFECT_SPRITES: [&str; 2] = ["✶", "✷"];
const HAZARD_SPRITE: &str = "●";

fn actor_sprite(sprite: Sprite) -> (&'static str, Color) {
    match sprite {
        Sprite::Facing(direction) => (ACTOR_SPRITES[direction.index()], C_ACTOR),
        Sprite::Variant(SPRITE_HAPPY) => ("(^o^)", C_ACTOR_HAPPY),
        Sprite::Variant(SPRITE_HIT) => ("(x_x)", C_ACTOR_HIT),
        Sprite::Variant(_) => ("(o_o)", C_ACTOR),
    }
}

// ── Projection ────────────────────────────────────────────────────────────────

/// Maps logical viewport pixels onto terminal cells.
///
/// Layout: row 0 title, row 1 top border, rows 2..rows-2 play field,
/// row rows-2 bottom border, row rows-1 controls hint.  Columns 0 and
/// cols-1 are the side walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Projection {
    cols: u16,
    rows: u16,
    viewport: Viewport,
}

impl Projection {
    pub fn new(cols: u16, rows: u16, viewport: Viewport) -> Result<Self> {
        if cols < MIN_COLS || rows < MIN_ROWS {
            return Err(GameError::TerminalTooSmall {
                width: cols,
                height: rows,
                min_width: MIN_COLS,
                min_height: MIN_ROWS,
            });
        }
        Ok(Projection {
            cols,
            rows,
            viewport,
        })
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    fn field_cols(&self) -> u16 {
        self.cols - 2
    }

    fn field_rows(&self) -> u16 {
        self.rows - 4
    }

    /// Terminal cell for a logical point, or `None` when the point lies
    /// outside the viewport.
    pub fn to_cell(&self, p: IVec2) -> Option<(u16, u16)> {
        let vp = self.viewport;
        if p.x < 0 || p.y < 0 || p.x > vp.width || p.y > vp.height {
            return None;
        }
        let fc = self.field_cols() as i64;
        let fr = self.field_rows() as i64;
        let col = (p.x as i64 * fc / vp.width as i64).min(fc - 1);
        let row = (p.y as i64 * fr / vp.height as i64).min(fr - 1);
        Some((1 + col as u16, 2 + row as u16))
    }
}

/// Print `text` centred on `cell`, kept inside the side walls.
fn put_centered<W: Write>(
    out: &mut W,
    proj: &Projection,
    cell: (u16, u16),
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let len = text.chars().count() as u16;
    let max_col = proj.cols.saturating_sub(1 + len).max(1);
    let col = cell.0.saturating_sub(len / 2).clamp(1, max_col);
    out.queue(cursor::MoveTo(col, cell.1))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame and flush it.
pub fn render<W: Write>(out: &mut W, state: &GameState, proj: &Projection) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, proj)?;
    draw_title(out, proj)?;

    for effect in &state.effects {
        draw_effect(out, proj, effect)?;
    }
    for hazard in &state.hazards {
        draw_hazard(out, proj, hazard)?;
    }
    for projectile in &state.projectiles {
        draw_projectile(out, proj, projectile)?;
    }

    draw_actor(out, proj, &state.actor)?;
    draw_score(out, proj, state)?;
    draw_controls_hint(out, proj)?;

    if state.status == GameStatus::Ending {
        draw_game_over(out, proj, state)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, proj.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Frame ─────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, proj: &Projection) -> std::io::Result<()> {
    let w = proj.cols as usize;
    let h = proj.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(proj.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

fn draw_title<W: Write>(out: &mut W, proj: &Projection) -> std::io::Result<()> {
    let title = "たたかえ！こうかとん";
    // Each kana is two cells wide.
    let width = title.chars().count() as u16 * 2;
    out.queue(cursor::MoveTo((proj.cols / 2).saturating_sub(width / 2), 0))?;
    out.queue(style::SetForegroundColor(C_TITLE))?;
    out.queue(Print(title))?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, proj: &Projection) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, proj.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("↑↓←→ / WASD : Move   SPACE : Beam   Q : Quit"))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_actor<W: Write>(out: &mut W, proj: &Projection, actor: &Actor) -> std::io::Result<()> {
    let (glyph, color) = actor_sprite(actor.sprite);
    if let Some(cell) = proj.to_cell(actor.center()) {
        put_centered(out, proj, cell, glyph, color)?;
    }
    Ok(())
}

fn draw_hazard<W: Write>(out: &mut W, proj: &Projection, hazard: &Hazard) -> std::io::Result<()> {
    if let Some(cell) = proj.to_cell(hazard.rect.center()) {
        put_centered(out, proj, cell, HAZARD_SPRITE, C_HAZARD)?;
    }
    Ok(())
}

fn draw_projectile<W: Write>(
    out: &mut W,
    proj: &Projection,
    projectile: &Projectile,
) -> std::io::Result<()> {
    // Beams that have flown off-field are simply not drawn.
    if let Some(cell) = proj.to_cell(projectile.rect.center()) {
        let glyph = BEAM_SPRITES[projectile.direction.index()];
        put_centered(out, proj, cell, glyph, C_BEAM)?;
    }
    Ok(())
}

fn draw_effect<W: Write>(out: &mut W, proj: &Projection, effect: &Effect) -> std::io::Result<()> {
    if let Some(cell) = proj.to_cell(effect.rect.center()) {
        let glyph = EFFECT_SPRITES[effect.frame_index % EFFECT_SPRITES.len()];
        put_centered(out, proj, cell, glyph, C_EFFECT)?;
    }
    Ok(())
}

/// Score text, anchored 100px in from the left and 50px up from the bottom.
fn draw_score<W: Write>(out: &mut W, proj: &Projection, state: &GameState) -> std::io::Result<()> {
    let anchor = IVec2::new(100, state.viewport.height - 50);
    if let Some(cell) = proj.to_cell(anchor) {
        put_centered(out, proj, cell, &state.score.render(), C_SCORE)?;
    }
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    proj: &Projection,
    state: &GameState,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>4}", state.score.score);
    let lines: [(&str, Color); 4] = [
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
    ];

    let cx = proj.cols / 2;
    let start_row = (proj.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        put_centered(out, proj, (cx, start_row + i as u16), msg, *color)?;
    }
    Ok(())
}
