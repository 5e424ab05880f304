//! Terminal rendering
//!
//! All terminal I/O lives here. Each frame the renderer receives an
//! immutable view of the game state and translates it into queued
//! crossterm commands; no game logic is performed.

pub mod background;
pub mod hud;

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use glam::Vec2;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, RUNNER_LANES};
use crate::settings::Settings;
use crate::sim::level::asteroid::AsteroidKind;
use crate::sim::level::runner::lane_y;
use crate::sim::{ActiveLevel, GamePhase, GameState, ParticleKind};
use crate::sim::words::WordTarget;

use hud::HudSnapshot;

// Colour palette

const C_PLAYER: Color = Color::Cyan;
const C_ROCK: Color = Color::Grey;
const C_HUNTER: Color = Color::Red;
const C_OBSTACLE: Color = Color::Magenta;
const C_WORD_TYPED: Color = Color::Green;
const C_WORD_REST: Color = Color::White;
const C_WORD_BOUND: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

/// Terminal dimensions plus the field-to-cell projection.
///
/// Row 0 is the HUD, the last row is the bound-word/hint line; the
/// playfield maps onto everything between.
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    pub fn play_top(&self) -> u16 {
        1
    }

    pub fn play_rows(&self) -> u16 {
        self.rows.saturating_sub(2)
    }

    /// Map a field position to a terminal cell, `None` if off-screen.
    pub fn project(&self, pos: Vec2) -> Option<(u16, u16)> {
        let rows = self.play_rows();
        if self.cols == 0 || rows == 0 {
            return None;
        }
        let x = (pos.x / FIELD_WIDTH * self.cols as f32) as i32;
        let y = (pos.y / FIELD_HEIGHT * rows as f32) as i32;
        if x < 0 || y < 0 || x >= self.cols as i32 || y >= rows as i32 {
            return None;
        }
        Some((x as u16, self.play_top() + y as u16))
    }
}

/// Render one complete frame into `out` at the given viewport.
///
/// Pure with respect to the state: the same state and viewport always
/// produce the same command stream. The caller owns the terminal size
/// query, the way the orchestrator's caller owns the clock.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    settings: &Settings,
    fps: f32,
    view: &Viewport,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    if settings.starfield {
        background::draw(out, view, state.bg_scroll)?;
    }

    match state.phase {
        GamePhase::Menu => draw_menu(out, view)?,
        GamePhase::Playing | GamePhase::Paused => {
            draw_level(out, view, state)?;
            if settings.particles {
                draw_particles(out, view, state)?;
            }
            hud::draw(out, view, &HudSnapshot::capture(state))?;
            if state.phase == GamePhase::Paused {
                draw_center_lines(
                    out,
                    view,
                    &[("= PAUSED =", Color::Yellow), ("TAB : Resume   ESC : Menu", C_HINT)],
                )?;
            }
        }
        GamePhase::LevelComplete => {
            hud::draw(out, view, &HudSnapshot::capture(state))?;
            let score_line = format!("Final Score: {}", state.player.score());
            draw_center_lines(
                out,
                view,
                &[
                    ("╔══════════════════════╗", Color::Green),
                    ("║    MISSION COMPLETE  ║", Color::Green),
                    ("╚══════════════════════╝", Color::Green),
                    (&score_line, Color::Yellow),
                    ("ESC : Back to menu", C_HINT),
                ],
            )?;
        }
        GamePhase::GameOver => {
            hud::draw(out, view, &HudSnapshot::capture(state))?;
            let score_line = format!("Final Score: {}", state.player.score());
            draw_center_lines(
                out,
                view,
                &[
                    ("╔══════════════════╗", Color::Red),
                    ("║    GAME  OVER    ║", Color::Red),
                    ("╚══════════════════╝", Color::Red),
                    (&score_line, Color::Yellow),
                    ("ESC : Back to menu", C_HINT),
                ],
            )?;
        }
    }

    if settings.show_fps {
        out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(format!("{fps:>3.0} fps")))?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// Menu

fn draw_menu<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    draw_center_lines(
        out,
        view,
        &[
            ("★  T Y P E N A U T  ★", Color::Cyan),
            ("", Color::White),
            ("Type the words before they reach you.", Color::White),
            ("", Color::White),
            ("ENTER : Launch   TAB : Pause   ESC : Quit", C_HINT),
        ],
    )
}

// Levels

fn draw_level<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    let Some(level) = state.level.as_ref() else {
        return Ok(());
    };

    match level {
        ActiveLevel::AsteroidDefense(l) => {
            let bound = l.bound_handle();
            for (handle, asteroid) in l.entities.iter() {
                let (glyph, color) = match asteroid.kind {
                    AsteroidKind::Rock => ("(@)", C_ROCK),
                    AsteroidKind::Hunter => ("<A>", C_HUNTER),
                };
                if let Some((x, y)) = view.project(asteroid.pos) {
                    out.queue(cursor::MoveTo(x.saturating_sub(1), y))?;
                    out.queue(style::SetForegroundColor(color))?;
                    out.queue(Print(glyph))?;
                    draw_word_label(out, view, x, y, &asteroid.word, bound == Some(handle))?;
                }
            }
            // Stationary avatar in the centre
            if let Some((x, y)) = view.project(state.player.pos) {
                out.queue(cursor::MoveTo(x, y))?;
                out.queue(style::SetForegroundColor(C_PLAYER))?;
                out.queue(Print("◆"))?;
            }
        }
        ActiveLevel::RocketLaunch(l) => {
            // The rocket sits on the pad and climbs with altitude
            let rocket_pos = state.player.pos - Vec2::new(0.0, l.altitude.min(FIELD_HEIGHT - 8.0));
            if let Some((x, y)) = view.project(rocket_pos) {
                out.queue(style::SetForegroundColor(C_PLAYER))?;
                out.queue(cursor::MoveTo(x, y.saturating_sub(1)))?;
                out.queue(Print("▲"))?;
                out.queue(cursor::MoveTo(x.saturating_sub(1), y))?;
                out.queue(Print("/║\\"))?;
            }
            // Upcoming stages listed down the side, current first
            out.queue(style::SetForegroundColor(C_HINT))?;
            for (i, stage) in l.stages.iter().enumerate().skip(l.current).take(4) {
                let row = view.play_top() + 1 + (i - l.current) as u16;
                out.queue(cursor::MoveTo(2, row))?;
                if i == l.current {
                    out.queue(style::SetForegroundColor(C_WORD_BOUND))?;
                    out.queue(Print(format!("> {}", stage.text())))?;
                    out.queue(style::SetForegroundColor(C_HINT))?;
                } else {
                    out.queue(Print(format!("  {}", stage.text())))?;
                }
            }
        }
        ActiveLevel::CosmicRunner(l) => {
            // Lane guides
            out.queue(style::SetForegroundColor(C_HINT))?;
            for lane in 0..RUNNER_LANES {
                if let Some((_, y)) = view.project(Vec2::new(1.0, lane_y(lane))) {
                    for x in (0..view.cols).step_by(4) {
                        out.queue(cursor::MoveTo(x, y))?;
                        out.queue(Print("-"))?;
                    }
                }
            }
            let bound = l.bound_handle();
            for (handle, obstacle) in l.entities.iter() {
                if let Some((x, y)) = view.project(obstacle.pos) {
                    out.queue(cursor::MoveTo(x, y))?;
                    out.queue(style::SetForegroundColor(C_OBSTACLE))?;
                    out.queue(Print("▓"))?;
                    draw_word_label(out, view, x, y, &obstacle.word, bound == Some(handle))?;
                }
            }
            if let Some((x, y)) = view.project(state.player.pos) {
                out.queue(cursor::MoveTo(x, y))?;
                out.queue(style::SetForegroundColor(C_PLAYER))?;
                out.queue(Print("»"))?;
            }
        }
    }
    Ok(())
}

/// Print an entity's word just beneath it, typed prefix highlighted.
/// `is_bound` comes from lock identity, not word text: two entities
/// can carry the same word while only one holds the lock.
fn draw_word_label<W: Write>(
    out: &mut W,
    view: &Viewport,
    x: u16,
    y: u16,
    word: &WordTarget,
    is_bound: bool,
) -> std::io::Result<()> {
    let row = y + 1;
    if row >= view.play_top() + view.play_rows() {
        return Ok(());
    }
    let typed: String = word.text().chars().take(word.matched()).collect();
    let rest: String = word.text().chars().skip(word.matched()).collect();

    out.queue(cursor::MoveTo(x, row))?;
    out.queue(style::SetForegroundColor(C_WORD_TYPED))?;
    out.queue(Print(&typed))?;
    out.queue(style::SetForegroundColor(if is_bound {
        C_WORD_BOUND
    } else {
        C_WORD_REST
    }))?;
    out.queue(Print(&rest))?;
    Ok(())
}

// Particles

fn draw_particles<W: Write>(
    out: &mut W,
    view: &Viewport,
    state: &GameState,
) -> std::io::Result<()> {
    for p in state.particles.iter() {
        let (glyph, color) = match p.kind {
            ParticleKind::Burst => ('*', Color::Yellow),
            ParticleKind::Exhaust => ('^', Color::DarkYellow),
            ParticleKind::Spark => ('·', Color::White),
            ParticleKind::Debris => ('x', Color::DarkRed),
        };
        if let Some((x, y)) = view.project(p.pos) {
            out.queue(cursor::MoveTo(x, y))?;
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

// Centered overlay text

fn draw_center_lines<W: Write>(
    out: &mut W,
    view: &Viewport,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
