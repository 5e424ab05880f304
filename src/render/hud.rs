//! HUD overlay
//!
//! `HudSnapshot` is a pure projection of game state into the strings
//! and fractions the HUD shows; the drawing code below just places it.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use crate::consts::{FUEL_MAX, HEALTH_MAX};
use crate::sim::{GameState, LevelId};

use super::Viewport;

const BAR_WIDTH: usize = 10;

/// Everything the HUD displays, computed without touching the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub score: u64,
    pub level_name: &'static str,
    pub health_frac: f32,
    pub fuel_frac: f32,
    /// Fuel only matters on the rocket level
    pub show_fuel: bool,
    pub progress: String,
    /// The bound word split into (typed, remaining)
    pub word: Option<(String, String)>,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let level_name = state.level_id().map(|id| id.name()).unwrap_or("");
        let word = state.level.as_ref().and_then(|l| l.bound_word()).map(|w| {
            let typed: String = w.text().chars().take(w.matched()).collect();
            let rest: String = w.text().chars().skip(w.matched()).collect();
            (typed, rest)
        });
        Self {
            score: state.player.score(),
            level_name,
            health_frac: state.player.health() / HEALTH_MAX,
            fuel_frac: state.player.fuel() / FUEL_MAX,
            show_fuel: state.level_id() == Some(LevelId::RocketLaunch),
            progress: state
                .level
                .as_ref()
                .map(|l| l.progress_line())
                .unwrap_or_default(),
            word,
        }
    }
}

fn bar(frac: f32) -> String {
    let filled = ((frac.clamp(0.0, 1.0) * BAR_WIDTH as f32).round()) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Draw the top HUD row and the bound-word line at the bottom.
pub fn draw<W: Write>(out: &mut W, view: &Viewport, hud: &HudSnapshot) -> std::io::Result<()> {
    // Score - left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(format!("Score: {:>8}", hud.score)))?;

    // Level name + progress - centre
    let mid = format!("{}  {}", hud.level_name, hud.progress);
    let cx = (view.cols / 2).saturating_sub(mid.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(cx, 0))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(&mid))?;

    // Vitals - right
    let vital = if hud.show_fuel {
        format!("Fuel {}", bar(hud.fuel_frac))
    } else {
        format!("Hull {}", bar(hud.health_frac))
    };
    let vital_color = if (if hud.show_fuel { hud.fuel_frac } else { hud.health_frac }) < 0.3 {
        Color::Red
    } else {
        Color::Green
    };
    let rx = view
        .cols
        .saturating_sub(vital.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(vital_color))?;
    out.queue(Print(&vital))?;

    // Bound word - bottom row, typed prefix in green
    if let Some((typed, rest)) = &hud.word {
        let total = typed.chars().count() + rest.chars().count();
        let wx = (view.cols / 2).saturating_sub(total as u16 / 2);
        let wy = view.rows.saturating_sub(1);
        out.queue(cursor::MoveTo(wx, wy))?;
        out.queue(style::SetForegroundColor(Color::Green))?;
        out.queue(Print(typed))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(rest))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetManifest;
    use crate::consts::SIM_DT;
    use crate::sim::{tick, TickInput};

    #[test]
    fn menu_snapshot_is_blank() {
        let state = GameState::new(1, AssetManifest::builtin());
        let hud = HudSnapshot::capture(&state);
        assert_eq!(hud.level_name, "");
        assert_eq!(hud.score, 0);
        assert!(hud.word.is_none());
    }

    #[test]
    fn playing_snapshot_tracks_level_and_vitals() {
        let mut state = GameState::new(1, AssetManifest::builtin());
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..TickInput::default()
            },
            SIM_DT,
        );
        let hud = HudSnapshot::capture(&state);
        assert_eq!(hud.level_name, "Asteroid Defense");
        assert!(!hud.show_fuel);
        assert_eq!(hud.health_frac, 1.0);
        assert!(hud.progress.contains("Destroyed"));
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(0.0), "░".repeat(BAR_WIDTH));
        assert_eq!(bar(1.0), "█".repeat(BAR_WIDTH));
        assert_eq!(bar(0.5).matches('█').count(), BAR_WIDTH / 2);
    }
}
