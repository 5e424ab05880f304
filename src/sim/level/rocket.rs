//! Rocket Launch
//!
//! A fixed, ordered sequence of stage words. Only the current stage is
//! ever bound to keystrokes, so out-of-order completions are
//! impossible by construction. Mismatches are lenient: progress is
//! kept, only the combo timer resets. Fuel drains continuously and is
//! refilled by each completed stage.

use glam::Vec2;

use crate::assets::AssetManifest;
use crate::consts::*;
use crate::sim::level::{LevelCtx, Outcome};
use crate::sim::particles::ParticleKind;
use crate::sim::state::{GameEvent, PlayerState};
use crate::sim::words::{KeyOutcome, MismatchPolicy, WordTarget};

/// Ticks between ambient exhaust puffs while the rocket is lit.
const EXHAUST_CADENCE: u64 = 12;

pub struct RocketLaunch {
    pub stages: Vec<WordTarget>,
    /// Index of the stage currently accepting input
    pub current: usize,
    /// Visual altitude, grows per completed stage
    pub altitude: f32,
    /// Seconds left in the combo window after a completion
    pub combo_timer: f32,
}

impl RocketLaunch {
    pub fn new(assets: &AssetManifest) -> Self {
        let stages = assets
            .words
            .stages
            .iter()
            // An empty stage word is complete before it is ever shown;
            // dropping it here keeps `current` honest.
            .filter(|s| !s.is_empty())
            .map(WordTarget::new)
            .collect();
        Self {
            stages,
            current: 0,
            altitude: 0.0,
            combo_timer: 0.0,
        }
    }

    /// Launch pad position in field coordinates.
    fn pad_pos(&self) -> Vec2 {
        Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - 4.0)
    }

    pub fn on_enter(&mut self, ctx: &mut LevelCtx) {
        ctx.player.pos = self.pad_pos();
    }

    pub fn update(&mut self, ctx: &mut LevelCtx, dt: f32) {
        ctx.player.apply_fuel_delta(-FUEL_DECAY_PER_SEC * dt);
        self.combo_timer = (self.combo_timer - dt).max(0.0);

        // Ambient exhaust once the first stage has fired
        if self.current > 0
            && self.current < self.stages.len()
            && ctx.time_ticks % EXHAUST_CADENCE == 0
        {
            let base = self.pad_pos() - Vec2::new(0.0, self.altitude.min(FIELD_HEIGHT - 8.0));
            ctx.particles
                .emit(ParticleKind::Exhaust, base, 2, ctx.time_ticks);
        }
    }

    pub fn handle_key(&mut self, ctx: &mut LevelCtx, key: char) {
        let Some(stage) = self.stages.get_mut(self.current) else {
            return; // all stages complete; keys are inert
        };
        match stage.submit_key(key, MismatchPolicy::IgnoreErrors) {
            KeyOutcome::Advanced => ctx.events.push(GameEvent::KeyMatched),
            KeyOutcome::Completed => self.on_word_completed(self.current, ctx),
            KeyOutcome::Rejected => {
                // Lenient: no progress penalty, but the combo is gone
                self.combo_timer = 0.0;
                ctx.events.push(GameEvent::KeyRejected);
            }
            KeyOutcome::Ignored => {}
        }
    }

    /// Fire the completed stage: score, refuel, climb.
    pub fn on_word_completed(&mut self, stage_index: usize, ctx: &mut LevelCtx) {
        if stage_index != self.current {
            // Out-of-order completion has no effect
            return;
        }
        let mut reward = STAGE_REWARD;
        if self.combo_timer > 0.0 {
            reward += COMBO_BONUS;
        }
        ctx.player.add_score(reward);
        ctx.player.apply_fuel_delta(FUEL_PER_STAGE);
        self.altitude += ALTITUDE_PER_STAGE;
        self.combo_timer = COMBO_WINDOW_SECS;
        self.current += 1;

        let base = self.pad_pos() - Vec2::new(0.0, self.altitude.min(FIELD_HEIGHT - 8.0));
        ctx.particles
            .emit(ParticleKind::Exhaust, base, 14, ctx.time_ticks);
        ctx.events.push(GameEvent::WordCompleted);
        ctx.events.push(GameEvent::StageComplete);
    }

    pub fn check_outcome(&mut self, player: &PlayerState) -> Outcome {
        if self.current >= self.stages.len() {
            return Outcome::Won;
        }
        if player.fuel() <= 0.0 {
            return Outcome::Lost;
        }
        Outcome::Continue
    }

    pub fn bound_word(&self) -> Option<&WordTarget> {
        self.stages.get(self.current)
    }

    pub fn progress_line(&self) -> String {
        format!(
            "Stage {}/{}  Altitude {:.0} km",
            self.current.min(self.stages.len()),
            self.stages.len(),
            self.altitude
        )
    }
}
