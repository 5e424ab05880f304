//! Cosmic Runner
//!
//! Obstacles scroll right-to-left in three lanes, speeding up as the
//! run progresses. An obstacle that reaches the runner's column before
//! its word is typed collides for a fixed penalty. Strict mismatch
//! policy, but the lock is kept: the obstacle is still inbound, the
//! player just starts its word over.

use glam::Vec2;
use rand::Rng;

use crate::assets::AssetManifest;
use crate::consts::*;
use crate::sim::arena::{Arena, Handle};
use crate::sim::level::{pick_binding, BindCandidate, LevelCtx, Outcome};
use crate::sim::particles::ParticleKind;
use crate::sim::state::{GameEvent, PlayerState};
use crate::sim::words::{KeyOutcome, MismatchPolicy, WordPool, WordTarget};

/// Vertical center of a lane in field coordinates.
pub fn lane_y(lane: usize) -> f32 {
    let band = FIELD_HEIGHT * 0.6 / RUNNER_LANES as f32;
    FIELD_HEIGHT * 0.25 + band * (lane as f32 + 0.5)
}

pub struct Obstacle {
    pub pos: Vec2,
    pub lane: usize,
    pub word: WordTarget,
    pub seq: u64,
}

pub struct CosmicRunner {
    pub entities: Arena<Obstacle>,
    pool: WordPool,
    locked: Option<Handle>,
    /// Distance travelled so far; doubles as the difficulty ramp input
    pub distance: f32,
    pub speed: f32,
    spawn_timer: u32,
    spawn_seq: u64,
    cleared: u32,
    stall_warned: bool,
}

impl CosmicRunner {
    pub fn new(assets: &AssetManifest) -> Self {
        Self {
            entities: Arena::new(),
            pool: WordPool::new(assets.words.easy.clone()),
            locked: None,
            distance: 0.0,
            speed: RUNNER_BASE_SPEED,
            spawn_timer: 45,
            spawn_seq: 0,
            cleared: 0,
            stall_warned: false,
        }
    }

    pub fn on_enter(&mut self, ctx: &mut LevelCtx) {
        ctx.player.pos = Vec2::new(RUNNER_PLAYER_X, lane_y(RUNNER_LANES / 2));
    }

    fn spawn_interval(&self) -> u32 {
        let ramp = (self.distance / RUNNER_DISTANCE_TARGET
            * (RUNNER_SPAWN_INTERVAL - RUNNER_SPAWN_INTERVAL_MIN) as f32) as u32;
        RUNNER_SPAWN_INTERVAL
            .saturating_sub(ramp)
            .max(RUNNER_SPAWN_INTERVAL_MIN)
    }

    fn spawn(&mut self, ctx: &mut LevelCtx) {
        let Some(word) = self.pool.draw(ctx.rng) else {
            return;
        };
        let lane = ctx.rng.random_range(0..RUNNER_LANES);
        self.spawn_seq += 1;
        self.entities.insert(Obstacle {
            pos: Vec2::new(FIELD_WIDTH + 2.0, lane_y(lane)),
            lane,
            word,
            seq: self.spawn_seq,
        });
    }

    pub fn update(&mut self, ctx: &mut LevelCtx, dt: f32) {
        self.speed = (RUNNER_BASE_SPEED + self.distance * RUNNER_SPEED_RAMP).min(RUNNER_MAX_SPEED);
        self.distance += self.speed * dt;

        self.spawn_timer = self.spawn_timer.saturating_sub(1);
        if self.spawn_timer == 0 {
            self.spawn(ctx);
            self.spawn_timer = self.spawn_interval();
        }

        for (_, obstacle) in self.entities.iter_mut() {
            obstacle.pos.x -= self.speed * dt;
        }

        // Collisions: an uncompleted obstacle crossing the runner's column
        let collisions = self
            .entities
            .handles_where(|o| o.pos.x <= RUNNER_PLAYER_X);
        for handle in collisions {
            if let Some(obstacle) = self.entities.remove(handle) {
                ctx.player.apply_damage(OBSTACLE_DAMAGE);
                ctx.events.push(GameEvent::Impact);
                ctx.particles
                    .emit(ParticleKind::Debris, obstacle.pos, 12, ctx.time_ticks);
                if self.locked == Some(handle) {
                    self.locked = None;
                }
            }
        }
    }

    pub fn handle_key(&mut self, ctx: &mut LevelCtx, key: char) {
        if !key.is_alphanumeric() {
            return;
        }

        if self.locked.map(|h| !self.entities.contains(h)).unwrap_or(true) {
            let player_pos = ctx.player.pos;
            self.locked = pick_binding(
                player_pos,
                self.entities
                    .iter()
                    .filter(|(_, o)| o.word.starts_with_key(key))
                    .map(|(handle, o)| BindCandidate {
                        handle,
                        pos: o.pos,
                        seq: o.seq,
                    }),
            );
        }

        let Some(handle) = self.locked else {
            ctx.events.push(GameEvent::KeyRejected);
            return;
        };
        let Some(obstacle) = self.entities.get_mut(handle) else {
            return;
        };

        match obstacle.word.submit_key(key, MismatchPolicy::ResetOnError) {
            KeyOutcome::Advanced => {
                ctx.particles
                    .emit(ParticleKind::Spark, obstacle.pos, 2, ctx.time_ticks);
                ctx.events.push(GameEvent::KeyMatched);
            }
            KeyOutcome::Completed => self.on_word_completed(handle, ctx),
            KeyOutcome::Rejected => {
                // Strict reset, but the obstacle stays bound: it is
                // still the one bearing down on the runner.
                ctx.events.push(GameEvent::KeyRejected);
            }
            KeyOutcome::Ignored => {}
        }
    }

    /// Clear the obstacle whose word was completed.
    pub fn on_word_completed(&mut self, handle: Handle, ctx: &mut LevelCtx) {
        let Some(obstacle) = self.entities.remove(handle) else {
            return;
        };
        ctx.player.add_score(OBSTACLE_REWARD);
        self.cleared += 1;
        ctx.particles
            .emit(ParticleKind::Burst, obstacle.pos, 14, ctx.time_ticks);
        ctx.events.push(GameEvent::WordCompleted);
        if self.locked == Some(handle) {
            self.locked = None;
        }
    }

    pub fn check_outcome(&mut self, player: &PlayerState) -> Outcome {
        if player.is_dead() {
            return Outcome::Lost;
        }
        if self.distance >= RUNNER_DISTANCE_TARGET {
            return Outcome::Won;
        }
        if self.pool.is_empty() && self.entities.is_empty() && !self.stall_warned {
            log::warn!("cosmic runner has no words and no obstacles; treating as Continue");
            self.stall_warned = true;
        }
        Outcome::Continue
    }

    /// Handle of the obstacle currently holding the keystroke lock.
    pub fn bound_handle(&self) -> Option<Handle> {
        self.locked.filter(|h| self.entities.contains(*h))
    }

    pub fn bound_word(&self) -> Option<&WordTarget> {
        self.bound_handle()
            .and_then(|h| self.entities.get(h))
            .map(|o| &o.word)
    }

    pub fn progress_line(&self) -> String {
        format!(
            "Distance {:.0}/{:.0}  Cleared {}",
            self.distance.min(RUNNER_DISTANCE_TARGET),
            RUNNER_DISTANCE_TARGET,
            self.cleared
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::particles::ParticleSystem;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn harness() -> (CosmicRunner, PlayerState, ParticleSystem, Pcg32, Vec<GameEvent>) {
        let assets = AssetManifest::builtin();
        (
            CosmicRunner::new(&assets),
            PlayerState::default(),
            ParticleSystem::new(),
            Pcg32::seed_from_u64(5),
            Vec::new(),
        )
    }

    #[test]
    fn obstacle_reaching_player_column_collides() {
        let (mut level, mut player, mut particles, mut rng, mut events) = harness();
        level.entities.insert(Obstacle {
            pos: Vec2::new(RUNNER_PLAYER_X + 0.05, lane_y(1)),
            lane: 1,
            word: WordTarget::new("comet"),
            seq: 1,
        });
        let mut ctx = LevelCtx {
            player: &mut player,
            particles: &mut particles,
            rng: &mut rng,
            events: &mut events,
            time_ticks: 0,
        };
        level.update(&mut ctx, SIM_DT);
        assert!(level.entities.is_empty());
        assert_eq!(player.health(), HEALTH_MAX - OBSTACLE_DAMAGE);
        assert!(events.contains(&GameEvent::Impact));
    }

    #[test]
    fn completed_word_clears_obstacle_before_impact() {
        let (mut level, mut player, mut particles, mut rng, mut events) = harness();
        let handle = level.entities.insert(Obstacle {
            pos: Vec2::new(60.0, lane_y(0)),
            lane: 0,
            word: WordTarget::new("nova"),
            seq: 1,
        });
        let mut ctx = LevelCtx {
            player: &mut player,
            particles: &mut particles,
            rng: &mut rng,
            events: &mut events,
            time_ticks: 0,
        };
        for key in "nova".chars() {
            level.handle_key(&mut ctx, key);
        }
        assert!(!level.entities.contains(handle));
        assert_eq!(player.score(), OBSTACLE_REWARD);
        assert_eq!(player.health(), HEALTH_MAX);
    }

    #[test]
    fn wrong_key_resets_word_but_keeps_lock() {
        let (mut level, mut player, mut particles, mut rng, mut events) = harness();
        let handle = level.entities.insert(Obstacle {
            pos: Vec2::new(60.0, lane_y(0)),
            lane: 0,
            word: WordTarget::new("nova"),
            seq: 1,
        });
        let mut ctx = LevelCtx {
            player: &mut player,
            particles: &mut particles,
            rng: &mut rng,
            events: &mut events,
            time_ticks: 0,
        };
        level.handle_key(&mut ctx, 'n');
        level.handle_key(&mut ctx, 'z');
        assert_eq!(level.entities.get(handle).unwrap().word.matched(), 0);
        // Still bound: the next correct key restarts the same word
        assert!(level.bound_word().is_some());
    }

    #[test]
    fn speed_ramps_with_distance_up_to_cap() {
        let (mut level, mut player, mut particles, mut rng, mut events) = harness();
        let mut ctx = LevelCtx {
            player: &mut player,
            particles: &mut particles,
            rng: &mut rng,
            events: &mut events,
            time_ticks: 0,
        };
        level.update(&mut ctx, SIM_DT);
        let early = level.speed;
        level.distance = RUNNER_DISTANCE_TARGET * 0.8;
        level.update(&mut ctx, SIM_DT);
        assert!(level.speed > early);
        level.distance = 1.0e6;
        level.update(&mut ctx, SIM_DT);
        assert_eq!(level.speed, RUNNER_MAX_SPEED);
    }

    #[test]
    fn distance_target_wins() {
        let (mut level, player, ..) = harness();
        level.distance = RUNNER_DISTANCE_TARGET;
        assert_eq!(level.check_outcome(&player), Outcome::Won);
    }
}
