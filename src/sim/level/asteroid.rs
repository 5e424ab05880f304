//! Asteroid Defense
//!
//! Asteroids drift in from the field edges toward the centered avatar.
//! Typing an asteroid's word destroys it; an asteroid that reaches the
//! avatar costs health. Strict mismatch policy: a wrong key resets the
//! bound word and releases the lock.

use glam::Vec2;
use rand::Rng;

use crate::assets::AssetManifest;
use crate::consts::*;
use crate::sim::arena::{Arena, Handle};
use crate::sim::level::{pick_binding, BindCandidate, LevelCtx, Outcome};
use crate::sim::particles::ParticleKind;
use crate::sim::state::{GameEvent, PlayerState};
use crate::sim::words::{KeyOutcome, MismatchPolicy, WordPool, WordTarget};

/// Contact distance between an asteroid and the avatar.
const IMPACT_RADIUS: f32 = 2.5;
/// Hunters appear once this many rocks have been destroyed.
const HUNTERS_FROM: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsteroidKind {
    /// Slow drifting rock
    Rock,
    /// Faster enemy ship, longer word, bigger reward
    Hunter,
}

pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub word: WordTarget,
    pub kind: AsteroidKind,
    pub seq: u64,
}

pub struct AsteroidDefense {
    pub entities: Arena<Asteroid>,
    rock_pool: WordPool,
    hunter_pool: WordPool,
    locked: Option<Handle>,
    pub destroyed: u32,
    spawn_timer: u32,
    spawn_seq: u64,
    stall_warned: bool,
}

impl AsteroidDefense {
    pub fn new(assets: &AssetManifest) -> Self {
        Self {
            entities: Arena::new(),
            rock_pool: WordPool::new(assets.words.medium.clone()),
            hunter_pool: WordPool::new(assets.words.hard.clone()),
            locked: None,
            destroyed: 0,
            spawn_timer: 30,
            spawn_seq: 0,
            stall_warned: false,
        }
    }

    pub fn on_enter(&mut self, ctx: &mut LevelCtx) {
        ctx.player.pos = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);
    }

    /// Spawn interval shrinks as the player gets through the wave.
    fn spawn_interval(&self) -> u32 {
        ASTEROID_SPAWN_INTERVAL
            .saturating_sub(self.destroyed * 5)
            .max(ASTEROID_SPAWN_INTERVAL_MIN)
    }

    fn spawn(&mut self, ctx: &mut LevelCtx) {
        let hunters_active = self.destroyed >= HUNTERS_FROM;
        let kind = if hunters_active && ctx.rng.random_bool(0.25) {
            AsteroidKind::Hunter
        } else {
            AsteroidKind::Rock
        };
        let pool = match kind {
            AsteroidKind::Rock => &mut self.rock_pool,
            AsteroidKind::Hunter => &mut self.hunter_pool,
        };
        let Some(word) = pool.draw(ctx.rng) else {
            return;
        };

        // Random point on the field boundary
        let pos = match ctx.rng.random_range(0..4u32) {
            0 => Vec2::new(ctx.rng.random_range(0.0..FIELD_WIDTH), 0.0),
            1 => Vec2::new(ctx.rng.random_range(0.0..FIELD_WIDTH), FIELD_HEIGHT),
            2 => Vec2::new(0.0, ctx.rng.random_range(0.0..FIELD_HEIGHT)),
            _ => Vec2::new(FIELD_WIDTH, ctx.rng.random_range(0.0..FIELD_HEIGHT)),
        };
        let speed = match kind {
            AsteroidKind::Rock => ASTEROID_SPEED,
            AsteroidKind::Hunter => HUNTER_SPEED,
        };
        let vel = (ctx.player.pos - pos).normalize_or_zero() * speed;

        self.spawn_seq += 1;
        self.entities.insert(Asteroid {
            pos,
            vel,
            word,
            kind,
            seq: self.spawn_seq,
        });
    }

    pub fn update(&mut self, ctx: &mut LevelCtx, dt: f32) {
        self.spawn_timer = self.spawn_timer.saturating_sub(1);
        if self.spawn_timer == 0 {
            self.spawn(ctx);
            self.spawn_timer = self.spawn_interval();
        }

        // Home in on the avatar; the avatar is stationary in this mode
        let player_pos = ctx.player.pos;
        for (_, asteroid) in self.entities.iter_mut() {
            let speed = asteroid.vel.length();
            asteroid.vel = (player_pos - asteroid.pos).normalize_or_zero() * speed;
            asteroid.pos += asteroid.vel * dt;
        }

        // Impacts: asteroid reaches the avatar without being typed out
        let impacts = self
            .entities
            .handles_where(|a| a.pos.distance(player_pos) <= IMPACT_RADIUS);
        for handle in impacts {
            if let Some(asteroid) = self.entities.remove(handle) {
                ctx.player.apply_damage(ASTEROID_DAMAGE);
                ctx.events.push(GameEvent::Impact);
                ctx.particles
                    .emit(ParticleKind::Debris, asteroid.pos, 10, ctx.time_ticks);
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

        // Acquire a lock on first keystroke: nearest accepting entity
        if self.locked.map(|h| !self.entities.contains(h)).unwrap_or(true) {
            let player_pos = ctx.player.pos;
            self.locked = pick_binding(
                player_pos,
                self.entities
                    .iter()
                    .filter(|(_, a)| a.word.starts_with_key(key))
                    .map(|(handle, a)| BindCandidate {
                        handle,
                        pos: a.pos,
                        seq: a.seq,
                    }),
            );
        }

        let Some(handle) = self.locked else {
            ctx.events.push(GameEvent::KeyRejected);
            return;
        };
        let Some(asteroid) = self.entities.get_mut(handle) else {
            return;
        };

        match asteroid.word.submit_key(key, MismatchPolicy::ResetOnError) {
            KeyOutcome::Advanced => {
                ctx.particles
                    .emit(ParticleKind::Spark, asteroid.pos, 2, ctx.time_ticks);
                ctx.events.push(GameEvent::KeyMatched);
            }
            KeyOutcome::Completed => self.on_word_completed(handle, ctx),
            KeyOutcome::Rejected => {
                // Strict: progress already reset; drop the lock too
                self.locked = None;
                ctx.events.push(GameEvent::KeyRejected);
            }
            KeyOutcome::Ignored => {}
        }
    }

    /// Destroy the asteroid whose word was completed and score it.
    pub fn on_word_completed(&mut self, handle: Handle, ctx: &mut LevelCtx) {
        let Some(asteroid) = self.entities.remove(handle) else {
            return;
        };
        let reward = match asteroid.kind {
            AsteroidKind::Rock => ASTEROID_REWARD,
            AsteroidKind::Hunter => HUNTER_REWARD,
        };
        ctx.player.add_score(reward);
        self.destroyed += 1;
        ctx.particles
            .emit(ParticleKind::Burst, asteroid.pos, 16, ctx.time_ticks);
        ctx.events.push(GameEvent::WordCompleted);
        if self.locked == Some(handle) {
            self.locked = None;
        }
    }

    pub fn check_outcome(&mut self, player: &PlayerState) -> Outcome {
        if player.is_dead() {
            return Outcome::Lost;
        }
        if self.destroyed >= ASTEROID_CLEAR_TARGET {
            return Outcome::Won;
        }
        // A drained word pool with nothing on screen can never
        // terminate; log once and keep the level alive.
        if self.rock_pool.is_empty() && self.entities.is_empty() && !self.stall_warned {
            log::warn!("asteroid defense has no words and no entities; treating as Continue");
            self.stall_warned = true;
        }
        Outcome::Continue
    }

    /// Handle of the entity currently holding the keystroke lock.
    /// Identity, not text: two asteroids may carry the same word.
    pub fn bound_handle(&self) -> Option<Handle> {
        self.locked.filter(|h| self.entities.contains(*h))
    }

    pub fn bound_word(&self) -> Option<&WordTarget> {
        self.bound_handle()
            .and_then(|h| self.entities.get(h))
            .map(|a| &a.word)
    }

    pub fn progress_line(&self) -> String {
        format!("Destroyed {}/{}", self.destroyed, ASTEROID_CLEAR_TARGET)
    }
}
