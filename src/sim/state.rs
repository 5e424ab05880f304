//! Game state and core simulation types
//!
//! Everything the orchestrator owns lives here. Levels and the word
//! engine only ever see explicit borrows of these fields.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::level::ActiveLevel;
use super::particles::ParticleSystem;
use crate::assets::AssetManifest;
use crate::consts::*;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for start
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation frozen; rendering continues
    Paused,
    /// Every level won - terminal for the run
    LevelComplete,
    /// Player died - terminal for the run
    GameOver,
}

/// Identifies a level variant. Order here is the play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelId {
    AsteroidDefense,
    RocketLaunch,
    CosmicRunner,
}

impl LevelId {
    /// The fixed level sequence for a run.
    pub const SEQUENCE: [LevelId; 3] = [
        LevelId::AsteroidDefense,
        LevelId::RocketLaunch,
        LevelId::CosmicRunner,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LevelId::AsteroidDefense => "Asteroid Defense",
            LevelId::RocketLaunch => "Rocket Launch",
            LevelId::CosmicRunner => "Cosmic Runner",
        }
    }
}

/// Discrete outcomes the sim emits for the feedback layer. Drained by
/// the frontend each frame and mapped to sounds; the sim itself never
/// touches the audio backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A typed key advanced a word
    KeyMatched,
    /// A typed key was wrong for the bound word
    KeyRejected,
    /// A word was fully typed (entity destroyed / stage fired)
    WordCompleted,
    /// The player took damage
    Impact,
    /// A rocket stage ignited
    StageComplete,
    /// The active level was won
    LevelWon,
    /// The active level was lost
    LevelLost,
    /// The run ended in defeat
    GameOver,
    /// The run ended in victory
    RunComplete,
}

/// The player's avatar: position, vitals, score.
///
/// Vitals are clamped, never negative; score only grows within a run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub pos: Vec2,
    health: f32,
    fuel: f32,
    score: u64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            pos: Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0),
            health: HEALTH_MAX,
            fuel: FUEL_MAX,
            score: 0,
        }
    }
}

impl PlayerState {
    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn fuel(&self) -> f32 {
        self.fuel
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Damage clamps at zero; a negative amount is treated as zero
    /// rather than a heal.
    pub fn apply_damage(&mut self, amount: f32) {
        self.health = (self.health - amount.max(0.0)).max(0.0);
    }

    /// Fuel delta (either sign) clamped into [0, FUEL_MAX].
    pub fn apply_fuel_delta(&mut self, amount: f32) {
        self.fuel = (self.fuel + amount).clamp(0.0, FUEL_MAX);
    }

    pub fn add_score(&mut self, amount: u64) {
        self.score = self.score.saturating_add(amount);
    }

    /// Refill health and fuel for the next level; score carries over.
    pub fn restore_vitals(&mut self) {
        self.health = HEALTH_MAX;
        self.fuel = FUEL_MAX;
    }
}

/// Complete game state. Owned by the orchestrator; levels receive
/// explicit borrows of the pieces they may touch.
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; the only randomness source in the sim
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Index into `LevelId::SEQUENCE`; valid while Playing/Paused
    pub level_index: usize,
    /// The active level; `None` in the menu
    pub level: Option<ActiveLevel>,
    /// Player avatar
    pub player: PlayerState,
    /// Cosmetic particles
    pub particles: ParticleSystem,
    /// Events emitted this tick, drained by the frontend
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Parallax background offset (cosmetic, advances while unpaused)
    pub bg_scroll: f32,
    /// Immutable word banks and tuning data, loaded before the run
    pub assets: AssetManifest,
}

impl GameState {
    pub fn new(seed: u64, assets: AssetManifest) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            level_index: 0,
            level: None,
            player: PlayerState::default(),
            particles: ParticleSystem::new(),
            events: Vec::new(),
            time_ticks: 0,
            bg_scroll: 0.0,
            assets,
        }
    }

    /// Identifier of the current level, if one is active.
    pub fn level_id(&self) -> Option<LevelId> {
        self.level.as_ref().map(|l| l.id())
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn damage_clamps_at_zero() {
        let mut p = PlayerState::default();
        p.apply_damage(HEALTH_MAX + 50.0);
        assert_eq!(p.health(), 0.0);
        assert!(p.is_dead());
    }

    #[test]
    fn negative_damage_does_not_heal() {
        let mut p = PlayerState::default();
        p.apply_damage(30.0);
        let before = p.health();
        p.apply_damage(-100.0);
        assert_eq!(p.health(), before);
    }

    #[test]
    fn fuel_clamps_both_ends() {
        let mut p = PlayerState::default();
        p.apply_fuel_delta(500.0);
        assert_eq!(p.fuel(), FUEL_MAX);
        p.apply_fuel_delta(-2.0 * FUEL_MAX);
        assert_eq!(p.fuel(), 0.0);
    }

    proptest! {
        /// Health and fuel stay within [0, max] after any call sequence.
        #[test]
        fn vitals_stay_in_range(deltas in proptest::collection::vec(-200.0f32..200.0, 0..64)) {
            let mut p = PlayerState::default();
            for d in deltas {
                if d < 0.0 {
                    p.apply_damage(-d);
                } else {
                    p.apply_fuel_delta(d - 100.0);
                }
                prop_assert!((0.0..=HEALTH_MAX).contains(&p.health()));
                prop_assert!((0.0..=FUEL_MAX).contains(&p.fuel()));
            }
        }

        /// Score never decreases.
        #[test]
        fn score_is_monotone(amounts in proptest::collection::vec(0u64..10_000, 0..32)) {
            let mut p = PlayerState::default();
            let mut prev = 0;
            for a in amounts {
                p.add_score(a);
                prop_assert!(p.score() >= prev);
                prev = p.score();
            }
        }
    }
}
