//! Level variants and their uniform lifecycle
//!
//! Every level implements the same contract: `on_enter`, `update`,
//! `handle_key`, `on_word_completed`, `check_outcome`. The orchestrator
//! dispatches through the `ActiveLevel` enum exhaustively; adding a
//! variant without wiring every method is a compile error, not a
//! runtime surprise.

pub mod asteroid;
pub mod rocket;
pub mod runner;

pub use asteroid::AsteroidDefense;
pub use rocket::RocketLaunch;
pub use runner::CosmicRunner;

use glam::Vec2;
use rand_pcg::Pcg32;

use super::arena::Handle;
use super::particles::ParticleSystem;
use super::state::{GameEvent, LevelId, PlayerState};
use super::words::WordTarget;
use crate::assets::AssetManifest;

/// Result of a level's outcome check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Won,
    Lost,
}

/// Mutable context a level may touch during its lifecycle calls.
/// Everything else in `GameState` stays with the orchestrator.
pub struct LevelCtx<'a> {
    pub player: &'a mut PlayerState,
    pub particles: &'a mut ParticleSystem,
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<GameEvent>,
    /// Current simulation tick, for deterministic particle seeds
    pub time_ticks: u64,
}

/// The active level. Replaced wholesale on level transition, never
/// mutated into a different variant.
pub enum ActiveLevel {
    AsteroidDefense(AsteroidDefense),
    RocketLaunch(RocketLaunch),
    CosmicRunner(CosmicRunner),
}

impl ActiveLevel {
    /// Construct the level at `index` of the run sequence.
    pub fn for_index(index: usize, assets: &AssetManifest) -> Option<ActiveLevel> {
        let id = *LevelId::SEQUENCE.get(index)?;
        Some(match id {
            LevelId::AsteroidDefense => {
                ActiveLevel::AsteroidDefense(AsteroidDefense::new(assets))
            }
            LevelId::RocketLaunch => ActiveLevel::RocketLaunch(RocketLaunch::new(assets)),
            LevelId::CosmicRunner => ActiveLevel::CosmicRunner(CosmicRunner::new(assets)),
        })
    }

    pub fn id(&self) -> LevelId {
        match self {
            ActiveLevel::AsteroidDefense(_) => LevelId::AsteroidDefense,
            ActiveLevel::RocketLaunch(_) => LevelId::RocketLaunch,
            ActiveLevel::CosmicRunner(_) => LevelId::CosmicRunner,
        }
    }

    /// Initialize entities and position the player for this variant.
    pub fn on_enter(&mut self, ctx: &mut LevelCtx) {
        match self {
            ActiveLevel::AsteroidDefense(l) => l.on_enter(ctx),
            ActiveLevel::RocketLaunch(l) => l.on_enter(ctx),
            ActiveLevel::CosmicRunner(l) => l.on_enter(ctx),
        }
    }

    /// Advance entity motion, spawns and collisions by `dt` seconds.
    pub fn update(&mut self, ctx: &mut LevelCtx, dt: f32) {
        match self {
            ActiveLevel::AsteroidDefense(l) => l.update(ctx, dt),
            ActiveLevel::RocketLaunch(l) => l.update(ctx, dt),
            ActiveLevel::CosmicRunner(l) => l.update(ctx, dt),
        }
    }

    /// Feed one typed character through the level's word binding.
    pub fn handle_key(&mut self, ctx: &mut LevelCtx, key: char) {
        match self {
            ActiveLevel::AsteroidDefense(l) => l.handle_key(ctx, key),
            ActiveLevel::RocketLaunch(l) => l.handle_key(ctx, key),
            ActiveLevel::CosmicRunner(l) => l.handle_key(ctx, key),
        }
    }

    /// Evaluate win/lose. Pure; transitions happen in the orchestrator.
    pub fn check_outcome(&mut self, player: &PlayerState) -> Outcome {
        match self {
            ActiveLevel::AsteroidDefense(l) => l.check_outcome(player),
            ActiveLevel::RocketLaunch(l) => l.check_outcome(player),
            ActiveLevel::CosmicRunner(l) => l.check_outcome(player),
        }
    }

    /// The word currently bound to keystrokes, for the HUD.
    pub fn bound_word(&self) -> Option<&WordTarget> {
        match self {
            ActiveLevel::AsteroidDefense(l) => l.bound_word(),
            ActiveLevel::RocketLaunch(l) => l.bound_word(),
            ActiveLevel::CosmicRunner(l) => l.bound_word(),
        }
    }

    /// One-line progress description for the HUD.
    pub fn progress_line(&self) -> String {
        match self {
            ActiveLevel::AsteroidDefense(l) => l.progress_line(),
            ActiveLevel::RocketLaunch(l) => l.progress_line(),
            ActiveLevel::CosmicRunner(l) => l.progress_line(),
        }
    }
}

/// A candidate entity for keystroke binding.
pub(crate) struct BindCandidate {
    pub handle: Handle,
    pub pos: Vec2,
    /// Spawn sequence number - the deterministic tie-break
    pub seq: u64,
}

/// The one explicit ambiguity rule: when several entities could accept
/// the first keystroke of their word, bind the entity nearest the
/// player; ties fall to the earliest-spawned. Iteration order never
/// decides.
pub(crate) fn pick_binding(
    player_pos: Vec2,
    candidates: impl Iterator<Item = BindCandidate>,
) -> Option<Handle> {
    candidates
        .min_by(|a, b| {
            let da = a.pos.distance_squared(player_pos);
            let db = b.pos.distance_squared(player_pos);
            da.partial_cmp(&db)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        })
        .map(|c| c.handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arena::Arena;

    #[test]
    fn binding_prefers_nearest_entity() {
        let mut arena: Arena<()> = Arena::new();
        let near = arena.insert(());
        let far = arena.insert(());
        let player = Vec2::new(0.0, 0.0);
        let picked = pick_binding(
            player,
            vec![
                BindCandidate {
                    handle: far,
                    pos: Vec2::new(50.0, 0.0),
                    seq: 0,
                },
                BindCandidate {
                    handle: near,
                    pos: Vec2::new(5.0, 0.0),
                    seq: 1,
                },
            ]
            .into_iter(),
        );
        assert_eq!(picked, Some(near));
    }

    #[test]
    fn binding_tie_breaks_by_spawn_order() {
        let mut arena: Arena<()> = Arena::new();
        let first = arena.insert(());
        let second = arena.insert(());
        let player = Vec2::ZERO;
        // Same distance, opposite sides; listed newest-first on purpose
        let picked = pick_binding(
            player,
            vec![
                BindCandidate {
                    handle: second,
                    pos: Vec2::new(-10.0, 0.0),
                    seq: 2,
                },
                BindCandidate {
                    handle: first,
                    pos: Vec2::new(10.0, 0.0),
                    seq: 1,
                },
            ]
            .into_iter(),
        );
        assert_eq!(picked, Some(first));
    }
}
