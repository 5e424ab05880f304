//! Fixed timestep simulation tick
//!
//! The one entry point that advances the game. Pure with respect to
//! the outside world: same seed, same inputs, same resulting state.

use super::level::{ActiveLevel, LevelCtx, Outcome};
use super::particles::ParticleSystem;
use super::state::{GameEvent, GamePhase, GameState, PlayerState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Characters typed this tick, oldest first
    pub keys: Vec<char>,
    /// Start the run from the menu
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Abandon the run and return to the menu
    pub restart: bool,
}

/// Advance the game state by one fixed timestep.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.restart && state.phase != GamePhase::Menu {
        reset_to_menu(state);
        return;
    }

    // Pause toggle before anything else; entering pause ends the tick
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Paused => {}
        GamePhase::Menu => {
            state.bg_scroll += BG_SCROLL_SPEED * dt;
            if input.start {
                start_run(state);
            }
        }
        GamePhase::LevelComplete | GamePhase::GameOver => {
            // Terminal screens keep the starfield drifting
            state.bg_scroll += BG_SCROLL_SPEED * dt;
        }
        GamePhase::Playing => tick_playing(state, input, dt),
    }
}

/// One Playing-phase step. The outcome check runs first, against the
/// state the previous tick left behind: a level that ended on tick N
/// transitions at the top of tick N+1, after its final frame was seen.
fn tick_playing(state: &mut GameState, input: &TickInput, dt: f32) {
    let Some(mut level) = state.level.take() else {
        log::error!("playing phase with no active level; returning to menu");
        state.phase = GamePhase::Menu;
        return;
    };

    match level.check_outcome(&state.player) {
        Outcome::Lost => {
            state.level = Some(level);
            state.push_event(GameEvent::LevelLost);
            state.push_event(GameEvent::GameOver);
            state.phase = GamePhase::GameOver;
            return;
        }
        Outcome::Won => {
            state.push_event(GameEvent::LevelWon);
            state.level_index += 1;
            match ActiveLevel::for_index(state.level_index, &state.assets) {
                Some(mut next) => {
                    state.player.restore_vitals();
                    let mut ctx = LevelCtx {
                        player: &mut state.player,
                        particles: &mut state.particles,
                        rng: &mut state.rng,
                        events: &mut state.events,
                        time_ticks: state.time_ticks,
                    };
                    next.on_enter(&mut ctx);
                    state.level = Some(next);
                }
                None => {
                    state.level = Some(level);
                    state.push_event(GameEvent::RunComplete);
                    state.phase = GamePhase::LevelComplete;
                }
            }
            return;
        }
        Outcome::Continue => {}
    }

    let mut ctx = LevelCtx {
        player: &mut state.player,
        particles: &mut state.particles,
        rng: &mut state.rng,
        events: &mut state.events,
        time_ticks: state.time_ticks,
    };
    for &key in &input.keys {
        level.handle_key(&mut ctx, key);
    }
    level.update(&mut ctx, dt);
    state.level = Some(level);

    state.particles.update(dt);
    state.bg_scroll += BG_SCROLL_SPEED * dt;
    state.time_ticks += 1;
}

fn start_run(state: &mut GameState) {
    state.level_index = 0;
    state.player = PlayerState::default();
    state.particles.clear();
    state.time_ticks = 0;
    let Some(mut level) = ActiveLevel::for_index(0, &state.assets) else {
        log::error!("level sequence is empty; staying in menu");
        return;
    };
    let mut ctx = LevelCtx {
        player: &mut state.player,
        particles: &mut state.particles,
        rng: &mut state.rng,
        events: &mut state.events,
        time_ticks: state.time_ticks,
    };
    level.on_enter(&mut ctx);
    state.level = Some(level);
    state.phase = GamePhase::Playing;
}

/// Full run reset. The RNG is reseeded so a fresh run from the same
/// seed replays identically.
fn reset_to_menu(state: &mut GameState) {
    use rand::SeedableRng;
    state.phase = GamePhase::Menu;
    state.level = None;
    state.level_index = 0;
    state.player = PlayerState::default();
    state.particles = ParticleSystem::new();
    state.rng = rand_pcg::Pcg32::seed_from_u64(state.seed);
    state.events.clear();
    state.time_ticks = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetManifest;
    use crate::sim::level::asteroid::{Asteroid, AsteroidKind};
    use crate::sim::state::LevelId;
    use crate::sim::words::WordTarget;
    use glam::Vec2;

    fn fresh_state() -> GameState {
        GameState::new(7, AssetManifest::builtin())
    }

    fn keys(s: &str) -> TickInput {
        TickInput {
            keys: s.chars().collect(),
            ..TickInput::default()
        }
    }

    fn started_state() -> GameState {
        let mut state = fresh_state();
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..TickInput::default()
            },
            SIM_DT,
        );
        state
    }

    /// Put a single stationary asteroid with `word` into the active
    /// asteroid-defense level.
    fn inject_asteroid(state: &mut GameState, word: &str, pos: Vec2) {
        let Some(ActiveLevel::AsteroidDefense(level)) = state.level.as_mut() else {
            panic!("asteroid defense not active");
        };
        level.entities.insert(Asteroid {
            pos,
            vel: Vec2::ZERO,
            word: WordTarget::new(word),
            kind: AsteroidKind::Rock,
            seq: 999,
        });
    }

    #[test]
    fn start_enters_the_first_level() {
        let state = started_state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level_id(), Some(LevelId::AsteroidDefense));
        assert_eq!(state.player.score(), 0);
    }

    #[test]
    fn typing_a_word_destroys_the_asteroid_and_scores() {
        let mut state = started_state();
        inject_asteroid(&mut state, "orbit", Vec2::new(20.0, 20.0));
        tick(&mut state, &keys("orbit"), SIM_DT);
        assert_eq!(state.player.score(), ASTEROID_REWARD);
        assert!(state.events.contains(&GameEvent::WordCompleted));
        assert!(!state.particles.is_empty());
    }

    #[test]
    fn pause_freezes_the_simulation() {
        let mut state = started_state();
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        tick(
            &mut state,
            &TickInput {
                pause: true,
                ..TickInput::default()
            },
            SIM_DT,
        );
        assert_eq!(state.phase, GamePhase::Paused);

        let ticks = state.time_ticks;
        let scroll = state.bg_scroll;
        let particles = state.particles.len();
        for _ in 0..60 {
            tick(&mut state, &keys("orbit"), SIM_DT);
        }
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.bg_scroll, scroll);
        assert_eq!(state.particles.len(), particles);

        tick(
            &mut state,
            &TickInput {
                pause: true,
                ..TickInput::default()
            },
            SIM_DT,
        );
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.time_ticks > ticks);
    }

    #[test]
    fn death_transitions_on_the_following_tick() {
        let mut state = started_state();
        // One hit from death, with an asteroid already in contact range
        state.player.apply_damage(HEALTH_MAX - ASTEROID_DAMAGE);
        inject_asteroid(
            &mut state,
            "rock",
            Vec2::new(FIELD_WIDTH / 2.0 + 1.0, FIELD_HEIGHT / 2.0),
        );

        // The impact lands during this tick; the phase holds for one
        // more frame so the hit is visible
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.player.is_dead());
        assert_eq!(state.phase, GamePhase::Playing);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn winning_a_level_advances_and_restores_vitals() {
        let mut state = started_state();
        state.player.apply_damage(40.0);
        let score_before = {
            state.player.add_score(500);
            state.player.score()
        };
        if let Some(ActiveLevel::AsteroidDefense(level)) = state.level.as_mut() {
            level.destroyed = ASTEROID_CLEAR_TARGET;
        }
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.level_id(), Some(LevelId::RocketLaunch));
        assert_eq!(state.player.health(), HEALTH_MAX);
        assert_eq!(state.player.score(), score_before);
        assert!(state.events.contains(&GameEvent::LevelWon));
    }

    #[test]
    fn winning_the_last_level_completes_the_run() {
        let mut state = started_state();
        state.level_index = LevelId::SEQUENCE.len() - 1;
        state.level = ActiveLevel::for_index(state.level_index, &state.assets);
        if let Some(ActiveLevel::CosmicRunner(level)) = state.level.as_mut() {
            level.distance = RUNNER_DISTANCE_TARGET;
        }
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert!(state.events.contains(&GameEvent::RunComplete));
    }

    #[test]
    fn restart_returns_to_a_fresh_menu() {
        let mut state = started_state();
        state.player.add_score(1000);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..TickInput::default()
            },
            SIM_DT,
        );
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.level.is_none());
        assert_eq!(state.player.score(), 0);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn identical_seeds_and_inputs_replay_identically() {
        let mut a = GameState::new(99, AssetManifest::builtin());
        let mut b = GameState::new(99, AssetManifest::builtin());
        let script = |n: u64| -> TickInput {
            match n {
                0 => TickInput {
                    start: true,
                    ..TickInput::default()
                },
                n if n % 37 == 0 => keys("star"),
                n if n % 53 == 0 => keys("orbit"),
                _ => TickInput::default(),
            }
        };
        for n in 0..600 {
            let input = script(n);
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.player.score(), b.player.score());
        assert_eq!(a.player.health(), b.player.health());
        assert_eq!(a.particles.len(), b.particles.len());
        assert_eq!(
            a.level.as_ref().map(|l| l.progress_line()),
            b.level.as_ref().map(|l| l.progress_line())
        );
    }
}
