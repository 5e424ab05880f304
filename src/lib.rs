//! Typenaut - a cosmic typing arcade game for the terminal
//!
//! Core modules:
//! - `sim`: Deterministic simulation (levels, word matching, game state)
//! - `render`: Terminal rendering (background starfield, foreground, HUD)
//! - `audio`: Fire-and-forget sound feedback
//! - `assets`: Embedded word banks and tone manifest
//! - `settings` / `highscores`: Player preferences and leaderboard

pub mod assets;
pub mod audio;
pub mod highscores;
pub mod render;
pub mod settings;
pub mod sim;

pub use assets::AssetManifest;
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical playfield dimensions; the renderer scales these to the
    /// terminal. All entity positions live in this coordinate space.
    pub const FIELD_WIDTH: f32 = 120.0;
    pub const FIELD_HEIGHT: f32 = 40.0;

    /// Player vitals
    pub const HEALTH_MAX: f32 = 100.0;
    pub const FUEL_MAX: f32 = 100.0;

    /// Asteroid defense tuning
    pub const ASTEROID_SPEED: f32 = 3.2;
    pub const HUNTER_SPEED: f32 = 5.5;
    pub const ASTEROID_DAMAGE: f32 = 20.0;
    pub const ASTEROID_REWARD: u64 = 50;
    pub const HUNTER_REWARD: u64 = 120;
    /// Asteroids destroyed to win the level
    pub const ASTEROID_CLEAR_TARGET: u32 = 18;
    /// Base ticks between spawns (shrinks as the level progresses)
    pub const ASTEROID_SPAWN_INTERVAL: u32 = 150;
    pub const ASTEROID_SPAWN_INTERVAL_MIN: u32 = 55;

    /// Rocket launch tuning
    pub const FUEL_DECAY_PER_SEC: f32 = 4.5;
    pub const FUEL_PER_STAGE: f32 = 22.0;
    pub const STAGE_REWARD: u64 = 200;
    /// Combo window after a stage completes (seconds)
    pub const COMBO_WINDOW_SECS: f32 = 6.0;
    pub const COMBO_BONUS: u64 = 75;
    pub const ALTITUDE_PER_STAGE: f32 = 8.0;

    /// Cosmic runner tuning
    pub const RUNNER_LANES: usize = 3;
    pub const RUNNER_PLAYER_X: f32 = 12.0;
    pub const RUNNER_BASE_SPEED: f32 = 6.0;
    /// Speed gained per logical unit of distance travelled
    pub const RUNNER_SPEED_RAMP: f32 = 0.012;
    pub const RUNNER_MAX_SPEED: f32 = 22.0;
    pub const OBSTACLE_DAMAGE: f32 = 25.0;
    pub const OBSTACLE_REWARD: u64 = 80;
    /// Distance target to win the level
    pub const RUNNER_DISTANCE_TARGET: f32 = 900.0;
    pub const RUNNER_SPAWN_INTERVAL: u32 = 130;
    pub const RUNNER_SPAWN_INTERVAL_MIN: u32 = 50;

    /// Background parallax scroll speed (cosmetic only)
    pub const BG_SCROLL_SPEED: f32 = 2.0;
}

/// Case-insensitive comparison for single typed characters.
#[inline]
pub fn chars_match(expected: char, typed: char) -> bool {
    expected.eq_ignore_ascii_case(&typed)
}
