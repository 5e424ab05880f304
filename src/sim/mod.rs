//! Deterministic game simulation
//!
//! Pure logic with no I/O: the frontend feeds `TickInput` into `tick`
//! at a fixed rate and reads the resulting `GameState`. Given the same
//! seed and the same inputs, the sim replays identically.

pub mod arena;
pub mod level;
pub mod particles;
pub mod state;
pub mod tick;
pub mod words;

pub use level::{ActiveLevel, Outcome};
pub use particles::{Particle, ParticleKind, ParticleSystem};
pub use state::{GameEvent, GamePhase, GameState, LevelId, PlayerState};
pub use tick::{tick, TickInput};
pub use words::{KeyOutcome, MismatchPolicy, WordTarget};
