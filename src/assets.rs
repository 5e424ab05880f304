//! Embedded game data: word banks and the audio tone table
//!
//! The manifest is compiled into the binary; a malformed or incomplete
//! manifest falls back to a built-in set rather than aborting.

use serde::Deserialize;

/// Raw manifest JSON, baked in at compile time.
const MANIFEST_JSON: &str = include_str!("../assets/manifest.json");

/// Word banks by difficulty, plus the ordered rocket stage sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct WordBank {
    pub easy: Vec<String>,
    pub medium: Vec<String>,
    pub hard: Vec<String>,
    /// Played strictly in order by the rocket level
    pub stages: Vec<String>,
}

/// A single synthesized tone: frequency in Hz, duration in seconds.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ToneSpec {
    pub freq: f32,
    pub secs: f32,
}

/// One tone per feedback event the sim can emit.
#[derive(Debug, Clone, Deserialize)]
pub struct ToneTable {
    pub key_matched: ToneSpec,
    pub key_rejected: ToneSpec,
    pub word_completed: ToneSpec,
    pub impact: ToneSpec,
    pub stage_complete: ToneSpec,
    pub level_won: ToneSpec,
    pub level_lost: ToneSpec,
    pub game_over: ToneSpec,
    pub run_complete: ToneSpec,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetManifest {
    pub words: WordBank,
    pub tones: ToneTable,
}

impl AssetManifest {
    /// Parse the embedded manifest, falling back to the built-in set
    /// if it fails to parse or validate.
    pub fn load() -> Self {
        match serde_json::from_str::<AssetManifest>(MANIFEST_JSON) {
            Ok(manifest) if manifest.is_valid() => {
                log::info!(
                    "Loaded asset manifest ({} easy / {} medium / {} hard words, {} stages)",
                    manifest.words.easy.len(),
                    manifest.words.medium.len(),
                    manifest.words.hard.len(),
                    manifest.words.stages.len(),
                );
                manifest
            }
            Ok(_) => {
                log::warn!("Embedded manifest has an empty word bank, using built-in assets");
                Self::builtin()
            }
            Err(err) => {
                log::warn!("Embedded manifest failed to parse ({err}), using built-in assets");
                Self::builtin()
            }
        }
    }

    /// Every bank must have at least one word or the levels stall.
    fn is_valid(&self) -> bool {
        let w = &self.words;
        !w.easy.is_empty()
            && !w.medium.is_empty()
            && !w.hard.is_empty()
            && w.stages.iter().any(|s| !s.is_empty())
    }

    /// Minimal hard-coded asset set. Also the fixture for sim tests.
    pub fn builtin() -> Self {
        let words = WordBank {
            easy: ["sun", "moon", "star", "dust", "void", "nova", "beam"]
                .map(String::from)
                .to_vec(),
            medium: ["orbit", "comet", "probe", "lunar", "rover", "flare", "plasma"]
                .map(String::from)
                .to_vec(),
            hard: [
                "asteroid",
                "satellite",
                "telescope",
                "supernova",
                "trajectory",
            ]
            .map(String::from)
            .to_vec(),
            stages: ["ignition", "boosters", "throttle", "staging", "orbit"]
                .map(String::from)
                .to_vec(),
        };
        let tones = ToneTable {
            key_matched: ToneSpec { freq: 880.0, secs: 0.03 },
            key_rejected: ToneSpec { freq: 180.0, secs: 0.08 },
            word_completed: ToneSpec { freq: 1320.0, secs: 0.12 },
            impact: ToneSpec { freq: 110.0, secs: 0.25 },
            stage_complete: ToneSpec { freq: 660.0, secs: 0.20 },
            level_won: ToneSpec { freq: 990.0, secs: 0.40 },
            level_lost: ToneSpec { freq: 220.0, secs: 0.40 },
            game_over: ToneSpec { freq: 140.0, secs: 0.60 },
            run_complete: ToneSpec { freq: 1100.0, secs: 0.60 },
        };
        Self { words, tones }
    }
}
