//! Fire-and-forget sound feedback
//!
//! Every tone is synthesized at startup from the manifest's tone
//! table; no sound files ship with the game. A missing audio device
//! degrades to silence, never to an error the game loop sees.

use std::sync::Arc;

use kira::sound::static_sound::{StaticSoundData, StaticSoundSettings};
use kira::{AudioManager, AudioManagerSettings, DefaultBackend, Frame};

use crate::assets::{ToneSpec, ToneTable};
use crate::settings::Settings;
use crate::sim::GameEvent;

const SAMPLE_RATE: u32 = 44_100;
/// Base amplitude before the volume sliders are applied.
const BASE_GAIN: f32 = 0.35;

/// Render one tone as a decaying sine burst.
fn render_tone(tone: ToneSpec, gain: f32) -> StaticSoundData {
    let sample_count = (tone.secs * SAMPLE_RATE as f32) as usize;
    let mut frames = Vec::with_capacity(sample_count);
    for i in 0..sample_count {
        let t = i as f32 / SAMPLE_RATE as f32;
        // Exponential decay keeps short blips from clicking
        let envelope = (-5.0 * t / tone.secs).exp();
        let sample = (t * tone.freq * std::f32::consts::TAU).sin() * envelope * gain;
        frames.push(Frame::from_mono(sample));
    }
    StaticSoundData {
        sample_rate: SAMPLE_RATE,
        frames: Arc::from(frames),
        settings: StaticSoundSettings::default(),
        slice: None,
    }
}

/// Maps sim events to pre-rendered tones and plays them.
pub struct AudioFeedback {
    manager: Option<AudioManager<DefaultBackend>>,
    key_matched: StaticSoundData,
    key_rejected: StaticSoundData,
    word_completed: StaticSoundData,
    impact: StaticSoundData,
    stage_complete: StaticSoundData,
    level_won: StaticSoundData,
    level_lost: StaticSoundData,
    game_over: StaticSoundData,
    run_complete: StaticSoundData,
}

impl AudioFeedback {
    /// Set up the audio backend and pre-render every tone. A backend
    /// failure is logged once and the game continues silently.
    pub fn new(settings: &Settings, tones: &ToneTable) -> Self {
        let manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(manager) => Some(manager),
            Err(err) => {
                log::warn!("Audio unavailable ({err}); continuing without sound");
                None
            }
        };
        let gain = BASE_GAIN * settings.effective_sfx_volume();
        Self {
            manager,
            key_matched: render_tone(tones.key_matched, gain),
            key_rejected: render_tone(tones.key_rejected, gain),
            word_completed: render_tone(tones.word_completed, gain),
            impact: render_tone(tones.impact, gain),
            stage_complete: render_tone(tones.stage_complete, gain),
            level_won: render_tone(tones.level_won, gain),
            level_lost: render_tone(tones.level_lost, gain),
            game_over: render_tone(tones.game_over, gain),
            run_complete: render_tone(tones.run_complete, gain),
        }
    }

    fn sound_for(&self, event: GameEvent) -> &StaticSoundData {
        match event {
            GameEvent::KeyMatched => &self.key_matched,
            GameEvent::KeyRejected => &self.key_rejected,
            GameEvent::WordCompleted => &self.word_completed,
            GameEvent::Impact => &self.impact,
            GameEvent::StageComplete => &self.stage_complete,
            GameEvent::LevelWon => &self.level_won,
            GameEvent::LevelLost => &self.level_lost,
            GameEvent::GameOver => &self.game_over,
            GameEvent::RunComplete => &self.run_complete,
        }
    }

    /// Play the tone for `event`. Never blocks, never fails the caller.
    pub fn play(&mut self, event: GameEvent) {
        let sound = self.sound_for(event).clone();
        if let Some(manager) = self.manager.as_mut() {
            if let Err(err) = manager.play(sound) {
                log::debug!("Dropped sound for {event:?}: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_tone_has_expected_length() {
        let data = render_tone(ToneSpec { freq: 440.0, secs: 0.5 }, 0.3);
        assert_eq!(data.frames.len(), (0.5 * SAMPLE_RATE as f32) as usize);
        assert_eq!(data.sample_rate, SAMPLE_RATE);
    }

    #[test]
    fn samples_stay_within_gain() {
        let data = render_tone(ToneSpec { freq: 880.0, secs: 0.2 }, 0.3);
        assert!(data.frames.iter().all(|f| f.left.abs() <= 0.3));
    }

    #[test]
    fn zero_gain_renders_silence() {
        let data = render_tone(ToneSpec { freq: 880.0, secs: 0.1 }, 0.0);
        assert!(data.frames.iter().all(|f| f.left == 0.0 && f.right == 0.0));
    }
}
