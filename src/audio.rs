//! Sound effects and background music
//!
//! Sound effects are generated with Web Audio oscillators; the looping music
//! track streams from an `<audio>` element. Native builds keep the same
//! state machine without a backend.

use crate::settings::AudioSettings;

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player hit an obstacle (shielded or not)
    Collision,
    /// Power-up collected
    PowerUp,
    /// Score crossed a multiple of 100
    ScoreMilestone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Audio manager for the game
pub struct AudioManager {
    settings: AudioSettings,
    music: MusicState,
    #[cfg(target_arch = "wasm32")]
    backend: web::WebAudio,
}

impl AudioManager {
    pub fn new(settings: AudioSettings) -> Self {
        Self {
            settings,
            music: MusicState::Stopped,
            #[cfg(target_arch = "wasm32")]
            backend: web::WebAudio::new(settings.effective_music_volume()),
        }
    }

    pub fn settings(&self) -> AudioSettings {
        self.settings
    }

    pub fn music_state(&self) -> MusicState {
        self.music
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        self.settings.set_music_volume(volume);
        self.apply_music_volume();
    }

    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.settings.set_sfx_volume(volume);
    }

    /// Returns the new muted flag
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.settings.toggle_mute();
        self.apply_music_volume();
        log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
        muted
    }

    fn apply_music_volume(&mut self) {
        #[cfg(target_arch = "wasm32")]
        self.backend
            .set_music_volume(self.settings.effective_music_volume());
    }

    /// Play a sound effect. Returns false when muted or silent.
    pub fn play(&self, effect: SoundEffect) -> bool {
        let vol = self.settings.effective_sfx_volume();
        if vol <= 0.0 {
            return false;
        }

        #[cfg(target_arch = "wasm32")]
        self.backend.play(effect, vol);
        #[cfg(not(target_arch = "wasm32"))]
        log::debug!("Sound: {:?} at {:.2}", effect, vol);

        true
    }

    /// Start or continue the music loop; ignored while muted
    pub fn play_music(&mut self) {
        if self.settings.is_muted || self.music == MusicState::Playing {
            return;
        }

        #[cfg(target_arch = "wasm32")]
        self.backend.play_music();
        self.music = MusicState::Playing;
    }

    /// Hold the music at its current position
    pub fn pause_music(&mut self) {
        if self.music != MusicState::Playing {
            return;
        }

        #[cfg(target_arch = "wasm32")]
        self.backend.pause_music();
        self.music = MusicState::Paused;
    }

    /// Stop the music and rewind it
    pub fn stop_music(&mut self) {
        #[cfg(target_arch = "wasm32")]
        self.backend.stop_music();
        self.music = MusicState::Stopped;
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    const MUSIC_URL: &str = "assets/audio/background-music.mp3";

    pub struct WebAudio {
        ctx: Option<AudioContext>,
        music: Option<HtmlAudioElement>,
    }

    impl WebAudio {
        pub fn new(music_volume: f32) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - sound effects disabled");
            }

            let music = HtmlAudioElement::new_with_src(MUSIC_URL).ok();
            match &music {
                Some(el) => {
                    el.set_loop(true);
                    el.set_volume(music_volume as f64);
                }
                None => log::warn!("Failed to create music element - music disabled"),
            }

            Self { ctx, music }
        }

        pub fn set_music_volume(&self, volume: f32) {
            if let Some(el) = &self.music {
                el.set_volume(volume as f64);
            }
        }

        pub fn play_music(&self) {
            if let Some(el) = &self.music {
                // Autoplay rejection is expected before the first user gesture
                let _ = el.play();
            }
        }

        pub fn pause_music(&self) {
            if let Some(el) = &self.music {
                let _ = el.pause();
            }
        }

        pub fn stop_music(&self) {
            if let Some(el) = &self.music {
                let _ = el.pause();
                el.set_current_time(0.0);
            }
        }

        pub fn play(&self, effect: SoundEffect, vol: f32) {
            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Collision => play_collision(ctx, vol),
                SoundEffect::PowerUp => play_power_up(ctx, vol),
                SoundEffect::ScoreMilestone => play_milestone(ctx, vol),
            }
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Collision - low thump with a buzzy edge
    fn play_collision(ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = create_osc(ctx, 180.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.6, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(180.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0, t + 0.25)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        if let Some((osc, gain)) = create_osc(ctx, 90.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }
    }

    /// Power-up - rising three-note chime
    fn play_power_up(ctx: &AudioContext, vol: f32) {
        for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Milestone - short major arpeggio
    fn play_milestone(ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.25, 659.25, 783.99, 1046.5].iter().enumerate() {
            let delay = i as f64 * 0.1;
            if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.35).ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_respects_mute() {
        let mut audio = AudioManager::new(AudioSettings::default());
        assert!(audio.play(SoundEffect::Collision));
        audio.toggle_mute();
        assert!(!audio.play(SoundEffect::PowerUp));
        audio.toggle_mute();
        audio.set_sfx_volume(0.0);
        assert!(!audio.play(SoundEffect::ScoreMilestone));
    }

    #[test]
    fn test_music_state_machine() {
        let mut audio = AudioManager::new(AudioSettings::default());
        assert_eq!(audio.music_state(), MusicState::Stopped);

        audio.pause_music();
        assert_eq!(audio.music_state(), MusicState::Stopped);

        audio.play_music();
        assert_eq!(audio.music_state(), MusicState::Playing);
        audio.pause_music();
        assert_eq!(audio.music_state(), MusicState::Paused);
        audio.play_music();
        assert_eq!(audio.music_state(), MusicState::Playing);
        audio.stop_music();
        assert_eq!(audio.music_state(), MusicState::Stopped);
    }

    #[test]
    fn test_muted_music_does_not_start() {
        let mut audio = AudioManager::new(AudioSettings {
            is_muted: true,
            ..Default::default()
        });
        audio.play_music();
        assert_eq!(audio.music_state(), MusicState::Stopped);
    }

    #[test]
    fn test_volume_setters_clamp() {
        let mut audio = AudioManager::new(AudioSettings::default());
        audio.set_music_volume(2.0);
        audio.set_sfx_volume(-0.5);
        assert_eq!(audio.settings().music_volume, 1.0);
        assert_eq!(audio.settings().sfx_volume, 0.0);
    }
}
