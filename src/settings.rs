//! Player settings and preferences
//!
//! Each preference lives under its own storage key and loads
//! independently, so one corrupt value never resets the others.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage};
use crate::sim::{Difficulty, ThemeBlend};

pub const DIFFICULTY_KEY: &str = "sky-dodge-difficulty";
pub const CURRENT_LEVEL_KEY: &str = "sky-dodge-current-level";
pub const AUDIO_KEY: &str = "sky-dodge-audio-settings";
pub const THEME_BLEND_KEY: &str = "sky-dodge-theme-blend";

/// Volume and mute state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioSettings {
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub is_muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music_volume: 0.5,
            sfx_volume: 0.7,
            is_muted: false,
        }
    }
}

impl AudioSettings {
    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = clamp_volume(volume);
    }

    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = clamp_volume(volume);
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.is_muted = !self.is_muted;
        self.is_muted
    }

    /// Music volume after mute
    pub fn effective_music_volume(&self) -> f32 {
        if self.is_muted { 0.0 } else { self.music_volume }
    }

    /// Sound effect volume after mute
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.is_muted { 0.0 } else { self.sfx_volume }
    }

    /// Clamp values that came from storage
    fn sanitized(self) -> Self {
        Self {
            music_volume: clamp_volume(self.music_volume),
            sfx_volume: clamp_volume(self.sfx_volume),
            is_muted: self.is_muted,
        }
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) }
}

/// Saved preferences
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Highest level reached in the last run, starting at 1
    pub current_level: u32,
    pub audio: AudioSettings,
    pub theme_blend: ThemeBlend,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            current_level: 1,
            audio: AudioSettings::default(),
            theme_blend: ThemeBlend::default(),
        }
    }
}

impl Settings {
    pub fn load(storage: &dyn Storage) -> Self {
        let defaults = Self::default();

        let difficulty = persistence::load_raw(storage, DIFFICULTY_KEY)
            .map(|raw| {
                Difficulty::parse(&raw).unwrap_or_else(|| {
                    log::warn!("Unknown difficulty {:?}, using default", raw);
                    defaults.difficulty
                })
            })
            .unwrap_or(defaults.difficulty);

        let current_level = persistence::load_raw(storage, CURRENT_LEVEL_KEY)
            .map(|raw| match raw.trim().parse::<u32>() {
                Ok(level) if level >= 1 => level,
                _ => {
                    log::warn!("Invalid stored level {:?}, using default", raw);
                    defaults.current_level
                }
            })
            .unwrap_or(defaults.current_level);

        let audio = persistence::load_or_default::<AudioSettings>(storage, AUDIO_KEY).sanitized();

        let theme_blend = persistence::load_raw(storage, THEME_BLEND_KEY)
            .and_then(|raw| ThemeBlend::parse(&raw))
            .unwrap_or(defaults.theme_blend);

        log::info!(
            "Loaded settings: {} difficulty, level {}",
            difficulty.as_str(),
            current_level
        );

        Self {
            difficulty,
            current_level,
            audio,
            theme_blend,
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        self.save_difficulty(storage);
        self.save_current_level(storage);
        self.save_audio(storage);
        if let Err(e) = storage.set(THEME_BLEND_KEY, self.theme_blend.as_str()) {
            log::error!("Failed to save theme blend: {}", e);
        }
    }

    pub fn save_difficulty(&self, storage: &mut dyn Storage) {
        if let Err(e) = storage.set(DIFFICULTY_KEY, self.difficulty.as_str()) {
            log::error!("Failed to save difficulty: {}", e);
        }
    }

    pub fn save_current_level(&self, storage: &mut dyn Storage) {
        if let Err(e) = storage.set(CURRENT_LEVEL_KEY, &self.current_level.to_string()) {
            log::error!("Failed to save current level: {}", e);
        }
    }

    pub fn save_audio(&self, storage: &mut dyn Storage) {
        if let Err(e) = persistence::save_json(storage, AUDIO_KEY, &self.audio) {
            log::error!("Failed to save audio settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::persistence::tests::BrokenStorage;

    #[test]
    fn test_defaults_when_empty() {
        let storage = MemoryStorage::new();
        let settings = Settings::load(&storage);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.current_level, 1);
        assert_eq!(settings.audio.music_volume, 0.5);
        assert_eq!(settings.audio.sfx_volume, 0.7);
        assert!(!settings.audio.is_muted);
        assert_eq!(settings.theme_blend, ThemeBlend::Step);
    }

    #[test]
    fn test_roundtrip() {
        let mut storage = MemoryStorage::new();
        let mut settings = Settings {
            difficulty: Difficulty::Hard,
            current_level: 7,
            theme_blend: ThemeBlend::Smooth,
            ..Default::default()
        };
        settings.audio.set_music_volume(0.25);
        settings.audio.toggle_mute();
        settings.save(&mut storage);

        assert_eq!(storage.get(DIFFICULTY_KEY).unwrap().as_deref(), Some("hard"));
        assert_eq!(storage.get(CURRENT_LEVEL_KEY).unwrap().as_deref(), Some("7"));
        let audio = storage.get(AUDIO_KEY).unwrap().unwrap();
        assert!(audio.contains("\"musicVolume\":0.25"));
        assert!(audio.contains("\"isMuted\":true"));

        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_each_key_falls_back_independently() {
        let mut storage = MemoryStorage::new();
        storage.set(DIFFICULTY_KEY, "nightmare").unwrap();
        storage.set(CURRENT_LEVEL_KEY, "4").unwrap();
        storage.set(AUDIO_KEY, "{broken").unwrap();
        storage.set(THEME_BLEND_KEY, "smooth").unwrap();

        let settings = Settings::load(&storage);
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.current_level, 4);
        assert_eq!(settings.audio, AudioSettings::default());
        assert_eq!(settings.theme_blend, ThemeBlend::Smooth);
    }

    #[test]
    fn test_invalid_level() {
        let mut storage = MemoryStorage::new();
        storage.set(CURRENT_LEVEL_KEY, "0").unwrap();
        assert_eq!(Settings::load(&storage).current_level, 1);
        storage.set(CURRENT_LEVEL_KEY, "three").unwrap();
        assert_eq!(Settings::load(&storage).current_level, 1);
    }

    #[test]
    fn test_partial_audio_blob() {
        let mut storage = MemoryStorage::new();
        storage.set(AUDIO_KEY, r#"{"sfxVolume":3.0}"#).unwrap();
        let audio = Settings::load(&storage).audio;
        assert_eq!(audio.sfx_volume, 1.0);
        assert_eq!(audio.music_volume, 0.5);
    }

    #[test]
    fn test_volume_and_mute() {
        let mut audio = AudioSettings::default();
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.sfx_volume, 0.0);
        audio.set_music_volume(f32::NAN);
        assert_eq!(audio.music_volume, 0.0);
        audio.set_music_volume(0.8);
        assert!(audio.toggle_mute());
        assert_eq!(audio.effective_music_volume(), 0.0);
        assert!(!audio.toggle_mute());
        assert_eq!(audio.effective_music_volume(), 0.8);
    }

    #[test]
    fn test_broken_storage_never_fails() {
        let mut storage = BrokenStorage;
        let settings = Settings::load(&storage);
        assert_eq!(settings, Settings::default());
        settings.save(&mut storage);
    }
}
