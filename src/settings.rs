//! Game settings and preferences
//!
//! Persisted next to the leaderboard in the same key-value store.

use serde::{Deserialize, Serialize};

use crate::audio::Mixer;
use crate::storage::{KeyValueStore, StorageError};

/// How long a mismatched pair stays visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Pace {
    Relaxed,
    #[default]
    Normal,
    Quick,
}

impl Pace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pace::Relaxed => "Relaxed",
            Pace::Normal => "Normal",
            Pace::Quick => "Quick",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "slow" => Some(Pace::Relaxed),
            "normal" => Some(Pace::Normal),
            "quick" | "fast" => Some(Pace::Quick),
            _ => None,
        }
    }

    /// Mismatch display delay in milliseconds
    pub fn mismatch_delay_ms(&self) -> u32 {
        match self {
            Pace::Relaxed => 1800,
            Pace::Normal => 1200,
            Pace::Quick => 700,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pace: Pace,
    /// Pause between the last match and the win screen
    pub win_delay_ms: u32,

    // === Audio ===
    pub muted: bool,
    /// Volume (0.0 - 1.0)
    pub volume: f32,
    /// Directory holding the mp3 cues
    pub sounds_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pace: Pace::Normal,
            win_delay_ms: 500,
            muted: false,
            volume: 0.8,
            sounds_path: "sounds".to_string(),
        }
    }
}

impl Settings {
    /// Create settings from a pace preset
    pub fn from_pace(pace: Pace) -> Self {
        Self {
            pace,
            ..Self::default()
        }
    }

    pub fn mismatch_delay_ms(&self) -> u32 {
        self.pace.mismatch_delay_ms()
    }

    /// Mixer configured from the audio settings
    pub fn mixer(&self) -> Mixer {
        Mixer::new(self.volume, self.muted)
    }

    /// Storage key
    const STORAGE_KEY: &'static str = "musicalMemorySettings";

    /// Load settings; missing or unreadable data yields defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        if let Ok(Some(json)) = store.get(Self::STORAGE_KEY) {
            if let Ok(mut settings) = serde_json::from_str::<Settings>(&json) {
                settings.volume = settings.volume.clamp(0.0, 1.0);
                log::info!("Loaded settings");
                return settings;
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_pace_parsing() {
        assert_eq!(Pace::from_str("QUICK"), Some(Pace::Quick));
        assert_eq!(Pace::from_str("slow"), Some(Pace::Relaxed));
        assert_eq!(Pace::from_str("warp"), None);
        assert_eq!(Pace::from_str(Pace::Normal.as_str()), Some(Pace::Normal));
    }

    #[test]
    fn test_defaults_match_classic_timing() {
        let settings = Settings::default();
        assert_eq!(settings.mismatch_delay_ms(), 1200);
        assert_eq!(settings.win_delay_ms, 500);
    }

    #[test]
    fn test_load_missing_and_partial() {
        let mut store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());

        store.set("musicalMemorySettings", r#"{"pace":"Quick","volume":4.0}"#).unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.pace, Pace::Quick);
        assert_eq!(settings.volume, 1.0);
        assert_eq!(settings.sounds_path, "sounds");
    }

    #[test]
    fn test_save_roundtrip() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::from_pace(Pace::Relaxed);
        settings.muted = true;
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }
}
