//! Portal settings and preferences
//!
//! Persisted as JSON next to the best scores.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError};

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    Urdu,
    RomanUrdu,
}

impl Language {
    /// Short code used by the host page
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Urdu => "ur",
            Language::RomanUrdu => "ru",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Some(Language::English),
            "ur" | "urdu" => Some(Language::Urdu),
            "ru" | "roman" | "roman-urdu" => Some(Language::RomanUrdu),
            _ => None,
        }
    }

    /// Display label in its own script
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Urdu => "اردو (Urdu)",
            Language::RomanUrdu => "Roman Urdu",
        }
    }

    /// Right-to-left layout
    pub fn is_rtl(&self) -> bool {
        *self == Language::Urdu
    }

    /// Value for the page's `dir` attribute
    pub fn text_direction(&self) -> &'static str {
        if self.is_rtl() { "rtl" } else { "ltr" }
    }
}

/// Portal settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub language: Language,
    pub sound_on: bool,
    /// Neon glow around entities (blur is costly on low-end devices)
    pub glow_effects: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::English,
            sound_on: true,
            glow_effects: true,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "neon_arcade_settings";

    /// Load settings, falling back to defaults on missing or corrupt JSON
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(json) = store.get_item(Self::STORAGE_KEY) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Discarding corrupt settings: {}", e);
                Self::default()
            }
        }
    }

    /// Switch language. Returns whether anything changed.
    pub fn set_language(&mut self, language: Language) -> bool {
        let changed = self.language != language;
        self.language = language;
        changed
    }

    /// Flip the sound preference and return the new value
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_on = !self.sound_on;
        self.sound_on
    }

    /// Flip neon glow and return the new value
    pub fn toggle_glow(&mut self) -> bool {
        self.glow_effects = !self.glow_effects;
        self.glow_effects
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self).map_err(|e| StorageError::WriteRejected {
            key: Self::STORAGE_KEY.to_string(),
            reason: e.to_string(),
        })?;
        store.set_item(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
