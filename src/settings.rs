//! User settings and preferences
//!
//! Persisted as a single document under [`consts::SETTINGS_KEY`]. Stored data
//! is merged over the built-in defaults field by field, so fields added later
//! still pick up their default for existing users.
//!
//! [`consts::SETTINGS_KEY`]: crate::consts::SETTINGS_KEY

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_KEY;
use crate::model::Difficulty;
use crate::observe::ObserverId;
use crate::persistence::{Diagnostic, Persisted, SharedStorage};
use crate::platform::ThemeSink;

/// Difficulty preselected when setting up a quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DefaultDifficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Any,
}

impl DefaultDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultDifficulty::Easy => "easy",
            DefaultDifficulty::Medium => "medium",
            DefaultDifficulty::Hard => "hard",
            DefaultDifficulty::Any => "any",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DefaultDifficulty::Easy),
            "medium" | "med" => Some(DefaultDifficulty::Medium),
            "hard" => Some(DefaultDifficulty::Hard),
            "any" | "" => Some(DefaultDifficulty::Any),
            _ => None,
        }
    }

    /// Concrete difficulty filter, `None` for "any"
    pub fn filter(&self) -> Option<Difficulty> {
        match self {
            DefaultDifficulty::Easy => Some(Difficulty::Easy),
            DefaultDifficulty::Medium => Some(Difficulty::Medium),
            DefaultDifficulty::Hard => Some(Difficulty::Hard),
            DefaultDifficulty::Any => None,
        }
    }
}

/// Application preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub dark_mode: bool,
    pub sound_enabled: bool,
    pub default_difficulty: DefaultDifficulty,
    pub default_question_count: u32,
    pub username: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            sound_enabled: true,
            default_difficulty: DefaultDifficulty::Any,
            default_question_count: crate::consts::DEFAULT_QUESTION_COUNT,
            username: "Player".to_string(),
        }
    }
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub dark_mode: Option<bool>,
    pub sound_enabled: Option<bool>,
    pub default_difficulty: Option<DefaultDifficulty>,
    pub default_question_count: Option<u32>,
    pub username: Option<String>,
}

impl SettingsPatch {
    pub fn dark_mode(mut self, enabled: bool) -> Self {
        self.dark_mode = Some(enabled);
        self
    }

    pub fn sound_enabled(mut self, enabled: bool) -> Self {
        self.sound_enabled = Some(enabled);
        self
    }

    pub fn default_difficulty(mut self, difficulty: DefaultDifficulty) -> Self {
        self.default_difficulty = Some(difficulty);
        self
    }

    pub fn default_question_count(mut self, count: u32) -> Self {
        self.default_question_count = Some(count);
        self
    }

    pub fn username(mut self, name: impl Into<String>) -> Self {
        self.username = Some(name.into());
        self
    }

    /// Shallow merge over `settings`
    pub fn apply_to(&self, settings: &mut AppSettings) {
        if let Some(v) = self.dark_mode {
            settings.dark_mode = v;
        }
        if let Some(v) = self.sound_enabled {
            settings.sound_enabled = v;
        }
        if let Some(v) = self.default_difficulty {
            settings.default_difficulty = v;
        }
        if let Some(v) = self.default_question_count {
            settings.default_question_count = v;
        }
        if let Some(v) = &self.username {
            settings.username = v.clone();
        }
    }
}

/// Names a single setting for [`SettingsStore::get`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    DarkMode,
    SoundEnabled,
    DefaultDifficulty,
    DefaultQuestionCount,
    Username,
}

/// Value of a single setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Difficulty(DefaultDifficulty),
    Count(u32),
    Text(String),
}

impl AppSettings {
    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::DarkMode => SettingValue::Bool(self.dark_mode),
            SettingKey::SoundEnabled => SettingValue::Bool(self.sound_enabled),
            SettingKey::DefaultDifficulty => SettingValue::Difficulty(self.default_difficulty),
            SettingKey::DefaultQuestionCount => SettingValue::Count(self.default_question_count),
            SettingKey::Username => SettingValue::Text(self.username.clone()),
        }
    }
}

/// Persisted settings with the dark-mode theme side-effect
pub struct SettingsStore {
    cell: Persisted<AppSettings>,
    theme: Box<dyn ThemeSink>,
}

impl SettingsStore {
    /// Load settings from storage, merged over defaults. If a stored document
    /// was found, its dark-mode value is applied to the theme.
    pub fn load(storage: SharedStorage, theme: Box<dyn ThemeSink>) -> Self {
        let (cell, found) = Persisted::load_or(SETTINGS_KEY, storage, AppSettings::default);
        if found {
            theme.apply_dark_mode(cell.get().dark_mode);
        } else {
            log::info!("Using default settings");
        }
        Self { cell, theme }
    }

    pub fn get_all(&self) -> &AppSettings {
        self.cell.get()
    }

    pub fn get(&self, key: SettingKey) -> SettingValue {
        self.cell.get().get(key)
    }

    /// Merge `patch` over the current settings and persist. Touching dark mode
    /// also pushes the new value to the theme.
    pub fn update(&mut self, patch: SettingsPatch) {
        self.cell.update(|settings| patch.apply_to(settings));
        if let Some(enabled) = patch.dark_mode {
            self.theme.apply_dark_mode(enabled);
        }
    }

    /// Restore built-in defaults, persist them, and re-apply the default theme
    pub fn reset_to_default(&mut self) {
        let defaults = AppSettings::default();
        let dark_mode = defaults.dark_mode;
        self.cell.set(defaults);
        self.theme.apply_dark_mode(dark_mode);
        log::info!("Settings reset to defaults");
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&AppSettings) + 'static) -> ObserverId {
        self.cell.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.cell.unsubscribe(id)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.cell.diagnostics()
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("settings", self.cell.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::PersistOp;
    use crate::platform::{MemoryStorage, RecordingTheme};
    use std::rc::Rc;

    fn open(storage: &MemoryStorage, theme: &RecordingTheme) -> SettingsStore {
        SettingsStore::load(Rc::new(storage.clone()), Box::new(theme.clone()))
    }

    #[test]
    fn test_defaults_when_nothing_stored() {
        let storage = MemoryStorage::new();
        let theme = RecordingTheme::new();
        let store = open(&storage, &theme);
        assert_eq!(store.get_all(), &AppSettings::default());
        assert_eq!(store.get(SettingKey::Username), SettingValue::Text("Player".into()));
        assert_eq!(store.get(SettingKey::DefaultQuestionCount), SettingValue::Count(10));
        assert!(theme.applied().is_empty());
        assert!(store.diagnostics().is_empty());
    }

    #[test]
    fn test_update_is_partial_and_survives_reload() {
        let storage = MemoryStorage::new();
        let theme = RecordingTheme::new();
        let mut store = open(&storage, &theme);
        store.update(SettingsPatch::default().username("Ada").default_question_count(5));
        let before = store.get_all().clone();

        store.update(SettingsPatch::default().dark_mode(true));
        assert_eq!(theme.applied(), vec![true]);

        let reloaded = open(&storage, &RecordingTheme::new());
        let expected = AppSettings {
            dark_mode: true,
            ..before
        };
        assert_eq!(reloaded.get_all(), &expected);
    }

    #[test]
    fn test_update_without_dark_mode_leaves_theme_alone() {
        let storage = MemoryStorage::new();
        let theme = RecordingTheme::new();
        let mut store = open(&storage, &theme);
        store.update(SettingsPatch::default().sound_enabled(false));
        assert!(theme.applied().is_empty());
        assert!(!store.get_all().sound_enabled);
    }

    #[test]
    fn test_stored_fields_merge_over_defaults() {
        let storage = MemoryStorage::new();
        storage.put_raw(SETTINGS_KEY, r#"{"darkMode":true,"username":"Lin"}"#);
        let theme = RecordingTheme::new();
        let store = open(&storage, &theme);

        let settings = store.get_all();
        assert!(settings.dark_mode);
        assert_eq!(settings.username, "Lin");
        assert!(settings.sound_enabled);
        assert_eq!(settings.default_difficulty, DefaultDifficulty::Any);
        assert_eq!(settings.default_question_count, 10);
        assert_eq!(theme.applied(), vec![true]);
    }

    #[test]
    fn test_malformed_document_falls_back_to_defaults() {
        let storage = MemoryStorage::new();
        storage.put_raw(SETTINGS_KEY, r#"{"darkMode":"yes"}"#);
        let store = open(&storage, &RecordingTheme::new());
        assert_eq!(store.get_all(), &AppSettings::default());
        assert_eq!(store.diagnostics().len(), 1);
        assert_eq!(store.diagnostics()[0].op, PersistOp::Load);
    }

    #[test]
    fn test_reset_to_default_reapplies_theme() {
        let storage = MemoryStorage::new();
        let theme = RecordingTheme::new();
        let mut store = open(&storage, &theme);
        store.update(SettingsPatch::default().dark_mode(true).username("Kai"));
        store.reset_to_default();

        assert_eq!(store.get_all(), &AppSettings::default());
        assert_eq!(theme.last(), Some(false));
        let reloaded = open(&storage, &RecordingTheme::new());
        assert_eq!(reloaded.get_all(), &AppSettings::default());
    }

    #[test]
    fn test_observers_see_every_update() {
        let storage = MemoryStorage::new();
        let mut store = open(&storage, &RecordingTheme::new());
        let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |s| sink.borrow_mut().push(s.username.clone()));
        store.update(SettingsPatch::default().username("Mo"));
        assert_eq!(*seen.borrow(), vec!["Player".to_string(), "Mo".to_string()]);
    }

    #[test]
    fn test_default_difficulty_parse() {
        assert_eq!(DefaultDifficulty::from_str("MED"), Some(DefaultDifficulty::Medium));
        assert_eq!(DefaultDifficulty::from_str("any"), Some(DefaultDifficulty::Any));
        assert_eq!(DefaultDifficulty::from_str("extreme"), None);
        assert_eq!(DefaultDifficulty::Any.filter(), None);
        assert_eq!(DefaultDifficulty::Hard.filter(), Some(Difficulty::Hard));
    }
}
