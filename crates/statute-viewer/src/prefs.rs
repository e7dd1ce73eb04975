//! Persisted reader preferences: theme and font size.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use statute_types::Result;

use crate::config::FontBounds;

pub const THEME_KEY: &str = "theme";
pub const FONT_SIZE_KEY: &str = "fontSize";

/// String key/value storage for preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON file store. The whole map is rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open `path`, starting empty when the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self> {
        let values = if path.exists() {
            let text = std::fs::read_to_string(path)?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        let text = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

// -------------------------------------------------------------------
// Theme
// -------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// `"dark"` is dark; anything else, including nothing, is light.
    pub fn from_pref(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Label of the theme button: it names the theme a click switches to.
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Light => "Dark Mode",
            Self::Dark => "Light Mode",
        }
    }

    pub fn body_class(self) -> Option<&'static str> {
        match self {
            Self::Dark => Some("dark-theme"),
            Self::Light => None,
        }
    }
}

// -------------------------------------------------------------------
// Preferences
// -------------------------------------------------------------------

/// Current theme and font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub font_size: u32,
}

impl Preferences {
    /// Read both preferences, falling back to defaults for missing or
    /// unparsable values.
    pub fn load(store: &dyn PreferenceStore, bounds: &FontBounds) -> Self {
        let theme = Theme::from_pref(store.get(THEME_KEY).as_deref());
        let font_size = store
            .get(FONT_SIZE_KEY)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&v| v > 0)
            .map_or(bounds.default, |v| bounds.clamp(v));
        Self { theme, font_size }
    }

    /// Flip the theme and persist it.
    pub fn toggle_theme(&mut self, store: &mut dyn PreferenceStore) {
        self.theme = self.theme.toggled();
        persist(store, THEME_KEY, self.theme.as_str());
    }

    /// Step the font up. Returns false at the upper bound.
    pub fn increase_font(&mut self, bounds: &FontBounds, store: &mut dyn PreferenceStore) -> bool {
        if self.font_size >= bounds.max {
            return false;
        }
        self.font_size = (self.font_size + bounds.step).min(bounds.max);
        persist(store, FONT_SIZE_KEY, &self.font_size.to_string());
        true
    }

    /// Step the font down. Returns false at the lower bound.
    pub fn decrease_font(&mut self, bounds: &FontBounds, store: &mut dyn PreferenceStore) -> bool {
        if self.font_size <= bounds.min {
            return false;
        }
        self.font_size = self.font_size.saturating_sub(bounds.step).max(bounds.min);
        persist(store, FONT_SIZE_KEY, &self.font_size.to_string());
        true
    }
}

fn persist(store: &mut dyn PreferenceStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        log::warn!("could not save preference {key}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_store_is_empty() {
        let p = Preferences::load(&MemoryStore::new(), &FontBounds::default());
        assert_eq!(p.theme, Theme::Light);
        assert_eq!(p.font_size, 16);
    }

    #[test]
    fn stored_values_are_read_and_clamped() {
        let bounds = FontBounds::default();
        let store = MemoryStore::new().with(THEME_KEY, "dark").with(FONT_SIZE_KEY, "40");
        let p = Preferences::load(&store, &bounds);
        assert_eq!(p.theme, Theme::Dark);
        assert_eq!(p.font_size, 24);

        let junk = MemoryStore::new().with(THEME_KEY, "sepia").with(FONT_SIZE_KEY, "big");
        let p = Preferences::load(&junk, &bounds);
        assert_eq!(p.theme, Theme::Light);
        assert_eq!(p.font_size, 16);
    }

    #[test]
    fn font_steps_stop_at_bounds() {
        let bounds = FontBounds::default();
        let mut store = MemoryStore::new();
        let mut p = Preferences {
            theme: Theme::Light,
            font_size: 23,
        };
        assert!(p.increase_font(&bounds, &mut store));
        assert!(!p.increase_font(&bounds, &mut store));
        assert_eq!(p.font_size, 24);
        assert_eq!(store.get(FONT_SIZE_KEY).as_deref(), Some("24"));

        p.font_size = 11;
        assert!(p.decrease_font(&bounds, &mut store));
        assert!(!p.decrease_font(&bounds, &mut store));
        assert_eq!(p.font_size, 10);
    }

    #[test]
    fn theme_labels_name_the_other_theme() {
        assert_eq!(Theme::Light.button_label(), "Dark Mode");
        assert_eq!(Theme::Dark.button_label(), "Light Mode");
        assert_eq!(Theme::Dark.body_class(), Some("dark-theme"));
    }

    #[test]
    fn toggle_theme_persists() {
        let mut store = MemoryStore::new();
        let mut p = Preferences::load(&store, &FontBounds::default());
        p.toggle_theme(&mut store);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        p.toggle_theme(&mut store);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        {
            let mut store = FileStore::open(&path).unwrap();
            assert_eq!(store.get(THEME_KEY), None);
            store.set(THEME_KEY, "dark").unwrap();
            store.set(FONT_SIZE_KEY, "18").unwrap();
        }
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(reopened.get(FONT_SIZE_KEY).as_deref(), Some("18"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(FileStore::open(&path).is_err());
    }
}
