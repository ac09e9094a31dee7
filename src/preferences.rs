//! Preferences
//!
//! Display preferences live in a string key-value store under a fixed namespace. Reads
//! never fail: a missing or malformed value falls back to the caller's default.

use std::{fs, io, path::PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

use crate::calendar::CalendarView;

/// Prefix applied to every preference key.
pub const NAMESPACE: &str = "salon-calendar-";

/// Smallest calendar zoom, in percent.
pub const MIN_ZOOM: u16 = 50;

/// Largest calendar zoom, in percent.
pub const MAX_ZOOM: u16 = 200;

/// Errors writing preferences.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// The backing file could not be read or written.
    #[error("failed to access preference file: {0}")]
    Io(#[from] io::Error),

    /// A value could not be encoded.
    #[error("failed to encode preference: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Raw string key-value storage.
pub trait PreferenceStore {
    /// Read the raw value stored under `key`.
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`PreferenceError`] if the value cannot be persisted.
    fn write(&mut self, key: &str, value: String) -> Result<(), PreferenceError>;
}

/// In-memory store, for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceStore {
    values: FxHashMap<String, String>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value);

        Ok(())
    }
}

/// Store backed by a single JSON object on disk.
///
/// The whole file is read on open and rewritten on every write. An unreadable or
/// malformed file opens as empty. A failed write leaves the in-memory values untouched.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: FxHashMap<String, String>,
}

impl JsonFilePreferenceStore {
    /// Open the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let values = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|error| {
                debug!(path = %path.display(), %error, "ignoring malformed preference file");

                FxHashMap::default()
            }),
            Err(error) if error.kind() == io::ErrorKind::NotFound => FxHashMap::default(),
            Err(error) => {
                debug!(path = %path.display(), %error, "ignoring unreadable preference file");

                FxHashMap::default()
            }
        };

        Self { path, values }
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), PreferenceError> {
        let mut values = self.values.clone();
        values.insert(key.to_string(), value);

        let encoded = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, encoded)?;

        self.values = values;

        Ok(())
    }
}

/// Typed, namespaced access to a [`PreferenceStore`].
#[derive(Debug)]
pub struct Preferences<S> {
    store: S,
}

impl<S: PreferenceStore> Preferences<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read `key`, or `fallback` if it is absent or cannot be decoded.
    pub fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let Some(raw) = self.store.read(&namespaced(key)) else {
            return fallback;
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(error) => {
                debug!(key, %error, "ignoring malformed preference");

                fallback
            }
        }
    }

    /// Write `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`PreferenceError`] if the value cannot be encoded or persisted.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), PreferenceError> {
        let encoded = serde_json::to_string(value)?;

        self.store.write(&namespaced(key), encoded)
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

fn namespaced(key: &str) -> String {
    format!("{NAMESPACE}{key}")
}

/// How appointment blocks are coloured.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    /// Colour by appointment status.
    #[default]
    Status,

    /// Colour by staff member.
    Staff,

    /// Colour by service.
    Service,
}

const VIEW_KEY: &str = "view";
const COLOR_MODE_KEY: &str = "color-mode";
const ZOOM_KEY: &str = "zoom";
const WORKING_HOURS_KEY: &str = "show-working-hours";

/// The calendar's persisted display settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CalendarPreferences {
    /// Active view
    pub view: CalendarView,

    /// Colour-coding mode
    pub color_mode: ColorMode,

    /// Zoom level in percent
    pub zoom: u16,

    /// Whether non-working hours are shaded
    pub show_working_hours: bool,
}

impl Default for CalendarPreferences {
    fn default() -> Self {
        Self {
            view: CalendarView::Week,
            color_mode: ColorMode::Status,
            zoom: 100,
            show_working_hours: true,
        }
    }
}

impl CalendarPreferences {
    /// Load every setting, falling back field by field.
    pub fn load<S: PreferenceStore>(preferences: &Preferences<S>) -> Self {
        let defaults = Self::default();

        Self {
            view: preferences.get(VIEW_KEY, defaults.view),
            color_mode: preferences.get(COLOR_MODE_KEY, defaults.color_mode),
            zoom: preferences
                .get(ZOOM_KEY, defaults.zoom)
                .clamp(MIN_ZOOM, MAX_ZOOM),
            show_working_hours: preferences.get(WORKING_HOURS_KEY, defaults.show_working_hours),
        }
    }

    /// Persist and then apply the view. On error `self` is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`PreferenceError`] if the value cannot be persisted.
    pub fn set_view<S: PreferenceStore>(
        &mut self,
        preferences: &mut Preferences<S>,
        view: CalendarView,
    ) -> Result<(), PreferenceError> {
        preferences.set(VIEW_KEY, &view)?;
        self.view = view;

        Ok(())
    }

    /// Change and persist the colour mode.
    ///
    /// # Errors
    ///
    /// Returns a [`PreferenceError`] if the value cannot be persisted.
    pub fn set_color_mode<S: PreferenceStore>(
        &mut self,
        preferences: &mut Preferences<S>,
        color_mode: ColorMode,
    ) -> Result<(), PreferenceError> {
        preferences.set(COLOR_MODE_KEY, &color_mode)?;
        self.color_mode = color_mode;

        Ok(())
    }

    /// Change and persist the zoom, clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    ///
    /// # Errors
    ///
    /// Returns a [`PreferenceError`] if the value cannot be persisted.
    pub fn set_zoom<S: PreferenceStore>(
        &mut self,
        preferences: &mut Preferences<S>,
        zoom: u16,
    ) -> Result<(), PreferenceError> {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);

        preferences.set(ZOOM_KEY, &zoom)?;
        self.zoom = zoom;

        Ok(())
    }

    /// Change and persist working-hours shading.
    ///
    /// # Errors
    ///
    /// Returns a [`PreferenceError`] if the value cannot be persisted.
    pub fn set_show_working_hours<S: PreferenceStore>(
        &mut self,
        preferences: &mut Preferences<S>,
        show: bool,
    ) -> Result<(), PreferenceError> {
        preferences.set(WORKING_HOURS_KEY, &show)?;
        self.show_working_hours = show;

        Ok(())
    }
}
