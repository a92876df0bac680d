//! User settings, read from `~/.roofplan/settings.json`.
//!
//! Every field is optional. A missing file means all defaults.

use anyhow::{Context, Result};
use canvas::{EditorAction, EditorConfig, Keymap};
use scene::{CanvasSize, DEFAULT_GRID_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use theme::Theme;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `"light"` or `"dark"`.
    pub theme: String,
    pub history_limit: usize,
    /// Width and height of new modules.
    pub module_size: [f32; 2],
    /// Grid size for new layouts.
    pub grid_size: f32,
    /// Where saved records live. Defaults to `~/.roofplan/layouts`.
    pub storage_dir: Option<PathBuf>,
    /// Keystroke to action overrides, applied over the default bindings.
    pub keymap: BTreeMap<String, EditorAction>,
}

impl Default for Settings {
    fn default() -> Self {
        let config = EditorConfig::default();
        Self {
            theme: "light".to_string(),
            history_limit: config.history_limit,
            module_size: [config.module_size.width(), config.module_size.height()],
            grid_size: DEFAULT_GRID_SIZE,
            storage_dir: None,
            keymap: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load from `path`, or from the default location when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        let settings = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings file: {}", path.display()))?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".roofplan").join("settings.json"))
    }

    pub fn editor_config(&self) -> EditorConfig {
        let defaults = EditorConfig::default();
        let [width, height] = self.module_size;
        let module_size = if width > 0.0 && height > 0.0 {
            CanvasSize::new(width, height)
        } else {
            log::warn!("ignoring non-positive module size {}x{}", width, height);
            defaults.module_size
        };
        EditorConfig {
            history_limit: self.history_limit.max(1),
            module_size,
            ..defaults
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::named(&self.theme).unwrap_or_else(|| {
            log::warn!("unknown theme {:?}, using light", self.theme);
            Theme::light()
        })
    }

    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }
        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home.join(".roofplan").join("layouts"))
    }

    /// Default bindings with this user's overrides on top.
    pub fn keymap(&self) -> Keymap {
        let mut keymap = Keymap::with_defaults();
        keymap.extend_from(self.keymap.iter().map(|(k, a)| (k.as_str(), *a)));
        keymap
    }
}
