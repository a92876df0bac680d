//! # Keyboard mapping
//!
//! Keystrokes are written the way they appear in settings files:
//! modifiers joined to the key with `-`, e.g. `"ctrl-shift-z"` or `"delete"`.
//! Later bindings for the same keystroke win, so user overrides are simply
//! appended to the defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// Modifier keys held during a pointer or key event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
    /// Command on macOS, the Windows key elsewhere.
    pub platform: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }

    pub fn control() -> Self {
        Self {
            control: true,
            ..Default::default()
        }
    }

    pub fn command() -> Self {
        Self {
            platform: true,
            ..Default::default()
        }
    }

    /// Whether a click should add to the selection instead of replacing it.
    pub fn is_additive(&self) -> bool {
        self.shift
    }
}

/// Error returned when a keystroke string can't be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeystrokeParseError {
    Empty,
    UnknownModifier(String),
}

impl fmt::Display for KeystrokeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeystrokeParseError::Empty => write!(f, "empty keystroke"),
            KeystrokeParseError::UnknownModifier(m) => write!(f, "unknown modifier: {}", m),
        }
    }
}

impl std::error::Error for KeystrokeParseError {}

/// A key plus the modifiers held with it. Keys are stored lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub modifiers: Modifiers,
    pub key: String,
}

impl Keystroke {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            key: key.into().to_lowercase(),
        }
    }

    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(key, Modifiers::none())
    }
}

impl FromStr for Keystroke {
    type Err = KeystrokeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeystrokeParseError::Empty);
        }

        // A trailing "-" after a separator is the minus key itself.
        let (prefix, key) = if s == "-" {
            ("", "-")
        } else if let Some(prefix) = s.strip_suffix("--") {
            (prefix, "-")
        } else {
            match s.rsplit_once('-') {
                Some((prefix, key)) => (prefix, key),
                None => ("", s),
            }
        };
        if key.is_empty() {
            return Err(KeystrokeParseError::Empty);
        }

        let mut modifiers = Modifiers::none();
        for part in prefix.split('-').filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers.control = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "cmd" | "super" | "win" => modifiers.platform = true,
                other => return Err(KeystrokeParseError::UnknownModifier(other.to_string())),
            }
        }

        Ok(Keystroke::new(key, modifiers))
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.control {
            write!(f, "ctrl-")?;
        }
        if self.modifiers.alt {
            write!(f, "alt-")?;
        }
        if self.modifiers.shift {
            write!(f, "shift-")?;
        }
        if self.modifiers.platform {
            write!(f, "cmd-")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Everything a key can trigger in the editor.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EditorAction {
    SelectTool,
    PanTool,
    PlaceModuleTool,
    LineTool,
    RectangleTool,
    FreehandTool,
    ArrowTool,
    Delete,
    Undo,
    Redo,
    RotateSelected,
    Duplicate,
    ToggleLock,
    ToggleGrid,
    ToggleSnap,
    SelectAll,
    Cancel,
    ZoomIn,
    ZoomOut,
    ResetView,
    RemoveLastShape,
}

#[derive(Clone, Debug)]
pub struct KeyBinding {
    pub keystroke: Keystroke,
    pub action: EditorAction,
}

impl KeyBinding {
    pub fn new(keystroke: &str, action: EditorAction) -> Result<Self, KeystrokeParseError> {
        Ok(Self {
            keystroke: keystroke.parse()?,
            action,
        })
    }
}

/// Keystroke to action lookup.
#[derive(Clone, Debug, Default)]
pub struct Keymap {
    bindings: Vec<KeyBinding>,
}

const DEFAULT_BINDINGS: &[(&str, EditorAction)] = &[
    ("v", EditorAction::SelectTool),
    ("h", EditorAction::PanTool),
    ("m", EditorAction::PlaceModuleTool),
    ("l", EditorAction::LineTool),
    ("r", EditorAction::RectangleTool),
    ("p", EditorAction::FreehandTool),
    ("a", EditorAction::ArrowTool),
    ("delete", EditorAction::Delete),
    ("backspace", EditorAction::Delete),
    ("ctrl-z", EditorAction::Undo),
    ("cmd-z", EditorAction::Undo),
    ("ctrl-shift-z", EditorAction::Redo),
    ("cmd-shift-z", EditorAction::Redo),
    ("ctrl-y", EditorAction::Redo),
    ("shift-r", EditorAction::RotateSelected),
    ("ctrl-d", EditorAction::Duplicate),
    ("cmd-d", EditorAction::Duplicate),
    ("ctrl-l", EditorAction::ToggleLock),
    ("cmd-l", EditorAction::ToggleLock),
    ("g", EditorAction::ToggleGrid),
    ("shift-g", EditorAction::ToggleSnap),
    ("ctrl-a", EditorAction::SelectAll),
    ("cmd-a", EditorAction::SelectAll),
    ("escape", EditorAction::Cancel),
    ("=", EditorAction::ZoomIn),
    ("+", EditorAction::ZoomIn),
    ("shift-=", EditorAction::ZoomIn),
    ("-", EditorAction::ZoomOut),
    ("0", EditorAction::ResetView),
    ("ctrl-backspace", EditorAction::RemoveLastShape),
];

impl Keymap {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut keymap = Self::empty();
        for (keystroke, action) in DEFAULT_BINDINGS {
            match KeyBinding::new(keystroke, *action) {
                Ok(binding) => keymap.bindings.push(binding),
                Err(err) => log::error!("bad default binding {:?}: {}", keystroke, err),
            }
        }
        keymap
    }

    /// Add a binding; it takes precedence over earlier ones for the same keystroke.
    pub fn bind(&mut self, keystroke: &str, action: EditorAction) -> Result<(), KeystrokeParseError> {
        self.bindings.push(KeyBinding::new(keystroke, action)?);
        Ok(())
    }

    /// Apply user overrides on top of the current bindings. Entries that fail
    /// to parse are skipped with a warning.
    pub fn extend_from<'a>(&mut self, overrides: impl IntoIterator<Item = (&'a str, EditorAction)>) {
        for (keystroke, action) in overrides {
            if let Err(err) = self.bind(keystroke, action) {
                log::warn!("ignoring key binding {:?}: {}", keystroke, err);
            }
        }
    }

    pub fn action_for(&self, keystroke: &Keystroke) -> Option<EditorAction> {
        self.bindings
            .iter()
            .rev()
            .find(|b| &b.keystroke == keystroke)
            .map(|b| b.action)
    }

    pub fn bindings_for(&self, action: EditorAction) -> impl Iterator<Item = &Keystroke> {
        self.bindings
            .iter()
            .filter(move |b| b.action == action)
            .map(|b| &b.keystroke)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parse_keystrokes() {
        let ks: Keystroke = "ctrl-shift-z".parse().unwrap();
        assert!(ks.modifiers.control && ks.modifiers.shift);
        assert!(!ks.modifiers.platform);
        assert_eq!(ks.key, "z");

        let minus: Keystroke = "cmd--".parse().unwrap();
        assert_eq!(minus.key, "-");
        assert!(minus.modifiers.platform);

        assert_eq!("-".parse::<Keystroke>().unwrap().key, "-");
        assert_eq!("Delete".parse::<Keystroke>().unwrap(), Keystroke::plain("delete"));
        assert_eq!(
            "hyper-x".parse::<Keystroke>(),
            Err(KeystrokeParseError::UnknownModifier("hyper".into()))
        );
        assert_eq!("".parse::<Keystroke>(), Err(KeystrokeParseError::Empty));
    }

    #[test]
    fn display_round_trips() {
        let ks: Keystroke = "ctrl-alt-shift-cmd-k".parse().unwrap();
        assert_eq!(ks.to_string(), "ctrl-alt-shift-cmd-k");
    }

    #[test]
    fn defaults_cover_core_shortcuts() {
        let keymap = Keymap::with_defaults();
        assert_eq!(keymap.action_for(&Keystroke::plain("delete")), Some(EditorAction::Delete));
        assert_eq!(keymap.action_for(&Keystroke::plain("backspace")), Some(EditorAction::Delete));
        assert_eq!(
            keymap.action_for(&Keystroke::new("z", Modifiers::control())),
            Some(EditorAction::Undo)
        );
        assert_eq!(
            keymap.action_for(&Keystroke::new("z", Modifiers::command())),
            Some(EditorAction::Undo)
        );
        assert_eq!(
            keymap.action_for(&"cmd-shift-z".parse().unwrap()),
            Some(EditorAction::Redo)
        );
        assert_eq!(keymap.action_for(&Keystroke::plain("q")), None);
    }

    #[test]
    fn every_action_has_a_default() {
        let keymap = Keymap::with_defaults();
        for action in EditorAction::iter() {
            assert!(keymap.bindings_for(action).next().is_some(), "{action} unbound");
        }
    }

    #[test]
    fn overrides_take_precedence() {
        let mut keymap = Keymap::with_defaults();
        keymap.extend_from([("v", EditorAction::PanTool), ("bogus-v", EditorAction::Undo)]);
        assert_eq!(keymap.action_for(&Keystroke::plain("v")), Some(EditorAction::PanTool));
    }

    #[test]
    fn actions_parse_from_names() {
        assert_eq!("toggle_snap".parse::<EditorAction>().unwrap(), EditorAction::ToggleSnap);
        assert_eq!(EditorAction::RemoveLastShape.to_string(), "remove_last_shape");
    }
}
