//! Roofplan API - command and query interface for layout editing.
//!
//! This crate defines the typed command language for all editor operations.
//! Commands represent user intent and are:
//! - Serializable (for scripting, recording and replay)
//! - Intent-based (what to do, not how to do it)
//! - Undo-aware (the store decides what becomes a history step)
//!
//! # Example
//! ```ignore
//! use api::{Command, execute_command};
//!
//! let mut editor = canvas::Editor::default();
//! let cmd = Command::AddModuleRow {
//!     origin: Vec2::new(100.0, 100.0),
//!     count: 6,
//!     orientation: RowOrientation::Horizontal,
//!     spacing: 4.0,
//!     size: None,
//! };
//! let result = execute_command(&mut editor, cmd);
//! ```

mod command;
mod executor;
mod query;
mod target;

pub use command::*;
pub use executor::{execute_command, execute_query};
pub use query::*;
pub use target::*;

/// Parse a script: either a single command object or an array of commands.
pub fn parse_script(input: &str) -> Result<Vec<Command>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|command| vec![command])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_accepts_object_or_array() {
        let single = parse_script(r#"{"type": "undo"}"#).unwrap();
        assert_eq!(single, vec![Command::Undo]);

        let many = parse_script(r#"[{"type": "select_all"}, {"type": "toggle_grid"}]"#).unwrap();
        assert_eq!(many, vec![Command::SelectAll, Command::ToggleGrid]);

        assert!(parse_script(r#"{"type": "fly"}"#).is_err());
    }
}
