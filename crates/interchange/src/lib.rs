//! Roofplan interchange format and persistence.
//!
//! Layouts are stored as flat, versioned JSON documents (see [`Document`]).
//! Records pair a document with a name, summary scalars and opaque business
//! associations, and live behind a [`LayoutBackend`].

mod backend;
mod document;
mod record;
mod save;

pub use backend::{FileBackend, LayoutBackend, MemoryBackend, PersistenceError};
pub use document::{
    load_layout, CanvasDoc, Document, ModuleDoc, PointDoc, RoofDoc, ShapeDoc, Summary,
    FORMAT_VERSION,
};
pub use record::{Associations, LayoutRecord, RecordListing, SaveRequest};
pub use save::{SaveController, SaveError};

/// Error type for decoding and encoding documents.
#[derive(Debug, Clone, PartialEq)]
pub enum InterchangeError {
    Parse(String),
    InvalidStructure(String),
    InvalidValue(String),
    UnsupportedVersion(String),
}

impl std::fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
            Self::InvalidStructure(msg) => write!(f, "Invalid structure: {}", msg),
            Self::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
            Self::UnsupportedVersion(v) => write!(f, "Unsupported document version: {}", v),
        }
    }
}

impl std::error::Error for InterchangeError {}
