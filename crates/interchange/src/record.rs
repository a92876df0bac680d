use crate::document::{Document, Summary};
use scene::Layout;
use serde::{Deserialize, Serialize};

/// Links from a layout to the business records it belongs to. Never
/// interpreted here, only stored and returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Associations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
}

/// What gets written for one save: the document plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub name: String,
    #[serde(flatten)]
    pub summary: Summary,
    #[serde(default)]
    pub associations: Associations,
    pub document: Document,
}

impl SaveRequest {
    /// Snapshot a layout for saving. The request owns its data, so the
    /// layout can keep changing while the save is in flight.
    pub fn new(name: impl Into<String>, layout: &Layout, associations: Associations) -> Self {
        Self {
            name: name.into(),
            summary: Summary::of(layout),
            associations,
            document: Document::from_layout(layout),
        }
    }
}

/// A stored layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    pub id: String,
    /// RFC 3339 timestamp of the last save.
    pub updated_at: String,
    #[serde(flatten)]
    pub request: SaveRequest,
}

impl LayoutRecord {
    pub fn new(id: impl Into<String>, request: SaveRequest) -> Self {
        Self {
            id: id.into(),
            updated_at: chrono::Utc::now().to_rfc3339(),
            request,
        }
    }

    pub fn name(&self) -> &str {
        &self.request.name
    }

    pub fn summary(&self) -> &Summary {
        &self.request.summary
    }

    pub fn layout(&self) -> Layout {
        self.request.document.clone().into_layout()
    }

    pub fn listing(&self) -> RecordListing {
        RecordListing {
            id: self.id.clone(),
            name: self.request.name.clone(),
            updated_at: self.updated_at.clone(),
            summary: self.request.summary.clone(),
        }
    }
}

/// One row of a record listing, without the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordListing {
    pub id: String,
    pub name: String,
    pub updated_at: String,
    #[serde(flatten)]
    pub summary: Summary,
}
