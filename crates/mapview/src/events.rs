use foundation::DocumentId;
use serde::Serialize;

/// A resolved place handed to document-creation flows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationData {
    pub lat: f64,
    pub lng: f64,
    pub province: String,
    pub district: String,
    pub subdistrict: String,
    /// Region group of the province, when it belongs to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    GeocodeFailed,
    OutOfBounds,
    UnknownDocument,
    UnknownSearchResult,
}

/// A recoverable condition the host should show the user (toast, banner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Everything the engine tells its host. Queued, then drained by the host
/// once per turn of its event loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EngineEvent {
    /// The hovered document changed; `None` means nothing is hovered.
    HoverChanged(Option<DocumentId>),
    DocumentClicked(DocumentId),
    LocationSelected(LocationData),
    Notice(Notice),
}
