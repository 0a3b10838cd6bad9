use crate::model::Coordinate;
use serde::Serialize;

/// Upstream category a report was filed under.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ReportKind {
    Emergency,
    Complaint,
}

impl ReportKind {
    pub fn label(self) -> &'static str {
        match self {
            ReportKind::Emergency => "emergency",
            ReportKind::Complaint => "complaint",
        }
    }
}

/// How attached media should be presented.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Link,
}

/// Confirmed field report. Immutable once fetched.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Report {
    pub id: String,
    pub name: String,
    pub address: String,
    pub kind: ReportKind,
    /// Free-text `EmergencyType` / `ComplaintType` value.
    pub category: String,
    pub location: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

impl Report {
    pub fn media_kind(&self) -> Option<MediaKind> {
        self.media_url.as_deref().map(|url| {
            if url.ends_with(".jpg") || url.ends_with(".png") {
                MediaKind::Image
            } else {
                MediaKind::Link
            }
        })
    }
}
