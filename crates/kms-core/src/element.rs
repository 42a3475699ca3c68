//! Knowledge element types.

use std::fmt;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::KmsError;

/// Unique identifier for an element, stable across fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl ElementId {
    /// Create a new ElementId from a u64.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sync/processing status of an element. Display-only.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum KnowledgeStatus {
    Error,
    Reserved,
    Processing,
    Processed,
    #[default]
    Uploaded,
}

/// Where an element comes from: the native store or a sync provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementSource(pub CompactString);

impl ElementSource {
    /// Source name used by the native store.
    pub const LOCAL: &'static str = "local";

    /// The native store.
    pub fn local() -> Self {
        Self(CompactString::new(Self::LOCAL))
    }

    /// A named sync provider.
    pub fn provider(name: impl Into<CompactString>) -> Self {
        Self(name.into())
    }

    /// Check if this is the native store.
    pub fn is_local(&self) -> bool {
        self.0.as_str() == Self::LOCAL
    }

    /// Raw source name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ElementSource {
    fn default() -> Self {
        Self::local()
    }
}

impl fmt::Display for ElementSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single file or folder entry in the knowledge tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,

    /// File name (uploaded knowledge and folders).
    #[serde(default)]
    pub file_name: Option<CompactString>,

    /// URL (crawled knowledge).
    #[serde(default)]
    pub url: Option<CompactString>,

    /// Whether this entry is a folder.
    #[serde(default)]
    pub is_folder: bool,

    /// Processing status.
    #[serde(default)]
    pub status: KnowledgeStatus,

    /// Parent element, `None` for root entries.
    #[serde(default, rename = "parent_id")]
    pub parent: Option<ElementId>,

    /// Native store or provider name.
    #[serde(default)]
    pub source: ElementSource,

    /// Presentational glyph, never persisted by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<CompactString>,

    /// Size in bytes, when known.
    #[serde(default)]
    pub file_size: Option<u64>,

    /// Last update time, when known.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Element {
    fn named(id: ElementId, file_name: Option<CompactString>, url: Option<CompactString>) -> Self {
        Self {
            id,
            file_name,
            url,
            is_folder: false,
            status: KnowledgeStatus::default(),
            parent: None,
            source: ElementSource::local(),
            icon: None,
            file_size: None,
            updated_at: None,
        }
    }

    /// Create a file element.
    pub fn file(id: ElementId, name: impl Into<CompactString>) -> Self {
        Self::named(id, Some(name.into()), None)
    }

    /// Create a folder element.
    pub fn folder(id: ElementId, name: impl Into<CompactString>) -> Self {
        let mut element = Self::named(id, Some(name.into()), None);
        element.is_folder = true;
        element
    }

    /// Create a crawled URL element.
    pub fn link(id: ElementId, url: impl Into<CompactString>) -> Self {
        Self::named(id, None, Some(url.into()))
    }

    /// Set the parent.
    pub fn with_parent(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: KnowledgeStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the source.
    pub fn with_source(mut self, source: ElementSource) -> Self {
        self.source = source;
        self
    }

    /// Set the icon.
    pub fn with_icon(mut self, icon: impl Into<CompactString>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the size.
    pub fn with_size(mut self, bytes: u64) -> Self {
        self.file_size = Some(bytes);
        self
    }

    /// Name shown to the user: the file name, or the URL for crawled entries.
    pub fn display_name(&self) -> &str {
        match (&self.file_name, &self.url) {
            (Some(name), _) if !name.is_empty() => name.as_str(),
            (_, Some(url)) => url.as_str(),
            _ => "",
        }
    }

    /// Check that exactly one naming field is populated.
    pub fn validate(&self) -> Result<(), KmsError> {
        let has_name = self.file_name.as_ref().is_some_and(|n| !n.is_empty());
        let has_url = self.url.as_ref().is_some_and(|u| !u.is_empty());
        match (has_name, has_url) {
            (true, false) | (false, true) => Ok(()),
            (false, false) => Err(KmsError::InvalidElement {
                id: self.id,
                reason: "neither file_name nor url is set".to_string(),
            }),
            (true, true) => Err(KmsError::InvalidElement {
                id: self.id,
                reason: "both file_name and url are set".to_string(),
            }),
        }
    }

    /// Check whether this element can receive drops.
    pub fn accepts_drop(&self) -> bool {
        self.is_folder
    }
}
