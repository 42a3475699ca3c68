//! Error types for explorer and backend operations.

use std::path::PathBuf;

use strum::Display;
use thiserror::Error;

use crate::element::ElementId;

/// Errors reported by a knowledge backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The element does not exist.
    #[error("Element not found: {id}")]
    NotFound { id: ElementId },

    /// The target of a move is not a folder.
    #[error("Not a folder: {id}")]
    NotAFolder { id: ElementId },

    /// The move would put an element inside itself.
    #[error("Cannot move {id} into its own subtree ({target})")]
    WouldCycle { id: ElementId, target: ElementId },

    /// Transport-level failure talking to the backend.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The backend returned or was seeded with malformed data.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },
}

impl BackendError {
    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Kind of mutation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MutationKind {
    Move,
    Delete,
}

/// Errors surfaced by the explorer model.
#[derive(Debug, Clone, Error)]
pub enum KmsError {
    /// Listing a folder's children failed.
    #[error("Failed to list {}: {source}", scope_label(.folder))]
    Fetch {
        folder: Option<ElementId>,
        #[source]
        source: BackendError,
    },

    /// A move or delete request failed.
    #[error("Failed to {action} {id}: {source}")]
    Mutation {
        action: MutationKind,
        id: ElementId,
        #[source]
        source: BackendError,
    },

    /// An element violates the data model.
    #[error("Invalid element {id}: {reason}")]
    InvalidElement { id: ElementId, reason: String },

    /// An element id is not present in the store.
    #[error("Unknown element: {id}")]
    UnknownElement { id: ElementId },

    /// A parent link would create a cycle.
    #[error("Parent link {id} -> {parent} would create a cycle")]
    Cycle { id: ElementId, parent: ElementId },

    /// A drop was refused before any request was issued.
    #[error("Cannot drop {dragged} onto {target}: {reason}")]
    InvalidDrop {
        dragged: ElementId,
        target: ElementId,
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Configuration file could not be read or parsed.
    #[error("Failed to load config {path}: {message}")]
    ConfigFile { path: PathBuf, message: String },
}

impl KmsError {
    /// Wrap a backend listing failure.
    pub fn fetch(folder: Option<ElementId>, source: BackendError) -> Self {
        Self::Fetch { folder, source }
    }

    /// Wrap a backend mutation failure.
    pub fn mutation(action: MutationKind, id: ElementId, source: BackendError) -> Self {
        Self::Mutation { action, id, source }
    }

    /// Check if this is a listing failure.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    /// Check if this is a move/delete failure.
    pub fn is_mutation_failure(&self) -> bool {
        matches!(self, Self::Mutation { .. })
    }
}

fn scope_label(folder: &Option<ElementId>) -> String {
    match folder {
        Some(id) => format!("folder {id}"),
        None => "root".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_message() {
        let err = KmsError::fetch(Some(ElementId::new(7)), BackendError::transport("timeout"));
        assert!(err.is_fetch_failure());
        assert_eq!(
            err.to_string(),
            "Failed to list folder #7: Transport error: timeout"
        );

        let root = KmsError::fetch(None, BackendError::transport("down"));
        assert!(root.to_string().starts_with("Failed to list root"));
    }

    #[test]
    fn test_mutation_error_message() {
        let err = KmsError::mutation(
            MutationKind::Delete,
            ElementId::new(3),
            BackendError::NotFound { id: ElementId::new(3) },
        );
        assert!(err.is_mutation_failure());
        assert_eq!(err.to_string(), "Failed to delete #3: Element not found: #3");
    }
}
