//! The knowledge backend contract.

use std::sync::Arc;

use async_trait::async_trait;

use kms_core::{BackendError, Element, ElementId};

/// Source of element listings and sink for move/delete requests.
///
/// Implementations talk to the remote knowledge API or, for local use and
/// tests, to an in-memory store.
#[async_trait]
pub trait KnowledgeBackend: Send + Sync {
    /// Direct children of `folder`, in display order. `None` lists the root.
    async fn list_children(&self, folder: Option<ElementId>) -> Result<Vec<Element>, BackendError>;

    /// Re-parent `id` under `new_parent` (`None` moves it to the root).
    async fn move_element(
        &self,
        id: ElementId,
        new_parent: Option<ElementId>,
    ) -> Result<(), BackendError>;

    /// Delete `id` and everything below it.
    async fn delete_element(&self, id: ElementId) -> Result<(), BackendError>;
}

/// Backend handle shared between the UI loop and background tasks.
pub type SharedBackend = Arc<dyn KnowledgeBackend>;
