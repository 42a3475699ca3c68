//! In-memory knowledge backend.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use kms_core::{BackendError, Element, ElementId, ElementSource, ElementStore, KmsError, KnowledgeStatus};

use crate::backend::KnowledgeBackend;

/// Backend holding the whole knowledge base in memory.
///
/// Seeded from a JSON array of elements (see [`MemoryBackend::from_json`]).
#[derive(Debug, Default)]
pub struct MemoryBackend {
    store: RwLock<ElementStore>,
}

impl MemoryBackend {
    /// Create a backend from a flat list of elements.
    ///
    /// Ids must be unique, every parent must exist and be a folder, and
    /// parent chains must be acyclic.
    pub fn new(elements: Vec<Element>) -> Result<Self, BackendError> {
        let mut seen = HashSet::with_capacity(elements.len());
        for element in &elements {
            if !seen.insert(element.id) {
                return Err(BackendError::InvalidData {
                    message: format!("duplicate id {}", element.id),
                });
            }
        }

        let mut store = ElementStore::new();
        for element in &elements {
            store.insert(element.clone()).map_err(invalid_data)?;
        }

        for element in &elements {
            if let Some(parent) = element.parent {
                match store.get(parent) {
                    Some(p) if p.is_folder => {}
                    Some(_) => return Err(BackendError::NotAFolder { id: parent }),
                    None => {
                        return Err(BackendError::InvalidData {
                            message: format!("{} refers to missing parent {parent}", element.id),
                        });
                    }
                }
            }
        }

        Ok(Self {
            store: RwLock::new(store),
        })
    }

    /// Parse a JSON array of elements.
    pub fn from_json(json: &str) -> Result<Self, BackendError> {
        let elements: Vec<Element> =
            serde_json::from_str(json).map_err(|e| BackendError::InvalidData {
                message: e.to_string(),
            })?;
        Self::new(elements)
    }

    /// Read a JSON array of elements from a file.
    pub fn from_json_file(path: &Path) -> Result<Self, BackendError> {
        let json = std::fs::read_to_string(path).map_err(|e| BackendError::InvalidData {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_json(&json)
    }

    /// A small knowledge base with native folders and one synced provider.
    pub fn sample() -> Self {
        let id = ElementId::new;
        let google = ElementSource::provider("Google");
        let elements = vec![
            Element::folder(id(1), "Research"),
            Element::folder(id(2), "Papers").with_parent(id(1)),
            Element::file(id(3), "attention.pdf")
                .with_parent(id(2))
                .with_size(2_215_000)
                .with_status(KnowledgeStatus::Processed),
            Element::file(id(4), "scaling-laws.pdf")
                .with_parent(id(2))
                .with_size(1_048_576)
                .with_status(KnowledgeStatus::Processing),
            Element::folder(id(5), "Notes").with_parent(id(1)),
            Element::file(id(6), "reading-list.md")
                .with_parent(id(5))
                .with_size(4_096),
            Element::link(id(7), "https://arxiv.org/list/cs.CL/recent")
                .with_parent(id(1))
                .with_status(KnowledgeStatus::Uploaded),
            Element::folder(id(8), "Projects"),
            Element::folder(id(9), "Archive.2023").with_parent(id(8)),
            Element::file(id(10), "roadmap.docx")
                .with_parent(id(8))
                .with_size(52_000)
                .with_status(KnowledgeStatus::Error),
            Element::file(id(11), "welcome.txt").with_size(812),
            Element::folder(id(12), "Shared drive").with_source(google.clone()),
            Element::folder(id(13), "Specs")
                .with_parent(id(12))
                .with_source(google.clone()),
            Element::file(id(14), "api-design.gdoc")
                .with_parent(id(13))
                .with_source(google)
                .with_status(KnowledgeStatus::Reserved),
        ];
        // Ids and parents above are consistent by construction.
        match Self::new(elements) {
            Ok(backend) => backend,
            Err(err) => unreachable!("sample knowledge base is invalid: {err}"),
        }
    }

    /// Snapshot of every element, in insertion order.
    pub async fn elements(&self) -> Vec<Element> {
        self.store.read().await.iter().cloned().collect()
    }
}

fn invalid_data(err: KmsError) -> BackendError {
    BackendError::InvalidData {
        message: err.to_string(),
    }
}

#[async_trait]
impl KnowledgeBackend for MemoryBackend {
    async fn list_children(&self, folder: Option<ElementId>) -> Result<Vec<Element>, BackendError> {
        let store = self.store.read().await;
        if let Some(id) = folder {
            match store.get(id) {
                Some(e) if e.is_folder => {}
                Some(_) => return Err(BackendError::NotAFolder { id }),
                None => return Err(BackendError::NotFound { id }),
            }
        }
        Ok(store.children(folder).cloned().collect())
    }

    async fn move_element(
        &self,
        id: ElementId,
        new_parent: Option<ElementId>,
    ) -> Result<(), BackendError> {
        let mut store = self.store.write().await;
        if !store.contains(id) {
            return Err(BackendError::NotFound { id });
        }
        if let Some(target) = new_parent {
            match store.get(target) {
                Some(e) if e.is_folder => {}
                Some(_) => return Err(BackendError::NotAFolder { id: target }),
                None => return Err(BackendError::NotFound { id: target }),
            }
            store
                .reparent(id, Some(target))
                .map_err(|_| BackendError::WouldCycle { id, target })?;
        } else {
            store.reparent(id, None).map_err(invalid_data)?;
        }
        debug!(%id, ?new_parent, "moved element");
        Ok(())
    }

    async fn delete_element(&self, id: ElementId) -> Result<(), BackendError> {
        let mut store = self.store.write().await;
        if !store.contains(id) {
            return Err(BackendError::NotFound { id });
        }
        let removed = store.remove_subtree(id);
        debug!(%id, removed = removed.len(), "deleted element");
        Ok(())
    }
}
