//! Arena storage for elements with explicit parent links.
//!
//! The same element may be shown by the folder tree and the flat table at
//! once; both refer to it by [`ElementId`] and read it from one store.

use indexmap::IndexMap;
use tracing::warn;

use crate::element::{Element, ElementId};
use crate::error::KmsError;

/// Elements keyed by id, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: IndexMap<ElementId, Element>,
}

impl ElementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get an element by id.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Check if an id is present.
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Iterate over all elements in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Insert or replace an element.
    ///
    /// Rejects elements that break the naming invariant or whose parent link
    /// would close a cycle.
    pub fn insert(&mut self, element: Element) -> Result<(), KmsError> {
        element.validate()?;
        if let Some(parent) = element.parent {
            if parent == element.id || self.is_descendant_of(parent, element.id) {
                return Err(KmsError::Cycle {
                    id: element.id,
                    parent,
                });
            }
        }
        self.elements.insert(element.id, element);
        Ok(())
    }

    /// Store a listing response for `parent`, returning the accepted ids in
    /// response order.
    ///
    /// Each entry is re-parented under `parent`. Invalid entries are skipped.
    pub fn ingest_listing(
        &mut self,
        parent: Option<ElementId>,
        listing: Vec<Element>,
    ) -> Vec<ElementId> {
        let mut ids = Vec::with_capacity(listing.len());
        for mut element in listing {
            element.parent = parent;
            let id = element.id;
            match self.insert(element) {
                Ok(()) => ids.push(id),
                Err(err) => warn!(%id, error = %err, "skipping listing entry"),
            }
        }
        ids
    }

    /// Direct children of `parent` (`None` = roots), in first-seen order.
    pub fn children(&self, parent: Option<ElementId>) -> impl Iterator<Item = &Element> {
        self.elements.values().filter(move |e| e.parent == parent)
    }

    /// Walk the parent chain of `id`, nearest first. Does not include `id`.
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        Ancestors {
            store: self,
            next: self.get(id).and_then(|e| e.parent),
            remaining: self.len(),
        }
    }

    /// Check if `id` lies strictly below `ancestor`.
    pub fn is_descendant_of(&self, id: ElementId, ancestor: ElementId) -> bool {
        self.ancestors(id).any(|a| a.id == ancestor)
    }

    /// Move `id` under `new_parent`.
    pub fn reparent(&mut self, id: ElementId, new_parent: Option<ElementId>) -> Result<(), KmsError> {
        if !self.contains(id) {
            return Err(KmsError::UnknownElement { id });
        }
        if let Some(parent) = new_parent {
            if parent == id || self.is_descendant_of(parent, id) {
                return Err(KmsError::Cycle { id, parent });
            }
        }
        if let Some(element) = self.elements.get_mut(&id) {
            element.parent = new_parent;
        }
        Ok(())
    }

    /// Remove an element and everything below it. Returns the removed
    /// elements, the requested one first.
    pub fn remove_subtree(&mut self, id: ElementId) -> Vec<Element> {
        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            stack.extend(self.children(Some(current)).map(|e| e.id));
            if let Some(element) = self.elements.shift_remove(&current) {
                removed.push(element);
            }
        }
        removed
    }

    /// Forget all children of `parent` that are not in `keep`, with their
    /// subtrees. Returns every removed id.
    ///
    /// Used when a fresh listing replaces an older one, so deleted or moved
    /// entries don't linger.
    pub fn prune_children(&mut self, parent: Option<ElementId>, keep: &[ElementId]) -> Vec<ElementId> {
        let stale: Vec<ElementId> = self
            .children(parent)
            .map(|e| e.id)
            .filter(|id| !keep.contains(id))
            .collect();
        let mut removed = Vec::new();
        for id in stale {
            removed.extend(self.remove_subtree(id).into_iter().map(|e| e.id));
        }
        removed
    }
}

/// Iterator over an element's ancestors.
///
/// Bounded by the store size, so a corrupted chain cannot loop forever.
pub struct Ancestors<'a> {
    store: &'a ElementStore,
    next: Option<ElementId>,
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let element = self.store.get(self.next?)?;
        self.next = element.parent;
        Some(element)
    }
}
