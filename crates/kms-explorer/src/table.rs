//! Searchable, sortable, multi-select table over one folder listing.

use tracing::debug;

use kms_core::{
    ClickKind, Element, ElementId, ElementStore, KmsError, Selection, SortConfig, SortKey,
    filter_and_sort, select,
};
use kms_ops::{OperationComplete, SharedBackend, delete_all};

use crate::context::NavigationContext;

/// A visible table row.
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    pub element: &'a Element,
    pub selected: bool,
}

/// Table state: the listing, search text, sort order and selection.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeTable {
    elements: Vec<ElementId>,
    search: String,
    sort: SortConfig,
    visible: Vec<ElementId>,
    selection: Selection,
    all_checked: bool,
    error: Option<KmsError>,
}

impl KnowledgeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the listing. The selection is kept.
    pub fn set_elements(&mut self, elements: Vec<ElementId>, store: &ElementStore) {
        self.elements = elements;
        self.error = None;
        self.refresh(store);
    }

    /// Record a failed listing. The previous rows stay visible.
    pub fn set_error(&mut self, error: KmsError) {
        self.error = Some(error);
    }

    pub fn error(&self) -> Option<&KmsError> {
        self.error.as_ref()
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Change the search text. Hidden items stay selected.
    pub fn set_search(&mut self, query: impl Into<String>, store: &ElementStore) {
        self.search = query.into();
        self.refresh(store);
    }

    pub fn sort(&self) -> &SortConfig {
        &self.sort
    }

    /// Column header click.
    pub fn toggle_sort(&mut self, key: SortKey, store: &ElementStore) {
        self.sort = self.sort.toggle(key);
        debug!(key = ?self.sort.key, direction = %self.sort.direction, "table sort changed");
        self.refresh(store);
    }

    /// Recompute the visible list from the store.
    pub fn refresh(&mut self, store: &ElementStore) {
        let listing = self.elements.iter().filter_map(|id| store.get(*id));
        self.visible = filter_and_sort(listing, &self.search, &self.sort)
            .into_iter()
            .map(|e| e.id)
            .collect();
    }

    /// Ids in display order.
    pub fn visible(&self) -> &[ElementId] {
        &self.visible
    }

    pub fn rows<'s>(&self, store: &'s ElementStore) -> Vec<TableRow<'s>> {
        self.visible
            .iter()
            .filter_map(|id| store.get(*id))
            .map(|element| TableRow {
                element,
                selected: self.selection.contains(element.id),
            })
            .collect()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Click the row at `index` of the visible list.
    pub fn click(&mut self, index: usize, kind: ClickKind) {
        if let Some(&id) = self.visible.get(index) {
            self.selection = select(&self.selection, id, index, kind, &self.visible);
        }
    }

    /// State of the select-all checkbox.
    pub fn all_checked(&self) -> bool {
        self.all_checked
    }

    /// Select-all checkbox: checking selects every visible row, unchecking
    /// clears the selection.
    pub fn set_all_checked(&mut self, checked: bool) {
        self.all_checked = checked;
        if checked {
            self.selection = Selection::all(&self.visible);
        } else {
            self.selection.clear();
        }
    }

    pub fn delete_enabled(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Selected ids that are currently visible.
    pub fn delete_batch(&self) -> Vec<ElementId> {
        self.selection.visible_subset(&self.visible)
    }

    /// Take the delete batch and clear the selection.
    pub fn take_delete_batch(&mut self) -> Vec<ElementId> {
        let batch = self.delete_batch();
        self.selection.clear();
        self.all_checked = false;
        batch
    }

    /// Drop deleted ids from the listing.
    pub fn forget(&mut self, deleted: &[ElementId], store: &ElementStore) {
        self.elements.retain(|id| !deleted.contains(id));
        self.refresh(store);
    }

    /// Apply a finished bulk delete: remove what succeeded from the store
    /// and the listing, and ask for a refetch.
    ///
    /// Returns every id that left the store, subtrees included.
    pub fn apply_deleted(
        &mut self,
        complete: &OperationComplete,
        store: &mut ElementStore,
        ctx: &mut NavigationContext,
    ) -> Vec<ElementId> {
        let removed: Vec<ElementId> = complete
            .succeeded
            .iter()
            .flat_map(|id| store.remove_subtree(*id))
            .map(|e| e.id)
            .collect();
        self.forget(&complete.succeeded, store);
        if !complete.succeeded.is_empty() {
            ctx.request_refetch();
        }
        removed
    }

    /// Delete the selected and visible items, one request each, then clear
    /// the selection. Failures are reported in the returned summary.
    pub async fn delete_selected(
        &mut self,
        store: &mut ElementStore,
        ctx: &mut NavigationContext,
        backend: SharedBackend,
    ) -> OperationComplete {
        let batch = self.take_delete_batch();
        let complete = delete_all(backend, batch).await;
        self.apply_deleted(&complete, store, ctx);
        complete
    }
}
