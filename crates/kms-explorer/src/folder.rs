//! Lazily loaded folder tree.
//!
//! Every folder node moves through `Collapsed -> Loading -> Loaded`, or to
//! `Failed` when its listing cannot be fetched. Listings are requested through
//! [`FetchRequest`]s carrying a token; a response whose token no longer
//! matches the node (because it was collapsed or re-requested meanwhile) is
//! dropped.

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use strum::Display;
use tracing::{debug, warn};

use kms_core::{
    BackendError, Element, ElementId, ElementStore, ExplorerConfig, KmsError, label,
};
use kms_ops::{KnowledgeBackend, move_element};

use crate::context::NavigationContext;

/// Load state of one folder node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NodeState {
    #[default]
    Collapsed,
    Loading,
    Loaded,
    Failed,
}

/// A listing request issued by the tree. Hand it to a backend and feed the
/// result back through [`FolderTree::complete_fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Folder to list, `None` for the root.
    pub folder: Option<ElementId>,
    pub token: u64,
}

/// A validated drop, ready to be sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub id: ElementId,
    pub target: ElementId,
}

#[derive(Debug, Clone)]
struct Listing {
    children: Vec<ElementId>,
    fetched_at: Instant,
}

/// One folder entry and its lazily fetched children.
#[derive(Debug, Clone, Default)]
pub struct FolderNode {
    state: NodeState,
    listing: Option<Listing>,
    pending: Option<u64>,
    error: Option<KmsError>,
    drag_over: bool,
}

impl FolderNode {
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// The error of the last failed fetch, while the node is `Failed`.
    pub fn error(&self) -> Option<&KmsError> {
        self.error.as_ref()
    }

    pub fn is_drag_over(&self) -> bool {
        self.drag_over
    }

    /// Ids of the last listing, in response order. Includes files.
    pub fn children(&self) -> &[ElementId] {
        self.listing.as_ref().map_or(&[], |l| l.children.as_slice())
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        !ttl.is_zero()
            && self
                .listing
                .as_ref()
                .is_some_and(|l| l.fetched_at.elapsed() < ttl)
    }
}

/// A flattened, visible folder row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRow {
    pub id: ElementId,
    /// Folder name with its last extension removed.
    pub label: String,
    pub depth: usize,
    pub state: NodeState,
    /// Not loading and no folder children loaded.
    pub is_empty: bool,
    pub is_current: bool,
    pub drag_over: bool,
    pub is_last_sibling: bool,
    /// For each ancestor level, whether that ancestor was the last sibling.
    pub parent_last_siblings: Vec<bool>,
}

/// The folder tree of one knowledge root.
#[derive(Debug)]
pub struct FolderTree {
    root: FolderNode,
    nodes: IndexMap<ElementId, FolderNode>,
    cache_ttl: Duration,
    next_token: u64,
}

impl FolderTree {
    pub fn new(config: &ExplorerConfig) -> Self {
        Self {
            root: FolderNode::default(),
            nodes: IndexMap::new(),
            cache_ttl: config.cache_ttl(),
            next_token: 0,
        }
    }

    /// Node for `folder` (`None` = root), if it was ever touched.
    pub fn node(&self, folder: Option<ElementId>) -> Option<&FolderNode> {
        match folder {
            None => Some(&self.root),
            Some(id) => self.nodes.get(&id),
        }
    }

    /// Current state of `id`. Untouched folders are collapsed.
    pub fn state(&self, id: ElementId) -> NodeState {
        self.nodes.get(&id).map_or(NodeState::Collapsed, FolderNode::state)
    }

    fn node_mut(&mut self, folder: Option<ElementId>) -> &mut FolderNode {
        match folder {
            None => &mut self.root,
            Some(id) => self.nodes.entry(id).or_default(),
        }
    }

    fn issue(&mut self, folder: Option<ElementId>) -> FetchRequest {
        self.next_token += 1;
        let token = self.next_token;
        self.node_mut(folder).pending = Some(token);
        FetchRequest { folder, token }
    }

    /// Start loading the root listing.
    pub fn load_root(&mut self) -> Option<FetchRequest> {
        self.open(None)
    }

    /// Expand `id`. Returns the listing to fetch, or `None` when the node is
    /// already loading or loaded, or a cached listing is reused.
    pub fn expand(&mut self, id: ElementId) -> Option<FetchRequest> {
        self.open(Some(id))
    }

    fn open(&mut self, folder: Option<ElementId>) -> Option<FetchRequest> {
        let ttl = self.cache_ttl;
        let node = self.node_mut(folder);
        match node.state {
            NodeState::Loading | NodeState::Loaded => None,
            NodeState::Collapsed | NodeState::Failed => {
                node.error = None;
                if node.is_fresh(ttl) {
                    node.state = NodeState::Loaded;
                    debug!(?folder, "reusing cached listing");
                    return None;
                }
                node.state = NodeState::Loading;
                debug!(?folder, "loading listing");
                Some(self.issue(folder))
            }
        }
    }

    /// Collapse `id`. An in-flight fetch for it will be ignored.
    pub fn collapse(&mut self, id: ElementId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.state = NodeState::Collapsed;
            node.pending = None;
            node.error = None;
        }
    }

    /// Expand a collapsed or failed node, collapse any other.
    pub fn toggle(&mut self, id: ElementId) -> Option<FetchRequest> {
        match self.state(id) {
            NodeState::Collapsed | NodeState::Failed => self.expand(id),
            NodeState::Loading | NodeState::Loaded => {
                self.collapse(id);
                None
            }
        }
    }

    /// Re-request the root and every loaded folder, ignoring the cache.
    ///
    /// Loaded nodes keep showing their old children until the new listing
    /// arrives.
    pub fn refresh(&mut self) -> Vec<FetchRequest> {
        let mut folders: Vec<Option<ElementId>> = Vec::new();
        if self.root.state != NodeState::Collapsed {
            folders.push(None);
        }
        folders.extend(
            self.nodes
                .iter()
                .filter(|(_, n)| n.state == NodeState::Loaded)
                .map(|(id, _)| Some(*id)),
        );
        folders.into_iter().map(|f| self.issue(f)).collect()
    }

    /// Apply a listing response. Returns `false` if the response was stale
    /// and ignored.
    pub fn complete_fetch(
        &mut self,
        store: &mut ElementStore,
        request: FetchRequest,
        result: Result<Vec<Element>, BackendError>,
    ) -> bool {
        let node = match request.folder {
            None => &mut self.root,
            Some(id) => match self.nodes.get_mut(&id) {
                Some(node) => node,
                None => return false,
            },
        };
        if node.pending != Some(request.token) {
            debug!(folder = ?request.folder, token = request.token, "ignoring stale listing");
            return false;
        }
        node.pending = None;

        match result {
            Ok(listing) => {
                let children = store.ingest_listing(request.folder, listing);
                let removed = store.prune_children(request.folder, &children);
                debug!(folder = ?request.folder, count = children.len(), "listing loaded");
                node.listing = Some(Listing {
                    children,
                    fetched_at: Instant::now(),
                });
                node.state = NodeState::Loaded;
                node.error = None;
                self.forget(&removed);
            }
            Err(source) => {
                let error = KmsError::fetch(request.folder, source);
                warn!(error = %error, "listing failed");
                node.state = NodeState::Failed;
                node.error = Some(error);
            }
        }
        true
    }

    /// Drop the nodes of elements that left the store.
    ///
    /// An element seen again later, for example under the folder it was
    /// moved to, starts over as a collapsed node.
    pub fn forget(&mut self, removed: &[ElementId]) {
        for id in removed {
            if self.nodes.shift_remove(id).is_some() {
                debug!(%id, "forgetting folder node");
            }
        }
    }

    /// Expand `id` and wait for its listing.
    pub async fn expand_with(
        &mut self,
        store: &mut ElementStore,
        backend: &dyn KnowledgeBackend,
        id: ElementId,
    ) {
        if let Some(request) = self.expand(id) {
            let result = backend.list_children(request.folder).await;
            self.complete_fetch(store, request, result);
        }
    }

    /// Load the root listing and wait for it.
    pub async fn load_root_with(&mut self, store: &mut ElementStore, backend: &dyn KnowledgeBackend) {
        if let Some(request) = self.load_root() {
            let result = backend.list_children(None).await;
            self.complete_fetch(store, request, result);
        }
    }

    /// Folder children of `folder` that are still in the store under it.
    fn folder_children<'s>(
        &self,
        store: &'s ElementStore,
        folder: Option<ElementId>,
    ) -> Vec<&'s Element> {
        self.node(folder)
            .map(FolderNode::children)
            .unwrap_or_default()
            .iter()
            .filter_map(|id| store.get(*id))
            .filter(|e| e.is_folder && e.parent == folder)
            .collect()
    }

    /// Check whether `id` has no folder children to show.
    pub fn is_empty(&self, store: &ElementStore, id: ElementId) -> bool {
        self.state(id) != NodeState::Loading && self.folder_children(store, Some(id)).is_empty()
    }

    /// Flatten the expanded tree into rows, depth-first. Files are never
    /// shown as nodes.
    pub fn visible_rows(&self, store: &ElementStore, ctx: &NavigationContext) -> Vec<FolderRow> {
        let mut rows = Vec::new();
        self.flatten(store, ctx, None, 0, &mut Vec::new(), &mut rows);
        rows
    }

    fn flatten(
        &self,
        store: &ElementStore,
        ctx: &NavigationContext,
        folder: Option<ElementId>,
        depth: usize,
        parent_last: &mut Vec<bool>,
        rows: &mut Vec<FolderRow>,
    ) {
        let children = self.folder_children(store, folder);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            let is_last = i + 1 == count;
            let state = self.state(child.id);
            rows.push(FolderRow {
                id: child.id,
                label: label::trim_last_extension(child.display_name()).to_string(),
                depth,
                state,
                is_empty: self.is_empty(store, child.id),
                is_current: ctx.current_folder() == Some(child.id),
                drag_over: self.nodes.get(&child.id).is_some_and(|n| n.drag_over),
                is_last_sibling: is_last,
                parent_last_siblings: parent_last.clone(),
            });
            if state == NodeState::Loaded {
                parent_last.push(is_last);
                self.flatten(store, ctx, Some(child.id), depth + 1, parent_last, rows);
                parent_last.pop();
            }
        }
    }

    /// Label click: make `id` the current folder.
    ///
    /// A provider folder also switches the context to that provider's root.
    pub fn select_label(
        &self,
        store: &ElementStore,
        ctx: &mut NavigationContext,
        id: ElementId,
    ) -> Result<(), KmsError> {
        let element = store.get(id).ok_or(KmsError::UnknownElement { id })?;
        if !element.source.is_local() {
            ctx.set_exploring_native(false);
            ctx.set_explored_provider(Some(element.source.clone()));
        }
        ctx.set_current_folder(Some(element));
        Ok(())
    }

    /// Highlight `id` as a drop target. Returns `false` for non-folders.
    pub fn drag_enter(&mut self, store: &ElementStore, id: ElementId) -> bool {
        if !store.get(id).is_some_and(Element::accepts_drop) {
            return false;
        }
        for node in self.nodes.values_mut() {
            node.drag_over = false;
        }
        self.node_mut(Some(id)).drag_over = true;
        true
    }

    pub fn drag_leave(&mut self, id: ElementId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.drag_over = false;
        }
    }

    /// Validate dropping `dragged` onto `target` and clear the highlight.
    ///
    /// Only folders accept drops, and a folder cannot be dropped onto itself
    /// or anything below it.
    pub fn prepare_drop(
        &mut self,
        store: &ElementStore,
        dragged: ElementId,
        target: ElementId,
    ) -> Result<MoveRequest, KmsError> {
        self.drag_leave(target);

        let invalid = |reason: &str| KmsError::InvalidDrop {
            dragged,
            target,
            reason: reason.to_string(),
        };
        if !store.contains(dragged) {
            return Err(KmsError::UnknownElement { id: dragged });
        }
        let target_element = store
            .get(target)
            .ok_or(KmsError::UnknownElement { id: target })?;
        if !target_element.accepts_drop() {
            return Err(invalid("target is not a folder"));
        }
        if dragged == target {
            return Err(invalid("cannot drop an element onto itself"));
        }
        if store.is_descendant_of(target, dragged) {
            return Err(invalid("target is inside the dragged folder"));
        }
        Ok(MoveRequest {
            id: dragged,
            target,
        })
    }

    /// Drop `dragged` onto `target`: validate, send the move, then ask every
    /// listing to refetch.
    pub async fn drop_onto(
        &mut self,
        store: &ElementStore,
        ctx: &mut NavigationContext,
        backend: &dyn KnowledgeBackend,
        dragged: ElementId,
        target: ElementId,
    ) -> Result<(), KmsError> {
        let request = self.prepare_drop(store, dragged, target)?;
        move_element(backend, request.id, Some(request.target)).await?;
        ctx.request_refetch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ttl: u64) -> ExplorerConfig {
        ExplorerConfig::builder().cache_ttl_secs(ttl).build().unwrap()
    }

    fn id(n: u64) -> ElementId {
        ElementId::new(n)
    }

    #[test]
    fn test_expand_issues_one_request() {
        let mut tree = FolderTree::new(&config(0));
        let request = tree.expand(id(1)).unwrap();
        assert_eq!(request.folder, Some(id(1)));
        assert_eq!(tree.state(id(1)), NodeState::Loading);

        // Expanding while loading does nothing.
        assert!(tree.expand(id(1)).is_none());
    }

    #[test]
    fn test_failed_fetch_is_kept_on_the_node() {
        let mut tree = FolderTree::new(&config(0));
        let mut store = ElementStore::new();
        let request = tree.expand(id(1)).unwrap();

        assert!(tree.complete_fetch(&mut store, request, Err(BackendError::transport("timeout"))));
        assert_eq!(tree.state(id(1)), NodeState::Failed);
        let error = tree.node(Some(id(1))).unwrap().error().unwrap();
        assert!(error.is_fetch_failure());

        // Retrying clears the error and loads again.
        assert!(tree.expand(id(1)).is_some());
        assert!(tree.node(Some(id(1))).unwrap().error().is_none());
    }

    #[test]
    fn test_stale_fetch_after_collapse_is_ignored() {
        let mut tree = FolderTree::new(&config(0));
        let mut store = ElementStore::new();
        let request = tree.expand(id(1)).unwrap();
        tree.collapse(id(1));

        let listing = vec![Element::folder(id(2), "sub")];
        assert!(!tree.complete_fetch(&mut store, request, Ok(listing)));
        assert_eq!(tree.state(id(1)), NodeState::Collapsed);
        assert!(store.is_empty());
    }

    #[test]
    fn test_reexpand_refetches_without_ttl() {
        let mut tree = FolderTree::new(&config(0));
        let mut store = ElementStore::new();
        let request = tree.expand(id(1)).unwrap();
        tree.complete_fetch(&mut store, request, Ok(vec![]));

        tree.collapse(id(1));
        assert!(tree.expand(id(1)).is_some());
    }

    #[test]
    fn test_reexpand_reuses_fresh_listing() {
        let mut tree = FolderTree::new(&config(3600));
        let mut store = ElementStore::new();
        let request = tree.expand(id(1)).unwrap();
        tree.complete_fetch(&mut store, request, Ok(vec![Element::folder(id(2), "sub")]));

        tree.collapse(id(1));
        assert!(tree.expand(id(1)).is_none());
        assert_eq!(tree.state(id(1)), NodeState::Loaded);
        assert_eq!(tree.node(Some(id(1))).unwrap().children(), &[id(2)]);
    }

    #[test]
    fn test_toggle() {
        let mut tree = FolderTree::new(&config(0));
        assert!(tree.toggle(id(4)).is_some());
        assert!(tree.toggle(id(4)).is_none());
        assert_eq!(tree.state(id(4)), NodeState::Collapsed);
    }

    #[test]
    fn test_node_state_display() {
        assert_eq!(NodeState::Loading.to_string(), "loading");
    }
}
