//! Navigation state shared by the tree, header and table.

use kms_core::{Element, ElementId, ElementSource};
use tracing::debug;

/// Current folder and root being explored.
///
/// Passed explicitly to every component and changed only through setters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationContext {
    current_folder: Option<ElementId>,
    exploring_native: bool,
    explored_provider: Option<ElementSource>,
    refetch_requested: bool,
}

impl NavigationContext {
    /// Context as set up when the explorer is opened: the native root is
    /// selected and no folder is current.
    pub fn mounted() -> Self {
        Self {
            exploring_native: true,
            ..Self::default()
        }
    }

    pub fn current_folder(&self) -> Option<ElementId> {
        self.current_folder
    }

    pub fn is_exploring_native(&self) -> bool {
        self.exploring_native
    }

    pub fn explored_provider(&self) -> Option<&ElementSource> {
        self.explored_provider.as_ref()
    }

    /// Make `folder` current. A folder from the native store also switches
    /// the context to the native root.
    pub fn set_current_folder(&mut self, folder: Option<&Element>) {
        self.current_folder = folder.map(|f| f.id);
        if let Some(f) = folder {
            if f.source.is_local() {
                self.exploring_native = true;
                self.explored_provider = None;
            }
        }
        debug!(current = ?self.current_folder, "current folder changed");
    }

    /// Forget the current folder, showing the root of whatever is explored.
    pub fn clear_current_folder(&mut self) {
        self.current_folder = None;
    }

    pub fn set_exploring_native(&mut self, exploring: bool) {
        self.exploring_native = exploring;
    }

    pub fn set_explored_provider(&mut self, provider: Option<ElementSource>) {
        self.explored_provider = provider;
    }

    /// Ask every listing to reload.
    pub fn request_refetch(&mut self) {
        self.refetch_requested = true;
    }

    pub fn refetch_requested(&self) -> bool {
        self.refetch_requested
    }

    /// Consume a pending refetch request.
    pub fn take_refetch(&mut self) -> bool {
        std::mem::take(&mut self.refetch_requested)
    }
}
