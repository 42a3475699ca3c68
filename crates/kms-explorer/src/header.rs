//! Breadcrumb header over the navigation context.

use kms_core::{Element, ElementId, ElementStore, ExplorerConfig, label};

use crate::context::NavigationContext;

/// Position of a crumb in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrumbKind {
    /// The native root or a provider root.
    Root,
    /// The parent of the current folder.
    Parent,
    /// The current folder (empty label at the root).
    Current,
}

/// One breadcrumb segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub kind: CrumbKind,
    pub label: String,
    /// Folder the crumb stands for; `None` for roots and the empty current crumb.
    pub target: Option<ElementId>,
    pub icon: Option<String>,
    /// Whether a chevron is drawn after this crumb.
    pub chevron: bool,
    /// Root crumbs are only clickable while a folder is open.
    pub clickable: bool,
    pub highlighted: bool,
}

/// Builds breadcrumbs and handles crumb clicks.
#[derive(Debug, Clone)]
pub struct FolderHeader {
    native_root_label: String,
}

impl FolderHeader {
    pub fn new(config: &ExplorerConfig) -> Self {
        Self {
            native_root_label: config.native_root_label.clone(),
        }
    }

    /// Breadcrumbs for the current context, left to right.
    ///
    /// A root crumb is shown when the current folder has no parent; otherwise
    /// the parent crumb takes its place. The current crumb is always last.
    pub fn crumbs(&self, ctx: &NavigationContext, store: &ElementStore) -> Vec<Crumb> {
        let current = ctx.current_folder().and_then(|id| store.get(id));
        let parent = current.and_then(|c| c.parent);
        let has_current = ctx.current_folder().is_some();
        let mut crumbs = Vec::with_capacity(2);

        let root_label = match (parent, ctx.explored_provider()) {
            (None, _) if ctx.is_exploring_native() => Some(self.native_root_label.clone()),
            (None, Some(provider)) => Some(label::connection_label(provider.as_str()).to_string()),
            _ => None,
        };

        if let Some(root_label) = root_label {
            crumbs.push(Crumb {
                kind: CrumbKind::Root,
                label: root_label,
                target: None,
                icon: None,
                chevron: has_current,
                clickable: has_current,
                highlighted: false,
            });
        } else if let Some(parent_id) = parent {
            crumbs.push(Crumb {
                kind: CrumbKind::Parent,
                label: store.get(parent_id).map(crumb_label).unwrap_or_default(),
                target: Some(parent_id),
                icon: None,
                chevron: true,
                clickable: true,
                highlighted: false,
            });
        }

        crumbs.push(Crumb {
            kind: CrumbKind::Current,
            label: current.map(crumb_label).unwrap_or_default(),
            target: ctx.current_folder(),
            icon: current.and_then(|c| c.icon.as_ref()).map(|i| i.to_string()),
            chevron: false,
            clickable: false,
            highlighted: parent.is_some() || (ctx.is_exploring_native() && has_current),
        });

        crumbs
    }

    /// Root crumb click: back to the root listing.
    pub fn click_root(&self, ctx: &mut NavigationContext) {
        ctx.clear_current_folder();
    }

    /// Parent crumb click: pop one level. Does nothing at the top level.
    pub fn click_parent(&self, ctx: &mut NavigationContext, store: &ElementStore) {
        let parent = ctx
            .current_folder()
            .and_then(|id| store.get(id))
            .and_then(|c| c.parent)
            .and_then(|p| store.get(p));
        if let Some(parent) = parent {
            ctx.set_current_folder(Some(parent));
        }
    }

    /// Handle a click on `crumb`.
    pub fn click(&self, crumb: &Crumb, ctx: &mut NavigationContext, store: &ElementStore) {
        match crumb.kind {
            CrumbKind::Root if crumb.clickable => self.click_root(ctx),
            CrumbKind::Parent => self.click_parent(ctx, store),
            _ => {}
        }
    }
}

fn crumb_label(element: &Element) -> String {
    label::trim_extensions(element.display_name()).to_string()
}
