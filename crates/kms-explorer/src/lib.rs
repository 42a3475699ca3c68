//! Headless explorer model for kms-explorer.
//!
//! The folder tree, breadcrumb header and knowledge table all read the same
//! [`NavigationContext`] and [`ElementStore`](kms_core::ElementStore). None of
//! them render anything; front ends turn their rows and crumbs into widgets.

mod context;
mod folder;
mod header;
mod table;

pub use context::NavigationContext;
pub use folder::{FetchRequest, FolderNode, FolderRow, FolderTree, MoveRequest, NodeState};
pub use header::{Crumb, CrumbKind, FolderHeader};
pub use table::{KnowledgeTable, TableRow};
