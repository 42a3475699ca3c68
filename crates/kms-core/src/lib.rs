//! Core types and helpers for kms-explorer.
//!
//! This crate provides the element data model shared by every other crate:
//! elements and their arena store, configuration, error types, and the pure
//! selection and filter/sort helpers used by the knowledge table.

mod config;
mod element;
mod error;
pub mod label;
mod listing;
mod selection;
mod store;

pub use config::{DEFAULT_NATIVE_ROOT_LABEL, ExplorerConfig, ExplorerConfigBuilder};
pub use element::{Element, ElementId, ElementSource, KnowledgeStatus};
pub use error::{BackendError, KmsError, MutationKind};
pub use listing::{SortConfig, SortDirection, SortKey, filter_and_sort};
pub use selection::{ClickKind, Selection, select};
pub use store::{Ancestors, ElementStore};
