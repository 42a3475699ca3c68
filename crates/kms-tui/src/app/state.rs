//! Application state types and enums.

use strum::{Display, EnumIter, IntoEnumIterator};

use kms_core::{BackendError, Element, ElementId};
use kms_explorer::FetchRequest;
use kms_ops::{DeleteResult, OperationComplete};

/// Application mode representing the current UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Normal,
    Help,
    /// Editing the table's search text.
    Search,
    /// Confirming deletion of the selected rows.
    ConfirmDelete,
    /// Bulk delete in progress.
    Deleting,
    /// An element is picked up and waiting to be dropped on a folder.
    Dragging,
    Quit,
}

/// Pane receiving navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter)]
pub enum Focus {
    #[default]
    Tree,
    Table,
}

impl Focus {
    /// Next pane, wrapping around.
    pub fn next(self) -> Self {
        let all: Vec<Self> = Self::iter().collect();
        let index = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(index + 1) % all.len()]
    }
}

/// An element picked up for a move, and the folder row under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub dragged: ElementId,
    pub over: Option<ElementId>,
}

/// Results sent back from background tasks.
#[derive(Debug)]
pub enum AppMessage {
    /// A tree node listing finished.
    TreeListing {
        request: FetchRequest,
        result: Result<Vec<Element>, BackendError>,
    },
    /// The table's listing of `folder` finished.
    TableListing {
        folder: Option<ElementId>,
        token: u64,
        result: Result<Vec<Element>, BackendError>,
    },
    /// Bulk delete progress or completion.
    Delete(DeleteResult),
    /// A drop finished moving its element.
    Move(OperationComplete),
}
