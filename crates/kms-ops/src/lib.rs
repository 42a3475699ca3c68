//! Knowledge backend contract and mutation operations for kms-explorer.
//!
//! Listing, moving and deleting all go through [`KnowledgeBackend`]. Batch
//! mutations run on background tasks and report through channels, so the
//! UI loop never awaits a backend call directly.

mod backend;
mod delete;
mod memory;
mod move_op;
mod progress;

pub use backend::{KnowledgeBackend, SharedBackend};
pub use delete::{DeleteResult, delete_all, start_bulk_delete};
pub use memory::MemoryBackend;
pub use move_op::{move_element, start_move};
pub use progress::{OperationComplete, OperationProgress, OperationType};

/// Default channel buffer size for operation progress updates.
pub const OPERATION_CHANNEL_SIZE: usize = 100;
