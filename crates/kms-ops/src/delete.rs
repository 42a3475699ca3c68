//! Bulk deletion with progress reporting.

use tokio::sync::mpsc;
use tracing::{info, warn};

use kms_core::{ElementId, KmsError, MutationKind};

use crate::OPERATION_CHANNEL_SIZE;
use crate::backend::SharedBackend;
use crate::progress::{OperationComplete, OperationProgress, OperationType};

/// Event sent through the channel during a bulk delete.
#[derive(Debug)]
pub enum DeleteResult {
    Progress(OperationProgress),
    Complete(OperationComplete),
}

/// Start deleting `ids` in the background, one backend request per id.
///
/// A failed request does not stop the batch. The receiver always gets a
/// final [`DeleteResult::Complete`].
pub fn start_bulk_delete(backend: SharedBackend, ids: Vec<ElementId>) -> mpsc::Receiver<DeleteResult> {
    let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);

    tokio::spawn(async move {
        let complete = delete_impl(backend, ids, &tx).await;
        let _ = tx.send(DeleteResult::Complete(complete)).await;
    });

    rx
}

/// Delete `ids` and wait for the batch to finish.
pub async fn delete_all(backend: SharedBackend, ids: Vec<ElementId>) -> OperationComplete {
    let mut rx = start_bulk_delete(backend, ids);
    while let Some(event) = rx.recv().await {
        if let DeleteResult::Complete(complete) = event {
            return complete;
        }
    }
    OperationComplete::empty(OperationType::Delete)
}

async fn delete_impl(
    backend: SharedBackend,
    ids: Vec<ElementId>,
    tx: &mpsc::Sender<DeleteResult>,
) -> OperationComplete {
    let mut progress = OperationProgress::new(OperationType::Delete, ids.len());
    let mut complete = OperationComplete::empty(OperationType::Delete);

    for id in ids {
        progress.current = Some(id);
        let _ = tx.send(DeleteResult::Progress(progress.clone())).await;

        match backend.delete_element(id).await {
            Ok(()) => complete.succeeded.push(id),
            Err(source) => {
                warn!(%id, error = %source, "delete failed");
                let error = KmsError::mutation(MutationKind::Delete, id, source);
                progress.add_error(error.clone());
                complete.errors.push(error);
                complete.failed += 1;
            }
        }
        progress.completed += 1;
    }

    progress.current = None;
    let _ = tx.send(DeleteResult::Progress(progress)).await;

    info!(
        deleted = complete.succeeded.len(),
        failed = complete.failed,
        "bulk delete finished"
    );
    complete
}
