//! Moving elements between folders.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use kms_core::{ElementId, KmsError, MutationKind};

use crate::OPERATION_CHANNEL_SIZE;
use crate::backend::{KnowledgeBackend, SharedBackend};
use crate::progress::{OperationComplete, OperationType};

/// Ask the backend to re-parent `id` under `target`.
pub async fn move_element(
    backend: &dyn KnowledgeBackend,
    id: ElementId,
    target: Option<ElementId>,
) -> Result<(), KmsError> {
    backend
        .move_element(id, target)
        .await
        .map_err(|source| KmsError::mutation(MutationKind::Move, id, source))?;
    debug!(%id, ?target, "move accepted");
    Ok(())
}

/// Start moving `id` under `target` in the background.
///
/// The receiver gets a single [`OperationComplete`].
pub fn start_move(
    backend: SharedBackend,
    id: ElementId,
    target: Option<ElementId>,
) -> mpsc::Receiver<OperationComplete> {
    let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);

    tokio::spawn(async move {
        let mut complete = OperationComplete::empty(OperationType::Move);
        match move_element(backend.as_ref(), id, target).await {
            Ok(()) => complete.succeeded.push(id),
            Err(err) => {
                warn!(%id, error = %err, "move failed");
                complete.failed = 1;
                complete.errors.push(err);
            }
        }
        let _ = tx.send(complete).await;
    });

    rx
}
