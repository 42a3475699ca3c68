//! Progress reporting types for backend mutations.

use kms_core::{ElementId, KmsError};
use strum::Display;

/// The kind of mutation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum OperationType {
    Move,
    Delete,
}

/// Progress of an ongoing batch.
#[derive(Debug, Clone)]
pub struct OperationProgress {
    pub operation_type: OperationType,
    /// Number of elements handled so far, successful or not.
    pub completed: usize,
    pub total: usize,
    /// The element currently being processed.
    pub current: Option<ElementId>,
    pub errors: Vec<KmsError>,
}

impl OperationProgress {
    pub fn new(operation_type: OperationType, total: usize) -> Self {
        Self {
            operation_type,
            completed: 0,
            total,
            current: None,
            errors: Vec::new(),
        }
    }

    /// Progress as a percentage (0.0 to 100.0).
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.completed as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: KmsError) {
        self.errors.push(error);
    }
}

/// Result of a finished batch.
#[derive(Debug, Clone)]
pub struct OperationComplete {
    pub operation_type: OperationType,
    /// Elements the backend accepted, in request order.
    pub succeeded: Vec<ElementId>,
    pub failed: usize,
    pub errors: Vec<KmsError>,
}

impl OperationComplete {
    pub fn empty(operation_type: OperationType) -> Self {
        Self {
            operation_type,
            succeeded: Vec::new(),
            failed: 0,
            errors: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Human-readable summary for the status bar.
    pub fn summary(&self) -> String {
        let action = match self.operation_type {
            OperationType::Move => "Moved",
            OperationType::Delete => "Deleted",
        };
        let count = self.succeeded.len();
        let noun = if count == 1 { "item" } else { "items" };

        if self.failed == 0 {
            format!("{action} {count} {noun}")
        } else {
            format!("{action} {count} {noun}, {} failed", self.failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        let mut progress = OperationProgress::new(OperationType::Delete, 4);
        assert_eq!(progress.percentage(), 0.0);
        progress.completed = 1;
        assert_eq!(progress.percentage(), 25.0);
        assert_eq!(OperationProgress::new(OperationType::Move, 0).percentage(), 0.0);
    }

    #[test]
    fn test_summary() {
        let mut complete = OperationComplete::empty(OperationType::Delete);
        complete.succeeded = vec![ElementId::new(1)];
        assert_eq!(complete.summary(), "Deleted 1 item");

        complete.succeeded.push(ElementId::new(2));
        complete.failed = 1;
        assert_eq!(complete.summary(), "Deleted 2 items, 1 failed");
        assert!(!complete.is_success());
    }

    #[test]
    fn test_operation_type_display() {
        assert_eq!(OperationType::Move.to_string(), "Move");
    }
}
