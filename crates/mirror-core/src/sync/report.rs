//! Per-cycle reporting

use serde::{Deserialize, Serialize};

/// Report from one reconciliation cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    /// Whether the cycle completed without per-entry errors
    pub success: bool,
    /// Actions taken during the cycle
    pub actions: Vec<String>,
    /// Per-entry errors encountered during the cycle
    pub errors: Vec<String>,
}

impl CycleReport {
    /// Create an empty, successful report
    pub fn new() -> Self {
        Self {
            success: true,
            actions: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Add an action to the report
    pub fn with_action(mut self, action: String) -> Self {
        self.actions.push(action);
        self
    }

    /// Whether the cycle changed nothing and hit no errors
    pub fn is_quiet(&self) -> bool {
        self.actions.is_empty() && self.errors.is_empty()
    }
}

impl Default for CycleReport {
    fn default() -> Self {
        Self::new()
    }
}
