//! Error types for the scenario runner.

use std::path::PathBuf;

use qtyguard_core::CoreError;
use qtyguard_store::StoreError;

/// Runner errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Cannot read scenario {path}: {source}")]
    ReadScenario {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid scenario {path}: {source}")]
    ParseScenario {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Scenario rule error: {0}")]
    Rule(#[from] CoreError),
}
