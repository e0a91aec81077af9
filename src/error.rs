use crate::lattice::ModuleId;
use thiserror::Error;

/// Failures while reading a scenario description.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("scenario has no header block (name, description, module type)")]
    MissingHeader,

    #[error("line {line}: expected {expected} comma-separated values, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: '{value}' is not an integer")]
    InvalidInteger { line: usize, value: String },

    #[error("line {line}: colour component {value} is outside 0..=255")]
    InvalidColor { line: usize, value: i32 },

    #[error("line {line}: module {module} uses undefined visual group {group}")]
    UnknownVisgroup {
        line: usize,
        module: ModuleId,
        group: i32,
    },

    #[error("line {line}: move refers to undeclared module {module}")]
    UnknownModule { line: usize, module: ModuleId },

    #[error("line {line}: module id {value} is negative")]
    NegativeModuleId { line: usize, value: i32 },
}

/// Failures at the external pathfinder boundary.
#[derive(Debug, Error)]
pub enum PathfinderError {
    #[error("failed to encode pathfinder input: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("pathfinder run failed: {0}")]
    Run(String),

    #[error("pathfinder returned an unreadable scenario: {0}")]
    Scenario(#[from] ScenarioError),
}
