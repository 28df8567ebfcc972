//! Error types for the page interaction controller

use thiserror::Error;

use crate::view::Landmark;

/// Main error type for controller operations
#[derive(Error, Debug)]
pub enum PageError {
    /// A landmark the controller cannot work without is absent from the page
    #[error("Required landmark missing: {0}")]
    MissingLandmark(Landmark),

    /// Two sections share the same id
    #[error("Duplicate section id: {0}")]
    DuplicateSection(String),

    /// Configuration values out of range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Configuration document could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Debug surface was asked for an operation it does not expose
    #[error("Unknown debug command: {0}")]
    UnknownDebugCommand(String),
}

/// Result type alias using PageError
pub type PageResult<T> = Result<T, PageError>;
