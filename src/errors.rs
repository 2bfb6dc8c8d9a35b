//! Error types for dvtrack
//!
//! `CoreError` covers the outcomes the voucher core models as expected
//! rejections. `DvError` wraps those plus the failures of the storage and
//! CLI layers. Each variant has a stable error code for programmatic handling.

use thiserror::Error;

use crate::schemas::{ActionName, DvStatus};

/// Result type alias for application-level operations
pub type Result<T> = std::result::Result<T, DvError>;

/// Result type alias for pure core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Rejections produced by the voucher core.
///
/// None of these leave a voucher modified: a rejected action returns the error
/// and the caller keeps its original snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The action is not legal from the voucher's current status
    #[error("Invalid transition: '{action}' is not allowed from status '{from}'")]
    InvalidTransition { from: DvStatus, action: ActionName },

    /// A structured identifier or typed value failed its grammar
    #[error("Invalid format for {field}: expected {expected}, got '{value}' ({reason})")]
    FormatError {
        field: String,
        expected: String,
        value: String,
        reason: String,
    },

    /// A required payload field is absent or blank
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// The document is not in a condition that allows the operation
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),
}

impl CoreError {
    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InvalidTransition { .. } => "INVALID_TRANSITION",
            CoreError::FormatError { .. } => "FORMAT_ERROR",
            CoreError::MissingField(_) => "MISSING_FIELD",
            CoreError::PreconditionFailed(_) => "PRECONDITION_FAILED",
        }
    }

    pub(crate) fn format(
        field: impl Into<String>,
        expected: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CoreError::FormatError {
            field: field.into(),
            expected: expected.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Main error type for storage and CLI operations
#[derive(Debug, Error)]
pub enum DvError {
    /// Workspace not found - no .dvtrack directory in cwd or its ancestors
    #[error("Workspace not found: {0}")]
    RootNotFound(String),

    /// Invalid JSON format
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// No voucher with the requested id
    #[error("Voucher not found: {0}")]
    VoucherNotFound(String),

    /// DV number already used by another voucher in this office
    #[error("DV number already exists: {0}")]
    DuplicateDvNumber(String),

    /// The stored snapshot changed since it was loaded
    #[error("Version conflict on voucher {id}: expected version {expected}, found {found}")]
    VersionConflict { id: String, expected: u64, found: u64 },

    /// Rejected by the voucher core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error with context
    #[error("{context}: {message}")]
    Wrapped { context: String, message: String },
}

impl DvError {
    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            DvError::RootNotFound(_) => "ROOT_NOT_FOUND",
            DvError::InvalidJson(_) => "INVALID_JSON",
            DvError::FileNotFound(_) => "FILE_NOT_FOUND",
            DvError::ConfigError(_) => "CONFIG_ERROR",
            DvError::VoucherNotFound(_) => "VOUCHER_NOT_FOUND",
            DvError::DuplicateDvNumber(_) => "DUPLICATE_DV_NUMBER",
            DvError::VersionConflict { .. } => "VERSION_CONFLICT",
            DvError::Core(e) => e.code(),
            DvError::Io(_) => "IO_ERROR",
            DvError::Wrapped { .. } => "WRAPPED_ERROR",
        }
    }

    /// Wrap an error with additional context
    pub fn wrap<E: std::fmt::Display>(error: E, context: impl Into<String>) -> Self {
        DvError::Wrapped {
            context: context.into(),
            message: error.to_string(),
        }
    }
}

/// Convert an error to an appropriate exit code
pub fn to_exit_code(error: &DvError) -> i32 {
    match error {
        DvError::Core(_) => 2,
        DvError::VersionConflict { .. } => 3,
        _ => 1,
    }
}
