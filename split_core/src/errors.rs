//! # Error Types
//!
//! Structured error types for split_core. Every variant carries enough
//! context for a front end to show a useful message or for a script to
//! react to the `error_code()`.
//!
//! ## Example
//!
//! ```rust
//! use split_core::errors::{SplitError, SplitResult};
//!
//! fn validate_amount(amount: f64) -> SplitResult<()> {
//!     if amount <= 0.0 {
//!         return Err(SplitError::InvalidInput {
//!             field: "amount".to_string(),
//!             value: amount.to_string(),
//!             reason: "Amount must be greater than 0".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for split_core operations
pub type SplitResult<T> = Result<T, SplitError>;

/// Structured error type for ledger and file operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SplitError {
    /// An input value is invalid (empty, out of range, duplicated, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// No group with this id exists in the ledger
    #[error("Group not found: {group_id}")]
    GroupNotFound { group_id: u64 },

    /// A name was used that is not a member of the group
    #[error("'{member}' is not a member of group {group_id}")]
    MemberNotFound { group_id: u64, member: String },

    /// Custom shares do not add up to the expense amount
    #[error("Custom shares (${shares_total:.2}) must equal total amount (${amount:.2})")]
    ShareMismatch { shares_total: f64, amount: f64 },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Configuration file could not be read or parsed
    #[error("Config error in '{path}': {reason}")]
    ConfigError { path: String, reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SplitError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        SplitError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        SplitError::MissingField {
            field: field.into(),
        }
    }

    /// Create a GroupNotFound error
    pub fn group_not_found(group_id: u64) -> Self {
        SplitError::GroupNotFound { group_id }
    }

    /// Create a MemberNotFound error
    pub fn member_not_found(group_id: u64, member: impl Into<String>) -> Self {
        SplitError::MemberNotFound {
            group_id,
            member: member.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        SplitError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        SplitError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError from any displayable cause
    pub fn serialization(reason: impl std::fmt::Display) -> Self {
        SplitError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SplitError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SplitError::InvalidInput { .. } => "INVALID_INPUT",
            SplitError::MissingField { .. } => "MISSING_FIELD",
            SplitError::GroupNotFound { .. } => "GROUP_NOT_FOUND",
            SplitError::MemberNotFound { .. } => "MEMBER_NOT_FOUND",
            SplitError::ShareMismatch { .. } => "SHARE_MISMATCH",
            SplitError::FileError { .. } => "FILE_ERROR",
            SplitError::FileLocked { .. } => "FILE_LOCKED",
            SplitError::SerializationError { .. } => "SERIALIZATION_ERROR",
            SplitError::VersionMismatch { .. } => "VERSION_MISMATCH",
            SplitError::ConfigError { .. } => "CONFIG_ERROR",
            SplitError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
