//! Error types for SchemaForge
//!
//! This module provides unified error handling across the workspace:
//! schema lookups, workflow misuse, internal compiler faults, IO,
//! configuration and serialization errors.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for SchemaForge
#[derive(Debug, Error)]
pub enum EngineError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Field not found
    #[error("Field '{0}' not found in schema")]
    FieldNotFound(String),

    /// Schema file not found
    #[error("Schema file not found at path: {0}")]
    SchemaNotFound(PathBuf),

    // ========================================================================
    // Workflow Errors
    // ========================================================================
    /// Another request is still outstanding
    #[error("A {pending} request is already in progress")]
    Busy { pending: String },

    /// The requested action is not allowed in the current state
    #[error("Cannot {action} while in the {state} state")]
    InvalidTransition { action: String, state: String },

    /// The interpretation collaborator failed
    #[error("Interpretation failed: {0}")]
    Interpretation(String),

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Directory creation failed
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Invalid schema file format
    #[error("Invalid schema file format: {0}")]
    InvalidSchemaFormat(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration file could not be parsed
    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl EngineError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    /// Create a busy error for the request kind still in flight
    pub fn busy(pending: impl Into<String>) -> Self {
        EngineError::Busy {
            pending: pending.into(),
        }
    }

    /// Create an invalid transition error
    pub fn invalid_transition(action: impl Into<String>, state: impl Into<String>) -> Self {
        EngineError::InvalidTransition {
            action: action.into(),
            state: state.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        EngineError::Internal(msg.into())
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::Validation(_))
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::FieldNotFound(_) | EngineError::SchemaNotFound(_)
        )
    }

    /// Check if this error comes from workflow sequencing
    pub fn is_workflow(&self) -> bool {
        matches!(
            self,
            EngineError::Busy { .. }
                | EngineError::InvalidTransition { .. }
                | EngineError::Interpretation(_)
        )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            EngineError::Io(_)
                | EngineError::FileRead { .. }
                | EngineError::FileWrite { .. }
                | EngineError::DirectoryCreate { .. }
        )
    }
}

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> EngineResult<T>;
}

impl<T, E: Into<EngineError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> EngineResult<T> {
        self.map_err(|e| {
            let err: EngineError = e.into();
            EngineError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
