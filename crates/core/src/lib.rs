//! # SchemaForge Core
//!
//! Core types, traits, and error handling for SchemaForge.
//!
//! This crate provides the foundational building blocks used throughout
//! the workspace, including:
//!
//! - **Types**: field types, CRUD operations, SQL dialects
//! - **Traits**: `Validatable`, `Identifiable`, `Named`
//! - **Errors**: Unified error handling with `EngineError` and `EngineResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EngineError, EngineResult, ResultExt};
pub use traits::{Identifiable, Named, Validatable};
pub use types::{DatabaseType, FieldId, FieldType, Operation};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
