//! # SchemaForge IR (Intermediate Representation)
//!
//! This crate holds the schema model reviewed by the user and the
//! validation engine that checks it before compilation.
//!
//! ## Core Concepts
//!
//! - **SchemaDefinition**: one entity with ordered fields and enabled CRUD operations
//! - **FieldDefinition**: a named, typed attribute that maps to a column
//! - **SchemaDraft**: id-less schema produced by the interpretation collaborator
//! - **Validator**: runs the structural and advisory rules, producing `Diagnostics`
//!

// Module declarations
pub mod field;
pub mod schema;
pub mod serialization;
pub mod validation;

// Re-export commonly used types at crate root
pub use field::{
    FieldDefinition, FieldDraft, FieldPatch, IDENTITY_FIELD_NAME, NEW_FIELD_NAME,
    check_default_value, is_valid_identifier, to_title_case,
};
pub use schema::{Operations, SchemaDefinition, SchemaDraft};
pub use serialization::{
    SchemaFile, load_schema, load_schema_from_bytes, load_schema_from_string, save_schema,
    save_schema_to_string,
};
pub use validation::{
    Diagnostics, ValidationConfig, ValidationError, ValidationErrorCode, ValidationRule,
    ValidationWarning, ValidationWarningCode, Validator,
};

// Re-export core types that are commonly used with IR
pub use schemaforge_core::{
    DatabaseType, EngineError, EngineResult, FieldId, FieldType, Operation,
};

/// Current version of the schema file layout
pub const SCHEMA_VERSION: u32 = 1;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        Diagnostics,
        EngineError,
        EngineResult,
        FieldDefinition,
        FieldDraft,
        FieldId,
        FieldPatch,
        // Re-exported from core
        FieldType,
        Operation,
        Operations,
        SchemaDefinition,
        SchemaDraft,
        ValidationConfig,
        Validator,
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_version() {
        assert_eq!(SCHEMA_VERSION, 1);
    }

    #[test]
    fn test_prelude_builds_a_valid_schema() {
        use crate::prelude::*;

        let schema = SchemaDefinition::new("Book")
            .with_field(FieldDefinition::new("title", FieldType::String).required());
        assert!(Validator::default().validate(&schema).is_valid());
    }
}
