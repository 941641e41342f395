//! Core traits for SchemaForge
//!
//! This module defines the small set of behaviours shared by schema
//! values: validation, identity lookup and case-insensitive naming.

use crate::error::EngineResult;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated
///
/// Types implementing this trait can check their internal consistency
/// and return validation errors if the state is invalid.
///
/// # Example
///
/// ```rust,ignore
/// use schemaforge_core::{Validatable, EngineResult, EngineError};
///
/// struct Draft {
///     entity_name: String,
/// }
///
/// impl Validatable for Draft {
///     fn validate(&self) -> EngineResult<()> {
///         if self.entity_name.is_empty() {
///             return Err(EngineError::validation("Entity name cannot be empty"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or an `EngineError` describing the problem.
    fn validate(&self) -> EngineResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

// ============================================================================
// Identifiable Trait
// ============================================================================

/// Trait for types that have a unique identifier
pub trait Identifiable {
    /// Get the unique identifier
    fn id(&self) -> uuid::Uuid;

    /// Check if this matches another identifier
    fn matches_id(&self, id: uuid::Uuid) -> bool {
        self.id() == id
    }
}

// ============================================================================
// Named Trait
// ============================================================================

/// Trait for types that have a name
pub trait Named {
    /// Get the name
    fn name(&self) -> &str;

    /// Check if the name matches (case-insensitive)
    fn name_matches(&self, other: &str) -> bool {
        self.name().eq_ignore_ascii_case(other)
    }

    /// The key used for case-insensitive uniqueness checks
    fn name_key(&self) -> String {
        self.name().to_lowercase()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct TestValidatable {
        valid: bool,
    }

    impl Validatable for TestValidatable {
        fn validate(&self) -> EngineResult<()> {
            if self.valid {
                Ok(())
            } else {
                Err(crate::error::EngineError::validation("Invalid state"))
            }
        }
    }

    #[test]
    fn test_validatable_trait() {
        let valid = TestValidatable { valid: true };
        assert!(valid.is_valid());
        assert!(valid.validation_errors().is_empty());

        let invalid = TestValidatable { valid: false };
        assert!(!invalid.is_valid());
        assert_eq!(invalid.validation_errors().len(), 1);
    }

    struct Column(&'static str);

    impl Named for Column {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_named_case_insensitive() {
        let column = Column("Title");
        assert!(column.name_matches("title"));
        assert!(column.name_matches("TITLE"));
        assert!(!column.name_matches("titles"));
        assert_eq!(column.name_key(), "title");
    }

    struct Row(uuid::Uuid);

    impl Identifiable for Row {
        fn id(&self) -> uuid::Uuid {
            self.0
        }
    }

    #[test]
    fn test_identifiable() {
        let id = uuid::Uuid::new_v4();
        let row = Row(id);
        assert!(row.matches_id(id));
        assert!(!row.matches_id(uuid::Uuid::new_v4()));
    }
}
