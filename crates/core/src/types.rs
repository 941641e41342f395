//! Core types used throughout SchemaForge
//!
//! This module contains the fundamental enums shared by the schema model,
//! the validation engine, the generators and the workflow.

use serde::{Deserialize, Serialize};

// ============================================================================
// Unique Identifiers
// ============================================================================

/// Type alias for field unique identifiers
pub type FieldId = uuid::Uuid;

// ============================================================================
// Field Types
// ============================================================================

/// Data types a schema field may declare
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Short bounded text
    #[default]
    String,
    /// Integer number
    Number,
    /// True/false flag
    Boolean,
    /// Calendar date without time
    Date,
    /// Email address (bounded text with format check)
    Email,
    /// Long-form unbounded text
    Text,
}

impl FieldType {
    /// Get the lower-case wire name (as used in schema files)
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Email => "email",
            FieldType::Text => "text",
        }
    }

    /// Get a user-friendly display name
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Number => "Number",
            FieldType::Boolean => "Boolean",
            FieldType::Date => "Date",
            FieldType::Email => "Email",
            FieldType::Text => "Text",
        }
    }

    /// Whether values of this type are stored as text
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldType::String | FieldType::Email | FieldType::Text)
    }

    /// Get all field types
    pub fn all() -> &'static [FieldType] {
        &[
            FieldType::String,
            FieldType::Number,
            FieldType::Boolean,
            FieldType::Date,
            FieldType::Email,
            FieldType::Text,
        ]
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown field type '{}'", s))
    }
}

// ============================================================================
// CRUD Operations
// ============================================================================

/// The four CRUD operations a schema may enable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    /// Get the lower-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// Get all operations in canonical order
    pub fn all() -> &'static [Operation] {
        &[
            Operation::Create,
            Operation::Read,
            Operation::Update,
            Operation::Delete,
        ]
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Database Types
// ============================================================================

/// Supported SQL dialects for the data-definition artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    PostgreSQL,
    MySQL,
    SQLite,
}

impl DatabaseType {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            DatabaseType::PostgreSQL => "PostgreSQL",
            DatabaseType::MySQL => "MySQL",
            DatabaseType::SQLite => "SQLite",
        }
    }

    /// Get all database types
    pub fn all() -> &'static [DatabaseType] {
        &[
            DatabaseType::PostgreSQL,
            DatabaseType::MySQL,
            DatabaseType::SQLite,
        ]
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&FieldType::Email).unwrap(),
            "\"email\""
        );
        let parsed: FieldType = serde_json::from_str("\"number\"").unwrap();
        assert_eq!(parsed, FieldType::Number);
    }

    #[test]
    fn test_field_type_from_str() {
        assert_eq!("Date".parse::<FieldType>(), Ok(FieldType::Date));
        assert!("uuid".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_field_type_textual() {
        assert!(FieldType::String.is_textual());
        assert!(FieldType::Text.is_textual());
        assert!(!FieldType::Number.is_textual());
        assert!(!FieldType::Date.is_textual());
    }

    #[test]
    fn test_field_type_default() {
        assert_eq!(FieldType::default(), FieldType::String);
        assert_eq!(FieldType::all().len(), 6);
    }

    #[test]
    fn test_operation_order() {
        let names: Vec<&str> = Operation::all().iter().map(|o| o.as_str()).collect();
        assert_eq!(names, vec!["create", "read", "update", "delete"]);
    }

    #[test]
    fn test_database_type() {
        assert_eq!(DatabaseType::default(), DatabaseType::PostgreSQL);
        assert_eq!(DatabaseType::MySQL.display_name(), "MySQL");
        let parsed: DatabaseType = serde_json::from_str("\"sqlite\"").unwrap();
        assert_eq!(parsed, DatabaseType::SQLite);
    }
}
