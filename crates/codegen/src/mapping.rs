//! # Type Mapping
//!
//! The single table that maps each [`FieldType`] to its storage type, Rust
//! binding, payload check and input widget. Every generator reads from
//! this table, so the four artifacts always agree on a field's shape.

use schemaforge_core::{DatabaseType, FieldType};

/// Length bound shared by the bounded text types
pub const BOUNDED_TEXT_LENGTH: usize = 255;

// ============================================================================
// TypeMapping
// ============================================================================

/// How one field type appears in each artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    pub storage: StorageType,
    pub binding: BindingType,
    pub validation: Option<FieldCheck>,
    pub widget: WidgetKind,
}

/// Look up the mapping for a field type
pub fn mapping_for(field_type: FieldType) -> TypeMapping {
    match field_type {
        FieldType::String => TypeMapping {
            storage: StorageType::Varchar(BOUNDED_TEXT_LENGTH),
            binding: BindingType::String,
            validation: Some(FieldCheck::MaxLength(BOUNDED_TEXT_LENGTH)),
            widget: WidgetKind::TextInput,
        },
        FieldType::Number => TypeMapping {
            storage: StorageType::Integer,
            binding: BindingType::I32,
            validation: Some(FieldCheck::Numeric),
            widget: WidgetKind::NumberInput,
        },
        FieldType::Boolean => TypeMapping {
            storage: StorageType::Boolean,
            binding: BindingType::Bool,
            validation: Some(FieldCheck::Boolean),
            widget: WidgetKind::Checkbox,
        },
        FieldType::Date => TypeMapping {
            storage: StorageType::Date,
            binding: BindingType::NaiveDate,
            validation: Some(FieldCheck::IsoDate),
            widget: WidgetKind::DatePicker,
        },
        FieldType::Email => TypeMapping {
            storage: StorageType::Varchar(BOUNDED_TEXT_LENGTH),
            binding: BindingType::String,
            validation: Some(FieldCheck::Email),
            widget: WidgetKind::EmailInput,
        },
        FieldType::Text => TypeMapping {
            storage: StorageType::Text,
            binding: BindingType::String,
            validation: None,
            widget: WidgetKind::TextArea,
        },
    }
}

// ============================================================================
// StorageType
// ============================================================================

/// Column storage class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    Varchar(usize),
    Integer,
    Boolean,
    Date,
    Text,
}

impl StorageType {
    /// Render the column type for a dialect
    pub fn sql(&self, db: DatabaseType) -> String {
        match (self, db) {
            (StorageType::Varchar(_), DatabaseType::SQLite) => "TEXT".into(),
            (StorageType::Varchar(len), _) => format!("VARCHAR({})", len),
            (StorageType::Integer, DatabaseType::MySQL) => "INT".into(),
            (StorageType::Integer, _) => "INTEGER".into(),
            (StorageType::Boolean, DatabaseType::MySQL) => "TINYINT(1)".into(),
            (StorageType::Boolean, DatabaseType::SQLite) => "INTEGER".into(),
            (StorageType::Boolean, DatabaseType::PostgreSQL) => "BOOLEAN".into(),
            (StorageType::Date, DatabaseType::SQLite) => "TEXT".into(),
            (StorageType::Date, _) => "DATE".into(),
            (StorageType::Text, _) => "TEXT".into(),
        }
    }

    /// SeaORM `column_type` override, when the binding alone is ambiguous
    pub fn sea_orm_column_type(&self) -> Option<&'static str> {
        match self {
            StorageType::Text => Some("Text"),
            _ => None,
        }
    }
}

/// Column type of the injected identity column
pub fn identity_sql_type(db: DatabaseType) -> &'static str {
    match db {
        DatabaseType::PostgreSQL => "SERIAL",
        DatabaseType::MySQL => "INT AUTO_INCREMENT",
        DatabaseType::SQLite => "INTEGER",
    }
}

// ============================================================================
// BindingType
// ============================================================================

/// Rust type a column binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingType {
    String,
    I32,
    Bool,
    NaiveDate,
}

impl BindingType {
    pub fn rust_type(&self) -> &'static str {
        match self {
            BindingType::String => "String",
            BindingType::I32 => "i32",
            BindingType::Bool => "bool",
            BindingType::NaiveDate => "chrono::NaiveDate",
        }
    }

    /// Rust type for a field, wrapped in `Option` when the field is optional
    pub fn rust_type_for(&self, required: bool) -> String {
        if required {
            self.rust_type().to_string()
        } else {
            format!("Option<{}>", self.rust_type())
        }
    }
}

// ============================================================================
// FieldCheck
// ============================================================================

/// Per-field check applied to create/update payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    MaxLength(usize),
    Numeric,
    Boolean,
    IsoDate,
    Email,
}

impl FieldCheck {
    /// `validator` derive attribute, if the check is not already enforced
    /// by typed deserialization
    pub fn to_validator_attribute(&self) -> Option<String> {
        match self {
            FieldCheck::MaxLength(max) => Some(format!("#[validate(length(max = {}))]", max)),
            FieldCheck::Email => Some("#[validate(email)]".to_string()),
            FieldCheck::Numeric | FieldCheck::Boolean | FieldCheck::IsoDate => None,
        }
    }

    pub fn description(&self) -> String {
        match self {
            FieldCheck::MaxLength(max) => format!("at most {} characters", max),
            FieldCheck::Numeric => "an integer".to_string(),
            FieldCheck::Boolean => "true or false".to_string(),
            FieldCheck::IsoDate => "an ISO-8601 date".to_string(),
            FieldCheck::Email => "an email address".to_string(),
        }
    }
}

// ============================================================================
// WidgetKind
// ============================================================================

/// Input control used for a field in the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    TextInput,
    NumberInput,
    Checkbox,
    DatePicker,
    EmailInput,
    TextArea,
}

impl WidgetKind {
    /// HTML `input` type, or `None` for a textarea
    pub fn input_type(&self) -> Option<&'static str> {
        match self {
            WidgetKind::TextInput => Some("text"),
            WidgetKind::NumberInput => Some("number"),
            WidgetKind::Checkbox => Some("checkbox"),
            WidgetKind::DatePicker => Some("date"),
            WidgetKind::EmailInput => Some("email"),
            WidgetKind::TextArea => None,
        }
    }

    /// CSS class for the listing cell
    pub fn cell_class(&self) -> &'static str {
        match self {
            WidgetKind::NumberInput => "cell-number",
            WidgetKind::Checkbox => "cell-flag",
            WidgetKind::DatePicker => "cell-date",
            WidgetKind::TextArea => "cell-long",
            WidgetKind::TextInput | WidgetKind::EmailInput => "cell-text",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rows() {
        let string = mapping_for(FieldType::String);
        assert_eq!(string.storage.sql(DatabaseType::PostgreSQL), "VARCHAR(255)");
        assert_eq!(string.binding.rust_type(), "String");
        assert_eq!(string.validation, Some(FieldCheck::MaxLength(255)));
        assert_eq!(string.widget, WidgetKind::TextInput);

        let number = mapping_for(FieldType::Number);
        assert_eq!(number.storage.sql(DatabaseType::PostgreSQL), "INTEGER");
        assert_eq!(number.binding.rust_type(), "i32");

        let date = mapping_for(FieldType::Date);
        assert_eq!(date.binding.rust_type(), "chrono::NaiveDate");
        assert_eq!(date.widget.input_type(), Some("date"));

        let text = mapping_for(FieldType::Text);
        assert_eq!(text.storage.sql(DatabaseType::PostgreSQL), "TEXT");
        assert!(text.validation.is_none());
        assert_eq!(text.widget.input_type(), None);
    }

    #[test]
    fn test_email_shares_storage_with_string() {
        let email = mapping_for(FieldType::Email);
        let string = mapping_for(FieldType::String);
        assert_eq!(email.storage, string.storage);
        assert_eq!(email.validation, Some(FieldCheck::Email));
    }

    #[test]
    fn test_dialect_rendering() {
        let boolean = mapping_for(FieldType::Boolean).storage;
        assert_eq!(boolean.sql(DatabaseType::PostgreSQL), "BOOLEAN");
        assert_eq!(boolean.sql(DatabaseType::MySQL), "TINYINT(1)");
        assert_eq!(boolean.sql(DatabaseType::SQLite), "INTEGER");

        assert_eq!(identity_sql_type(DatabaseType::PostgreSQL), "SERIAL");
        assert_eq!(identity_sql_type(DatabaseType::MySQL), "INT AUTO_INCREMENT");
        assert_eq!(identity_sql_type(DatabaseType::SQLite), "INTEGER");
    }

    #[test]
    fn test_validator_attributes() {
        assert_eq!(
            FieldCheck::MaxLength(255).to_validator_attribute().as_deref(),
            Some("#[validate(length(max = 255))]")
        );
        assert_eq!(
            FieldCheck::Email.to_validator_attribute().as_deref(),
            Some("#[validate(email)]")
        );
        assert!(FieldCheck::Numeric.to_validator_attribute().is_none());
    }

    #[test]
    fn test_optional_binding() {
        assert_eq!(BindingType::I32.rust_type_for(true), "i32");
        assert_eq!(BindingType::I32.rust_type_for(false), "Option<i32>");
    }

    #[test]
    fn test_every_type_has_a_mapping() {
        for field_type in FieldType::all() {
            let mapping = mapping_for(*field_type);
            assert!(!mapping.storage.sql(DatabaseType::default()).is_empty());
        }
    }
}
