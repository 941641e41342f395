//! Field definitions for entity attributes
//!
//! This module contains the `FieldDefinition` struct, the id-less
//! `FieldDraft` produced by interpretation, and the `FieldPatch` used for
//! partial edits.

use regex::Regex;
use schemaforge_core::{FieldId, FieldType, Identifiable, Named};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

/// Name given to fields created with [`FieldDefinition::placeholder`]
pub const NEW_FIELD_NAME: &str = "new_field";

/// Name of the identity (primary key) column
pub const IDENTITY_FIELD_NAME: &str = "id";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

// ============================================================================
// FieldDefinition
// ============================================================================

/// One named, typed attribute of an entity (maps to a column)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Unique identifier for this field
    #[serde(default = "Uuid::new_v4")]
    pub id: FieldId,

    /// Field name (identifier-shaped, unique case-insensitively)
    pub name: String,

    /// Display label
    #[serde(default)]
    pub label: String,

    /// Declared type
    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    /// Whether the field is required (NOT NULL)
    #[serde(default)]
    pub required: bool,

    /// Default value as typed by the user; checked against the type at
    /// validation time, not here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Index hint
    #[serde(default)]
    pub indexed: bool,
}

impl FieldDefinition {
    /// Create a new field with the given name and type
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        let label = to_title_case(&name);

        Self {
            id: Uuid::new_v4(),
            name,
            label,
            field_type,
            required: false,
            default_value: None,
            indexed: false,
        }
    }

    /// The field appended by "add field": an optional string named `new_field`
    pub fn placeholder() -> Self {
        Self::new(NEW_FIELD_NAME, FieldType::String).with_label("New Field")
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set a default value
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Mark the field as indexed
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    // ========================================================================
    // Utility methods
    // ========================================================================

    /// The effective default value; blank input counts as no default
    pub fn default_value(&self) -> Option<&str> {
        self.default_value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Get the display label (falls back to formatted field name)
    pub fn display_label(&self) -> String {
        if self.label.trim().is_empty() {
            to_title_case(&self.name)
        } else {
            self.label.clone()
        }
    }

    /// Whether this field is the identity field (named `id`)
    pub fn is_identity(&self) -> bool {
        self.name_matches(IDENTITY_FIELD_NAME)
    }

    /// Return a copy with the `Some` members of `patch` merged in
    pub fn merged(&self, patch: &FieldPatch) -> Self {
        let mut field = self.clone();
        if let Some(name) = &patch.name {
            field.name = name.clone();
        }
        if let Some(label) = &patch.label {
            field.label = label.clone();
        }
        if let Some(field_type) = patch.field_type {
            field.field_type = field_type;
        }
        if let Some(required) = patch.required {
            field.required = required;
        }
        if let Some(default_value) = &patch.default_value {
            field.default_value = default_value.clone();
        }
        if let Some(indexed) = patch.indexed {
            field.indexed = indexed;
        }
        field
    }
}

impl Identifiable for FieldDefinition {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Named for FieldDefinition {
    fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// FieldDraft
// ============================================================================

/// A field as produced by the interpretation collaborator (no id yet)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDraft {
    pub name: String,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(default)]
    pub indexed: bool,
}

impl FieldDraft {
    /// Create a draft with the given name and type
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: None,
            field_type,
            required: false,
            default_value: None,
            indexed: false,
        }
    }

    /// Mark the draft as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set a default value
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Materialise the draft with a fresh id
    pub fn into_field(self) -> FieldDefinition {
        let label = self.label.unwrap_or_else(|| to_title_case(&self.name));
        FieldDefinition {
            id: Uuid::new_v4(),
            name: self.name,
            label,
            field_type: self.field_type,
            required: self.required,
            default_value: self.default_value,
            indexed: self.indexed,
        }
    }
}

impl From<&FieldDefinition> for FieldDraft {
    fn from(field: &FieldDefinition) -> Self {
        Self {
            name: field.name.clone(),
            label: Some(field.label.clone()),
            field_type: field.field_type,
            required: field.required,
            default_value: field.default_value.clone(),
            indexed: field.indexed,
        }
    }
}

// ============================================================================
// FieldPatch
// ============================================================================

/// A partial update for a field; `None` members are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub label: Option<String>,
    pub field_type: Option<FieldType>,
    pub required: Option<bool>,
    /// `Some(None)` clears the default value
    pub default_value: Option<Option<String>>,
    pub indexed: Option<bool>,
}

impl FieldPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(Some(default.into()));
        self
    }

    pub fn clear_default(mut self) -> Self {
        self.default_value = Some(None);
        self
    }

    pub fn indexed(mut self, indexed: bool) -> Self {
        self.indexed = Some(indexed);
        self
    }

    /// Check if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Check if a string matches `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    // First character must be letter or underscore
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }

    // Rest must be alphanumeric or underscore
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check a default value against a field type.
///
/// Returns a short reason when the value cannot be stored in a column of
/// that type.
pub fn check_default_value(field_type: FieldType, value: &str) -> Result<(), String> {
    match field_type {
        FieldType::String | FieldType::Text => Ok(()),
        FieldType::Number => value
            .parse::<i32>()
            .map(|_| ())
            .map_err(|_| format!("'{}' is not an integer", value)),
        FieldType::Boolean => match value.to_ascii_lowercase().as_str() {
            "true" | "false" => Ok(()),
            _ => Err(format!("'{}' is not true or false", value)),
        },
        FieldType::Date => chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(|_| ())
            .map_err(|_| format!("'{}' is not an ISO-8601 date (YYYY-MM-DD)", value)),
        FieldType::Email => {
            if EMAIL_PATTERN.is_match(value) {
                Ok(())
            } else {
                Err(format!("'{}' is not an email address", value))
            }
        }
    }
}

/// Convert a snake_case string to Title Case
pub fn to_title_case(s: &str) -> String {
    s.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Tests
// ============================================================================
