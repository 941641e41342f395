//! Validation rules for schema definitions
//!
//! The validator is stateless: it runs every registered rule, in
//! registration order, on every call and merges their diagnostics. Errors
//! block compilation; warnings are advisory and are always computed.

use crate::field::{check_default_value, is_valid_identifier};
use crate::schema::SchemaDefinition;
use heck::ToSnakeCase;
use schemaforge_core::{EngineError, EngineResult, FieldType, Named, Operation, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field count above which an unpaginated list endpoint is flagged
pub const DEFAULT_PAGINATION_THRESHOLD: usize = 8;

/// Name suffixes that mark a field as a reference to another record
pub const DEFAULT_RELATION_SUFFIXES: &[&str] = &["_id", "_ref", "_fk"];

/// Identifiers that cannot name a struct field, even as raw identifiers
pub const RESERVED_FIELD_NAMES: &[&str] = &["_", "crate", "self", "super", "Self"];

// ============================================================================
// ValidationConfig
// ============================================================================

/// Tunables for the advisory rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Warn about missing pagination above this many fields
    pub pagination_threshold: usize,

    /// Suffixes that mark relation-like field names
    pub relation_suffixes: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            pagination_threshold: DEFAULT_PAGINATION_THRESHOLD,
            relation_suffixes: DEFAULT_RELATION_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ValidationConfig {
    pub fn with_pagination_threshold(mut self, threshold: usize) -> Self {
        self.pagination_threshold = threshold;
        self
    }

    pub fn with_relation_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relation_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    /// Check whether a field name looks like a relation (case-insensitive)
    pub fn is_relation_name(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.relation_suffixes
            .iter()
            .any(|suffix| lower.ends_with(&suffix.to_lowercase()))
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Errors and warnings produced by one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl Diagnostics {
    /// An empty result
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Append another result, keeping order
    pub fn merge(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// True when there are no errors (warnings do not count)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Convert to EngineResult (fails if any errors)
    pub fn to_result(&self) -> EngineResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let msg = self
                .errors
                .iter()
                .map(|e| e.message.clone())
                .collect::<Vec<_>>()
                .join("; ");
            Err(EngineError::validation(msg))
        }
    }
}

// ============================================================================
// ValidationError
// ============================================================================

/// A structural problem that blocks compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Error code for programmatic handling
    pub code: ValidationErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Path to the problematic element (e.g. "fields.title")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Suggested fix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            suggestion: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "[{}] {}", path, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// Error codes for validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorCode {
    EmptyEntityName,
    InvalidEntityName,
    NoFields,
    DuplicateFieldName,
    EmptyFieldName,
    InvalidFieldName,
    InvalidDefaultValue,
}

// ============================================================================
// ValidationWarning
// ============================================================================

/// An advisory note; never blocks compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    pub code: ValidationWarningCode,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: ValidationWarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "[{}] {}", path, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// Warning codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationWarningCode {
    MissingRelationIndex,
    RequiredTextWithoutDefault,
    MissingPagination,
    NoOperations,
}

// ============================================================================
// ValidationRule Trait
// ============================================================================

/// One check over a schema
pub trait ValidationRule: Send + Sync {
    /// Get the rule name
    fn name(&self) -> &'static str;

    /// Get the rule description
    fn description(&self) -> &'static str;

    /// Check a schema and return its diagnostics
    fn validate(&self, schema: &SchemaDefinition) -> Diagnostics;
}

// ============================================================================
// Validator
// ============================================================================

/// Schema validator that runs its rules in a fixed order
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    /// Create a validator with no rules
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a validator with the built-in rules.
    ///
    /// Error rules are registered before warning rules; within each group
    /// the registration order is the reporting order.
    pub fn with_default_rules(config: &ValidationConfig) -> Self {
        let mut validator = Self::new();
        validator.add_rule(Box::new(EntityNameRule));
        validator.add_rule(Box::new(FieldsPresentRule));
        validator.add_rule(Box::new(UniqueFieldNamesRule));
        validator.add_rule(Box::new(FieldNamesRule));
        validator.add_rule(Box::new(DefaultValuesRule));
        validator.add_rule(Box::new(RelationIndexRule {
            config: config.clone(),
        }));
        validator.add_rule(Box::new(RequiredTextRule));
        validator.add_rule(Box::new(PaginationRule {
            threshold: config.pagination_threshold,
        }));
        validator.add_rule(Box::new(OperationsRule));
        validator
    }

    /// Add a validation rule
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Number of registered rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Run every rule against the schema
    pub fn validate(&self, schema: &SchemaDefinition) -> Diagnostics {
        let mut result = Diagnostics::ok();

        for rule in &self.rules {
            let rule_result = rule.validate(schema);
            tracing::debug!(
                rule = rule.name(),
                errors = rule_result.errors.len(),
                warnings = rule_result.warnings.len(),
                "Validation rule finished"
            );
            result.merge(rule_result);
        }

        result
    }

    /// Validate and return Result
    pub fn validate_result(&self, schema: &SchemaDefinition) -> EngineResult<()> {
        self.validate(schema).to_result()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::with_default_rules(&ValidationConfig::default())
    }
}

impl Validatable for SchemaDefinition {
    fn validate(&self) -> EngineResult<()> {
        Validator::default().validate_result(self)
    }

    fn validation_errors(&self) -> Vec<String> {
        Validator::default()
            .validate(self)
            .errors
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

// ============================================================================
// Built-in Validation Rules
// ============================================================================

fn field_path(name: &str, index: usize) -> String {
    if name.is_empty() {
        format!("fields[{}]", index)
    } else {
        format!("fields.{}", name)
    }
}

/// The snake_case form names the generated modules and handlers
fn has_module_name(name: &str) -> bool {
    name.to_snake_case()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
}

/// Rule: entity name must be a non-empty identifier
pub struct EntityNameRule;

impl ValidationRule for EntityNameRule {
    fn name(&self) -> &'static str {
        "entity_name"
    }

    fn description(&self) -> &'static str {
        "Validates that the entity name is a non-empty identifier"
    }

    fn validate(&self, schema: &SchemaDefinition) -> Diagnostics {
        let mut result = Diagnostics::ok();
        let name = schema.entity_name.as_str();

        if name.trim().is_empty() {
            result.add_error(
                ValidationError::new(
                    ValidationErrorCode::EmptyEntityName,
                    "Entity name cannot be empty",
                )
                .with_path("entity"),
            );
        } else if !is_valid_identifier(name) {
            result.add_error(
                ValidationError::new(
                    ValidationErrorCode::InvalidEntityName,
                    format!("Entity name '{}' is not a valid identifier", name),
                )
                .with_path("entity")
                .with_suggestion("Use only letters, digits and underscores, not starting with a digit"),
            );
        } else if !has_module_name(name) {
            result.add_error(
                ValidationError::new(
                    ValidationErrorCode::InvalidEntityName,
                    format!("Entity name '{}' does not yield a usable module name", name),
                )
                .with_path("entity")
                .with_suggestion("Start the name with a letter"),
            );
        }

        result
    }
}

/// Rule: at least one field
pub struct FieldsPresentRule;

impl ValidationRule for FieldsPresentRule {
    fn name(&self) -> &'static str {
        "fields_present"
    }

    fn description(&self) -> &'static str {
        "Validates that the schema declares at least one field"
    }

    fn validate(&self, schema: &SchemaDefinition) -> Diagnostics {
        let mut result = Diagnostics::ok();

        if schema.fields.is_empty() {
            result.add_error(
                ValidationError::new(
                    ValidationErrorCode::NoFields,
                    "Schema must have at least one field",
                )
                .with_path("entity")
                .with_suggestion("Add a field before confirming"),
            );
        }

        result
    }
}

/// Rule: field names unique case-insensitively, one error per group
pub struct UniqueFieldNamesRule;

impl ValidationRule for UniqueFieldNamesRule {
    fn name(&self) -> &'static str {
        "unique_field_names"
    }

    fn description(&self) -> &'static str {
        "Validates that field names are unique ignoring case"
    }

    fn validate(&self, schema: &SchemaDefinition) -> Diagnostics {
        let mut result = Diagnostics::ok();

        // Group keys in first-occurrence order
        let mut groups: Vec<(String, usize)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for field in schema.fields.iter().filter(|f| !f.name.is_empty()) {
            let key = field.name_key();
            match positions.get(&key) {
                Some(&index) => groups[index].1 += 1,
                None => {
                    positions.insert(key, groups.len());
                    groups.push((field.name.clone(), 1));
                }
            }
        }

        for (name, count) in groups.into_iter().filter(|(_, count)| *count > 1) {
            result.add_error(
                ValidationError::new(
                    ValidationErrorCode::DuplicateFieldName,
                    format!("Duplicate field name: '{}' is used {} times", name, count),
                )
                .with_path(format!("fields.{}", name)),
            );
        }

        result
    }
}

/// Rule: field names follow the identifier grammar
pub struct FieldNamesRule;

impl ValidationRule for FieldNamesRule {
    fn name(&self) -> &'static str {
        "field_names"
    }

    fn description(&self) -> &'static str {
        "Validates that field names are identifiers"
    }

    fn validate(&self, schema: &SchemaDefinition) -> Diagnostics {
        let mut result = Diagnostics::ok();

        for (index, field) in schema.fields.iter().enumerate() {
            let path = field_path(&field.name, index);

            if field.name.trim().is_empty() {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::EmptyFieldName,
                        "Field name cannot be empty",
                    )
                    .with_path(path),
                );
            } else if !is_valid_identifier(&field.name) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::InvalidFieldName,
                        format!("Field name '{}' is not a valid identifier", field.name),
                    )
                    .with_path(path)
                    .with_suggestion("Use snake_case with only letters, digits and underscores"),
                );
            } else if RESERVED_FIELD_NAMES.contains(&field.name.as_str()) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::InvalidFieldName,
                        format!("Field name '{}' is reserved in generated Rust code", field.name),
                    )
                    .with_path(path)
                    .with_suggestion("Pick a more descriptive name"),
                );
            }
        }

        result
    }
}

/// Rule: default values parse for the field's type
pub struct DefaultValuesRule;

impl ValidationRule for DefaultValuesRule {
    fn name(&self) -> &'static str {
        "default_values"
    }

    fn description(&self) -> &'static str {
        "Validates that default values match their field types"
    }

    fn validate(&self, schema: &SchemaDefinition) -> Diagnostics {
        let mut result = Diagnostics::ok();

        for (index, field) in schema.fields.iter().enumerate() {
            let Some(value) = field.default_value() else {
                continue;
            };

            if let Err(reason) = check_default_value(field.field_type, value) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::InvalidDefaultValue,
                        format!(
                            "Default value for '{}' is invalid: {}",
                            field.name, reason
                        ),
                    )
                    .with_path(field_path(&field.name, index)),
                );
            }
        }

        result
    }
}

/// Rule: relation-like fields should be indexed
pub struct RelationIndexRule {
    config: ValidationConfig,
}

impl ValidationRule for RelationIndexRule {
    fn name(&self) -> &'static str {
        "relation_index"
    }

    fn description(&self) -> &'static str {
        "Suggests an index for fields that look like references"
    }

    fn validate(&self, schema: &SchemaDefinition) -> Diagnostics {
        let mut result = Diagnostics::ok();

        for field in &schema.fields {
            if field.indexed || !self.config.is_relation_name(&field.name) {
                continue;
            }
            result.add_warning(
                ValidationWarning::new(
                    ValidationWarningCode::MissingRelationIndex,
                    format!(
                        "Consider adding an index on '{}' for better lookup performance",
                        field.name
                    ),
                )
                .with_path(format!("fields.{}", field.name)),
            );
        }

        result
    }
}

/// Rule: required long text should carry a default
pub struct RequiredTextRule;

impl ValidationRule for RequiredTextRule {
    fn name(&self) -> &'static str {
        "required_text"
    }

    fn description(&self) -> &'static str {
        "Flags required text fields without a default value"
    }

    fn validate(&self, schema: &SchemaDefinition) -> Diagnostics {
        let mut result = Diagnostics::ok();

        for field in &schema.fields {
            if field.field_type == FieldType::Text && field.required && field.default_value().is_none()
            {
                result.add_warning(
                    ValidationWarning::new(
                        ValidationWarningCode::RequiredTextWithoutDefault,
                        format!(
                            "Required text field '{}' has no default value",
                            field.name
                        ),
                    )
                    .with_path(format!("fields.{}", field.name)),
                );
            }
        }

        result
    }
}

/// Rule: wide listings should be paginated
pub struct PaginationRule {
    threshold: usize,
}

impl ValidationRule for PaginationRule {
    fn name(&self) -> &'static str {
        "pagination"
    }

    fn description(&self) -> &'static str {
        "Suggests pagination for list endpoints over wide entities"
    }

    fn validate(&self, schema: &SchemaDefinition) -> Diagnostics {
        let mut result = Diagnostics::ok();

        if schema.field_count() > self.threshold
            && schema.operations.is_enabled(Operation::Read)
            && !schema.paginated
        {
            result.add_warning(
                ValidationWarning::new(
                    ValidationWarningCode::MissingPagination,
                    format!(
                        "Entity has {} fields; consider paginating the list endpoint",
                        schema.field_count()
                    ),
                )
                .with_path("entity"),
            );
        }

        result
    }
}

/// Rule: at least one operation should be enabled
pub struct OperationsRule;

impl ValidationRule for OperationsRule {
    fn name(&self) -> &'static str {
        "operations"
    }

    fn description(&self) -> &'static str {
        "Flags schemas with every operation disabled"
    }

    fn validate(&self, schema: &SchemaDefinition) -> Diagnostics {
        let mut result = Diagnostics::ok();

        if !schema.operations.any() {
            result.add_warning(
                ValidationWarning::new(
                    ValidationWarningCode::NoOperations,
                    "No operations are enabled; the API will expose no endpoints",
                )
                .with_path("entity"),
            );
        }

        result
    }
}

// ============================================================================
// Tests
// ============================================================================
