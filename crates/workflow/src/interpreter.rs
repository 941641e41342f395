//! Interpretation collaborator
//!
//! Turns a natural-language prompt (or feedback on an existing schema)
//! into a [`SchemaDraft`]. The real service lives outside this crate;
//! [`StaticInterpreter`] is an offline stand-in that always proposes the
//! same draft.

use std::collections::BTreeSet;

use async_trait::async_trait;
use schemaforge_core::{EngineError, FieldType, Operation};
use schemaforge_ir::{FieldDraft, Operations, SchemaDefinition, SchemaDraft};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Parameters & errors
// ============================================================================

/// Structured hints sent along with the prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretationParams {
    /// Preferred entity name, if the user gave one
    pub entity_name: Option<String>,

    /// Operations the generated schema should enable
    pub operations: BTreeSet<Operation>,
}

impl Default for InterpretationParams {
    fn default() -> Self {
        Self {
            entity_name: None,
            operations: Operation::all().iter().copied().collect(),
        }
    }
}

impl InterpretationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.entity_name = if name.trim().is_empty() {
            None
        } else {
            Some(name.trim().to_string())
        };
        self
    }

    pub fn with_operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations = operations.into_iter().collect();
        self
    }
}

/// Failure reported by the interpretation collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretationError {
    #[error("interpretation service unavailable: {0}")]
    Unavailable(String),

    #[error("could not derive a schema from the request: {0}")]
    Unintelligible(String),

    #[error("interpretation returned a malformed draft: {0}")]
    MalformedDraft(String),
}

impl From<InterpretationError> for EngineError {
    fn from(err: InterpretationError) -> Self {
        EngineError::Interpretation(err.to_string())
    }
}

/// Reject a fresh proposal that has no entity name or an unnamed field
pub(crate) fn check_draft(draft: SchemaDraft) -> Result<SchemaDraft, InterpretationError> {
    if draft.entity_name.trim().is_empty() {
        return Err(InterpretationError::MalformedDraft(
            "draft has no entity name".to_string(),
        ));
    }
    if let Some(index) = draft.fields.iter().position(|f| f.name.trim().is_empty()) {
        return Err(InterpretationError::MalformedDraft(format!(
            "field {} has no name",
            index + 1
        )));
    }
    Ok(draft)
}

// ============================================================================
// Interpreter trait
// ============================================================================

/// The natural-language collaborator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Interpreter: Send + Sync {
    /// Propose a schema for a fresh prompt
    async fn interpret(
        &self,
        prompt: &str,
        params: &InterpretationParams,
    ) -> Result<SchemaDraft, InterpretationError>;

    /// Propose a replacement for `current` given free-text feedback
    async fn refine(
        &self,
        current: &SchemaDefinition,
        feedback: &str,
    ) -> Result<SchemaDraft, InterpretationError>;
}

// ============================================================================
// StaticInterpreter
// ============================================================================

/// Offline interpreter that proposes a fixed draft.
///
/// The entity name and operations from [`InterpretationParams`] override
/// the template's; refinement hands back the current schema unchanged.
#[derive(Debug, Clone)]
pub struct StaticInterpreter {
    template: SchemaDraft,
}

impl StaticInterpreter {
    pub fn new(template: SchemaDraft) -> Self {
        Self { template }
    }

    /// The bookstore inventory example
    pub fn book() -> Self {
        Self::new(
            SchemaDraft::new("Book")
                .with_field(FieldDraft::new("id", FieldType::Number).required().with_label("ID"))
                .with_field(FieldDraft::new("title", FieldType::String).required())
                .with_field(FieldDraft::new("author", FieldType::String).required())
                .with_field(FieldDraft::new("publication_year", FieldType::Number))
                .with_field(FieldDraft::new("stock", FieldType::Number).with_default("0")),
        )
    }
}

#[async_trait]
impl Interpreter for StaticInterpreter {
    async fn interpret(
        &self,
        _prompt: &str,
        params: &InterpretationParams,
    ) -> Result<SchemaDraft, InterpretationError> {
        let mut draft = self.template.clone();
        if let Some(name) = &params.entity_name {
            draft.entity_name = name.clone();
        }
        draft.operations = Operations::from_set(&params.operations);
        Ok(draft)
    }

    async fn refine(
        &self,
        current: &SchemaDefinition,
        _feedback: &str,
    ) -> Result<SchemaDraft, InterpretationError> {
        Ok(current.to_draft())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_default_enables_everything() {
        let params = InterpretationParams::default();
        assert!(params.entity_name.is_none());
        assert_eq!(params.operations.len(), 4);
    }

    #[test]
    fn test_params_blank_entity_name() {
        let params = InterpretationParams::new().with_entity_name("   ");
        assert!(params.entity_name.is_none());

        let params = InterpretationParams::new().with_entity_name(" Author ");
        assert_eq!(params.entity_name.as_deref(), Some("Author"));
    }

    #[test]
    fn test_check_draft() {
        let draft = SchemaDraft::new("Book").with_field(FieldDraft::new("title", FieldType::String));
        assert_eq!(check_draft(draft.clone()), Ok(draft));

        assert!(matches!(
            check_draft(SchemaDraft::new("  ")),
            Err(InterpretationError::MalformedDraft(_))
        ));

        let unnamed = SchemaDraft::new("Book")
            .with_field(FieldDraft::new("title", FieldType::String))
            .with_field(FieldDraft::new("", FieldType::String));
        assert_eq!(
            check_draft(unnamed),
            Err(InterpretationError::MalformedDraft(
                "field 2 has no name".to_string()
            ))
        );
    }

    #[test]
    fn test_error_conversion() {
        let err: EngineError = InterpretationError::Unavailable("timeout".into()).into();
        assert!(err.is_workflow());
        assert_eq!(
            err.to_string(),
            "Interpretation failed: interpretation service unavailable: timeout"
        );
    }

    #[tokio::test]
    async fn test_static_interpreter_applies_params() {
        let interpreter = StaticInterpreter::book();
        let params = InterpretationParams::new()
            .with_entity_name("Novel")
            .with_operations([Operation::Read]);

        let draft = interpreter.interpret("novels", &params).await.unwrap();
        assert_eq!(draft.entity_name, "Novel");
        assert_eq!(draft.fields.len(), 5);
        assert!(draft.operations.read);
        assert!(!draft.operations.create);
    }

    #[tokio::test]
    async fn test_static_refine_keeps_schema() {
        let interpreter = StaticInterpreter::book();
        let draft = interpreter
            .interpret("books", &InterpretationParams::default())
            .await
            .unwrap();
        let schema = SchemaDefinition::create(draft).set_paginated(true);

        let refined = interpreter.refine(&schema, "add an isbn").await.unwrap();
        assert_eq!(refined, schema.to_draft());
    }
}
