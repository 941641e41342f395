//! Schema definitions
//!
//! A `SchemaDefinition` describes one entity: its name, its ordered fields
//! and the CRUD operations to generate. Every mutation method takes `&self`
//! and returns a fresh snapshot, so validation and compilation always see
//! a consistent value.

use crate::field::{FieldDefinition, FieldDraft, FieldPatch};
use schemaforge_core::{EngineError, EngineResult, FieldId, Identifiable, Named, Operation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// Operations
// ============================================================================

/// The four independent CRUD flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Operations {
    pub create: bool,
    pub read: bool,
    pub update: bool,
    pub delete: bool,
}

impl Operations {
    /// All four operations enabled
    pub fn all() -> Self {
        Self {
            create: true,
            read: true,
            update: true,
            delete: true,
        }
    }

    /// No operation enabled
    pub fn none() -> Self {
        Self {
            create: false,
            read: false,
            update: false,
            delete: false,
        }
    }

    /// Enable exactly the operations in `set`
    pub fn from_set(set: &BTreeSet<Operation>) -> Self {
        let mut ops = Self::none();
        for op in set {
            ops = ops.with(*op, true);
        }
        ops
    }

    /// Check whether an operation is enabled
    pub fn is_enabled(&self, op: Operation) -> bool {
        match op {
            Operation::Create => self.create,
            Operation::Read => self.read,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }

    /// Return a copy with one operation set
    pub fn with(mut self, op: Operation, enabled: bool) -> Self {
        match op {
            Operation::Create => self.create = enabled,
            Operation::Read => self.read = enabled,
            Operation::Update => self.update = enabled,
            Operation::Delete => self.delete = enabled,
        }
        self
    }

    /// Return a copy with one operation flipped
    pub fn toggled(self, op: Operation) -> Self {
        let enabled = self.is_enabled(op);
        self.with(op, !enabled)
    }

    /// Enabled operations in canonical order
    pub fn enabled(&self) -> Vec<Operation> {
        Operation::all()
            .iter()
            .copied()
            .filter(|op| self.is_enabled(*op))
            .collect()
    }

    /// Check whether any operation is enabled
    pub fn any(&self) -> bool {
        self.create || self.read || self.update || self.delete
    }
}

impl Default for Operations {
    fn default() -> Self {
        Self::all()
    }
}

// ============================================================================
// SchemaDefinition
// ============================================================================

/// The entity/field/operations value reviewed by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDefinition {
    /// Entity name (e.g. "Book")
    pub entity_name: String,

    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,

    /// Enabled CRUD operations
    #[serde(default)]
    pub operations: Operations,

    /// Pagination hint for the list endpoint and listing view
    #[serde(default)]
    pub paginated: bool,
}

impl SchemaDefinition {
    /// Create an empty schema with all operations enabled
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            fields: Vec::new(),
            operations: Operations::all(),
            paginated: false,
        }
    }

    /// Materialise an interpretation result, giving every field a fresh id
    pub fn create(draft: SchemaDraft) -> Self {
        Self {
            entity_name: draft.entity_name,
            fields: draft.fields.into_iter().map(FieldDraft::into_field).collect(),
            operations: draft.operations,
            paginated: draft.paginated,
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Append a field
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the operations
    pub fn with_operations(mut self, operations: Operations) -> Self {
        self.operations = operations;
        self
    }

    /// Enable the pagination hint
    pub fn paginated(mut self) -> Self {
        self.paginated = true;
        self
    }

    // ========================================================================
    // Mutation API (returns new snapshots)
    // ========================================================================

    /// Rename the entity. Not validated here.
    pub fn set_entity_name(&self, name: impl Into<String>) -> Self {
        Self {
            entity_name: name.into(),
            ..self.clone()
        }
    }

    /// Merge `patch` into the field with the given id
    pub fn update_field(&self, id: FieldId, patch: &FieldPatch) -> EngineResult<Self> {
        let index = self.index_of(id)?;
        let mut next = self.clone();
        next.fields[index] = self.fields[index].merged(patch);
        Ok(next)
    }

    /// Append a `new_field` placeholder
    pub fn add_field(&self) -> Self {
        self.clone().with_field(FieldDefinition::placeholder())
    }

    /// Remove the field with the given id
    pub fn remove_field(&self, id: FieldId) -> EngineResult<Self> {
        let index = self.index_of(id)?;
        let mut next = self.clone();
        next.fields.remove(index);
        Ok(next)
    }

    /// Flip exactly one operation flag
    pub fn toggle_operation(&self, op: Operation) -> Self {
        Self {
            operations: self.operations.toggled(op),
            ..self.clone()
        }
    }

    /// Set the pagination hint
    pub fn set_paginated(&self, paginated: bool) -> Self {
        Self {
            paginated,
            ..self.clone()
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Find a field by id
    pub fn field(&self, id: FieldId) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.matches_id(id))
    }

    /// Find the first field with the given name (case-insensitive)
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name_matches(name))
    }

    /// The user-declared identity field, if any
    pub fn identity_field(&self) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.is_identity())
    }

    /// Declared fields other than the identity field, in order
    pub fn data_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| !f.is_identity())
    }

    /// Number of fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Enabled operations in canonical order
    pub fn enabled_operations(&self) -> Vec<Operation> {
        self.operations.enabled()
    }

    /// Convert back to an id-less draft (e.g. for a refinement request)
    pub fn to_draft(&self) -> SchemaDraft {
        SchemaDraft {
            entity_name: self.entity_name.clone(),
            fields: self.fields.iter().map(FieldDraft::from).collect(),
            operations: self.operations,
            paginated: self.paginated,
        }
    }

    fn index_of(&self, id: FieldId) -> EngineResult<usize> {
        self.fields
            .iter()
            .position(|f| f.matches_id(id))
            .ok_or_else(|| EngineError::FieldNotFound(id.to_string()))
    }
}

// ============================================================================
// SchemaDraft
// ============================================================================

/// A schema as produced by the interpretation collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDraft {
    pub entity_name: String,

    #[serde(default)]
    pub fields: Vec<FieldDraft>,

    #[serde(default)]
    pub operations: Operations,

    #[serde(default)]
    pub paginated: bool,
}

impl SchemaDraft {
    /// Create a draft with all operations enabled
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            fields: Vec::new(),
            operations: Operations::all(),
            paginated: false,
        }
    }

    /// Append a field draft
    pub fn with_field(mut self, field: FieldDraft) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the operations
    pub fn with_operations(mut self, operations: Operations) -> Self {
        self.operations = operations;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
