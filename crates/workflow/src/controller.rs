//! # Workflow Controller
//!
//! Synchronous state machine behind the Prompt → Mockup → Report flow.
//!
//! ```text
//!            begin_submit                     ok
//!   Prompt ───────────────► Generating(Prompt) ──► Mockup
//!     ▲                          │ err                │ ▲
//!     └──────────────────────────┘                    │ │ ok / err
//!                                  begin_regenerate   │ │
//!                         Generating(Mockup) ◄────────┤ │
//!                                  └──────────────────┼─┘
//!                                  begin_confirm      │
//!                         Confirming ◄────────────────┘
//!                                  │ result            (internal fault → Mockup)
//!                                  ▼
//!                                Report ──revise (rejected only)──► Mockup
//! ```
//!
//! `start_over` returns to `Prompt` from any state and invalidates the
//! outstanding token, so a late completion is discarded.

use schemaforge_codegen::ValidationResult;
use schemaforge_core::{EngineError, EngineResult, FieldId, Operation};
use schemaforge_ir::{FieldPatch, SchemaDefinition, SchemaDraft};

use crate::interpreter::{InterpretationError, InterpretationParams, check_draft};
use crate::state::{Completion, Origin, PendingRequest, RequestKind, RequestToken, WorkflowState};

/// Payload of an interpretation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretRequest {
    pub prompt: String,
    pub params: InterpretationParams,
}

/// Payload of a refinement request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefineRequest {
    pub current: SchemaDefinition,
    pub feedback: String,
}

// ============================================================================
// WorkflowController
// ============================================================================

/// Owns the current schema snapshot, the last validation result and the
/// single outstanding request.
#[derive(Debug, Default)]
pub struct WorkflowController {
    state: WorkflowState,
    schema: Option<SchemaDefinition>,
    result: Option<ValidationResult>,
    last_error: Option<EngineError>,
    outstanding: Option<(RequestToken, RequestKind)>,
    last_token: u64,
}

impl WorkflowController {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// The current schema snapshot
    pub fn schema(&self) -> Option<&SchemaDefinition> {
        self.schema.as_ref()
    }

    /// The result shown in `Report`
    pub fn result(&self) -> Option<&ValidationResult> {
        self.result.as_ref()
    }

    /// The most recent failure surfaced to the user
    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    pub fn outstanding(&self) -> Option<RequestToken> {
        self.outstanding.map(|(token, _)| token)
    }

    pub fn is_busy(&self) -> bool {
        self.outstanding.is_some()
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Start interpreting a prompt. Only valid in `Prompt`.
    pub fn begin_submit(
        &mut self,
        prompt: impl Into<String>,
        params: InterpretationParams,
    ) -> EngineResult<PendingRequest<InterpretRequest>> {
        self.ensure_idle()?;
        self.ensure_state(WorkflowState::Prompt, "submit a prompt")?;

        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(EngineError::validation("Prompt must not be empty"));
        }

        let token = self.dispatch(
            RequestKind::Interpretation,
            WorkflowState::Generating {
                origin: Origin::Prompt,
            },
        );

        Ok(PendingRequest {
            token,
            payload: InterpretRequest { prompt, params },
        })
    }

    /// Ask for a replacement schema based on feedback. Only valid in `Mockup`.
    pub fn begin_regenerate(
        &mut self,
        feedback: impl Into<String>,
    ) -> EngineResult<PendingRequest<RefineRequest>> {
        self.ensure_idle()?;
        self.ensure_state(WorkflowState::Mockup, "regenerate")?;
        let current = self.current_schema()?.clone();

        let token = self.dispatch(
            RequestKind::Refinement,
            WorkflowState::Generating {
                origin: Origin::Mockup,
            },
        );

        Ok(PendingRequest {
            token,
            payload: RefineRequest {
                current,
                feedback: feedback.into(),
            },
        })
    }

    /// Freeze the current schema for validation and compilation. Only
    /// valid in `Mockup`.
    pub fn begin_confirm(&mut self) -> EngineResult<PendingRequest<SchemaDefinition>> {
        self.ensure_idle()?;
        self.ensure_state(WorkflowState::Mockup, "confirm")?;
        let snapshot = self.current_schema()?.clone();

        let token = self.dispatch(RequestKind::Confirmation, WorkflowState::Confirming);

        Ok(PendingRequest {
            token,
            payload: snapshot,
        })
    }

    // ========================================================================
    // Completion
    // ========================================================================

    /// Apply the outcome of an interpretation or refinement request.
    pub fn complete_interpretation(
        &mut self,
        token: RequestToken,
        outcome: Result<SchemaDraft, InterpretationError>,
    ) -> Completion {
        let state = self.state;
        let origin = match state {
            WorkflowState::Generating { origin } if self.take_outstanding(token) => origin,
            _ => return self.discard(token, "interpretation"),
        };

        let outcome = match origin {
            Origin::Prompt => outcome.and_then(check_draft),
            Origin::Mockup => outcome,
        };

        match outcome {
            Ok(draft) => {
                let schema = SchemaDefinition::create(draft);
                tracing::info!(
                    token = %token,
                    entity = %schema.entity_name,
                    fields = schema.field_count(),
                    "schema proposed",
                );
                self.schema = Some(schema);
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!(token = %token, error = %e, "interpretation failed");
                if origin == Origin::Prompt {
                    self.schema = None;
                }
                self.last_error = Some(e.into());
            }
        }

        self.state = match (origin, self.schema.is_some()) {
            (Origin::Prompt, false) => WorkflowState::Prompt,
            _ => WorkflowState::Mockup,
        };
        Completion::Applied
    }

    /// Apply the outcome of a confirmation request.
    ///
    /// A rejected schema still lands in `Report`; only an internal fault
    /// returns to `Mockup`.
    pub fn complete_confirm(
        &mut self,
        token: RequestToken,
        outcome: EngineResult<ValidationResult>,
    ) -> Completion {
        if self.state != WorkflowState::Confirming || !self.take_outstanding(token) {
            return self.discard(token, "confirmation");
        }

        match outcome {
            Ok(result) => {
                tracing::info!(
                    token = %token,
                    success = result.success,
                    errors = result.errors.len(),
                    warnings = result.warnings.len(),
                    "validation finished",
                );
                self.result = Some(result);
                self.last_error = None;
                self.state = WorkflowState::Report;
            }
            Err(e) => {
                tracing::error!(token = %token, error = %e, "compilation fault");
                self.last_error = Some(e);
                self.state = WorkflowState::Mockup;
            }
        }
        Completion::Applied
    }

    // ========================================================================
    // Local edits (Mockup only)
    // ========================================================================

    pub fn set_entity_name(&mut self, name: impl Into<String>) -> EngineResult<&SchemaDefinition> {
        let name = name.into();
        self.edit("rename the entity", |schema| Ok(schema.set_entity_name(name)))
    }

    pub fn update_field(&mut self, id: FieldId, patch: &FieldPatch) -> EngineResult<&SchemaDefinition> {
        self.edit("update a field", |schema| schema.update_field(id, patch))
    }

    pub fn add_field(&mut self) -> EngineResult<&SchemaDefinition> {
        self.edit("add a field", |schema| Ok(schema.add_field()))
    }

    pub fn remove_field(&mut self, id: FieldId) -> EngineResult<&SchemaDefinition> {
        self.edit("remove a field", |schema| schema.remove_field(id))
    }

    pub fn toggle_operation(&mut self, op: Operation) -> EngineResult<&SchemaDefinition> {
        self.edit("toggle an operation", |schema| Ok(schema.toggle_operation(op)))
    }

    pub fn set_paginated(&mut self, paginated: bool) -> EngineResult<&SchemaDefinition> {
        self.edit("change pagination", |schema| Ok(schema.set_paginated(paginated)))
    }

    /// Take a rejected schema back to `Mockup` for correction.
    ///
    /// Only a `Report` whose result failed validation can be revised; a
    /// compiled report stays final until `start_over`.
    pub fn revise(&mut self) -> EngineResult<&SchemaDefinition> {
        self.ensure_idle()?;
        self.ensure_state(WorkflowState::Report, "revise the schema")?;

        match self.result.as_ref().map(|r| r.success) {
            Some(false) => {}
            Some(true) => {
                return Err(EngineError::invalid_transition(
                    "revise a compiled schema",
                    self.state.display_name(),
                ));
            }
            None => return Err(EngineError::internal("report state without a result")),
        }

        self.result = None;
        self.last_error = None;
        self.state = WorkflowState::Mockup;
        tracing::info!("rejected schema reopened for editing");
        self.current_schema()
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Discard everything and return to `Prompt`. Valid in every state.
    pub fn start_over(&mut self) {
        if let Some((token, kind)) = self.outstanding.take() {
            tracing::debug!(token = %token, kind = %kind, "abandoning outstanding request");
        }
        self.schema = None;
        self.result = None;
        self.last_error = None;
        self.state = WorkflowState::Prompt;
        tracing::info!("workflow reset");
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn ensure_idle(&self) -> EngineResult<()> {
        match self.outstanding {
            Some((token, kind)) => {
                tracing::warn!(pending = %token, kind = %kind, "request rejected while busy");
                Err(EngineError::busy(kind.as_str()))
            }
            None => Ok(()),
        }
    }

    fn ensure_state(&self, expected: WorkflowState, action: &str) -> EngineResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(EngineError::invalid_transition(action, self.state.display_name()))
        }
    }

    fn current_schema(&self) -> EngineResult<&SchemaDefinition> {
        self.schema
            .as_ref()
            .ok_or_else(|| EngineError::internal("mockup state without a schema"))
    }

    fn dispatch(&mut self, kind: RequestKind, next: WorkflowState) -> RequestToken {
        self.last_token += 1;
        let token = RequestToken::new(self.last_token);
        self.outstanding = Some((token, kind));
        self.last_error = None;
        self.state = next;
        tracing::debug!(token = %token, kind = %kind, state = %next, "request dispatched");
        token
    }

    /// Clear the outstanding request if it matches `token`
    fn take_outstanding(&mut self, token: RequestToken) -> bool {
        match self.outstanding {
            Some((current, _)) if current == token => {
                self.outstanding = None;
                true
            }
            _ => false,
        }
    }

    fn discard(&self, token: RequestToken, what: &str) -> Completion {
        tracing::debug!(
            token = %token,
            outstanding = ?self.outstanding(),
            state = %self.state,
            "discarding stale {} result",
            what,
        );
        Completion::Discarded
    }

    fn edit<F>(&mut self, action: &str, apply: F) -> EngineResult<&SchemaDefinition>
    where
        F: FnOnce(&SchemaDefinition) -> EngineResult<SchemaDefinition>,
    {
        self.ensure_state(WorkflowState::Mockup, action)?;
        let next = apply(self.current_schema()?)?;
        Ok(&*self.schema.insert(next))
    }
}

// ============================================================================
// Tests
// ============================================================================
