//! Async session driver
//!
//! A [`Session`] owns one [`WorkflowController`] behind an async mutex
//! and runs the slow steps with the lock released: interpretation on the
//! [`Interpreter`], validation and compilation on the blocking pool.
//! While a step is in flight, other calls see the controller's `Busy`
//! rejection and `start_over` can still reset it.

use std::sync::Arc;

use schemaforge_codegen::{Pipeline, ValidationResult};
use schemaforge_core::{EngineError, EngineResult};
use schemaforge_ir::SchemaDefinition;
use tokio::sync::Mutex;

use crate::controller::WorkflowController;
use crate::interpreter::{InterpretationParams, Interpreter};
use crate::state::{Completion, WorkflowState};

/// Shared handle to a running workflow; clones drive the same controller
#[derive(Clone)]
pub struct Session {
    controller: Arc<Mutex<WorkflowController>>,
    interpreter: Arc<dyn Interpreter>,
    pipeline: Arc<Pipeline>,
}

impl Session {
    /// Create a session with the default pipeline
    pub fn new(interpreter: impl Interpreter + 'static) -> Self {
        Self::with_parts(Arc::new(interpreter), Pipeline::default())
    }

    pub fn with_parts(interpreter: Arc<dyn Interpreter>, pipeline: Pipeline) -> Self {
        Self {
            controller: Arc::new(Mutex::new(WorkflowController::new())),
            interpreter,
            pipeline: Arc::new(pipeline),
        }
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    pub async fn state(&self) -> WorkflowState {
        self.controller.lock().await.state()
    }

    pub async fn schema(&self) -> Option<SchemaDefinition> {
        self.controller.lock().await.schema().cloned()
    }

    pub async fn result(&self) -> Option<ValidationResult> {
        self.controller.lock().await.result().cloned()
    }

    /// Message of the last surfaced failure
    pub async fn last_error(&self) -> Option<String> {
        self.controller
            .lock()
            .await
            .last_error()
            .map(ToString::to_string)
    }

    // ========================================================================
    // Steps
    // ========================================================================

    /// Interpret a prompt. Interpretation failures are surfaced through
    /// [`last_error`](Self::last_error), not returned.
    pub async fn submit(
        &self,
        prompt: impl Into<String>,
        params: InterpretationParams,
    ) -> EngineResult<Completion> {
        let request = self.controller.lock().await.begin_submit(prompt, params)?;

        let outcome = self
            .interpreter
            .interpret(&request.payload.prompt, &request.payload.params)
            .await;

        Ok(self
            .controller
            .lock()
            .await
            .complete_interpretation(request.token, outcome))
    }

    /// Ask for a replacement schema based on feedback
    pub async fn regenerate(&self, feedback: impl Into<String>) -> EngineResult<Completion> {
        let request = self.controller.lock().await.begin_regenerate(feedback)?;

        let outcome = self
            .interpreter
            .refine(&request.payload.current, &request.payload.feedback)
            .await;

        Ok(self
            .controller
            .lock()
            .await
            .complete_interpretation(request.token, outcome))
    }

    /// Validate and compile the current schema
    pub async fn confirm(&self) -> EngineResult<Completion> {
        let request = self.controller.lock().await.begin_confirm()?;

        let pipeline = Arc::clone(&self.pipeline);
        let schema = request.payload;
        let outcome = match tokio::task::spawn_blocking(move || pipeline.run(&schema)).await {
            Ok(outcome) => outcome,
            Err(e) => Err(EngineError::internal(format!("compile task failed: {}", e))),
        };

        Ok(self
            .controller
            .lock()
            .await
            .complete_confirm(request.token, outcome))
    }

    /// Run a synchronous step (an edit, usually) against the controller
    pub async fn with_controller<R>(
        &self,
        f: impl FnOnce(&mut WorkflowController) -> EngineResult<R>,
    ) -> EngineResult<R> {
        f(&mut *self.controller.lock().await)
    }

    /// Reopen a rejected schema in `Mockup`
    pub async fn revise(&self) -> EngineResult<SchemaDefinition> {
        self.controller.lock().await.revise().cloned()
    }

    pub async fn start_over(&self) {
        self.controller.lock().await.start_over();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{InterpretationError, MockInterpreter, StaticInterpreter};
    use async_trait::async_trait;
    use schemaforge_core::{FieldType, Operation};
    use schemaforge_ir::{FieldDraft, SchemaDraft};
    use tokio::sync::Notify;

    /// Interpreter that holds every call until the gate is opened
    struct GatedInterpreter {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl Interpreter for GatedInterpreter {
        async fn interpret(
            &self,
            _prompt: &str,
            _params: &InterpretationParams,
        ) -> Result<SchemaDraft, InterpretationError> {
            self.gate.notified().await;
            Ok(SchemaDraft::new("Late")
                .with_field(FieldDraft::new("title", FieldType::String)))
        }

        async fn refine(
            &self,
            current: &SchemaDefinition,
            _feedback: &str,
        ) -> Result<SchemaDraft, InterpretationError> {
            self.gate.notified().await;
            Ok(current.to_draft())
        }
    }

    async fn wait_until_busy(session: &Session) {
        while !session.state().await.is_busy() {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_full_flow_with_static_interpreter() {
        let session = Session::new(StaticInterpreter::book());

        let completion = session
            .submit("a bookstore inventory", InterpretationParams::default())
            .await
            .unwrap();
        assert!(completion.is_applied());
        assert_eq!(session.state().await, WorkflowState::Mockup);

        session
            .with_controller(|c| c.toggle_operation(Operation::Update).map(|_| ()))
            .await
            .unwrap();

        session.confirm().await.unwrap();
        assert_eq!(session.state().await, WorkflowState::Report);

        let result = session.result().await.unwrap();
        assert!(result.success);
        let bundle = result.generated_files.unwrap();
        assert!(bundle.sql.contains("CREATE TABLE IF NOT EXISTS books ("));
        assert!(!bundle.api.contains("update_book"));
    }

    #[tokio::test]
    async fn test_rejected_schema_can_be_fixed() {
        let session = Session::new(StaticInterpreter::new(
            SchemaDraft::new("Book")
                .with_field(FieldDraft::new("title", FieldType::String))
                .with_field(FieldDraft::new("Title", FieldType::Text)),
        ));
        session
            .submit("books", InterpretationParams::default())
            .await
            .unwrap();
        session.confirm().await.unwrap();
        assert!(!session.result().await.unwrap().success);

        let schema = session.revise().await.unwrap();
        let duplicate = schema.fields[1].id;
        session
            .with_controller(|c| c.remove_field(duplicate).map(|_| ()))
            .await
            .unwrap();

        session.confirm().await.unwrap();
        assert_eq!(session.state().await, WorkflowState::Report);
        assert!(session.result().await.unwrap().success);
    }

    #[tokio::test]
    async fn test_interpretation_failure_surfaces_error() {
        let mut interpreter = MockInterpreter::new();
        interpreter
            .expect_interpret()
            .withf(|prompt, _| prompt.contains("gibberish"))
            .times(1)
            .returning(|_, _| Err(InterpretationError::Unintelligible("no nouns".into())));

        let session = Session::new(interpreter);
        let completion = session
            .submit("gibberish", InterpretationParams::default())
            .await
            .unwrap();

        assert_eq!(completion, Completion::Applied);
        assert_eq!(session.state().await, WorkflowState::Prompt);
        assert!(session.schema().await.is_none());
        assert!(session.last_error().await.unwrap().contains("no nouns"));
    }

    #[tokio::test]
    async fn test_refine_failure_keeps_schema() {
        let mut interpreter = MockInterpreter::new();
        interpreter
            .expect_interpret()
            .returning(|_, _| Ok(SchemaDraft::new("Book").with_field(FieldDraft::new("title", FieldType::String))));
        interpreter
            .expect_refine()
            .times(1)
            .returning(|_, _| Err(InterpretationError::Unavailable("timeout".into())));

        let session = Session::new(interpreter);
        session
            .submit("books", InterpretationParams::default())
            .await
            .unwrap();
        let before = session.schema().await;

        session.regenerate("add isbn").await.unwrap();

        assert_eq!(session.state().await, WorkflowState::Mockup);
        assert_eq!(session.schema().await, before);
        assert!(session.last_error().await.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_regenerate_rejected() {
        let gate = Arc::new(Notify::new());
        let session = Session::new(GatedInterpreter { gate: gate.clone() });

        // Reach Mockup first
        let first = tokio::spawn({
            let session = session.clone();
            async move { session.submit("books", InterpretationParams::default()).await }
        });
        wait_until_busy(&session).await;
        gate.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(session.state().await, WorkflowState::Mockup);

        let refine = tokio::spawn({
            let session = session.clone();
            async move { session.regenerate("one").await }
        });
        wait_until_busy(&session).await;

        let err = session.regenerate("two").await.unwrap_err();
        assert!(matches!(err, EngineError::Busy { .. }));

        gate.notify_one();
        assert_eq!(refine.await.unwrap().unwrap(), Completion::Applied);
        assert_eq!(session.state().await, WorkflowState::Mockup);
    }

    #[tokio::test]
    async fn test_start_over_discards_late_interpretation() {
        let gate = Arc::new(Notify::new());
        let session = Session::new(GatedInterpreter { gate: gate.clone() });

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.submit("books", InterpretationParams::default()).await }
        });
        wait_until_busy(&session).await;

        session.start_over().await;
        gate.notify_one();

        assert_eq!(pending.await.unwrap().unwrap(), Completion::Discarded);
        assert_eq!(session.state().await, WorkflowState::Prompt);
        assert!(session.schema().await.is_none());
    }
}
