//! # SchemaForge Workflow
//!
//! The Prompt → Mockup → Report workflow.
//!
//! - [`WorkflowController`] is a synchronous state machine. Slow work
//!   (interpretation, refinement, validate + compile) is split into a
//!   `begin_*` step that hands out a [`RequestToken`] and a `complete_*`
//!   step that applies the outcome only if the token is still current.
//! - [`Interpreter`] is the seam to the natural-language collaborator.
//! - [`Session`] drives a controller asynchronously with an interpreter
//!   and the artifact pipeline.
//!
//! ## Example
//!
//! ```rust,ignore
//! use schemaforge_workflow::{InterpretationParams, Session, StaticInterpreter};
//!
//! let session = Session::new(StaticInterpreter::book());
//! session.submit("a small bookstore inventory", InterpretationParams::default()).await?;
//! session.confirm().await?;
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod controller;
pub mod interpreter;
pub mod session;
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use controller::{InterpretRequest, RefineRequest, WorkflowController};
pub use interpreter::{InterpretationError, InterpretationParams, Interpreter, StaticInterpreter};
pub use session::Session;
pub use state::{Completion, Origin, PendingRequest, RequestKind, RequestToken, WorkflowState};
