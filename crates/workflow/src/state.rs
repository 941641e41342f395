//! Workflow states and request bookkeeping

use serde::Serialize;
use std::fmt;

// ============================================================================
// WorkflowState
// ============================================================================

/// Where a `Generating` step was started from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Prompt,
    Mockup,
}

/// Current step of the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum WorkflowState {
    /// Waiting for a prompt
    #[default]
    Prompt,
    /// Interpretation or refinement in flight
    Generating { origin: Origin },
    /// Reviewing and editing the schema
    Mockup,
    /// Validate + compile in flight
    Confirming,
    /// Showing the validation result
    Report,
}

impl WorkflowState {
    pub fn display_name(&self) -> &'static str {
        match self {
            WorkflowState::Prompt => "prompt",
            WorkflowState::Generating { .. } => "generating",
            WorkflowState::Mockup => "mockup",
            WorkflowState::Confirming => "confirming",
            WorkflowState::Report => "report",
        }
    }

    /// A request is outstanding in this state
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            WorkflowState::Generating { .. } | WorkflowState::Confirming
        )
    }

    /// Local schema edits are allowed
    pub fn accepts_edits(&self) -> bool {
        matches!(self, WorkflowState::Mockup)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Identifies one dispatched request. Tokens increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of outstanding request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Interpretation,
    Refinement,
    Confirmation,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Interpretation => "interpretation",
            RequestKind::Refinement => "refinement",
            RequestKind::Confirmation => "confirmation",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dispatched request: the token to complete it with and the work to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest<P> {
    pub token: RequestToken,
    pub payload: P,
}

/// What happened to a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The outcome was applied to the controller
    Applied,
    /// The token was stale; nothing changed
    Discarded,
}

impl Completion {
    pub fn is_applied(&self) -> bool {
        matches!(self, Completion::Applied)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        assert_eq!(WorkflowState::default(), WorkflowState::Prompt);
    }

    #[test]
    fn test_busy_states() {
        assert!(WorkflowState::Confirming.is_busy());
        assert!(WorkflowState::Generating { origin: Origin::Mockup }.is_busy());
        assert!(!WorkflowState::Report.is_busy());
        assert!(WorkflowState::Mockup.accepts_edits());
        assert!(!WorkflowState::Prompt.accepts_edits());
    }

    #[test]
    fn test_token_ordering() {
        assert!(RequestToken::new(2) > RequestToken::new(1));
        assert_eq!(RequestToken::new(7).to_string(), "#7");
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&WorkflowState::Generating {
            origin: Origin::Prompt,
        })
        .unwrap();
        assert_eq!(json, r#"{"state":"generating","origin":"prompt"}"#);
    }
}
