use crate::error::ToolError;
use crate::normalize::ToolResult;

/// Lifecycle phase of one tool controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed)
    }
}

/// Per-controller state.
///
/// `Succeeded` always carries a result and `Failed` always carries an error;
/// `Idle` and `Validating` carry neither. Only the transition methods below
/// mutate it, which keeps those pairings intact.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolState {
    phase: Phase,
    last_result: Option<ToolResult>,
    last_error: Option<String>,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            last_result: None,
            last_error: None,
        }
    }
}

impl ToolState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_result(&self) -> Option<&ToolResult> {
        self.last_result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Enter `Validating` from `Idle` or a terminal phase, dropping the previous outcome.
    pub fn begin_validation(&mut self) -> Result<(), ToolError> {
        match self.phase {
            Phase::Submitting => Err(ToolError::Busy),
            Phase::Validating => Err(ToolError::InvalidTransition {
                from: self.phase,
                action: "validate",
            }),
            Phase::Idle | Phase::Succeeded | Phase::Failed => {
                *self = Self {
                    phase: Phase::Validating,
                    ..Self::default()
                };
                Ok(())
            }
        }
    }

    /// Local checks failed: back to `Idle` with nothing recorded.
    pub fn reject_validation(&mut self) -> Result<(), ToolError> {
        self.expect_phase(Phase::Validating, "reject")?;
        *self = Self::default();
        Ok(())
    }

    pub fn begin_submission(&mut self) -> Result<(), ToolError> {
        self.expect_phase(Phase::Validating, "submit")?;
        self.phase = Phase::Submitting;
        Ok(())
    }

    pub fn succeed(&mut self, result: ToolResult) -> Result<(), ToolError> {
        self.expect_phase(Phase::Submitting, "succeed")?;
        *self = Self {
            phase: Phase::Succeeded,
            last_result: Some(result),
            last_error: None,
        };
        Ok(())
    }

    /// Record a failure. `error_result` is an error-shaped result for tools
    /// that render one in place of data.
    pub fn fail(
        &mut self,
        message: String,
        error_result: Option<ToolResult>,
    ) -> Result<(), ToolError> {
        self.expect_phase(Phase::Submitting, "fail")?;
        *self = Self {
            phase: Phase::Failed,
            last_result: error_result,
            last_error: Some(message),
        };
        Ok(())
    }

    /// Reset to `Idle`. Only allowed from a terminal phase.
    pub fn clear(&mut self) -> Result<(), ToolError> {
        if !self.phase.is_terminal() {
            return Err(ToolError::InvalidTransition {
                from: self.phase,
                action: "clear",
            });
        }
        *self = Self::default();
        Ok(())
    }

    fn expect_phase(&self, expected: Phase, action: &'static str) -> Result<(), ToolError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(ToolError::InvalidTransition {
                from: self.phase,
                action,
            })
        }
    }
}
