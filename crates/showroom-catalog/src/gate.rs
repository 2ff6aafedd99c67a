//! Ownership checks and the confirm-to-override workflow.
//!
//! Mutations are anchored to the record's stored owner identity. A caller
//! who is not the owner is not refused outright: the workflow pauses for an
//! explicit confirmation that names the real owner. In an internal tool the
//! owner's identity is information, not a secret.

use tracing::debug;

use showroom_core::{Error, RecordStore, Result};

/// Result of checking one caller against one record's stored owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Caller is the stored owner.
    Permitted,
    /// Caller is not the owner. Carries the owner identity so the
    /// confirmation prompt can name them.
    Denied { owner: String },
    /// No record under that identifier.
    NotFound,
}

/// Checks mutating calls against the stored owner identity.
pub struct OwnershipGate<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> OwnershipGate<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Decide whether `caller_email` may mutate record `id`.
    ///
    /// Permitted exactly when the caller equals the stored owner. A missing
    /// record is a decision, not an error; the workflow turns it into its
    /// not-found terminal.
    pub async fn authorize(&self, id: i64, caller_email: &str) -> Result<AccessDecision> {
        let record = match self.store.get(id, false).await? {
            Some(record) => record,
            None => return Ok(AccessDecision::NotFound),
        };
        let decision = if record.owner_email == caller_email {
            AccessDecision::Permitted
        } else {
            AccessDecision::Denied {
                owner: record.owner_email,
            }
        };
        debug!(record_id = id, decision = ?decision, "Ownership check");
        Ok(decision)
    }

    /// Run the ownership check for a workflow in one call: begin the check,
    /// feed the decision through, and return the next step. On a check
    /// failure the workflow resets rather than staying stuck mid-check.
    pub async fn check(
        &self,
        workflow: &mut MutationWorkflow,
        caller_email: &str,
    ) -> Result<WorkflowStep> {
        workflow.begin()?;
        match self.authorize(workflow.record_id(), caller_email).await {
            Ok(decision) => workflow.apply_decision(decision),
            Err(e) => {
                workflow.reset();
                Err(e)
            }
        }
    }
}

/// Which terminal action a workflow executes once cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAction {
    Update,
    Delete,
}

/// Where a mutation workflow currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    /// No mutation in flight.
    Idle,
    /// Ownership check running.
    Checking,
    /// Ownership decided against the caller; waiting for an explicit
    /// confirmation or a cancel.
    ConfirmPending { owner: String },
    /// Cleared to run the terminal action.
    Executing,
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Checking => write!(f, "checking"),
            Self::ConfirmPending { .. } => write!(f, "confirm_pending"),
            Self::Executing => write!(f, "executing"),
        }
    }
}

/// What the caller should do next with a workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowStep {
    /// Run the mutation, then call [`MutationWorkflow::complete`].
    Execute,
    /// Surface the owner and wait for [`MutationWorkflow::confirm`] or
    /// [`MutationWorkflow::cancel`].
    AwaitConfirmation { owner: String },
}

/// State machine for one ownership-gated mutation.
///
/// The same machine serves update and delete; the action only decides which
/// terminal operation the caller runs on [`WorkflowStep::Execute`]. Every
/// transition outside the machine's shape is an input error, so a UI wired
/// to it cannot, for example, confirm an override that was never requested.
#[derive(Debug)]
pub struct MutationWorkflow {
    action: MutationAction,
    record_id: i64,
    state: WorkflowState,
}

impl MutationWorkflow {
    pub fn new(action: MutationAction, record_id: i64) -> Self {
        Self {
            action,
            record_id,
            state: WorkflowState::Idle,
        }
    }

    pub fn action(&self) -> MutationAction {
        self.action
    }

    pub fn record_id(&self) -> i64 {
        self.record_id
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Start the ownership check. Idle is the only valid starting point.
    pub fn begin(&mut self) -> Result<()> {
        if !matches!(self.state, WorkflowState::Idle) {
            return Err(Error::InvalidInput(format!(
                "cannot begin a mutation from the {} state",
                self.state
            )));
        }
        self.state = WorkflowState::Checking;
        Ok(())
    }

    /// Feed the ownership decision through the machine.
    ///
    /// Permitted proceeds straight to executing; denied parks in
    /// confirm-pending with the owner on display; a missing record resets
    /// the machine and surfaces as the not-found error it is.
    pub fn apply_decision(&mut self, decision: AccessDecision) -> Result<WorkflowStep> {
        if !matches!(self.state, WorkflowState::Checking) {
            return Err(Error::InvalidInput(format!(
                "no ownership check in flight (state is {})",
                self.state
            )));
        }
        match decision {
            AccessDecision::Permitted => {
                self.state = WorkflowState::Executing;
                Ok(WorkflowStep::Execute)
            }
            AccessDecision::Denied { owner } => {
                self.state = WorkflowState::ConfirmPending {
                    owner: owner.clone(),
                };
                Ok(WorkflowStep::AwaitConfirmation { owner })
            }
            AccessDecision::NotFound => {
                self.state = WorkflowState::Idle;
                Err(Error::RecordNotFound(self.record_id))
            }
        }
    }

    /// Override the denial and proceed to executing.
    pub fn confirm(&mut self) -> Result<WorkflowStep> {
        if !matches!(self.state, WorkflowState::ConfirmPending { .. }) {
            return Err(Error::InvalidInput(format!(
                "nothing to confirm (state is {})",
                self.state
            )));
        }
        self.state = WorkflowState::Executing;
        Ok(WorkflowStep::Execute)
    }

    /// Abandon a pending override and return to idle.
    pub fn cancel(&mut self) -> Result<()> {
        if !matches!(self.state, WorkflowState::ConfirmPending { .. }) {
            return Err(Error::InvalidInput(format!(
                "nothing to cancel (state is {})",
                self.state
            )));
        }
        self.state = WorkflowState::Idle;
        Ok(())
    }

    /// Mark the terminal action as done and return to idle.
    pub fn complete(&mut self) -> Result<()> {
        if !matches!(self.state, WorkflowState::Executing) {
            return Err(Error::InvalidInput(format!(
                "no mutation executing (state is {})",
                self.state
            )));
        }
        self.state = WorkflowState::Idle;
        Ok(())
    }

    /// Drop any in-flight state. Used when the surrounding operation fails
    /// partway and the machine must not stay stuck.
    pub fn reset(&mut self) {
        self.state = WorkflowState::Idle;
    }
}
