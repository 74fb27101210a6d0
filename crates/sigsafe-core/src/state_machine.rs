use serde::{Deserialize, Serialize};

use crate::ports::PortError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Created,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionAction {
    Begin,
    Confirmed,
    Errored,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: SubmissionState,
    pub to: SubmissionState,
    pub reason: &'static str,
}

pub fn submission_transition(
    state: SubmissionState,
    action: SubmissionAction,
) -> Result<(SubmissionState, StateTransition), PortError> {
    use SubmissionAction as A;
    use SubmissionState as S;

    let (to, reason) = match (state, action) {
        (S::Idle | S::Created | S::Failed, A::Begin) => (S::Submitting, "submission started"),
        (S::Submitting, A::Confirmed) => (S::Created, "wallet returned transaction hash"),
        (S::Submitting, A::Errored) => (S::Failed, "submission failed"),
        (S::Created | S::Failed, A::Reset) => (S::Idle, "form reset"),
        (S::Idle, A::Reset) => (S::Idle, "already idle"),
        _ => {
            return Err(PortError::Validation(format!(
                "illegal submission transition: {state:?} --{action:?}-->"
            )))
        }
    };

    Ok((
        to,
        StateTransition {
            from: state,
            to,
            reason,
        },
    ))
}
