//! Order state machine
//!
//! Pure functions over [`OrderState`]; persistence of a successful
//! transition is the caller's responsibility. There is no branching
//! workflow and no rollback.

use super::OrderState;

/// The fixed, total workflow sequence.
pub const STATE_SEQUENCE: [OrderState; 3] = [
    OrderState::Created,
    OrderState::Analysis,
    OrderState::Completed,
];

/// Transition failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("order is already in final state")]
    FinalState,
}

/// Whether the order can still move forward.
pub fn can_advance(state: OrderState) -> bool {
    state != OrderState::Completed
}

/// The successor of `state` in the workflow sequence.
pub fn next_state(state: OrderState) -> Result<OrderState, TransitionError> {
    match state {
        OrderState::Created => Ok(OrderState::Analysis),
        OrderState::Analysis => Ok(OrderState::Completed),
        OrderState::Completed => Err(TransitionError::FinalState),
    }
}
