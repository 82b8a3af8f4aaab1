//! Simulation error type.

use thiserror::Error;

use tf_core::Tick;

/// Errors produced by `tf-sim`.
#[derive(Debug, Error)]
pub enum SimError {
    /// A full scheduler pass over every intersection reduced no car's state.
    #[error("gridlock at {tick}: a full pass left waiting cars unresolved")]
    GlobalDeadlock { tick: Tick },

    /// The per-(cross, road) loop stalled with waiters remaining.
    #[error("gridlock at {tick}: cross {cross}, road {road} stalled with waiting cars")]
    LocalDeadlock { tick: Tick, cross: i64, road: i64 },

    /// A plan failed validation against the network.
    #[error("car {car}: invalid plan: {reason}")]
    InvalidPlan { car: i64, reason: &'static str },
}

pub type SimResult<T> = Result<T, SimError>;
