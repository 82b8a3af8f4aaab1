//! Planning-subsystem error type.

use thiserror::Error;

use tf_net::NetError;

/// Errors produced by `tf-plan`.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("duplicate car id {0}")]
    DuplicateCar(i64),

    #[error("answer references unknown car {0}")]
    UnknownCar(i64),

    #[error("car {car}: no route from cross {from} to cross {to}")]
    Unreachable { car: i64, from: i64, to: i64 },

    #[error("car {car}: origin equals destination, route is empty")]
    EmptyRoute { car: i64 },

    #[error("car {car}: {reason}")]
    BrokenRoute { car: i64, reason: &'static str },

    #[error("car {car}: start tick must be at least 1")]
    BadStartTick { car: i64 },

    #[error(transparent)]
    Net(#[from] NetError),
}

pub type PlanResult<T> = Result<T, PlanError>;
