//! Network-subsystem error type.

use thiserror::Error;

use tf_core::CrossId;

/// Errors produced by `tf-net`.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("duplicate cross id {0}")]
    DuplicateCross(i64),

    #[error("duplicate road id {0}")]
    DuplicateRoad(i64),

    #[error("road {road} references unknown cross {cross}")]
    UnknownCross { road: i64, cross: i64 },

    #[error("cross {cross} references unknown road {road}")]
    UnknownRoad { cross: i64, road: i64 },

    #[error("road {id}: {reason}")]
    BadRecord { id: i64, reason: &'static str },

    #[error("cross {0} not found")]
    CrossNotFound(i64),

    #[error("road {0} not found")]
    RoadNotFound(i64),

    #[error("no route from {from} to {to}")]
    NoRoute { from: CrossId, to: CrossId },
}

pub type NetResult<T> = Result<T, NetError>;
