//! `tf-core` — foundational types for the `rust_tf` traffic scheduler.
//!
//! This crate is a dependency of every other `tf-*` crate.  It intentionally
//! has no `tf-*` dependencies and no required external ones (only optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`ids`]      | `CarId`, `RoadId`, `CrossId`                            |
//! | [`time`]     | `Tick`                                                  |
//! | [`options`]  | `SimOptions`                                            |
//! | [`records`]  | `CarRecord`, `RoadRecord`, `CrossRecord`, `AnswerRecord`|
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod ids;
pub mod options;
pub mod records;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{CarId, CrossId, RoadId};
pub use options::SimOptions;
pub use records::{AnswerRecord, CarRecord, CrossRecord, RoadRecord, NO_ROAD};
pub use time::Tick;
