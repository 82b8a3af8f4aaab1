//! `tf-flow` — the mutable half of the simulation: lanes, cars, admission,
//! and the per-tick car-following dynamics.
//!
//! | Module        | Contents                                            |
//! |---------------|-----------------------------------------------------|
//! | [`car`]       | `Car` — one vehicle on a lane                       |
//! | [`world`]     | `World` — all lanes plus conservation counters      |
//! | [`waiting`]   | `WaitLedger` — per-tick Settled/Waiting disposition |
//! | [`admission`] | departure batch placement (deferral on full lanes)  |
//! | [`dynamics`]  | phase A full advance and phase B re-drive           |
//!
//! Car state is intentionally flag-free: whether a car is Waiting this tick
//! lives only in the [`WaitLedger`], rebuilt by phase A and emptied by the
//! intersection scheduler before the tick ends.

pub mod admission;
pub mod car;
pub mod dynamics;
pub mod waiting;
pub mod world;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use admission::{admit_tick, AdmitStats};
pub use car::Car;
pub use dynamics::{advance_full, redrive_after_cross, DriveStats};
pub use waiting::WaitLedger;
pub use world::{Lane, World};
