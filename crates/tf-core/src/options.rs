//! Scheduler configuration.
//!
//! Everything not covered here is derived from the input records.  The
//! defaults reproduce the reference behavior: deadlocks abort the run and
//! departures are metered at one car per tick.
//!
//! Tie-breaks are fixed, not configurable: routing settles equal-cost
//! candidates toward the lower intersection id, and each admission batch is
//! placed in `(starting road id, car id)` order.  Both live with the code
//! they order (the router and the admission controller).

/// Top-level simulation configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimOptions {
    /// Abort the run with an error when the intersection scheduler stalls.
    /// When `false`, the run ends with a deadlocked outcome instead.
    pub deadlock_fatal: bool,

    /// How many cars the departure-time assignment schedules per start tick.
    pub admission_rate_per_tick: u32,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            deadlock_fatal: true,
            admission_rate_per_tick: 1,
        }
    }
}
