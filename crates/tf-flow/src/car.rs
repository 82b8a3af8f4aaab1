//! One vehicle on a lane.

use tf_core::CarId;

/// A car currently on the network.
///
/// Cars exist only inside a lane's queue; which lane (and therefore which
/// road and direction) a car is on is a property of where it is stored, not
/// a field — the ownership is the location.  A car is created when the
/// admission controller places it and dropped when it retires past its final
/// intersection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Car {
    pub id: CarId,

    /// Vehicle maximum speed, independent of the road.
    pub cap: u32,

    /// Effective speed on the current road: `min(cap, speed_limit)`.
    /// Recomputed every time the car enters a road.
    pub speed: u32,

    /// Cells remaining to the downstream intersection; 0 is the stop line.
    pub pos: u32,

    /// Plan cursor: index of the current road within the car's plan.
    pub step: u32,
}
