//! `WaitLedger` — the per-tick Settled/Waiting disposition.
//!
//! Phase A marks every car that still needs to cross an intersection this
//! tick; the intersection scheduler settles them one by one.  Membership in
//! the ledger *is* the Waiting state — there is no flag on `Car` to go
//! stale.  Per-(road, direction) counters answer the scheduler's "how many
//! waiters approach cross X on road R" query in O(1), replacing the
//! original's linear scans.

use rustc_hash::FxHashSet;

use tf_core::{CarId, RoadId};
use tf_net::Direction;

/// Waiting-car membership plus per-road-direction counts.
#[derive(Debug)]
pub struct WaitLedger {
    set: FxHashSet<CarId>,
    /// Waiting cars per `(road, direction)`, indexed by dense road id.
    counts: Vec<[u32; 2]>,
}

impl WaitLedger {
    pub fn new(road_count: usize) -> Self {
        Self {
            set: FxHashSet::default(),
            counts: vec![[0; 2]; road_count],
        }
    }

    /// Mark `car` as Waiting on `(road, dir)`.
    pub fn mark(&mut self, car: CarId, road: RoadId, dir: Direction) {
        if self.set.insert(car) {
            self.counts[road.index()][dir.index()] += 1;
        }
    }

    /// Settle `car` (crossed, parked, released, or retired).  Returns whether
    /// it was waiting.
    pub fn settle(&mut self, car: CarId, road: RoadId, dir: Direction) -> bool {
        if self.set.remove(&car) {
            self.counts[road.index()][dir.index()] -= 1;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn is_waiting(&self, car: CarId) -> bool {
        self.set.contains(&car)
    }

    /// Waiting cars on `(road, dir)`.
    #[inline]
    pub fn count(&self, road: RoadId, dir: Direction) -> u32 {
        self.counts[road.index()][dir.index()]
    }

    /// Waiting cars across the whole network.
    #[inline]
    pub fn total(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}
