//! Per-tick car-following dynamics.
//!
//! Two entry points:
//!
//! - [`advance_full`] (phase A): once per tick, over every lane.  Retires
//!   cars reaching their destination, advances whatever can move inside its
//!   road, and marks everything else Waiting in the ledger.
//! - [`redrive_after_cross`] (phase B): re-drives a single lane after the
//!   intersection scheduler changed its head, releasing the cars the old
//!   head was holding back.
//!
//! Within one lane the Waiting cars always form a contiguous prefix: a
//! follower only waits when its predecessor waits *and* sits within reach.
//! Phase B exploits this — once the head is settled, the remaining Waiting
//! cars settle in order with no further gap checks.

use tf_core::{CarId, RoadId, Tick};
use tf_net::Direction;
use tf_plan::PlanSet;

use crate::waiting::WaitLedger;
use crate::world::{Lane, World};

/// Counts from one phase-A sweep.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DriveStats {
    pub settled: u32,
    pub waiting: u32,
    pub retired: u32,
}

// ── Phase A ───────────────────────────────────────────────────────────────────

/// Advance every lane of every road-direction one tick.
///
/// The ledger must be empty on entry; it leaves holding exactly the cars
/// that need an intersection crossing resolved this tick.
pub fn advance_full(
    world: &mut World,
    plans: &PlanSet,
    ledger: &mut WaitLedger,
    now: Tick,
) -> DriveStats {
    debug_assert!(ledger.is_empty(), "waiting ledger not drained last tick");
    let mut stats = DriveStats::default();

    let World { lanes, retired, cars_on_road, .. } = world;
    for (r, sides) in lanes.iter_mut().enumerate() {
        let road = RoadId(r as u32);
        for dir in Direction::BOTH {
            for lane in &mut sides[dir.index()] {
                drive_lane(lane, road, dir, plans, ledger, retired, cars_on_road, now, &mut stats);
            }
        }
    }
    stats
}

#[allow(clippy::too_many_arguments)]
fn drive_lane(
    lane: &mut Lane,
    road: RoadId,
    dir: Direction,
    plans: &PlanSet,
    ledger: &mut WaitLedger,
    retired: &mut Vec<(CarId, Tick)>,
    cars_on_road: &mut usize,
    now: Tick,
    stats: &mut DriveStats,
) {
    // Terminal drain: heads on their final road that can reach the
    // destination cross this tick leave the network.
    while let Some(head) = lane.front() {
        if plans.get(head.id).is_last(head.step) && head.pos < head.speed {
            if let Some(car) = lane.pop_front() {
                retired.push((car.id, now));
                *cars_on_road -= 1;
                stats.retired += 1;
            }
        } else {
            break;
        }
    }

    let Some(head) = lane.front_mut() else { return };
    if head.pos >= head.speed {
        head.pos -= head.speed;
        stats.settled += 1;
    } else {
        // Needs to cross an intersection this tick.
        ledger.mark(head.id, road, dir);
        stats.waiting += 1;
    }

    for i in 1..lane.len() {
        let prev_pos = lane[i - 1].pos;
        let prev_waiting = ledger.is_waiting(lane[i - 1].id);
        let car = &mut lane[i];
        if !prev_waiting || car.pos - prev_pos > car.speed {
            car.pos = car.pos.saturating_sub(car.speed).max(prev_pos + 1);
            stats.settled += 1;
        } else {
            ledger.mark(car.id, road, dir);
            stats.waiting += 1;
        }
    }
}

// ── Phase B ───────────────────────────────────────────────────────────────────

/// Re-drive one lane after the scheduler moved (or parked) its head car.
///
/// Retires straggler terminators, settles a newly unblocked head, and then
/// releases the Waiting prefix behind any settled head.  Every car this
/// touches leaves the ledger.
pub fn redrive_after_cross(
    world: &mut World,
    plans: &PlanSet,
    ledger: &mut WaitLedger,
    road: RoadId,
    dir: Direction,
    k: usize,
    now: Tick,
) {
    let World { lanes, retired, cars_on_road, .. } = world;
    let lane = &mut lanes[road.index()][dir.index()][k];

    // Straggler terminators: Waiting heads on their final road.
    while let Some(head) = lane.front() {
        if ledger.is_waiting(head.id)
            && plans.get(head.id).is_last(head.step)
            && head.pos < head.speed
        {
            if let Some(car) = lane.pop_front() {
                ledger.settle(car.id, road, dir);
                retired.push((car.id, now));
                *cars_on_road -= 1;
            }
        } else {
            break;
        }
    }

    let Some(head) = lane.front_mut() else { return };
    if ledger.is_waiting(head.id) {
        if head.pos >= head.speed {
            head.pos -= head.speed;
            ledger.settle(head.id, road, dir);
        } else {
            // Still blocked at the intersection; nothing to release.
            return;
        }
    }

    // Head is settled (just now, or parked at the stop line by the
    // scheduler).  Release the Waiting prefix behind it.
    for i in 1..lane.len() {
        let prev_pos = lane[i - 1].pos;
        let car = &mut lane[i];
        if ledger.settle(car.id, road, dir) {
            car.pos = car.pos.saturating_sub(car.speed).max(prev_pos + 1);
        }
    }
}
