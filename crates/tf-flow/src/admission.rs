//! Admission control: placing each tick's departure batch onto lanes.

use tf_core::Tick;
use tf_net::{outbound_dir, Network};
use tf_plan::{DepartQueue, PlanSet};

use crate::world::{Lane, World};
use crate::Car;

/// Counts from one admission pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AdmitStats {
    pub admitted: u32,
    pub deferred: u32,
}

/// Admit every car scheduled to depart at `now`.
///
/// The batch is placed in `(starting road id, car id)` order.  A car whose
/// starting road has no lane space is deferred: its plan's start tick moves
/// to `now + 1` and it re-enters the departure queue.
pub fn admit_tick(
    world: &mut World,
    net: &Network,
    plans: &mut PlanSet,
    queue: &mut DepartQueue,
    now: Tick,
) -> AdmitStats {
    let mut stats = AdmitStats::default();
    let Some(mut batch) = queue.drain_tick(now) else {
        return stats;
    };
    batch.sort_unstable_by_key(|&c| (plans.get(c).roads[0], c));

    for car_id in batch {
        let plan = plans.get(car_id);
        let road_id = plan.roads[0];
        let road = net.road(road_id);
        let Some(slot) = net.slot_of(plan.from, road_id) else {
            debug_assert!(false, "start road absent from the origin's slot table");
            continue;
        };
        let dir = outbound_dir(slot);
        let speed = road.effective_speed(plan.cap);

        match find_entry(world.side(road_id, dir), road.length, speed) {
            Some((k, pos)) => {
                world.admit_car(road_id, dir, k, Car { id: car_id, cap: plan.cap, speed, pos, step: 0 });
                stats.admitted += 1;
            }
            None => {
                plans.get_mut(car_id).start = now + 1;
                queue.push(now + 1, car_id);
                stats.deferred += 1;
            }
        }
    }
    stats
}

/// First lane that accepts a new car, with the entry position.
///
/// Per lane, in index order:
/// 1. empty → enter at `length - speed` (a full first move);
/// 2. the tail is more than `speed` cells past the entry → same;
/// 3. the tail is off the entry cell → slot in right behind it;
/// 4. tail on the entry cell → lane is closed, try the next one.
fn find_entry(lanes: &[Lane], length: u32, speed: u32) -> Option<(usize, u32)> {
    for (k, lane) in lanes.iter().enumerate() {
        match lane.back() {
            None => return Some((k, length.saturating_sub(speed))),
            Some(tail) => {
                if length - tail.pos > speed {
                    return Some((k, length - speed));
                }
                if tail.pos != length - 1 {
                    return Some((k, tail.pos + 1));
                }
            }
        }
    }
    None
}
