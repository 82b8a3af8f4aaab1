//! The intersection scheduler: settle every Waiting car, one crossing at a
//! time, under the turn-priority discipline.
//!
//! # Shape
//!
//! - **Outer loop**: while Waiting cars exist anywhere, walk every cross in
//!   ascending id order, and per cross every incident road in ascending road
//!   id order.  A full pass that settles nothing is global gridlock.
//! - **Inner loop** per `(cross, road)`: repeatedly pick the single car
//!   allowed to cross next and move it, re-driving its old lane so the cars
//!   it blocked settle too.  The loop exits when the road has no eligible
//!   waiter or the outgoing road has no lane space.
//!
//! # Turn priority
//!
//! Straight always goes first.  A left turn yields to a straight-going car
//! on the road to the right; a right turn yields to a straight-going car on
//! the road to the left, and to an oncoming left turn (unless an oncoming
//! straight outranks it).

use tf_core::{CrossId, RoadId, SimOptions, Tick};
use tf_flow::{redrive_after_cross, Car, Lane, WaitLedger, World};
use tf_net::{inbound_dir, outbound_dir, turn_between, Direction, Network, Turn};
use tf_plan::PlanSet;

use crate::{SimError, SimResult};

/// How a scheduler invocation ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Quiescence {
    /// Every Waiting car settled.
    Clear,
    /// No progress was possible (only reported when `deadlock_fatal` is off).
    Deadlocked,
}

/// Counts from one scheduler invocation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ResolveStats {
    /// Cars moved onto their next road.
    pub crossed: u32,
    /// Cars that could not cross and settled at the stop line instead.
    pub parked: u32,
}

// ── Outer loop ────────────────────────────────────────────────────────────────

pub(crate) fn resolve_intersections(
    world: &mut World,
    net: &Network,
    plans: &PlanSet,
    ledger: &mut WaitLedger,
    now: Tick,
    opts: &SimOptions,
) -> SimResult<(Quiescence, ResolveStats)> {
    let mut stats = ResolveStats::default();

    while ledger.total() > 0 {
        let before = ledger.total();

        for x in 0..net.cross_count() {
            let cross = CrossId(x as u32);
            for &road in net.incident_roads_sorted(cross) {
                if resolve_road(world, net, plans, ledger, now, cross, road, opts, &mut stats)? {
                    return Ok((Quiescence::Deadlocked, stats));
                }
            }
        }

        if ledger.total() == before {
            if opts.deadlock_fatal {
                return Err(SimError::GlobalDeadlock { tick: now });
            }
            return Ok((Quiescence::Deadlocked, stats));
        }
    }

    Ok((Quiescence::Clear, stats))
}

// ── Inner loop ────────────────────────────────────────────────────────────────

/// Drain the waiters approaching `cross` on `road` as far as possible.
///
/// Returns `Ok(true)` for a local deadlock with `deadlock_fatal` off.
#[allow(clippy::too_many_arguments)]
fn resolve_road(
    world: &mut World,
    net: &Network,
    plans: &PlanSet,
    ledger: &mut WaitLedger,
    now: Tick,
    cross: CrossId,
    road: RoadId,
    opts: &SimOptions,
    stats: &mut ResolveStats,
) -> SimResult<bool> {
    let Some(slot) = net.slot_of(cross, road) else {
        return Ok(false);
    };
    let dir = inbound_dir(slot);
    // Only the side whose downstream cross is this one belongs to this walk.
    if net.road(road).downstream(dir) != cross {
        return Ok(false);
    }

    loop {
        let before = ledger.count(road, dir);
        if before == 0 {
            return Ok(false);
        }

        let allowed = allowed_turns(world, net, plans, ledger, cross, slot);
        let Some((lane_idx, turn)) = select_car(world, net, plans, ledger, cross, road, dir, &allowed)
        else {
            return Ok(false);
        };

        let out_slot = (slot + turn.offset()) % 4;
        let Some(out_road_id) = net.cross(cross).slots[out_slot] else {
            return Ok(false);
        };
        let out_dir = outbound_dir(out_slot);
        let out_road = net.road(out_road_id);

        // Outgoing capacity: every lane's tail on the entry cell closes the
        // road for this pass.
        let Some(out_lane) = entry_lane(world.side(out_road_id, out_dir), out_road.length) else {
            return Ok(false);
        };

        let Some(&head) = world.lane(road, dir, lane_idx).front() else {
            return Ok(false);
        };
        let v_out = out_road.effective_speed(head.cap);
        if v_out <= head.pos || v_out - head.pos >= out_road.length {
            // Cannot clear the stop line (or would overshoot the whole next
            // road): the car settles at the stop line instead of crossing.
            if let Some(h) = world.lane_mut(road, dir, lane_idx).front_mut() {
                h.pos = 0;
            }
            ledger.settle(head.id, road, dir);
            stats.parked += 1;
        } else {
            let residual = v_out - head.pos;
            let base = out_road.length - residual;
            let pos = match world.lane(out_road_id, out_dir, out_lane).back() {
                // Catching up to the outgoing lane's tail truncates the move.
                Some(tail) => base.max(tail.pos + 1),
                None => base,
            };
            if let Some(mut car) = world.pop_head(road, dir, lane_idx) {
                car.speed = v_out;
                car.step += 1;
                car.pos = pos;
                world.push_tail(out_road_id, out_dir, out_lane, car);
            }
            ledger.settle(head.id, road, dir);
            stats.crossed += 1;
        }

        redrive_after_cross(world, plans, ledger, road, dir, lane_idx, now);

        if ledger.count(road, dir) == before {
            if opts.deadlock_fatal {
                return Err(SimError::LocalDeadlock {
                    tick: now,
                    cross: net.cross(cross).ext_id,
                    road: net.road(road).ext_id,
                });
            }
            return Ok(true);
        }
    }
}

// ── Turn rules ────────────────────────────────────────────────────────────────

/// The turns the road in `slot` may take at `cross` this pass, in priority
/// order `[straight, left, right]`.
pub(crate) fn allowed_turns(
    world: &World,
    net: &Network,
    plans: &PlanSet,
    ledger: &WaitLedger,
    cross: CrossId,
    slot: usize,
) -> Vec<Turn> {
    let slots = &net.cross(cross).slots;
    let left_slot = (slot + 1) % 4;
    let opp_slot = (slot + 2) % 4;
    let right_slot = (slot + 3) % 4;

    let mut allowed = Vec::with_capacity(3);

    if slots[opp_slot].is_some() {
        allowed.push(Turn::Straight);
    }

    if slots[left_slot].is_some() {
        // A straight-going car on the road to the right outranks our left.
        let blocked = slots[right_slot].is_some_and(|r| {
            waiting_head_turns(world, net, plans, ledger, cross, r).contains(&Turn::Straight)
        });
        if !blocked {
            allowed.push(Turn::Left);
        }
    }

    if slots[right_slot].is_some() {
        // A straight-going car on the road to the left outranks our right;
        // failing that, an oncoming left turn does (unless an oncoming
        // straight outranks the left in turn).
        let mut blocked = slots[left_slot].is_some_and(|l| {
            waiting_head_turns(world, net, plans, ledger, cross, l).contains(&Turn::Straight)
        });
        if !blocked {
            if let Some(o) = slots[opp_slot] {
                let oncoming = waiting_head_turns(world, net, plans, ledger, cross, o);
                blocked = oncoming.contains(&Turn::Left) && !oncoming.contains(&Turn::Straight);
            }
        }
        if !blocked {
            allowed.push(Turn::Right);
        }
    }

    allowed
}

/// Turns of the Waiting head-of-lane cars approaching `cross` on `road`.
fn waiting_head_turns(
    world: &World,
    net: &Network,
    plans: &PlanSet,
    ledger: &WaitLedger,
    cross: CrossId,
    road: RoadId,
) -> Vec<Turn> {
    let Some(slot) = net.slot_of(cross, road) else {
        return Vec::new();
    };
    let dir = inbound_dir(slot);
    if net.road(road).downstream(dir) != cross {
        return Vec::new();
    }
    world
        .side(road, dir)
        .iter()
        .filter_map(|lane| lane.front())
        .filter(|car| ledger.is_waiting(car.id))
        .filter_map(|car| turn_of(net, plans, cross, car))
        .collect()
}

/// The turn `car` takes at `cross`.  A car on its final road goes straight
/// (it retires at the cross rather than crossing it).
fn turn_of(net: &Network, plans: &PlanSet, cross: CrossId, car: &Car) -> Option<Turn> {
    let plan = plans.get(car.id);
    if plan.is_last(car.step) {
        return Some(Turn::Straight);
    }
    let cur_slot = net.slot_of(cross, plan.road_at(car.step))?;
    let next_slot = net.slot_of(cross, plan.next_road(car.step)?)?;
    turn_between(cur_slot, next_slot)
}

// ── Car and lane selection ────────────────────────────────────────────────────

/// Pick the single car to cross next from `(road, dir)`: lane heads in lane
/// order, matched against the allowed turns in priority order.
#[allow(clippy::too_many_arguments)]
fn select_car(
    world: &World,
    net: &Network,
    plans: &PlanSet,
    ledger: &WaitLedger,
    cross: CrossId,
    road: RoadId,
    dir: Direction,
    allowed: &[Turn],
) -> Option<(usize, Turn)> {
    let mut heads: Vec<(usize, Turn)> = Vec::new();
    for (k, lane) in world.side(road, dir).iter().enumerate() {
        if let Some(car) = lane.front() {
            if ledger.is_waiting(car.id) {
                if let Some(turn) = turn_of(net, plans, cross, car) {
                    heads.push((k, turn));
                }
            }
        }
    }
    for &want in allowed {
        if let Some(&(k, _)) = heads.iter().find(|&&(_, t)| t == want) {
            return Some((k, want));
        }
    }
    None
}

/// First outgoing lane with room behind its tail, if any.
fn entry_lane(lanes: &[Lane], length: u32) -> Option<usize> {
    lanes
        .iter()
        .position(|lane| lane.back().is_none_or(|tail| tail.pos < length - 1))
}
