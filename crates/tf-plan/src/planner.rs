//! Fleet planning: route every car, then assign departure ticks.

use std::cmp::Reverse;

use rustc_hash::{FxHashMap, FxHashSet};

use tf_core::{AnswerRecord, CarId, CarRecord, SimOptions, Tick};
use tf_net::{Network, NetError, Router};

use crate::plan::{Plan, PlanSet};
use crate::{PlanError, PlanResult};

// ── Routing the fleet ─────────────────────────────────────────────────────────

/// Route every car and assign departure ticks.
///
/// Cars are interned in ascending external-id order.  An unreachable
/// destination is a fatal input error.  With the `parallel` feature the
/// routing fans out over Rayon's thread pool; the result is identical either
/// way since routing is a pure function of the immutable network.
pub fn build_plans<R: Router>(
    net: &Network,
    router: &R,
    cars: &[CarRecord],
    opts: &SimOptions,
) -> PlanResult<PlanSet> {
    let mut recs = cars.to_vec();
    recs.sort_unstable_by_key(|c| c.id);
    for w in recs.windows(2) {
        if w[0].id == w[1].id {
            return Err(PlanError::DuplicateCar(w[0].id));
        }
    }

    #[cfg(not(feature = "parallel"))]
    let routed: Vec<PlanResult<Plan>> =
        recs.iter().map(|rec| route_one(net, router, rec)).collect();

    #[cfg(feature = "parallel")]
    let routed: Vec<PlanResult<Plan>> = {
        use rayon::prelude::*;
        recs.par_iter().map(|rec| route_one(net, router, rec)).collect()
    };

    let plans = routed.into_iter().collect::<PlanResult<Vec<Plan>>>()?;
    let mut set = PlanSet::new(plans);
    assign_departures(&mut set, opts);
    Ok(set)
}

fn route_one<R: Router>(net: &Network, router: &R, rec: &CarRecord) -> PlanResult<Plan> {
    let from = net.cross_id(rec.from)?;
    let to = net.cross_id(rec.to)?;
    let route = router.route(net, from, to).map_err(|e| match e {
        NetError::NoRoute { .. } => PlanError::Unreachable { car: rec.id, from: rec.from, to: rec.to },
        other => PlanError::Net(other),
    })?;
    if route.is_trivial() {
        return Err(PlanError::EmptyRoute { car: rec.id });
    }
    Ok(Plan {
        car_ext: rec.id,
        cap: rec.cap_speed,
        plan_time: rec.plan_time,
        from,
        to,
        start: Tick::ZERO, // assigned below
        roads: route.roads,
        crosses: route.crosses,
    })
}

// ── Departure-time assignment ─────────────────────────────────────────────────

/// Assign start ticks: sort by `(plan_time asc, origin asc, cap desc)`, then
/// meter `admission_rate_per_tick` cars onto each tick, starting from the
/// first car's plan time (at least tick 1).
pub fn assign_departures(set: &mut PlanSet, opts: &SimOptions) {
    if set.is_empty() {
        return;
    }
    let mut order: Vec<u32> = (0..set.len() as u32).collect();
    order.sort_by_key(|&i| {
        let p = set.get(CarId(i));
        (p.plan_time, p.from, Reverse(p.cap))
    });

    let rate = opts.admission_rate_per_tick.max(1) as u64;
    let base = set.get(CarId(order[0])).plan_time.max(1);
    for (n, &i) in order.iter().enumerate() {
        set.get_mut(CarId(i)).start = Tick(base + n as u64 / rate);
    }
}

// ── Answer replay ─────────────────────────────────────────────────────────────

/// Build plans from pre-computed answer records instead of routing.
///
/// The cross path is reconstructed by walking each road's endpoints from the
/// car's origin; a road that does not continue the walk (or doubles back) is
/// a fatal input error.
pub fn plans_from_answers(
    net: &Network,
    cars: &[CarRecord],
    answers: &[AnswerRecord],
) -> PlanResult<PlanSet> {
    let mut by_car: FxHashMap<i64, &CarRecord> = FxHashMap::default();
    for rec in cars {
        if by_car.insert(rec.id, rec).is_some() {
            return Err(PlanError::DuplicateCar(rec.id));
        }
    }

    let mut plans = Vec::with_capacity(answers.len());
    let mut answered: FxHashSet<i64> = FxHashSet::default();
    for ans in answers {
        if !answered.insert(ans.car_id) {
            return Err(PlanError::DuplicateCar(ans.car_id));
        }
        let rec = *by_car
            .get(&ans.car_id)
            .ok_or(PlanError::UnknownCar(ans.car_id))?;
        if ans.start_tick == 0 {
            return Err(PlanError::BadStartTick { car: ans.car_id });
        }
        if ans.roads.is_empty() {
            return Err(PlanError::EmptyRoute { car: ans.car_id });
        }

        let from = net.cross_id(rec.from)?;
        let to = net.cross_id(rec.to)?;
        let mut roads = Vec::with_capacity(ans.roads.len());
        let mut crosses = vec![from];
        let mut cur = from;
        for &ext in &ans.roads {
            let id = net.road_id(ext)?;
            if roads.last() == Some(&id) {
                return Err(PlanError::BrokenRoute { car: ans.car_id, reason: "route doubles back on the same road" });
            }
            let road = net.road(id);
            cur = if road.from == cur {
                road.to
            } else if road.to == cur && road.duplex {
                road.from
            } else {
                return Err(PlanError::BrokenRoute { car: ans.car_id, reason: "road does not continue the route" });
            };
            roads.push(id);
            crosses.push(cur);
        }
        if cur != to {
            return Err(PlanError::BrokenRoute { car: ans.car_id, reason: "route does not end at the destination" });
        }

        plans.push(Plan {
            car_ext: rec.id,
            cap: rec.cap_speed,
            plan_time: rec.plan_time,
            from,
            to,
            start: Tick(ans.start_tick),
            roads,
            crosses,
        });
    }

    plans.sort_unstable_by_key(|p| p.car_ext);
    Ok(PlanSet::new(plans))
}
