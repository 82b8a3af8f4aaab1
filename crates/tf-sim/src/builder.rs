//! Validating builder for [`Sim`].

use tf_core::{SimOptions, Tick};
use tf_flow::{WaitLedger, World};
use tf_net::Network;
use tf_plan::{DepartQueue, Plan, PlanSet};

use crate::{Sim, SimError, SimResult};

/// Builder for [`Sim`].
///
/// `build()` validates every plan against the network — route soundness is
/// cheap to check once here and lets the tick loop index without second
/// guesses:
///
/// - the road list is non-empty and U-turn-free;
/// - consecutive roads share the cross the plan claims, with the right
///   direction available;
/// - every traversed road appears in both endpoint crosses' slot tables;
/// - the start tick is at least 1.
pub struct SimBuilder {
    net: Network,
    plans: PlanSet,
    options: SimOptions,
}

impl SimBuilder {
    pub fn new(net: Network, plans: PlanSet) -> Self {
        Self { net, plans, options: SimOptions::default() }
    }

    pub fn options(mut self, options: SimOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate the plans, build the departure queue, and return a
    /// ready-to-run [`Sim`] positioned at tick 1.
    pub fn build(self) -> SimResult<Sim> {
        for (_, plan) in self.plans.iter() {
            validate_plan(&self.net, plan)?;
        }

        let world = World::new(&self.net);
        let ledger = WaitLedger::new(self.net.road_count());
        let queue = DepartQueue::build_from_plans(&self.plans);

        Ok(Sim {
            net: self.net,
            plans: self.plans,
            options: self.options,
            world,
            queue,
            ledger,
            now: Tick::FIRST,
        })
    }
}

fn validate_plan(net: &Network, plan: &Plan) -> SimResult<()> {
    let car = plan.car_ext;
    let fail = |reason| Err(SimError::InvalidPlan { car, reason });

    if plan.roads.is_empty() {
        return fail("empty route");
    }
    if plan.crosses.len() != plan.roads.len() + 1 {
        return fail("cross path does not match the road list");
    }
    if plan.crosses[0] != plan.from || *plan.crosses.last().unwrap_or(&plan.from) != plan.to {
        return fail("cross path does not connect origin to destination");
    }
    if plan.start < Tick::FIRST {
        return fail("start tick before the first tick");
    }

    for (k, &road_id) in plan.roads.iter().enumerate() {
        if k > 0 && plan.roads[k - 1] == road_id {
            return fail("route doubles back on the same road");
        }
        let road = net.road(road_id);
        let a = plan.crosses[k];
        let b = plan.crosses[k + 1];
        let connects =
            (road.from == a && road.to == b) || (road.duplex && road.to == a && road.from == b);
        if !connects {
            return fail("consecutive roads do not share an intersection");
        }
        if net.slot_of(a, road_id).is_none() || net.slot_of(b, road_id).is_none() {
            return fail("road missing from an endpoint's slot table");
        }
    }
    Ok(())
}
