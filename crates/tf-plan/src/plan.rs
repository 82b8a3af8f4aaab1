//! `Plan` and `PlanSet`: the routed fleet.

use rustc_hash::FxHashMap;

use tf_core::{AnswerRecord, CarId, CrossId, RoadId, Tick};
use tf_net::Network;

// ── Plan ──────────────────────────────────────────────────────────────────────

/// One car's routed journey.
///
/// The road sequence and cross path are immutable after planning; `start` is
/// the only field the simulation mutates (admission deferral pushes it back
/// one tick at a time).
#[derive(Clone, Debug)]
pub struct Plan {
    /// Car id as it appears in the input records.
    pub car_ext: i64,
    /// Vehicle maximum speed.
    pub cap: u32,
    /// Earliest departure tick requested by the input record.
    pub plan_time: u64,
    pub from: CrossId,
    pub to: CrossId,
    /// Assigned departure tick.  Deferred admissions increment this.
    pub start: Tick,
    /// Roads traversed in order; never empty.
    pub roads: Vec<RoadId>,
    /// Crosses visited in order; `roads.len() + 1` entries, `crosses[0] ==
    /// from` and `crosses[last] == to`.
    pub crosses: Vec<CrossId>,
}

impl Plan {
    /// Road at plan cursor `step`.
    #[inline]
    pub fn road_at(&self, step: u32) -> RoadId {
        self.roads[step as usize]
    }

    /// Road after cursor `step`, or `None` on the final road.
    #[inline]
    pub fn next_road(&self, step: u32) -> Option<RoadId> {
        self.roads.get(step as usize + 1).copied()
    }

    /// `true` if cursor `step` sits on the final road.
    #[inline]
    pub fn is_last(&self, step: u32) -> bool {
        step as usize + 1 == self.roads.len()
    }

    /// Number of roads in the plan.
    pub fn len(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }
}

// ── PlanSet ───────────────────────────────────────────────────────────────────

/// All plans, indexed by dense `CarId`.
///
/// Cars are interned in ascending external-id order, so dense-id order is
/// external-id order (the admission tie-break relies on this).
#[derive(Debug)]
pub struct PlanSet {
    plans: Vec<Plan>,
    by_ext: FxHashMap<i64, CarId>,
}

impl PlanSet {
    /// Wrap a plan list (already sorted by ascending `car_ext`).
    pub fn new(plans: Vec<Plan>) -> Self {
        debug_assert!(plans.windows(2).all(|w| w[0].car_ext < w[1].car_ext));
        let by_ext = plans
            .iter()
            .enumerate()
            .map(|(i, p)| (p.car_ext, CarId(i as u32)))
            .collect();
        Self { plans, by_ext }
    }

    #[inline]
    pub fn get(&self, id: CarId) -> &Plan {
        &self.plans[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: CarId) -> &mut Plan {
        &mut self.plans[id.index()]
    }

    /// Resolve an external car id.
    pub fn car_id(&self, ext: i64) -> Option<CarId> {
        self.by_ext.get(&ext).copied()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Iterate `(CarId, &Plan)` in dense-id order.
    pub fn iter(&self) -> impl Iterator<Item = (CarId, &Plan)> {
        self.plans
            .iter()
            .enumerate()
            .map(|(i, p)| (CarId(i as u32), p))
    }

    /// Render every plan as an output answer record.
    pub fn to_answers(&self, net: &Network) -> Vec<AnswerRecord> {
        self.plans
            .iter()
            .map(|p| AnswerRecord {
                car_id: p.car_ext,
                start_tick: p.start.0,
                roads: p.roads.iter().map(|&r| net.road(r).ext_id).collect(),
            })
            .collect()
    }
}
