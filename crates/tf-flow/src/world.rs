//! `World` — every lane of every road, plus conservation counters.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use tf_core::{CarId, RoadId, Tick};
use tf_net::{Direction, Network};
use tf_plan::PlanSet;

use crate::Car;

/// One lane: cars ordered head (front, closest to the downstream
/// intersection) to tail (back).  Positions strictly increase front to back.
pub type Lane = VecDeque<Car>;

/// All live simulation state.
///
/// Lanes are indexed `[road][direction][lane]`; a non-duplex road has an
/// empty reverse side, so direction iteration skips it naturally.
#[derive(Debug)]
pub struct World {
    pub(crate) lanes: Vec<[Vec<Lane>; 2]>,

    /// Cars placed on the network since the start of the run.
    pub admitted: u64,

    /// Retirement log in order: `(car, tick it left the network)`.
    pub retired: Vec<(CarId, Tick)>,

    pub(crate) cars_on_road: usize,
}

impl World {
    /// An empty world shaped like `net`: `channels` lanes per existing
    /// direction of every road.
    pub fn new(net: &Network) -> Self {
        let lanes = net
            .roads
            .iter()
            .map(|r| {
                let fwd = vec![Lane::new(); r.channels as usize];
                let rev = if r.duplex {
                    vec![Lane::new(); r.channels as usize]
                } else {
                    Vec::new()
                };
                [fwd, rev]
            })
            .collect();
        Self {
            lanes,
            admitted: 0,
            retired: Vec::new(),
            cars_on_road: 0,
        }
    }

    // ── Lane access ───────────────────────────────────────────────────────

    #[inline]
    pub fn side(&self, road: RoadId, dir: Direction) -> &[Lane] {
        &self.lanes[road.index()][dir.index()]
    }

    #[inline]
    pub fn lane(&self, road: RoadId, dir: Direction, k: usize) -> &Lane {
        &self.lanes[road.index()][dir.index()][k]
    }

    #[inline]
    pub fn lane_mut(&mut self, road: RoadId, dir: Direction, k: usize) -> &mut Lane {
        &mut self.lanes[road.index()][dir.index()][k]
    }

    // ── Car movement primitives ───────────────────────────────────────────

    /// Place a newly admitted car at the tail of a lane.
    pub fn admit_car(&mut self, road: RoadId, dir: Direction, k: usize, car: Car) {
        self.admitted += 1;
        self.cars_on_road += 1;
        self.push_tail(road, dir, k, car);
    }

    /// Append a car behind the current tail (crossings and admissions).
    pub fn push_tail(&mut self, road: RoadId, dir: Direction, k: usize, car: Car) {
        let lane = &mut self.lanes[road.index()][dir.index()][k];
        debug_assert!(
            lane.back().is_none_or(|tail| tail.pos < car.pos),
            "lane ordering violated: tail {:?} vs appended {:?}",
            lane.back(),
            car
        );
        lane.push_back(car);
    }

    /// Remove and return the head car of a lane (crossings).
    pub fn pop_head(&mut self, road: RoadId, dir: Direction, k: usize) -> Option<Car> {
        self.lanes[road.index()][dir.index()][k].pop_front()
    }

    // ── Counters ──────────────────────────────────────────────────────────

    /// Cars currently on some lane.
    #[inline]
    pub fn cars_on_road(&self) -> usize {
        self.cars_on_road
    }

    /// `true` when no car is on any lane.
    pub fn is_empty(&self) -> bool {
        self.cars_on_road == 0
    }

    // ── Invariant checking ────────────────────────────────────────────────

    /// Verify the lane-structure invariants.  Used by the tick controller in
    /// debug builds and by the test suite; returns the first violation.
    pub fn check_invariants(&self, net: &Network, plans: &PlanSet) -> Result<(), String> {
        let mut seen: FxHashSet<CarId> = FxHashSet::default();
        let mut counted = 0usize;

        for (r, sides) in self.lanes.iter().enumerate() {
            let road_id = RoadId(r as u32);
            let road = net.road(road_id);
            for dir in Direction::BOTH {
                for (k, lane) in sides[dir.index()].iter().enumerate() {
                    let mut prev: Option<u32> = None;
                    for car in lane {
                        counted += 1;
                        if !seen.insert(car.id) {
                            return Err(format!("{} appears in more than one lane", car.id));
                        }
                        if car.pos >= road.length {
                            return Err(format!(
                                "{} at pos {} outside road {} of length {}",
                                car.id, car.pos, road.ext_id, road.length
                            ));
                        }
                        if let Some(p) = prev {
                            if car.pos <= p {
                                return Err(format!(
                                    "lane ordering broken on road {} dir {:?} lane {}: {} then {}",
                                    road.ext_id, dir, k, p, car.pos
                                ));
                            }
                        }
                        prev = Some(car.pos);

                        let plan = plans.get(car.id);
                        if plan.road_at(car.step) != road_id {
                            return Err(format!(
                                "{} cursor points at road {} but car sits on road {}",
                                car.id,
                                net.road(plan.road_at(car.step)).ext_id,
                                road.ext_id
                            ));
                        }
                    }
                }
            }
        }

        if counted != self.cars_on_road {
            return Err(format!(
                "car counter {} disagrees with lane contents {}",
                self.cars_on_road, counted
            ));
        }
        if self.admitted != self.retired.len() as u64 + self.cars_on_road as u64 {
            return Err(format!(
                "conservation broken: admitted {} != retired {} + on road {}",
                self.admitted,
                self.retired.len(),
                self.cars_on_road
            ));
        }
        Ok(())
    }
}
