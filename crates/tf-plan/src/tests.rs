use tf_core::{CarId, CarRecord, CrossRecord, RoadRecord, SimOptions, Tick, NO_ROAD};
use tf_net::{DijkstraRouter, Network, NetworkBuilder};

use crate::depart::DepartQueue;
use crate::planner::{build_plans, plans_from_answers};
use crate::PlanError;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn car(id: i64, from: i64, to: i64, cap: u32, plan_time: u64) -> CarRecord {
    CarRecord { id, from, to, cap_speed: cap, plan_time }
}

/// Line network 1 —101→ 2 —102→ 3, both duplex, len 6, v 3, 1 lane.
fn line_net() -> Network {
    NetworkBuilder::new()
        .crosses(&[
            CrossRecord { id: 1, slots: [101, NO_ROAD, NO_ROAD, NO_ROAD] },
            CrossRecord { id: 2, slots: [102, NO_ROAD, 101, NO_ROAD] },
            CrossRecord { id: 3, slots: [NO_ROAD, NO_ROAD, 102, NO_ROAD] },
        ])
        .roads(&[
            RoadRecord { id: 101, length: 6, speed_limit: 3, channels: 1, from: 1, to: 2, is_duplex: true },
            RoadRecord { id: 102, length: 6, speed_limit: 3, channels: 1, from: 2, to: 3, is_duplex: true },
        ])
        .build()
        .unwrap()
}

// ── Routing the fleet ─────────────────────────────────────────────────────────

mod build_tests {
    use super::*;

    #[test]
    fn plans_are_interned_ascending_by_car_id() {
        let net = line_net();
        let cars = [car(20, 2, 3, 4, 1), car(10, 1, 3, 2, 1)];
        let set = build_plans(&net, &DijkstraRouter, &cars, &SimOptions::default()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(CarId(0)).car_ext, 10);
        assert_eq!(set.get(CarId(1)).car_ext, 20);
        assert_eq!(set.car_id(20), Some(CarId(1)));
    }

    #[test]
    fn route_and_cross_path_are_consistent() {
        let net = line_net();
        let set = build_plans(&net, &DijkstraRouter, &[car(10, 1, 3, 2, 1)], &SimOptions::default())
            .unwrap();
        let plan = set.get(CarId(0));
        assert_eq!(plan.roads.len(), 2);
        assert_eq!(plan.crosses.len(), 3);
        assert_eq!(plan.crosses[0], plan.from);
        assert_eq!(*plan.crosses.last().unwrap(), plan.to);
        assert!(plan.is_last(1));
        assert_eq!(plan.next_road(0), Some(plan.road_at(1)));
    }

    #[test]
    fn unreachable_destination_is_fatal() {
        // One-way 1 → 2 only; a trip 2 → 1 cannot be routed.
        let net = NetworkBuilder::new()
            .crosses(&[
                CrossRecord { id: 1, slots: [101, NO_ROAD, NO_ROAD, NO_ROAD] },
                CrossRecord { id: 2, slots: [NO_ROAD, NO_ROAD, 101, NO_ROAD] },
            ])
            .roads(&[RoadRecord { id: 101, length: 5, speed_limit: 2, channels: 1, from: 1, to: 2, is_duplex: false }])
            .build()
            .unwrap();
        let err = build_plans(&net, &DijkstraRouter, &[car(10, 2, 1, 2, 1)], &SimOptions::default())
            .unwrap_err();
        assert!(matches!(err, PlanError::Unreachable { car: 10, from: 2, to: 1 }));
    }

    #[test]
    fn trivial_trip_is_rejected() {
        let net = line_net();
        let err = build_plans(&net, &DijkstraRouter, &[car(10, 2, 2, 2, 1)], &SimOptions::default())
            .unwrap_err();
        assert!(matches!(err, PlanError::EmptyRoute { car: 10 }));
    }

    #[test]
    fn duplicate_car_ids_are_rejected() {
        let net = line_net();
        let cars = [car(10, 1, 3, 2, 1), car(10, 1, 2, 2, 1)];
        let err = build_plans(&net, &DijkstraRouter, &cars, &SimOptions::default()).unwrap_err();
        assert!(matches!(err, PlanError::DuplicateCar(10)));
    }
}

// ── Departure-time assignment ─────────────────────────────────────────────────

mod departure_tests {
    use super::*;

    fn starts_by_ext(set: &crate::PlanSet, exts: &[i64]) -> Vec<u64> {
        exts.iter()
            .map(|&e| set.get(set.car_id(e).unwrap()).start.0)
            .collect()
    }

    #[test]
    fn one_car_per_tick_in_sorted_order() {
        let net = line_net();
        // Sort key is (plan_time, origin, cap desc):
        //   car 30: plan_time 1, from 1, cap 5  → first
        //   car 10: plan_time 1, from 1, cap 2  → second
        //   car 20: plan_time 1, from 2, cap 9  → third (higher origin)
        //   car 40: plan_time 2                 → fourth
        let cars = [
            car(10, 1, 3, 2, 1),
            car(20, 2, 3, 9, 1),
            car(30, 1, 3, 5, 1),
            car(40, 1, 3, 9, 2),
        ];
        let set = build_plans(&net, &DijkstraRouter, &cars, &SimOptions::default()).unwrap();
        assert_eq!(starts_by_ext(&set, &[30, 10, 20, 40]), vec![1, 2, 3, 4]);
    }

    #[test]
    fn rate_two_pairs_cars_per_tick() {
        let net = line_net();
        let cars = [
            car(10, 1, 3, 2, 1),
            car(20, 1, 3, 2, 1),
            car(30, 1, 3, 2, 1),
        ];
        let opts = SimOptions { admission_rate_per_tick: 2, ..SimOptions::default() };
        let set = build_plans(&net, &DijkstraRouter, &cars, &opts).unwrap();
        // cap ties broken by car order within the stable sort; ticks 1,1,2.
        let mut starts: Vec<u64> = starts_by_ext(&set, &[10, 20, 30]);
        starts.sort_unstable();
        assert_eq!(starts, vec![1, 1, 2]);
    }

    #[test]
    fn base_tick_anchors_at_first_plan_time() {
        let net = line_net();
        let cars = [car(10, 1, 3, 2, 5), car(20, 1, 3, 2, 7)];
        let set = build_plans(&net, &DijkstraRouter, &cars, &SimOptions::default()).unwrap();
        assert_eq!(starts_by_ext(&set, &[10, 20]), vec![5, 6]);
    }

    #[test]
    fn plan_time_zero_clamps_to_tick_one() {
        let net = line_net();
        let set = build_plans(&net, &DijkstraRouter, &[car(10, 1, 3, 2, 0)], &SimOptions::default())
            .unwrap();
        assert_eq!(set.get(CarId(0)).start, Tick::FIRST);
    }
}

// ── Answer replay ─────────────────────────────────────────────────────────────

mod answer_tests {
    use super::*;
    use tf_core::AnswerRecord;

    #[test]
    fn replay_reconstructs_the_cross_path() {
        let net = line_net();
        let cars = [car(10, 1, 3, 2, 1)];
        let answers = [AnswerRecord { car_id: 10, start_tick: 4, roads: vec![101, 102] }];
        let set = plans_from_answers(&net, &cars, &answers).unwrap();
        let plan = set.get(CarId(0));
        assert_eq!(plan.start, Tick(4));
        assert_eq!(plan.crosses.len(), 3);
        assert_eq!(plan.crosses[1], net.cross_id(2).unwrap());
    }

    #[test]
    fn replay_uses_duplex_reverse_legs() {
        let net = line_net();
        let cars = [car(10, 3, 1, 2, 1)];
        let answers = [AnswerRecord { car_id: 10, start_tick: 1, roads: vec![102, 101] }];
        let set = plans_from_answers(&net, &cars, &answers).unwrap();
        assert_eq!(set.get(CarId(0)).to, net.cross_id(1).unwrap());
    }

    #[test]
    fn disconnected_route_is_rejected() {
        let net = line_net();
        let cars = [car(10, 1, 3, 2, 1)];
        // Road 102 does not touch cross 1.
        let answers = [AnswerRecord { car_id: 10, start_tick: 1, roads: vec![102, 101] }];
        let err = plans_from_answers(&net, &cars, &answers).unwrap_err();
        assert!(matches!(err, PlanError::BrokenRoute { car: 10, .. }));
    }

    #[test]
    fn route_ending_elsewhere_is_rejected() {
        let net = line_net();
        let cars = [car(10, 1, 3, 2, 1)];
        let answers = [AnswerRecord { car_id: 10, start_tick: 1, roads: vec![101] }];
        let err = plans_from_answers(&net, &cars, &answers).unwrap_err();
        assert!(matches!(err, PlanError::BrokenRoute { car: 10, .. }));
    }

    #[test]
    fn doubling_back_is_rejected() {
        let net = line_net();
        let cars = [car(10, 1, 1, 2, 1)];
        let answers = [AnswerRecord { car_id: 10, start_tick: 1, roads: vec![101, 101] }];
        let err = plans_from_answers(&net, &cars, &answers).unwrap_err();
        assert!(matches!(err, PlanError::BrokenRoute { car: 10, .. }));
    }

    #[test]
    fn unknown_car_and_bad_start_are_rejected() {
        let net = line_net();
        let cars = [car(10, 1, 3, 2, 1)];
        let missing = [AnswerRecord { car_id: 99, start_tick: 1, roads: vec![101, 102] }];
        assert!(matches!(
            plans_from_answers(&net, &cars, &missing).unwrap_err(),
            PlanError::UnknownCar(99)
        ));
        let zero = [AnswerRecord { car_id: 10, start_tick: 0, roads: vec![101, 102] }];
        assert!(matches!(
            plans_from_answers(&net, &cars, &zero).unwrap_err(),
            PlanError::BadStartTick { car: 10 }
        ));
    }

    #[test]
    fn to_answers_round_trips_external_ids() {
        let net = line_net();
        let set = build_plans(&net, &DijkstraRouter, &[car(10, 1, 3, 2, 1)], &SimOptions::default())
            .unwrap();
        let answers = set.to_answers(&net);
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].car_id, 10);
        assert_eq!(answers[0].start_tick, 1);
        assert_eq!(answers[0].roads, vec![101, 102]);
    }
}

// ── Departure queue ───────────────────────────────────────────────────────────

mod queue_tests {
    use super::*;

    #[test]
    fn build_drain_and_defer() {
        let net = line_net();
        let cars = [car(10, 1, 3, 2, 1), car(20, 1, 3, 2, 1)];
        let set = build_plans(&net, &DijkstraRouter, &cars, &SimOptions::default()).unwrap();
        let mut queue = DepartQueue::build_from_plans(&set);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.next_tick(), Some(Tick(1)));

        let batch = queue.drain_tick(Tick(1)).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(queue.drain_tick(Tick(1)), None);

        // Deferral: the same car re-enters one tick later.
        queue.push(Tick(2), batch[0]);
        assert_eq!(queue.len(), 2);
        let batch2 = queue.drain_tick(Tick(2)).unwrap();
        assert_eq!(batch2.len(), 2);
        assert!(queue.is_empty());
    }
}
