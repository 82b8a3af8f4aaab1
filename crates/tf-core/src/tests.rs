use crate::{CarId, CrossId, RoadId, SimOptions, Tick};

mod id_tests {
    use super::*;

    #[test]
    fn invalid_sentinel_is_default() {
        assert_eq!(RoadId::default(), RoadId::INVALID);
        assert_eq!(CarId::INVALID.0, u32::MAX);
    }

    #[test]
    fn index_round_trip() {
        let id = CrossId(7);
        assert_eq!(id.index(), 7);
        assert_eq!(CrossId::try_from(7usize).unwrap(), id);
    }

    #[test]
    fn ids_sort_by_inner_value() {
        let mut v = vec![RoadId(3), RoadId(1), RoadId(2)];
        v.sort();
        assert_eq!(v, vec![RoadId(1), RoadId(2), RoadId(3)]);
    }

    #[test]
    fn display_names_the_type() {
        assert_eq!(CarId(42).to_string(), "CarId(42)");
    }
}

mod tick_tests {
    use super::*;

    #[test]
    fn offset_and_add_agree() {
        let t = Tick::FIRST;
        assert_eq!(t.offset(4), t + 4);
        assert_eq!((t + 4) - t, 4);
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(Tick::ZERO < Tick::FIRST);
        assert!(Tick(10) < Tick(11));
    }

    #[test]
    fn display_format() {
        assert_eq!(Tick(9).to_string(), "T9");
    }
}

mod options_tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let opts = SimOptions::default();
        assert!(opts.deadlock_fatal);
        assert_eq!(opts.admission_rate_per_tick, 1);
    }
}
