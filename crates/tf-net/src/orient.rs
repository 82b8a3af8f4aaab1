//! Compass-slot arithmetic: travel directions and turns.
//!
//! A cross lists its incident roads in four ordered slots.  The slot index
//! alone decides which storage side of a road faces the cross:
//!
//! | slot    | cars approaching the cross | cars leaving the cross |
//! |---------|----------------------------|------------------------|
//! | 0, 1    | [`Direction::Reverse`]     | [`Direction::Forward`] |
//! | 2, 3    | [`Direction::Forward`]     | [`Direction::Reverse`] |
//!
//! Admission, road dynamics, and the intersection scheduler all go through
//! [`inbound_dir`]/[`outbound_dir`], so "which lanes of road R hold cars
//! heading into cross X" has a single answer everywhere.

/// Storage side of a road.  `Forward` runs `from_cross → to_cross`; a
/// non-duplex road has no reverse lanes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Forward = 0,
    Reverse = 1,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Forward, Direction::Reverse];

    /// Cast to `usize` for direct use as a storage index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Direction of travel for cars arriving at the cross on the road in `slot`.
#[inline]
pub fn inbound_dir(slot: usize) -> Direction {
    debug_assert!(slot < 4);
    if slot < 2 { Direction::Reverse } else { Direction::Forward }
}

/// Direction of travel for cars departing the cross onto the road in `slot`.
#[inline]
pub fn outbound_dir(slot: usize) -> Direction {
    debug_assert!(slot < 4);
    if slot < 2 { Direction::Forward } else { Direction::Reverse }
}

// ── Turn ──────────────────────────────────────────────────────────────────────

/// A turn through a cross, encoded as the clockwise slot offset between the
/// incoming and outgoing road.  Offset 0 would be a U-turn, which the rules
/// never produce.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Turn {
    Left = 1,
    Straight = 2,
    Right = 3,
}

impl Turn {
    /// Slot offset of this turn: `out_slot = (in_slot + offset) % 4`.
    #[inline(always)]
    pub fn offset(self) -> usize {
        self as usize
    }
}

/// The turn taken when entering a cross via `from_slot` and leaving via
/// `to_slot`.  `None` for the (invalid) U-turn case `from_slot == to_slot`.
#[inline]
pub fn turn_between(from_slot: usize, to_slot: usize) -> Option<Turn> {
    debug_assert!(from_slot < 4 && to_slot < 4);
    match (to_slot + 4 - from_slot) % 4 {
        1 => Some(Turn::Left),
        2 => Some(Turn::Straight),
        3 => Some(Turn::Right),
        _ => None,
    }
}
