//! Typed input/output records exchanged with the I/O collaborator.
//!
//! These carry the raw integer ids from the tuple files ("external" ids).
//! The network and plan builders intern them into the dense [`crate::ids`]
//! types; nothing past the builders touches an external id except for
//! display and answer output.

/// Slot value meaning "no road on this side of the intersection".
pub const NO_ROAD: i64 = -1;

/// One car: `(id, from_cross, to_cross, cap_speed, plan_time)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarRecord {
    pub id: i64,
    pub from: i64,
    pub to: i64,
    /// Vehicle maximum speed in cells per tick.
    pub cap_speed: u32,
    /// Earliest tick the car is willing to depart.
    pub plan_time: u64,
}

/// One road: `(id, length, speed_limit, channels, from_cross, to_cross, is_duplex)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadRecord {
    pub id: i64,
    /// Length in cells.
    pub length: u32,
    /// Speed limit in cells per tick.
    pub speed_limit: u32,
    /// Lanes per direction.
    pub channels: u32,
    pub from: i64,
    pub to: i64,
    /// Whether the reverse direction (`to → from`) exists.
    pub is_duplex: bool,
}

/// One intersection: `(id, slot0_road, slot1_road, slot2_road, slot3_road)`.
///
/// A slot holds a road id or [`NO_ROAD`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossRecord {
    pub id: i64,
    pub slots: [i64; 4],
}

/// One routed car: `(car_id, start_tick, road_id_1, …, road_id_k)`.
///
/// Emitted after routing, and optionally read back in to replay a
/// pre-computed schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnswerRecord {
    pub car_id: i64,
    pub start_tick: u64,
    pub roads: Vec<i64>,
}
