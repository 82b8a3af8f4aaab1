//! Road network representation and builder.
//!
//! # Data layout
//!
//! The routing graph uses **Compressed Sparse Row (CSR)** format for outgoing
//! edges, one directed edge per road direction.  Given a `CrossId n`, its
//! outgoing edges occupy the index range:
//!
//! ```text
//! node_out_start[n] .. node_out_start[n + 1]
//! ```
//!
//! All edge arrays (`edge_to`, `edge_road`, `edge_len`) are sorted by source
//! cross, so Dijkstra's inner loop is a contiguous memory scan.
//!
//! # External vs dense ids
//!
//! Input records carry arbitrary integer ids.  `build()` interns them in
//! ascending order, so dense-id iteration *is* ascending-external-id
//! iteration — the ordering the intersection scheduler relies on.

use rustc_hash::FxHashMap;

use tf_core::{CrossId, CrossRecord, RoadId, RoadRecord, NO_ROAD};

use crate::orient::Direction;
use crate::{NetError, NetResult};

// ── Road ──────────────────────────────────────────────────────────────────────

/// Immutable attributes of one road.
#[derive(Clone, Debug)]
pub struct Road {
    /// Id as it appears in the input records.
    pub ext_id: i64,
    /// Length in cells.
    pub length: u32,
    /// Speed limit in cells per tick.
    pub speed_limit: u32,
    /// Lanes per direction.
    pub channels: u32,
    pub from: CrossId,
    pub to: CrossId,
    /// Whether the reverse direction exists.
    pub duplex: bool,
}

impl Road {
    /// The cross that cars travelling in `dir` are heading toward.
    #[inline]
    pub fn downstream(&self, dir: Direction) -> CrossId {
        match dir {
            Direction::Forward => self.to,
            Direction::Reverse => self.from,
        }
    }

    /// Speed a car with the given cap actually drives on this road.
    #[inline]
    pub fn effective_speed(&self, cap: u32) -> u32 {
        cap.min(self.speed_limit)
    }

    /// `true` if `dir` has lanes on this road.
    #[inline]
    pub fn has_dir(&self, dir: Direction) -> bool {
        dir == Direction::Forward || self.duplex
    }
}

// ── Cross ─────────────────────────────────────────────────────────────────────

/// One intersection: four compass slots, each holding an incident road or
/// nothing.
#[derive(Clone, Debug)]
pub struct Cross {
    /// Id as it appears in the input records.
    pub ext_id: i64,
    pub slots: [Option<RoadId>; 4],
}

impl Cross {
    /// The slot holding `road`, if it is incident here.
    pub fn slot_of(&self, road: RoadId) -> Option<usize> {
        self.slots.iter().position(|s| *s == Some(road))
    }
}

// ── Network ───────────────────────────────────────────────────────────────────

/// The immutable road network: crosses, roads, and the CSR routing graph.
///
/// Do not construct directly; use [`NetworkBuilder`].
#[derive(Debug)]
pub struct Network {
    /// Indexed by `CrossId`.
    pub crosses: Vec<Cross>,
    /// Indexed by `RoadId`.
    pub roads: Vec<Road>,

    // ── CSR edge adjacency (one edge per road direction) ──────────────────
    /// CSR row pointer.  Length = `cross_count + 1`.
    pub node_out_start: Vec<u32>,
    /// Destination cross of each edge.
    pub edge_to: Vec<CrossId>,
    /// Road the edge travels over.
    pub edge_road: Vec<RoadId>,
    /// Edge cost: the road length.
    pub edge_len: Vec<u32>,

    // ── Lookups ───────────────────────────────────────────────────────────
    cross_by_ext: FxHashMap<i64, CrossId>,
    road_by_ext: FxHashMap<i64, RoadId>,
    pair_to_road: FxHashMap<(CrossId, CrossId), RoadId>,
    /// Per cross: incident roads, ascending by id, empty slots skipped.
    incident_sorted: Vec<Vec<RoadId>>,
}

impl Network {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn cross_count(&self) -> usize {
        self.crosses.len()
    }

    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    #[inline]
    pub fn road(&self, id: RoadId) -> &Road {
        &self.roads[id.index()]
    }

    #[inline]
    pub fn cross(&self, id: CrossId) -> &Cross {
        &self.crosses[id.index()]
    }

    /// Resolve an external cross id to its dense id.
    pub fn cross_id(&self, ext: i64) -> NetResult<CrossId> {
        self.cross_by_ext
            .get(&ext)
            .copied()
            .ok_or(NetError::CrossNotFound(ext))
    }

    /// Resolve an external road id to its dense id.
    pub fn road_id(&self, ext: i64) -> NetResult<RoadId> {
        self.road_by_ext
            .get(&ext)
            .copied()
            .ok_or(NetError::RoadNotFound(ext))
    }

    /// The road whose direction runs `from → to`, if any.
    pub fn road_between(&self, from: CrossId, to: CrossId) -> Option<RoadId> {
        self.pair_to_road.get(&(from, to)).copied()
    }

    /// The slot of `road` at `cross`, if incident.
    #[inline]
    pub fn slot_of(&self, cross: CrossId, road: RoadId) -> Option<usize> {
        self.crosses[cross.index()].slot_of(road)
    }

    /// Incident roads of `cross` in ascending road-id order, empty slots
    /// skipped — the scheduler's per-cross walk order.
    #[inline]
    pub fn incident_roads_sorted(&self, cross: CrossId) -> &[RoadId] {
        &self.incident_sorted[cross.index()]
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the edge indices of all outgoing edges from `cross`.
    ///
    /// A contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, cross: CrossId) -> impl Iterator<Item = usize> + '_ {
        let start = self.node_out_start[cross.index()] as usize;
        let end = self.node_out_start[cross.index() + 1] as usize;
        start..end
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Network`] from input records, then call
/// [`build`](Self::build).
///
/// Records may be added in any order.  `build()` interns ids ascending,
/// validates every reference, and constructs the CSR arrays.
#[derive(Default)]
pub struct NetworkBuilder {
    crosses: Vec<CrossRecord>,
    roads: Vec<RoadRecord>,
}

struct RawEdge {
    from: CrossId,
    to: CrossId,
    road: RoadId,
    len: u32,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_cross(&mut self, rec: CrossRecord) -> &mut Self {
        self.crosses.push(rec);
        self
    }

    pub fn add_road(&mut self, rec: RoadRecord) -> &mut Self {
        self.roads.push(rec);
        self
    }

    pub fn crosses(mut self, recs: &[CrossRecord]) -> Self {
        self.crosses.extend_from_slice(recs);
        self
    }

    pub fn roads(mut self, recs: &[RoadRecord]) -> Self {
        self.roads.extend_from_slice(recs);
        self
    }

    /// Consume the builder and produce a validated [`Network`].
    pub fn build(self) -> NetResult<Network> {
        let mut cross_recs = self.crosses;
        let mut road_recs = self.roads;
        cross_recs.sort_unstable_by_key(|c| c.id);
        road_recs.sort_unstable_by_key(|r| r.id);

        // ── Intern ids (ascending, so dense order == external order) ──────
        let mut cross_by_ext = FxHashMap::default();
        for (i, rec) in cross_recs.iter().enumerate() {
            if cross_by_ext.insert(rec.id, CrossId(i as u32)).is_some() {
                return Err(NetError::DuplicateCross(rec.id));
            }
        }
        let mut road_by_ext = FxHashMap::default();
        for (i, rec) in road_recs.iter().enumerate() {
            if road_by_ext.insert(rec.id, RoadId(i as u32)).is_some() {
                return Err(NetError::DuplicateRoad(rec.id));
            }
        }

        // ── Validate and resolve road records ─────────────────────────────
        let mut roads = Vec::with_capacity(road_recs.len());
        for rec in &road_recs {
            if rec.length == 0 {
                return Err(NetError::BadRecord { id: rec.id, reason: "length must be positive" });
            }
            if rec.speed_limit == 0 {
                return Err(NetError::BadRecord { id: rec.id, reason: "speed limit must be positive" });
            }
            if rec.channels == 0 {
                return Err(NetError::BadRecord { id: rec.id, reason: "channel count must be positive" });
            }
            let resolve = |ext: i64| {
                cross_by_ext
                    .get(&ext)
                    .copied()
                    .ok_or(NetError::UnknownCross { road: rec.id, cross: ext })
            };
            roads.push(Road {
                ext_id: rec.id,
                length: rec.length,
                speed_limit: rec.speed_limit,
                channels: rec.channels,
                from: resolve(rec.from)?,
                to: resolve(rec.to)?,
                duplex: rec.is_duplex,
            });
        }

        // ── Validate and resolve cross records ────────────────────────────
        let mut crosses = Vec::with_capacity(cross_recs.len());
        let mut incident_sorted = Vec::with_capacity(cross_recs.len());
        for rec in &cross_recs {
            let mut slots = [None; 4];
            for (k, &ext) in rec.slots.iter().enumerate() {
                if ext == NO_ROAD {
                    continue;
                }
                let road = road_by_ext
                    .get(&ext)
                    .copied()
                    .ok_or(NetError::UnknownRoad { cross: rec.id, road: ext })?;
                slots[k] = Some(road);
            }
            let mut incident: Vec<RoadId> = slots.iter().flatten().copied().collect();
            incident.sort_unstable();
            crosses.push(Cross { ext_id: rec.id, slots });
            incident_sorted.push(incident);
        }

        // ── Build directed edges and the pair lookup ──────────────────────
        let mut raw: Vec<RawEdge> = Vec::with_capacity(roads.len() * 2);
        let mut pair_to_road = FxHashMap::default();
        for (i, road) in roads.iter().enumerate() {
            let id = RoadId(i as u32);
            raw.push(RawEdge { from: road.from, to: road.to, road: id, len: road.length });
            pair_to_road.insert((road.from, road.to), id);
            if road.duplex {
                raw.push(RawEdge { from: road.to, to: road.from, road: id, len: road.length });
                pair_to_road.insert((road.to, road.from), id);
            }
        }
        raw.sort_unstable_by_key(|e| (e.from, e.to));

        let edge_to: Vec<CrossId> = raw.iter().map(|e| e.to).collect();
        let edge_road: Vec<RoadId> = raw.iter().map(|e| e.road).collect();
        let edge_len: Vec<u32> = raw.iter().map(|e| e.len).collect();

        // CSR row pointer.
        let cross_count = crosses.len();
        let mut node_out_start = vec![0u32; cross_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=cross_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[cross_count] as usize, raw.len());

        Ok(Network {
            crosses,
            roads,
            node_out_start,
            edge_to,
            edge_road,
            edge_len,
            cross_by_ext,
            road_by_ext,
            pair_to_road,
            incident_sorted,
        })
    }
}
