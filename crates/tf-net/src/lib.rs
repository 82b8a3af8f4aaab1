//! `tf-net` — static road network model and shortest-path routing.
//!
//! The network is immutable after [`NetworkBuilder::build`]: intersections
//! ("crosses") with four compass slots, directional multi-lane roads, and a
//! CSR adjacency used by the Dijkstra router.
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`network`] | `Road`, `Cross`, `Network`, `NetworkBuilder`          |
//! | [`orient`]  | `Direction`, `Turn`, compass-slot arithmetic          |
//! | [`router`]  | `Router` trait, `DijkstraRouter`, `Route`             |
//! | [`error`]   | `NetError`, `NetResult`                               |

pub mod error;
pub mod network;
pub mod orient;
pub mod router;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{NetError, NetResult};
pub use network::{Cross, Network, NetworkBuilder, Road};
pub use orient::{inbound_dir, outbound_dir, turn_between, Direction, Turn};
pub use router::{DijkstraRouter, Route, Router};
