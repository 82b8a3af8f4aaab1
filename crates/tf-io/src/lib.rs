//! `tf-io` — the tuple-file collaborator.
//!
//! # File format
//!
//! Every input file shares one shape: an optional `#(field1,field2,…)`
//! header line followed by one parenthesized comma-delimited tuple per line:
//!
//! ```text
//! #(id,from,to,speed,planTime)
//! (10001, 15, 35, 6, 1)
//! (10002, 85, 24, 2, 1)
//! ```
//!
//! The reader strips the decoration and hands the comma-delimited bodies to
//! a `csv` reader; all record semantics live in the typed record structs of
//! `tf-core`.  The writer emits the answer file in the same shape.

pub mod error;
pub mod reader;
pub mod writer;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{IoError, IoResult};
pub use reader::{read_answers, read_cars, read_crosses, read_roads};
pub use writer::write_answers;
