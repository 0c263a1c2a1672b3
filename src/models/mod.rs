//! Schedule domain models.
//!
//! Provides the value types exchanged between the schedule spaces, the
//! dispatcher, and external collaborators (renderer, oracle): an operation
//! [`Step`], a complete test-case [`Schedule`], and the data-structure
//! [`DsKind`] tag. All are immutable once built and serde-serializable so
//! callers can encode them however their oracle expects.

mod schedule;
mod step;

pub use schedule::{DsKind, Schedule};
pub use step::{Op, Step};
