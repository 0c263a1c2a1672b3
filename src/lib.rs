//! Combinatorial schedule generation for verifying concurrent data
//! structures.
//!
//! Checking a concurrent set, queue, or priority queue against its
//! sequential specification means running it under many small concurrent
//! workloads and asking an oracle (a model checker or other verifier)
//! whether each one is linearizable. This crate generates those workloads
//! — exhaustively, canonically, and without duplicates — and feeds them to
//! the oracle.
//!
//! # Modules
//!
//! - **`combinatorics`**: in-place successor functions — mixed-radix
//!   sequences, permutations, integer partitions, and their
//!   symmetry-reduced variants
//! - **`models`**: domain types — `Op`, `Step`, `Schedule`, `DsKind`
//! - **`config`**: `SpaceConfig` bounds and flags, validated up front
//! - **`space`**: `ScheduleSpace`, the resumable level-stack enumerator
//! - **`dispatch`**: `Dispatcher`, a fail-fast worker pool leasing
//!   schedules to an [`dispatch::Oracle`]
//!
//! # Architecture
//!
//! The enumerator is a cursor, not a collection: spaces routinely hold
//! millions of schedules, so state lives in a fixed set of in-place
//! arrays (one per hierarchy level) and each schedule is materialized
//! only at hand-off. Symmetry reduction (thread-permutation and value
//! relabeling) happens during enumeration, not by post-filtering, which
//! keeps the visited fraction proportional to the reduced space.

pub mod combinatorics;
pub mod config;
pub mod dispatch;
pub mod models;
pub mod space;
