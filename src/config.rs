//! Enumeration configuration and validation.
//!
//! Owners of the outer surface (CLI, files) build a [`SpaceConfig`] and
//! must pass it through [`SpaceConfig::validate`] before constructing a
//! schedule space or dispatcher. The core assumes a validated
//! configuration and asserts, rather than handles, violations of it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::DsKind;

/// An inclusive integer range `lo..=hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Inclusive lower bound.
    pub lo: usize,
    /// Inclusive upper bound.
    pub hi: usize,
}

impl Bounds {
    /// Creates the range `lo..=hi`.
    pub fn new(lo: usize, hi: usize) -> Self {
        Self { lo, hi }
    }

    /// The single-point range `n..=n`.
    pub fn exact(n: usize) -> Self {
        Self { lo: n, hi: n }
    }

    /// Whether the range contains no values (`lo > hi`).
    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }
}

impl From<(usize, usize)> for Bounds {
    fn from((lo, hi): (usize, usize)) -> Self {
        Self { lo, hi }
    }
}

/// Rejection reasons for an invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A range has `lo > hi`.
    #[error("{name} range is inverted: {lo}..{hi}")]
    InvertedRange {
        /// Range name (`nthread`, `nstep`, `npre_add`).
        name: &'static str,
        /// Offending lower bound.
        lo: usize,
        /// Offending upper bound.
        hi: usize,
    },
    /// `nthread` or `nstep` admits zero, which no schedule satisfies.
    #[error("{name} lower bound must be at least 1")]
    ZeroBound {
        /// Range name.
        name: &'static str,
    },
    /// Set enumeration needs at least one usable value.
    #[error("value_bound must be at least 1")]
    ValueBoundTooSmall,
    /// `distinct_priorities` only applies to priority queues.
    #[error("distinct_priorities requires kind=pqueue, got {kind}")]
    DistinctPrioritiesKind {
        /// Configured kind.
        kind: DsKind,
    },
    /// The worker pool cannot be empty.
    #[error("workers must be at least 1")]
    NoWorkers,
}

/// Full configuration surface consumed by [`crate::space`] and
/// [`crate::dispatch`].
///
/// Option semantics (symmetry options are independently toggleable):
/// - `thread_sym`: threads are interchangeable; enumerate one
///   representative per thread-permutation class.
/// - `generic_vals` (queue/pqueue): added values are interchangeable and
///   fixed to encounter order `0,1,…`; the value level never advances.
/// - `distinct_priorities` (pqueue): scores form a permutation of
///   `0..totalAdds` instead of arbitrary sequences.
/// - `adds_dominate` (queue/pqueue): keep only schedules where adds
///   (including pre-adds) are at least as many as removes.
/// - `no_all_add` (queue/pqueue): skip schedules whose concurrent steps
///   are all adds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceConfig {
    /// Data-structure kind to enumerate for.
    pub kind: DsKind,
    /// Range of thread counts.
    pub nthread: Bounds,
    /// Range of concurrent step counts (pre-adds excluded).
    pub nstep: Bounds,
    /// Range of pre-add counts.
    pub npre_add: Bounds,
    /// Strict upper bound on set values (sets only).
    pub value_bound: u32,
    /// Treat added values as interchangeable (queue/pqueue).
    pub generic_vals: bool,
    /// Give every add a unique priority score (pqueue).
    pub distinct_priorities: bool,
    /// Require #adds >= #removes (queue/pqueue).
    pub adds_dominate: bool,
    /// Reduce by thread symmetry.
    pub thread_sym: bool,
    /// Skip all-add schedules (queue/pqueue).
    pub no_all_add: bool,
    /// Worker pool size for the dispatcher.
    pub workers: usize,
}

impl SpaceConfig {
    /// A baseline configuration for `kind` matching the verifier's
    /// defaults: 1..=3 threads, 1..=3 steps, 0..=1 pre-adds, value bound 2,
    /// generic values, thread symmetry, 4 workers.
    pub fn new(kind: DsKind) -> Self {
        Self {
            kind,
            nthread: Bounds::new(1, 3),
            nstep: Bounds::new(1, 3),
            npre_add: Bounds::new(0, 1),
            value_bound: 2,
            generic_vals: true,
            distinct_priorities: false,
            adds_dominate: false,
            thread_sym: true,
            no_all_add: false,
            workers: 4,
        }
    }

    /// Sets the thread-count range.
    pub fn with_nthread(mut self, bounds: impl Into<Bounds>) -> Self {
        self.nthread = bounds.into();
        self
    }

    /// Sets the step-count range.
    pub fn with_nstep(mut self, bounds: impl Into<Bounds>) -> Self {
        self.nstep = bounds.into();
        self
    }

    /// Sets the pre-add-count range.
    pub fn with_npre_add(mut self, bounds: impl Into<Bounds>) -> Self {
        self.npre_add = bounds.into();
        self
    }

    /// Sets the set value bound.
    pub fn with_value_bound(mut self, bound: u32) -> Self {
        self.value_bound = bound;
        self
    }

    /// Sets `generic_vals`.
    pub fn with_generic_vals(mut self, on: bool) -> Self {
        self.generic_vals = on;
        self
    }

    /// Sets `distinct_priorities`.
    pub fn with_distinct_priorities(mut self, on: bool) -> Self {
        self.distinct_priorities = on;
        self
    }

    /// Sets `adds_dominate`.
    pub fn with_adds_dominate(mut self, on: bool) -> Self {
        self.adds_dominate = on;
        self
    }

    /// Sets `thread_sym`.
    pub fn with_thread_sym(mut self, on: bool) -> Self {
        self.thread_sym = on;
        self
    }

    /// Sets `no_all_add`.
    pub fn with_no_all_add(mut self, on: bool) -> Self {
        self.no_all_add = on;
        self
    }

    /// Sets the worker pool size.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Validates the configuration.
    ///
    /// Note the asymmetry with enumeration semantics: an *inverted* range
    /// is a caller mistake and rejected here, while a validated range can
    /// still yield an empty space (e.g. `nthread_lo > nstep_hi`), which is
    /// not an error — the space is simply exhausted immediately. Likewise
    /// `nstep.lo` below the thread count is accepted; every thread needs a
    /// step, so enumeration clamps the effective lower bound to `nthread`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, b) in [
            ("nthread", self.nthread),
            ("nstep", self.nstep),
            ("npre_add", self.npre_add),
        ] {
            if b.is_empty() {
                return Err(ConfigError::InvertedRange {
                    name,
                    lo: b.lo,
                    hi: b.hi,
                });
            }
        }
        if self.nthread.lo < 1 {
            return Err(ConfigError::ZeroBound { name: "nthread" });
        }
        if self.nstep.lo < 1 {
            return Err(ConfigError::ZeroBound { name: "nstep" });
        }
        if self.kind == DsKind::Set && self.value_bound < 1 {
            return Err(ConfigError::ValueBoundTooSmall);
        }
        if self.distinct_priorities && self.kind != DsKind::PQueue {
            return Err(ConfigError::DistinctPrioritiesKind { kind: self.kind });
        }
        if self.workers < 1 {
            return Err(ConfigError::NoWorkers);
        }
        Ok(())
    }
}
