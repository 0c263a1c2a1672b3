//! Fail-fast dispatch of schedules to a verification oracle.
//!
//! A [`Dispatcher`] drains a [`ScheduleSpace`] through a fixed pool of
//! worker threads. Workers lease one schedule at a time under a lock (the
//! space is a shared cursor, never cloned), stamp it with a run-unique id,
//! and hand it to the [`Oracle`] outside the lock. The first failing
//! verdict raises a stop flag; workers finish their in-flight
//! verification and stop leasing, so a run ends shortly after the first
//! counterexample instead of grinding through the rest of the space.
//!
//! # Usage
//!
//! ```
//! use u_verify::config::SpaceConfig;
//! use u_verify::dispatch::{Dispatcher, Oracle, RunOutcome, Verdict};
//! use u_verify::models::{DsKind, Schedule};
//!
//! struct AlwaysPass;
//! impl Oracle for AlwaysPass {
//!     fn verify(&self, _schedule: &Schedule) -> Verdict {
//!         Verdict::Pass
//!     }
//! }
//!
//! let config = SpaceConfig::new(DsKind::Set)
//!     .with_nthread((1, 2))
//!     .with_nstep((1, 2))
//!     .with_workers(2);
//! let dispatcher = Dispatcher::new(config).unwrap();
//! match dispatcher.run(&AlwaysPass) {
//!     RunOutcome::AllPassed { verified, .. } => assert!(verified > 0),
//!     RunOutcome::Failed { .. } => unreachable!(),
//! }
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::config::{ConfigError, SpaceConfig};
use crate::models::Schedule;
use crate::space::ScheduleSpace;

/// Result of verifying one schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The schedule exposed no violation.
    Pass,
    /// The schedule is a counterexample; the payload is an opaque
    /// diagnostic (typically the oracle's output) kept for reporting.
    Fail(String),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Decides whether one schedule passes verification.
///
/// Implementations are shared across worker threads and must tolerate
/// concurrent calls. Verification runs outside the lease lock, so a slow
/// oracle blocks only its own worker.
pub trait Oracle: Send + Sync {
    fn verify(&self, schedule: &Schedule) -> Verdict;
}

/// Terminal state of a dispatch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The space was drained and every schedule passed.
    AllPassed {
        /// Number of schedules verified.
        verified: u64,
        elapsed: Duration,
    },
    /// Some schedule failed; the run stopped early.
    Failed {
        /// Id of the failing schedule; when several workers fail at
        /// once, the lowest id wins.
        schedule_id: u64,
        diagnostic: String,
        /// Schedules that passed before the stop took effect.
        verified: u64,
        elapsed: Duration,
    },
}

impl RunOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, RunOutcome::AllPassed { .. })
    }
}

/// The shared cursor: the space plus the next lease id, advanced together.
struct Lease {
    space: ScheduleSpace,
    next_id: u64,
}

/// Leases schedules from one space to a pool of oracle workers.
pub struct Dispatcher {
    lease: Mutex<Lease>,
    workers: usize,
    stop: AtomicBool,
    verified: AtomicU64,
    failure: Mutex<Option<(u64, String)>>,
}

impl Dispatcher {
    /// Validates `config` and positions the space; the worker count is
    /// taken from `config.workers`.
    pub fn new(config: SpaceConfig) -> Result<Self, ConfigError> {
        let workers = config.workers;
        let space = ScheduleSpace::new(config)?;
        Ok(Self {
            lease: Mutex::new(Lease { space, next_id: 0 }),
            workers,
            stop: AtomicBool::new(false),
            verified: AtomicU64::new(0),
            failure: Mutex::new(None),
        })
    }

    /// Drains the space, verifying every schedule, and reports the
    /// outcome. Consumes the dispatcher: the space cannot be rewound.
    pub fn run<O: Oracle>(self, oracle: &O) -> RunOutcome {
        let started = Instant::now();
        info!(workers = self.workers, "dispatch run starting");
        std::thread::scope(|scope| {
            for _ in 0..self.workers {
                scope.spawn(|| self.worker(oracle));
            }
        });
        let elapsed = started.elapsed();
        let verified = self.verified.load(Ordering::Acquire);
        match self.failure.into_inner() {
            Some((schedule_id, diagnostic)) => {
                error!(schedule_id, verified, ?elapsed, "run failed");
                RunOutcome::Failed {
                    schedule_id,
                    diagnostic,
                    verified,
                    elapsed,
                }
            }
            None => {
                info!(verified, ?elapsed, "run passed");
                RunOutcome::AllPassed { verified, elapsed }
            }
        }
    }

    fn worker<O: Oracle>(&self, oracle: &O) {
        debug!("worker started");
        while let Some(schedule) = self.next_lease() {
            match oracle.verify(&schedule) {
                Verdict::Pass => {
                    self.verified.fetch_add(1, Ordering::AcqRel);
                }
                Verdict::Fail(diagnostic) => {
                    self.record_failure(&schedule, diagnostic);
                    break;
                }
            }
        }
        debug!("worker stopped");
    }

    fn next_lease(&self) -> Option<Schedule> {
        if self.stop.load(Ordering::Acquire) {
            return None;
        }
        let mut lease = self.lease.lock();
        let schedule = lease.space.next()?.with_id(lease.next_id);
        lease.next_id += 1;
        debug!(id = lease.next_id - 1, "leased schedule");
        Some(schedule)
    }

    fn record_failure(&self, schedule: &Schedule, diagnostic: String) {
        self.stop.store(true, Ordering::Release);
        // id was stamped at lease time
        let id = match schedule.id {
            Some(id) => id,
            None => return,
        };
        let mut failure = self.failure.lock();
        if failure.as_ref().map_or(true, |(seen, _)| id < *seen) {
            *failure = Some((id, diagnostic));
        }
    }
}
