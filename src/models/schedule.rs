//! Schedule (test case) model.
//!
//! A schedule is one complete concurrent test case: a sequence of pre-adds
//! applied before concurrency begins, followed by one operation sequence
//! per thread, executed concurrently. Schedules are produced canonically
//! by [`crate::space::ScheduleSpace`] and never mutated afterwards except
//! for the identifier stamped at lease time by the dispatcher.

use serde::{Deserialize, Serialize};

use super::Step;

/// Kind of concurrent data structure under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DsKind {
    /// A set (add / remove / contains by value).
    Set,
    /// A FIFO queue.
    Queue,
    /// A priority queue.
    PQueue,
}

impl std::fmt::Display for DsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DsKind::Set => "set",
            DsKind::Queue => "queue",
            DsKind::PQueue => "pqueue",
        };
        f.write_str(s)
    }
}

/// One concurrent test case.
///
/// Invariant: `threads.len() == nthread` and the per-thread step counts
/// sum to `nstep` (pre-adds excluded).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Schedule {
    /// Identifier assigned at lease time; `None` until leased.
    pub id: Option<u64>,
    /// Data-structure kind this schedule exercises.
    pub kind: DsKind,
    /// Number of concurrent threads.
    pub nthread: usize,
    /// Total concurrent step count, excluding pre-adds.
    pub nstep: usize,
    /// Operations applied sequentially before concurrent execution.
    pub pre_adds: Vec<Step>,
    /// Operation sequence per thread, `threads[i]` executed by thread `i`.
    pub threads: Vec<Vec<Step>>,
}

impl Schedule {
    /// Returns a copy stamped with a lease identifier.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Total number of steps across all threads.
    pub fn total_steps(&self) -> usize {
        self.threads.iter().map(Vec::len).sum()
    }

    /// Checks the structural invariant relating `nthread`, `nstep`, and
    /// the per-thread sequences.
    pub fn is_consistent(&self) -> bool {
        self.threads.len() == self.nthread && self.total_steps() == self.nstep
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => writeln!(f, "begin schedule[id={id} kind={}]", self.kind)?,
            None => writeln!(f, "begin schedule[kind={}]", self.kind)?,
        }
        write!(f, "  presteps  = {{")?;
        for (i, s) in self.pre_adds.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{s}")?;
        }
        writeln!(f, "}}")?;
        for (i, steps) in self.threads.iter().enumerate() {
            write!(f, "  thread[{i}] = {{")?;
            for (j, s) in steps.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{s}")?;
            }
            writeln!(f, "}}")?;
        }
        write!(f, "end schedule")
    }
}
