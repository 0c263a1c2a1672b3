//! A single operation within a schedule.

use serde::{Deserialize, Serialize};

/// Operation kind.
///
/// Sets support all three; FIFO and priority queues support only `Add`
/// and `Remove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Op {
    /// Insert a value (with a priority score for priority queues).
    Add,
    /// Remove a value (set: by value; queues: head / highest priority).
    Remove,
    /// Membership test (sets only).
    Contains,
}

/// One operation executed by a thread (or as a pre-add).
///
/// Operand meaning depends on the data-structure kind: a set step always
/// carries `value`; a queue `Remove` carries no operands; a priority-queue
/// `Add` carries both `value` and `score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Step {
    /// Operation kind.
    pub op: Op,
    /// Value operand, absent for operations that take none.
    pub value: Option<u32>,
    /// Priority score, present only for priority-queue adds.
    pub score: Option<u32>,
}

impl Step {
    /// An `Add` of `value`.
    pub fn add(value: u32) -> Self {
        Self {
            op: Op::Add,
            value: Some(value),
            score: None,
        }
    }

    /// An `Add` of `value` with a priority `score`.
    pub fn add_scored(value: u32, score: u32) -> Self {
        Self {
            op: Op::Add,
            value: Some(value),
            score: Some(score),
        }
    }

    /// A `Remove` with no operand (queues).
    pub fn remove() -> Self {
        Self {
            op: Op::Remove,
            value: None,
            score: None,
        }
    }

    /// A `Remove` of `value` (sets).
    pub fn remove_value(value: u32) -> Self {
        Self {
            op: Op::Remove,
            value: Some(value),
            score: None,
        }
    }

    /// A `Contains` test for `value` (sets).
    pub fn contains(value: u32) -> Self {
        Self {
            op: Op::Contains,
            value: Some(value),
            score: None,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self.op {
            Op::Add => "ADD",
            Op::Remove => "REMOVE",
            Op::Contains => "CONTAINS",
        };
        write!(f, "{name}(")?;
        if let Some(v) = self.value {
            write!(f, "{v}")?;
        }
        if let Some(s) = self.score {
            write!(f, ",{s}")?;
        }
        write!(f, ")")
    }
}
