//! The level-stack enumerator shared by all three schedule-space kinds.
//!
//! The enumeration state is a hierarchy of levels, highest to lowest
//! precedence: `nthread` > `nstep` > `npre_add` > `partition` > `kinds` >
//! `values` > `scores` (the last only for priority queues). Each level has
//! an initializer, which positions it at its first state *given the
//! current state of every level above it*, and an incrementer, which moves
//! it to its successor. Advancing the whole hierarchy always attempts the
//! lowest level first; on exhaustion the level above is advanced and the
//! exhausted level reinitialized. Kind-specific behavior — alphabet size,
//! per-step versus per-add value rows, the optional scores level, the
//! `adds_dominate` / `no_all_add` filters — is data selected by `DsKind`,
//! not duplicated control flow.
//!
//! Shape invariant: every level's array shapes derive from the values of
//! the levels above it ([`partition`] rows from `nthread`, kind rows from
//! `partition`, value/score rows from the add counts in `kinds`), so an
//! initializer reallocates everything the levels below will write into.

use std::cmp::Ordering;

use crate::combinatorics::{
    compare_lo, next_lex_lo_2d, next_lex_lo_2d_sym, next_partition_lo, next_partition_sym_lo,
    next_perm_lo_2d,
};
use crate::config::SpaceConfig;
use crate::models::{DsKind, Schedule, Step};

/// One dimension of the enumeration hierarchy, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    NThread,
    NStep,
    NPreAdd,
    Partition,
    Kinds,
    Values,
    Scores,
}

const SET_LEVELS: &[Level] = &[
    Level::NThread,
    Level::NStep,
    Level::NPreAdd,
    Level::Partition,
    Level::Kinds,
    Level::Values,
];

const PQ_LEVELS: &[Level] = &[
    Level::NThread,
    Level::NStep,
    Level::NPreAdd,
    Level::Partition,
    Level::Kinds,
    Level::Values,
    Level::Scores,
];

pub(super) struct SpaceCore {
    cfg: SpaceConfig,
    /// Operation alphabet size for the kinds level: {ADD, REMOVE} for
    /// queues, plus CONTAINS for sets.
    alphabet: u32,

    nthread: usize,
    nstep: usize,
    npre_add: usize,

    /// Steps assigned to each thread; length `nthread`, sums to `nstep`.
    partition: Vec<usize>,
    /// `partition_stutter[i]` iff `partition[i] == partition[i+1]`;
    /// length `nthread - 1`.
    partition_stutter: Vec<bool>,
    /// Operation-kind codes per thread; row `i` has length `partition[i]`.
    kinds: Vec<Vec<u32>>,
    /// Adjacent threads with identical (length, kind-row). For sets this
    /// aligns with `kinds` (length `nthread - 1`); for queues it is
    /// shifted by one (length `nthread`, index 0 false) to align with the
    /// pre-add row leading the `values` array.
    kinds_stutter: Vec<bool>,
    /// Queue/pqueue only: add counts, `nadd[0]` the pre-adds, `nadd[i+1]`
    /// the adds of thread `i`. Length `nthread + 1`.
    nadd: Vec<usize>,
    /// Queue/pqueue only: sum of `nadd`.
    total_adds: usize,
    /// Value operands. Sets: one row per thread, length `partition[i]`.
    /// Queues: one row per add group (pre-adds first), length `nadd[i]`.
    values: Vec<Vec<u32>>,
    /// Pqueue only: adjacent add groups with equal values, gating score
    /// symmetry reduction. Length `nthread`.
    values_stutter: Vec<bool>,
    /// Pqueue only: score operands, shaped like `values`.
    scores: Vec<Vec<u32>>,
}

impl SpaceCore {
    /// Builds the core and positions it at the first schedule. Returns
    /// `None` if the configured space is empty.
    ///
    /// The configuration must already be validated; shape violations
    /// downstream of an unvalidated one are enumerator defects and panic.
    pub(super) fn start(cfg: SpaceConfig) -> Option<Self> {
        let alphabet = match cfg.kind {
            DsKind::Set => 3,
            DsKind::Queue | DsKind::PQueue => 2,
        };
        let mut core = Self {
            cfg,
            alphabet,
            nthread: 0,
            nstep: 0,
            npre_add: 0,
            partition: Vec::new(),
            partition_stutter: Vec::new(),
            kinds: Vec::new(),
            kinds_stutter: Vec::new(),
            nadd: Vec::new(),
            total_adds: 0,
            values: Vec::new(),
            values_stutter: Vec::new(),
            scores: Vec::new(),
        };
        core.position_first().then_some(core)
    }

    fn levels(&self) -> &'static [Level] {
        match self.cfg.kind {
            DsKind::Set | DsKind::Queue => SET_LEVELS,
            DsKind::PQueue => PQ_LEVELS,
        }
    }

    fn is_add_kind(&self) -> bool {
        matches!(self.cfg.kind, DsKind::Queue | DsKind::PQueue)
    }

    // ---- hierarchy plumbing ----------------------------------------

    fn init(&mut self, level: Level) -> bool {
        match level {
            Level::NThread => self.init_nthread(),
            Level::NStep => self.init_nstep(),
            Level::NPreAdd => self.init_npre_add(),
            Level::Partition => self.init_partition(),
            Level::Kinds => self.init_kinds(),
            Level::Values => self.init_values(),
            Level::Scores => self.init_scores(),
        }
    }

    fn advance(&mut self, level: Level) -> bool {
        match level {
            Level::NThread => self.inc_nthread(),
            Level::NStep => self.inc_nstep(),
            Level::NPreAdd => self.inc_npre_add(),
            Level::Partition => self.inc_partition(),
            Level::Kinds => self.inc_kinds(),
            Level::Values => self.inc_values(),
            Level::Scores => self.inc_scores(),
        }
    }

    /// Positions every level at its first state, top-down. When a level's
    /// initializer fails under the current outer state (an empty `nstep`
    /// window, or the kind filters rejecting every assignment), the level
    /// above is advanced and the initializer retried, exactly as [`bump`]
    /// does mid-run. Returns `false` if the whole space is empty.
    fn position_first(&mut self) -> bool {
        let levels = self.levels();
        if !self.init(levels[0]) {
            return false;
        }
        let mut i = 1;
        while i < levels.len() {
            if self.init(levels[i]) {
                i += 1;
            } else if !self.bump(i - 1) {
                return false;
            }
        }
        true
    }

    /// Advances level `i` to its next state, carrying into the levels
    /// above on exhaustion and reinitializing `i` afterwards. Levels below
    /// `i` are left for the caller. Returns `false` when the hierarchy is
    /// exhausted.
    fn bump(&mut self, i: usize) -> bool {
        let level = self.levels()[i];
        if self.advance(level) {
            return true;
        }
        loop {
            if i == 0 {
                return false;
            }
            if !self.bump(i - 1) {
                return false;
            }
            if self.init(level) {
                return true;
            }
        }
    }

    /// Advances the full hierarchy past the current schedule. Returns
    /// `false` on exhaustion.
    pub(super) fn advance_past_current(&mut self) -> bool {
        self.bump(self.levels().len() - 1)
    }

    // ---- nthread ----------------------------------------------------

    fn alloc_thread_arrays(&mut self) {
        let n = self.nthread;
        self.partition = vec![0; n];
        self.partition_stutter = vec![false; n - 1];
        self.kinds = vec![Vec::new(); n];
        if self.is_add_kind() {
            self.kinds_stutter = vec![false; n];
            self.nadd = vec![0; n + 1];
            self.values = vec![Vec::new(); n + 1];
            self.values_stutter = vec![false; n];
            self.scores = vec![Vec::new(); n + 1];
        } else {
            self.kinds_stutter = vec![false; n - 1];
            self.values = vec![Vec::new(); n];
        }
    }

    fn init_nthread(&mut self) -> bool {
        if self.cfg.nthread.lo <= self.cfg.nthread.hi {
            self.nthread = self.cfg.nthread.lo;
            self.alloc_thread_arrays();
            return true;
        }
        false
    }

    fn inc_nthread(&mut self) -> bool {
        if self.nthread < self.cfg.nthread.hi {
            self.nthread += 1;
            self.alloc_thread_arrays();
            return true;
        }
        false
    }

    // ---- nstep ------------------------------------------------------

    /// Every thread needs at least one step, so the effective lower bound
    /// is `max(nstep_lo, nthread)`; fails when that exceeds `nstep_hi`.
    fn init_nstep(&mut self) -> bool {
        if self.cfg.nstep.lo >= self.nthread {
            self.nstep = self.cfg.nstep.lo;
            return true;
        }
        if self.nthread <= self.cfg.nstep.hi {
            self.nstep = self.nthread;
            return true;
        }
        false
    }

    fn inc_nstep(&mut self) -> bool {
        if self.nstep < self.cfg.nstep.hi {
            self.nstep += 1;
            return true;
        }
        false
    }

    // ---- npre_add ---------------------------------------------------

    fn init_npre_add(&mut self) -> bool {
        if self.cfg.npre_add.lo <= self.cfg.npre_add.hi {
            self.npre_add = self.cfg.npre_add.lo;
            if self.is_add_kind() {
                self.nadd[0] = self.npre_add;
            }
            return true;
        }
        false
    }

    fn inc_npre_add(&mut self) -> bool {
        if self.npre_add < self.cfg.npre_add.hi {
            self.npre_add += 1;
            if self.is_add_kind() {
                self.nadd[0] = self.npre_add;
            }
            return true;
        }
        false
    }

    // ---- partition ----------------------------------------------------

    fn recompute_partition_derived(&mut self) {
        for i in 0..self.nthread - 1 {
            self.partition_stutter[i] = self.partition[i] == self.partition[i + 1];
        }
        for i in 0..self.nthread {
            self.kinds[i] = vec![0; self.partition[i]];
            if self.cfg.kind == DsKind::Set {
                self.values[i] = vec![0; self.partition[i]];
            }
        }
    }

    /// First composition in both the plain and symmetry-reduced orders:
    /// `(nstep - nthread + 1, 1, …, 1)`.
    fn init_partition(&mut self) -> bool {
        assert!(self.nstep >= self.nthread);
        self.partition[0] = self.nstep - self.nthread + 1;
        for p in self.partition[1..].iter_mut() {
            *p = 1;
        }
        self.recompute_partition_derived();
        true
    }

    fn inc_partition(&mut self) -> bool {
        let advanced = if self.cfg.thread_sym {
            next_partition_sym_lo(&mut self.partition)
        } else {
            next_partition_lo(&mut self.partition)
        };
        if advanced {
            self.recompute_partition_derived();
        }
        advanced
    }

    // ---- kinds --------------------------------------------------------

    fn recompute_kinds_derived(&mut self) {
        let n = self.nthread;
        if self.is_add_kind() {
            self.values[0] = vec![0; self.npre_add];
            if self.cfg.kind == DsKind::PQueue {
                self.scores[0] = vec![0; self.npre_add];
            }
            self.total_adds = self.npre_add;
            for i in 0..n {
                let adds = self.kinds[i].iter().filter(|&&k| k == 0).count();
                self.total_adds += adds;
                self.nadd[i + 1] = adds;
                self.values[i + 1] = vec![0; adds];
                if self.cfg.kind == DsKind::PQueue {
                    self.scores[i + 1] = vec![0; adds];
                }
            }
            self.kinds_stutter[0] = false;
            for i in 1..n {
                self.kinds_stutter[i] =
                    self.partition_stutter[i - 1] && self.kinds[i - 1] == self.kinds[i];
            }
        } else {
            for i in 0..n - 1 {
                self.kinds_stutter[i] =
                    self.partition_stutter[i] && self.kinds[i] == self.kinds[i + 1];
            }
        }
    }

    /// Post-filter on a kinds assignment. Sets take every assignment; the
    /// queue kinds honor `no_all_add` and `adds_dominate` (#removes =
    /// nstep - (total_adds - npre_add), so adds dominate iff
    /// `2 * total_adds >= nstep + npre_add`).
    fn kinds_accepted(&self) -> bool {
        if !self.is_add_kind() {
            return true;
        }
        if self.cfg.no_all_add && self.kinds.iter().flatten().all(|&k| k == 0) {
            return false;
        }
        if self.cfg.adds_dominate && 2 * self.total_adds < self.nstep + self.npre_add {
            return false;
        }
        true
    }

    /// Starts from the all-ADD assignment, advancing past it if the
    /// filters reject it.
    fn init_kinds(&mut self) -> bool {
        for i in 0..self.nthread {
            self.kinds[i] = vec![0; self.partition[i]];
        }
        self.recompute_kinds_derived();
        if self.kinds_accepted() {
            return true;
        }
        self.inc_kinds()
    }

    fn inc_kinds(&mut self) -> bool {
        loop {
            let advanced = if self.cfg.thread_sym {
                next_lex_lo_2d_sym(self.alphabet, &mut self.kinds, &self.partition_stutter)
            } else {
                next_lex_lo_2d(self.alphabet, &mut self.kinds)
            };
            if !advanced {
                return false;
            }
            self.recompute_kinds_derived();
            if self.kinds_accepted() {
                return true;
            }
        }
    }

    // ---- values -------------------------------------------------------

    fn recompute_values_derived(&mut self) {
        if self.cfg.kind != DsKind::PQueue {
            return;
        }
        for i in 0..self.nthread {
            self.values_stutter[i] = if self.cfg.generic_vals {
                self.kinds_stutter[i]
            } else {
                self.kinds_stutter[i] && self.values[i] == self.values[i + 1]
            };
        }
    }

    fn init_values(&mut self) -> bool {
        match self.cfg.kind {
            DsKind::Set => {
                for i in 0..self.nthread {
                    self.values[i] = vec![0; self.partition[i]];
                }
            }
            DsKind::Queue | DsKind::PQueue => {
                // generic values are the canonical numbering in encounter
                // order and never advance
                let mut count = 0;
                for i in 0..=self.nthread {
                    let m = self.nadd[i];
                    self.values[i] = (0..m)
                        .map(|j| if self.cfg.generic_vals { count + j as u32 } else { 0 })
                        .collect();
                    count += m as u32;
                }
                self.recompute_values_derived();
            }
        }
        true
    }

    fn inc_values(&mut self) -> bool {
        match self.cfg.kind {
            DsKind::Set => {
                if self.cfg.thread_sym {
                    next_lex_lo_2d_sym(self.cfg.value_bound, &mut self.values, &self.kinds_stutter)
                } else {
                    next_lex_lo_2d(self.cfg.value_bound, &mut self.values)
                }
            }
            DsKind::Queue | DsKind::PQueue => {
                if self.cfg.generic_vals {
                    return false;
                }
                let bound = self.total_adds as u32;
                let advanced = if self.cfg.thread_sym {
                    next_lex_lo_2d_sym(bound, &mut self.values, &self.kinds_stutter)
                } else {
                    next_lex_lo_2d(bound, &mut self.values)
                };
                if advanced {
                    self.recompute_values_derived();
                }
                advanced
            }
        }
    }

    // ---- scores (pqueue) ------------------------------------------------

    /// Representative test for the score dimension: adjacent add groups
    /// with equal values must carry non-decreasing scores.
    fn scores_are_representative(&self) -> bool {
        for i in 1..self.nthread {
            if self.values_stutter[i]
                && compare_lo(&self.scores[i], &self.scores[i + 1]) == Ordering::Greater
            {
                return false;
            }
        }
        true
    }

    fn init_scores(&mut self) -> bool {
        if self.cfg.distinct_priorities {
            // descending permutation, the first in the next_perm_lo order
            let mut next = self.total_adds as u32;
            for i in 0..=self.nthread {
                self.scores[i] = (0..self.nadd[i])
                    .map(|_| {
                        next -= 1;
                        next
                    })
                    .collect();
            }
            // the first permutation may itself fail the representative test
            if self.cfg.thread_sym && !self.scores_are_representative() {
                return self.inc_scores();
            }
        } else {
            for i in 0..=self.nthread {
                self.scores[i] = vec![0; self.nadd[i]];
            }
        }
        true
    }

    fn inc_scores(&mut self) -> bool {
        if self.cfg.distinct_priorities {
            while next_perm_lo_2d(&mut self.scores) {
                if !self.cfg.thread_sym || self.scores_are_representative() {
                    return true;
                }
            }
            return false;
        }
        let bound = self.total_adds as u32;
        if self.cfg.thread_sym {
            next_lex_lo_2d_sym(bound, &mut self.scores, &self.values_stutter)
        } else {
            next_lex_lo_2d(bound, &mut self.scores)
        }
    }

    // ---- snapshot -------------------------------------------------------

    /// Materializes the current state as an immutable [`Schedule`].
    pub(super) fn snapshot(&self) -> Schedule {
        let (pre_adds, threads) = match self.cfg.kind {
            DsKind::Set => self.snapshot_set(),
            DsKind::Queue | DsKind::PQueue => self.snapshot_add_kind(),
        };
        let schedule = Schedule {
            id: None,
            kind: self.cfg.kind,
            nthread: self.nthread,
            nstep: self.nstep,
            pre_adds,
            threads,
        };
        debug_assert!(schedule.is_consistent());
        schedule
    }

    fn snapshot_set(&self) -> (Vec<Step>, Vec<Vec<Step>>) {
        let pre_adds = (0..self.npre_add as u32).map(Step::add).collect();
        let threads = (0..self.nthread)
            .map(|i| {
                (0..self.partition[i])
                    .map(|j| {
                        let v = self.values[i][j];
                        match self.kinds[i][j] {
                            0 => Step::add(v),
                            1 => Step::remove_value(v),
                            2 => Step::contains(v),
                            k => unreachable!("kind code {k} outside set alphabet"),
                        }
                    })
                    .collect()
            })
            .collect();
        (pre_adds, threads)
    }

    fn snapshot_add_kind(&self) -> (Vec<Step>, Vec<Vec<Step>>) {
        let scored = self.cfg.kind == DsKind::PQueue;
        let make_add = |value, score| {
            if scored {
                Step::add_scored(value, score)
            } else {
                Step::add(value)
            }
        };
        let pre_adds = (0..self.npre_add)
            .map(|i| {
                let score = if scored { self.scores[0][i] } else { 0 };
                make_add(self.values[0][i], score)
            })
            .collect();
        let threads = (0..self.nthread)
            .map(|i| {
                let mut nth_add = 0;
                (0..self.partition[i])
                    .map(|j| {
                        if self.kinds[i][j] == 0 {
                            let value = self.values[i + 1][nth_add];
                            let score = if scored { self.scores[i + 1][nth_add] } else { 0 };
                            nth_add += 1;
                            make_add(value, score)
                        } else {
                            Step::remove()
                        }
                    })
                    .collect()
            })
            .collect();
        (pre_adds, threads)
    }
}
